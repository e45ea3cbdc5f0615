/// Games in every remaining series unless a series says otherwise
pub const DEFAULT_SERIES_LENGTH: u32 = 3;

/// Wild-card berths per league
pub const DEFAULT_WILD_CARD_SLOTS: usize = 3;

/// Upper bound on enumerated outcome vectors (4^10)
pub const MAX_PERMUTATIONS: u64 = 1 << 20;

/// Label used for teams that miss the playoffs
pub const ELIMINATED_LABEL: &str = "Eliminated";
