use thiserror::Error;

/// Failures raised while resolving standings, seeding or the outcome space.
///
/// Every variant is a hard failure: the core never clamps an outcome or
/// guesses a tiebreak winner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeasonError {
    #[error("series `{series}` result {home_wins} is outside 0..={length}")]
    InvalidOutcome {
        series: String,
        home_wins: u32,
        length: u32,
    },

    #[error("no result supplied for series `{0}`")]
    IncompleteOutcome(String),

    #[error("result supplied for unknown series `{0}`")]
    UnknownSeries(String),

    #[error("team `{team}` cannot win {additional} games with {remaining} remaining")]
    ExceedsRemaining {
        team: String,
        additional: u32,
        remaining: u32,
    },

    #[error("no tiebreak defined between `{0}` and `{1}`")]
    TiebreakUndefined(String, String),

    #[error("tiebreaks are not transitive among {}", .0.join(", "))]
    TiebreakCycle(Vec<String>),

    #[error("tiebreak winner `{winner}` is neither `{team1}` nor `{team2}`")]
    InvalidTiebreak {
        team1: String,
        team2: String,
        winner: String,
    },

    #[error("override for `{slot}` names `{team}`, who is not a contender")]
    InvalidOverride { slot: String, team: String },

    #[error("override names unknown slot `{0}`")]
    UnknownSlot(String),

    #[error("unknown team `{0}`")]
    UnknownTeam(String),

    #[error("team `{0}` appears more than once")]
    DuplicateTeam(String),

    #[error("invalid grouping: {0}")]
    InvalidGrouping(String),

    #[error("outcome space over {0} series is too large to enumerate")]
    SpaceTooLarge(usize),
}

pub type Result<T> = std::result::Result<T, SeasonError>;
