// Grouping files (TOML) and the built-in 2025 American and National League races.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::SeasonError;
use crate::grouping::Grouping;
use crate::outcome::Series;
use crate::seeding::{DivisionContest, FixedSeed, SeedingRules};
use crate::team::TeamRecord;
use crate::tiebreak::{TiebreakEntry, TiebreakTable};

const AL_2025: &str = include_str!("../data/al.toml");
const NL_2025: &str = include_str!("../data/nl.toml");

/// Names accepted by [`builtin`].
pub const BUILTIN_GROUPINGS: [&str; 2] = ["al", "nl"];

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to read tiebreak CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Invalid(#[from] SeasonError),

    #[error("unknown built-in grouping `{0}` (expected one of: al, nl)")]
    UnknownBuiltin(String),
}

impl ConfigError {
    /// Classify an I/O failure on `path`; a missing file gets its own variant.
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// File layout
// ---------------------------------------------------------------------------

/// Raw deserialization target for a grouping file.
#[derive(Debug, Clone, Deserialize)]
struct GroupingFile {
    name: String,
    #[serde(default)]
    season_length: Option<u32>,
    #[serde(default)]
    wild_card_slots: Option<usize>,
    teams: Vec<TeamRecord>,
    #[serde(default)]
    series: Vec<Series>,
    #[serde(default)]
    contests: Vec<DivisionContest>,
    #[serde(default)]
    fixed_seeds: Vec<FixedSeed>,
    #[serde(default)]
    tiebreaks: Vec<TiebreakEntry>,
}

impl GroupingFile {
    fn into_grouping(self) -> Result<Grouping, SeasonError> {
        let defaults = SeedingRules::default();
        let rules = SeedingRules {
            contests: self.contests,
            fixed_seeds: self.fixed_seeds,
            wild_card_slots: self.wild_card_slots.unwrap_or(defaults.wild_card_slots),
        };
        let tiebreaks = TiebreakTable::from_entries(&self.tiebreaks)?;
        let series = self.series.into_iter().map(Series::with_default_id).collect();
        Grouping::new(
            self.name,
            self.teams,
            series,
            rules,
            tiebreaks,
            self.season_length,
        )
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse grouping TOML. `origin` names the source in error messages.
pub fn parse_grouping(text: &str, origin: &Path) -> Result<Grouping, ConfigError> {
    let file: GroupingFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: origin.to_path_buf(),
        source: e,
    })?;
    Ok(file.into_grouping()?)
}

/// Load and validate a grouping file.
pub fn load_grouping(path: &Path) -> Result<Grouping, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    parse_grouping(&text, path)
}

/// One of the groupings shipped with the crate: `al` or `nl`.
pub fn builtin(name: &str) -> Result<Grouping, ConfigError> {
    let (text, origin) = match name.to_ascii_lowercase().as_str() {
        "al" => (AL_2025, "data/al.toml"),
        "nl" => (NL_2025, "data/nl.toml"),
        _ => return Err(ConfigError::UnknownBuiltin(name.to_string())),
    };
    parse_grouping(text, Path::new(origin))
}
