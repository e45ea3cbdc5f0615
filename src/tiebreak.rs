use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::config::ConfigError;
use crate::error::{Result, SeasonError};

/// Hand-curated tiebreak outcomes between specific pairs of teams.
///
/// Pairs are stored with team names in lexicographic order, so lookups are
/// independent of argument order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TiebreakTable {
    winners: HashMap<(String, String), String>,
}

/// One row of a tiebreak table as it appears in grouping files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiebreakEntry {
    pub teams: [String; 2],
    pub winner: String,
}

fn pair_key(team1: &str, team2: &str) -> (String, String) {
    if team1 < team2 {
        (team1.to_string(), team2.to_string())
    } else {
        (team2.to_string(), team1.to_string())
    }
}

impl TiebreakTable {
    pub fn new() -> Self {
        TiebreakTable {
            winners: HashMap::new(),
        }
    }

    /// Build a table from file entries, rejecting winners outside their pair.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a TiebreakEntry>) -> Result<Self> {
        let mut table = TiebreakTable::new();
        for entry in entries {
            table.insert(&entry.teams[0], &entry.teams[1], &entry.winner)?;
        }
        Ok(table)
    }

    /// Read a table from CSV. Format: team1,team2,winner (no header).
    pub fn read_from_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let file = std::fs::File::open(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_reader(file)
    }

    /// Read CSV rows from any reader. Rows without exactly three fields are
    /// skipped with a warning.
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, ConfigError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut table = TiebreakTable::new();
        for row in rdr.records() {
            let row = row?;
            if row.len() != 3 {
                warn!("skipping malformed tiebreak row: {:?}", row);
                continue;
            }
            table.insert(&row[0], &row[1], &row[2])?;
        }
        Ok(table)
    }

    /// Add or replace the tiebreak for a pair.
    pub fn insert(&mut self, team1: &str, team2: &str, winner: &str) -> Result<()> {
        if team1 == team2 || (winner != team1 && winner != team2) {
            return Err(SeasonError::InvalidTiebreak {
                team1: team1.to_string(),
                team2: team2.to_string(),
                winner: winner.to_string(),
            });
        }
        self.winners.insert(pair_key(team1, team2), winner.to_string());
        Ok(())
    }

    /// Remove the tiebreak for a pair.
    pub fn remove(&mut self, team1: &str, team2: &str) {
        self.winners.remove(&pair_key(team1, team2));
    }

    /// Get the tiebreak winner for a pair, if one exists.
    pub fn winner(&self, team1: &str, team2: &str) -> Option<&str> {
        self.winners.get(&pair_key(team1, team2)).map(String::as_str)
    }

    /// Like [`winner`](Self::winner), but a missing entry is an error.
    pub fn resolve(&self, team1: &str, team2: &str) -> Result<&str> {
        self.winner(team1, team2)
            .ok_or_else(|| SeasonError::TiebreakUndefined(team1.to_string(), team2.to_string()))
    }

    pub fn contains(&self, team1: &str, team2: &str) -> bool {
        self.winners.contains_key(&pair_key(team1, team2))
    }

    /// Copy every entry of `other` into this table, replacing existing pairs.
    pub fn merge(&mut self, other: &TiebreakTable) {
        for (key, winner) in &other.winners {
            self.winners.insert(key.clone(), winner.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}
