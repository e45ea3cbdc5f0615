use serde::{Deserialize, Serialize};
use std::fmt;

/// Current record of a team still in the race.
///
/// Records are snapshots: resolving standings never mutates them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: String,

    /// Display name, e.g. "Blue Jays" for `bluejays`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub wins: u32,

    pub losses: u32,

    /// Regular-season games still to be played
    pub games_remaining: u32,
}

impl TeamRecord {
    pub fn new(team: impl Into<String>, wins: u32, losses: u32, games_remaining: u32) -> Self {
        TeamRecord {
            team: team.into(),
            name: None,
            wins,
            losses,
            games_remaining,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, falling back to the team id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.team)
    }

    /// Total games in this team's season.
    pub fn season_length(&self) -> u32 {
        self.wins + self.losses + self.games_remaining
    }

    /// Final record if the team wins `additional` of its remaining games.
    ///
    /// Returns `None` when `additional` exceeds the games remaining.
    pub fn finish(&self, additional: u32) -> Option<FinalRecord> {
        let lost = self.games_remaining.checked_sub(additional)?;
        Some(FinalRecord {
            wins: self.wins + additional,
            losses: self.losses + lost,
            total_games: self.season_length(),
        })
    }
}

/// End-of-season record derived from a [`TeamRecord`] and an outcome vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FinalRecord {
    pub wins: u32,
    pub losses: u32,
    pub total_games: u32,
}

impl fmt::Display for FinalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}
