use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Result, SeasonError};
use crate::outcome::{OutcomeVector, Series};
use crate::team::{FinalRecord, TeamRecord};

/// Final records for every team in a grouping, keyed by team id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FinalStandings {
    records: BTreeMap<String, FinalRecord>,
}

impl FinalStandings {
    pub fn get(&self, team: &str) -> Option<&FinalRecord> {
        self.records.get(team)
    }

    pub fn wins(&self, team: &str) -> Result<u32> {
        self.get(team)
            .map(|r| r.wins)
            .ok_or_else(|| SeasonError::UnknownTeam(team.to_string()))
    }

    pub fn contains(&self, team: &str) -> bool {
        self.records.contains_key(team)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FinalRecord)> {
        self.records.iter().map(|(team, rec)| (team.as_str(), rec))
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Teams ordered by final wins, most first. Equal wins fall back to team
    /// id so the order is reproducible; it carries no tiebreak meaning.
    pub fn by_wins(&self) -> Vec<(&str, u32)> {
        let mut teams: Vec<(&str, u32)> = self.iter().map(|(t, r)| (t, r.wins)).collect();
        teams.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        teams
    }
}

impl FromIterator<(String, FinalRecord)> for FinalStandings {
    fn from_iter<I: IntoIterator<Item = (String, FinalRecord)>>(iter: I) -> Self {
        FinalStandings {
            records: iter.into_iter().collect(),
        }
    }
}

/// Compute final records from current records and a complete outcome vector.
///
/// Each team gains the wins its side takes in every series it plays and
/// loses the rest of its remaining games. Teams outside every modelled series
/// gain nothing.
///
/// # Errors
/// * [`SeasonError::IncompleteOutcome`] / [`SeasonError::UnknownSeries`] when
///   `outcomes` does not cover exactly `series`
/// * [`SeasonError::InvalidOutcome`] for a result above the series length
/// * [`SeasonError::ExceedsRemaining`] when series wins would exceed a team's
///   games remaining
/// * [`SeasonError::DuplicateTeam`] when `records` repeats a team
pub fn resolve_standings(
    records: &[TeamRecord],
    series: &[Series],
    outcomes: &OutcomeVector,
) -> Result<FinalStandings> {
    outcomes.validate(series)?;

    let mut final_records = BTreeMap::new();
    for record in records {
        let additional: u32 = series
            .iter()
            .filter_map(|s| {
                let k = outcomes.get(&s.id)?;
                s.wins_for(&record.team, k)
            })
            .sum();

        let fin = record
            .finish(additional)
            .ok_or_else(|| SeasonError::ExceedsRemaining {
                team: record.team.clone(),
                additional,
                remaining: record.games_remaining,
            })?;

        if final_records.insert(record.team.clone(), fin).is_some() {
            return Err(SeasonError::DuplicateTeam(record.team.clone()));
        }
    }

    Ok(FinalStandings {
        records: final_records,
    })
}
