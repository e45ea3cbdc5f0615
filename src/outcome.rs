use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::DEFAULT_SERIES_LENGTH;
use crate::error::{Result, SeasonError};

fn default_length() -> u32 {
    DEFAULT_SERIES_LENGTH
}

/// A remaining series between an away team and a home team.
///
/// A result for the series is the number of games `k` the home side wins;
/// the away side wins `length - k`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    /// Identifier, `"<away>-<home>"` unless given explicitly
    #[serde(default)]
    pub id: String,

    pub away: String,

    pub home: String,

    #[serde(default = "default_length")]
    pub length: u32,
}

impl Series {
    pub fn new(away: impl Into<String>, home: impl Into<String>, length: u32) -> Self {
        let away = away.into();
        let home = home.into();
        Series {
            id: format!("{away}-{home}"),
            away,
            home,
            length,
        }
    }

    /// Fill in the derived identifier when a grouping file leaves it blank.
    pub(crate) fn with_default_id(mut self) -> Self {
        if self.id.is_empty() {
            self.id = format!("{}-{}", self.away, self.home);
        }
        self
    }

    /// Wins credited to `team` when the home side wins `home_wins` games.
    ///
    /// Returns `None` when `team` does not play in this series or when
    /// `home_wins` exceeds the series length.
    pub fn wins_for(&self, team: &str, home_wins: u32) -> Option<u32> {
        if home_wins > self.length {
            None
        } else if team == self.home {
            Some(home_wins)
        } else if team == self.away {
            self.length.checked_sub(home_wins)
        } else {
            None
        }
    }

    /// Number of distinct results (`0..=length`).
    pub fn outcome_count(&self) -> u64 {
        u64::from(self.length) + 1
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    pub(crate) fn check(&self, home_wins: u32) -> Result<()> {
        if home_wins > self.length {
            return Err(SeasonError::InvalidOutcome {
                series: self.id.clone(),
                home_wins,
                length: self.length,
            });
        }
        Ok(())
    }
}

/// Chosen result (home-side wins) for each remaining series.
///
/// The vector stores whatever it is given; resolution rejects results that
/// are out of range, missing or unknown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeVector {
    results: BTreeMap<String, u32>,
}

impl OutcomeVector {
    pub fn new() -> Self {
        OutcomeVector {
            results: BTreeMap::new(),
        }
    }

    /// Set a result after checking it against the series length.
    pub fn set(&mut self, series: &Series, home_wins: u32) -> Result<()> {
        series.check(home_wins)?;
        self.results.insert(series.id.clone(), home_wins);
        Ok(())
    }

    /// Set a result by series id without validation.
    pub fn insert(&mut self, series_id: impl Into<String>, home_wins: u32) {
        self.results.insert(series_id.into(), home_wins);
    }

    pub fn get(&self, series_id: &str) -> Option<u32> {
        self.results.get(series_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.results.iter().map(|(id, &k)| (id.as_str(), k))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Check that this vector covers exactly `series`, with every result in range.
    pub fn validate(&self, series: &[Series]) -> Result<()> {
        for s in series {
            let k = self
                .get(&s.id)
                .ok_or_else(|| SeasonError::IncompleteOutcome(s.id.clone()))?;
            s.check(k)?;
        }
        if let Some((id, _)) = self
            .iter()
            .find(|(id, _)| !series.iter().any(|s| s.id == *id))
        {
            return Err(SeasonError::UnknownSeries(id.to_string()));
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for OutcomeVector {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        OutcomeVector {
            results: iter.into_iter().map(|(id, k)| (id.into(), k)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_id_and_roles() {
        let series = Series::new("orioles", "yankees", 3);
        assert_eq!(series.id, "orioles-yankees");
        assert_eq!(series.wins_for("yankees", 2), Some(2));
        assert_eq!(series.wins_for("orioles", 2), Some(1));
        assert_eq!(series.wins_for("rays", 2), None);
        assert_eq!(series.outcome_count(), 4);
    }

    #[test]
    fn test_wins_for_out_of_range() {
        let series = Series::new("orioles", "yankees", 3);
        assert_eq!(series.wins_for("orioles", 4), None);
        assert_eq!(series.wins_for("yankees", 4), None);
        assert_eq!(series.wins_for("orioles", 3), Some(0));
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let series = Series::new("rays", "bluejays", 3);
        let mut outcomes = OutcomeVector::new();
        let err = outcomes.set(&series, 4).unwrap_err();
        assert!(matches!(err, SeasonError::InvalidOutcome { home_wins: 4, .. }));
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_validate_incomplete() {
        let series = vec![
            Series::new("orioles", "yankees", 3),
            Series::new("rays", "bluejays", 3),
        ];
        let outcomes: OutcomeVector = [("orioles-yankees", 1)].into_iter().collect();
        assert_eq!(
            outcomes.validate(&series),
            Err(SeasonError::IncompleteOutcome("rays-bluejays".to_string()))
        );
    }

    #[test]
    fn test_validate_unknown_series() {
        let series = vec![Series::new("orioles", "yankees", 3)];
        let outcomes: OutcomeVector = [("orioles-yankees", 1), ("cubs-cardinals", 0)]
            .into_iter()
            .collect();
        assert_eq!(
            outcomes.validate(&series),
            Err(SeasonError::UnknownSeries("cubs-cardinals".to_string()))
        );
    }

    #[test]
    fn test_validate_out_of_range_unchecked_insert() {
        let series = vec![Series::new("orioles", "yankees", 3)];
        let mut outcomes = OutcomeVector::new();
        outcomes.insert("orioles-yankees", 7);
        assert!(matches!(
            outcomes.validate(&series),
            Err(SeasonError::InvalidOutcome { home_wins: 7, .. })
        ));
    }
}
