use serde::Serialize;
use std::collections::HashSet;

use crate::enumerate::{enumerate_outcomes, PermutationAggregate};
use crate::error::{Result, SeasonError};
use crate::outcome::{OutcomeVector, Series};
use crate::seeding::{resolve_seeding, SeedingResult, SeedingRules, SlotOverrides};
use crate::standings::{resolve_standings, FinalStandings};
use crate::team::TeamRecord;
use crate::tiebreak::TiebreakTable;

/// Final standings together with the playoff picture they produce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub standings: FinalStandings,
    pub seeding: SeedingResult,
}

/// Resolve standings and seeding in one step.
pub fn resolve_standings_and_seeding(
    records: &[TeamRecord],
    series: &[Series],
    outcomes: &OutcomeVector,
    rules: &SeedingRules,
    tiebreaks: &TiebreakTable,
    overrides: &SlotOverrides,
) -> Result<Resolution> {
    let standings = resolve_standings(records, series, outcomes)?;
    let seeding = resolve_seeding(&standings, rules, tiebreaks, overrides)?;
    Ok(Resolution { standings, seeding })
}

/// A league whose race is modelled: current records, remaining series,
/// playoff format and tiebreaks.
///
/// Construction validates the pieces against each other, so resolution only
/// fails on bad outcomes, overrides or missing tiebreaks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grouping {
    name: String,
    records: Vec<TeamRecord>,
    series: Vec<Series>,
    rules: SeedingRules,
    tiebreaks: TiebreakTable,
}

impl Grouping {
    pub fn new(
        name: impl Into<String>,
        records: Vec<TeamRecord>,
        series: Vec<Series>,
        rules: SeedingRules,
        tiebreaks: TiebreakTable,
        season_length: Option<u32>,
    ) -> Result<Self> {
        let mut teams = HashSet::new();
        for record in &records {
            if !teams.insert(record.team.as_str()) {
                return Err(SeasonError::DuplicateTeam(record.team.clone()));
            }
            if let Some(length) = season_length {
                if record.season_length() != length {
                    return Err(SeasonError::InvalidGrouping(format!(
                        "{} plays {} games, expected {length}",
                        record.team,
                        record.season_length()
                    )));
                }
            }
        }

        let mut ids = HashSet::new();
        for s in &series {
            if s.away == s.home {
                return Err(SeasonError::InvalidGrouping(format!(
                    "series `{}` has {} playing itself",
                    s.id, s.home
                )));
            }
            if !ids.insert(s.id.as_str()) {
                return Err(SeasonError::InvalidGrouping(format!(
                    "series `{}` is listed twice",
                    s.id
                )));
            }
        }

        for record in &records {
            let scheduled: u32 = series
                .iter()
                .filter(|s| s.involves(&record.team))
                .map(|s| s.length)
                .sum();
            if scheduled > record.games_remaining {
                return Err(SeasonError::InvalidGrouping(format!(
                    "{} has {scheduled} games in modelled series but only {} remaining",
                    record.team, record.games_remaining
                )));
            }
        }

        rules.validate(&teams)?;

        Ok(Grouping {
            name: name.into(),
            records,
            series,
            rules,
            tiebreaks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[TeamRecord] {
        &self.records
    }

    /// Display name of `team`; ids outside the grouping are returned as-is.
    pub fn display_name<'a>(&'a self, team: &'a str) -> &'a str {
        self.records
            .iter()
            .find(|r| r.team == team)
            .map_or(team, TeamRecord::display_name)
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn series_ids(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn rules(&self) -> &SeedingRules {
        &self.rules
    }

    pub fn tiebreaks(&self) -> &TiebreakTable {
        &self.tiebreaks
    }

    /// Copy of this grouping with extra tiebreaks merged in.
    pub fn with_tiebreaks(&self, extra: &TiebreakTable) -> Self {
        let mut grouping = self.clone();
        grouping.tiebreaks.merge(extra);
        grouping
    }

    /// Every series set to the same home-side result.
    pub fn uniform_outcomes(&self, home_wins: u32) -> Result<OutcomeVector> {
        let mut outcomes = OutcomeVector::new();
        for s in &self.series {
            outcomes.set(s, home_wins)?;
        }
        Ok(outcomes)
    }

    /// Build an outcome vector from `(series id, home wins)` pairs, checking
    /// ids and ranges. Series left out are filled with `fill` when given.
    pub fn outcomes_from<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a str, u32)>,
        fill: Option<u32>,
    ) -> Result<OutcomeVector> {
        let mut outcomes = OutcomeVector::new();
        for (id, k) in pairs {
            let s = self
                .series
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| SeasonError::UnknownSeries(id.to_string()))?;
            outcomes.set(s, k)?;
        }
        if let Some(k) = fill {
            for s in &self.series {
                if outcomes.get(&s.id).is_none() {
                    outcomes.set(s, k)?;
                }
            }
        }
        Ok(outcomes)
    }

    /// Final standings and seeding for one outcome vector.
    pub fn resolve(&self, outcomes: &OutcomeVector, overrides: &SlotOverrides) -> Result<Resolution> {
        resolve_standings_and_seeding(
            &self.records,
            &self.series,
            outcomes,
            &self.rules,
            &self.tiebreaks,
            overrides,
        )
    }

    /// Category counts over every combination of series results.
    pub fn enumerate(&self) -> Result<PermutationAggregate> {
        self.enumerate_with(&SlotOverrides::new())
    }

    /// Like [`enumerate`](Self::enumerate), with overrides applied to every point.
    pub fn enumerate_with(&self, overrides: &SlotOverrides) -> Result<PermutationAggregate> {
        enumerate_outcomes(
            &self.records,
            &self.series,
            &self.rules,
            &self.tiebreaks,
            overrides,
        )
    }
}
