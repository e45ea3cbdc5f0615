use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::constants::MAX_PERMUTATIONS;
use crate::error::{Result, SeasonError};
use crate::outcome::{OutcomeVector, Series};
use crate::seeding::{resolve_seeding, Category, SeedingRules, SlotOverrides};
use crate::standings::resolve_standings;
use crate::team::TeamRecord;
use crate::tiebreak::TiebreakTable;

/// Per-team category counts over an enumerated outcome space.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PermutationAggregate {
    total: u64,
    counts: BTreeMap<String, BTreeMap<Category, u64>>,
}

impl PermutationAggregate {
    /// Number of outcome vectors folded in.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, team: &str, category: &Category) -> u64 {
        self.counts
            .get(team)
            .and_then(|c| c.get(category))
            .copied()
            .unwrap_or(0)
    }

    /// Share of outcome vectors, in percent, that put `team` in `category`.
    pub fn percentage(&self, team: &str, category: &Category) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.count(team, category) as f64 / self.total as f64
    }

    /// Share of outcome vectors, in percent, in which `team` makes the playoffs.
    pub fn playoff_percentage(&self, team: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let made: u64 = self
            .categories(team)
            .filter(|(c, _)| c.is_playoff())
            .map(|(_, n)| n)
            .sum();
        100.0 * made as f64 / self.total as f64
    }

    /// Categories `team` landed in at least once, with counts.
    pub fn categories(&self, team: &str) -> impl Iterator<Item = (&Category, u64)> {
        self.counts
            .get(team)
            .into_iter()
            .flat_map(|c| c.iter().map(|(cat, &n)| (cat, n)))
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Count one resolved outcome vector.
    fn record<'a>(&mut self, assignments: impl Iterator<Item = (&'a str, Category)>) {
        self.total += 1;
        for (team, category) in assignments {
            *self
                .counts
                .entry(team.to_string())
                .or_default()
                .entry(category)
                .or_insert(0) += 1;
        }
    }

    /// Fold another aggregate into this one. Commutative and associative.
    pub fn merge(mut self, other: PermutationAggregate) -> Self {
        self.total += other.total;
        for (team, cats) in other.counts {
            let mine = self.counts.entry(team).or_default();
            for (category, n) in cats {
                *mine.entry(category).or_insert(0) += n;
            }
        }
        self
    }
}

/// Size of the outcome space over `series`, or `None` on overflow.
pub fn space_size(series: &[Series]) -> Option<u64> {
    series
        .iter()
        .try_fold(1u64, |acc, s| acc.checked_mul(s.outcome_count()))
}

/// Decode point `index` of the outcome space into an outcome vector.
///
/// Each series is one digit of a mixed-radix number whose base is that
/// series' outcome count; the first series is the least significant digit.
/// `index` must be below [`space_size`].
pub fn outcome_at(series: &[Series], mut index: u64) -> OutcomeVector {
    debug_assert!(
        space_size(series).map_or(true, |size| index < size),
        "outcome index {index} outside the outcome space"
    );
    let mut outcomes = OutcomeVector::new();
    for s in series {
        let base = s.outcome_count();
        outcomes.insert(s.id.clone(), (index % base) as u32);
        index /= base;
    }
    outcomes
}

/// Run standings and seeding over every combination of series results.
///
/// Points are evaluated in parallel; counts are merged commutatively, so the
/// result does not depend on evaluation order. A single failing point fails
/// the whole enumeration.
///
/// # Errors
/// * [`SeasonError::SpaceTooLarge`] when the space exceeds [`MAX_PERMUTATIONS`]
/// * any error raised while resolving a point
pub fn enumerate_outcomes(
    records: &[TeamRecord],
    series: &[Series],
    rules: &SeedingRules,
    tiebreaks: &TiebreakTable,
    overrides: &SlotOverrides,
) -> Result<PermutationAggregate> {
    let total = space_size(series)
        .filter(|&n| n <= MAX_PERMUTATIONS)
        .ok_or(SeasonError::SpaceTooLarge(series.len()))?;
    debug!(series = series.len(), points = total, "enumerating outcome space");

    let aggregate = (0..total)
        .into_par_iter()
        .try_fold(PermutationAggregate::default, |mut acc, index| {
            let outcomes = outcome_at(series, index);
            let standings = resolve_standings(records, series, &outcomes)?;
            let seeding = resolve_seeding(&standings, rules, tiebreaks, overrides)?;
            acc.record(seeding.assignments());
            Ok(acc)
        })
        .try_reduce(PermutationAggregate::default, |a, b| Ok(a.merge(b)))?;

    debug!(points = aggregate.total(), "enumeration complete");
    Ok(aggregate)
}
