use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::trace;

use crate::constants::{DEFAULT_WILD_CARD_SLOTS, ELIMINATED_LABEL};
use crate::error::{Result, SeasonError};
use crate::standings::FinalStandings;
use crate::tiebreak::TiebreakTable;

/// Manual winners for contest slots, keyed by slot label.
pub type SlotOverrides = BTreeMap<String, String>;

/// What happens to the team that loses a contest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerUp {
    /// Takes the next wild-card slot regardless of record
    WildCard,
    /// Receives the named seed
    Seed(String),
    /// Competes with everyone else for the remaining wild cards
    Pool,
}

/// Two teams competing for one division or top-seed slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionContest {
    pub slot: String,
    pub contenders: [String; 2],
    #[serde(default = "default_runner_up")]
    pub runner_up: RunnerUp,
}

fn default_runner_up() -> RunnerUp {
    RunnerUp::Pool
}

/// A seed assigned to a team unconditionally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSeed {
    pub slot: String,
    pub team: String,
}

fn default_wild_card_slots() -> usize {
    DEFAULT_WILD_CARD_SLOTS
}

/// Playoff format of a grouping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedingRules {
    #[serde(default)]
    pub contests: Vec<DivisionContest>,
    #[serde(default)]
    pub fixed_seeds: Vec<FixedSeed>,
    #[serde(default = "default_wild_card_slots")]
    pub wild_card_slots: usize,
}

impl Default for SeedingRules {
    fn default() -> Self {
        SeedingRules {
            contests: Vec::new(),
            fixed_seeds: Vec::new(),
            wild_card_slots: DEFAULT_WILD_CARD_SLOTS,
        }
    }
}

impl SeedingRules {
    /// Every seed label these rules can hand out, in assignment order.
    pub fn seed_labels(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        for contest in &self.contests {
            labels.push(contest.slot.as_str());
            if let RunnerUp::Seed(label) = &contest.runner_up {
                labels.push(label.as_str());
            }
        }
        labels.extend(self.fixed_seeds.iter().map(|f| f.slot.as_str()));
        labels
    }

    /// All categories a team can land in, best first.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .seed_labels()
            .into_iter()
            .map(|l| Category::Seed(l.to_string()))
            .collect();
        categories.extend((1..=self.wild_card_slots).map(Category::WildCard));
        categories.push(Category::Eliminated);
        categories
    }

    /// Structural checks that do not depend on any outcome.
    pub fn validate(&self, standings_teams: &HashSet<&str>) -> Result<()> {
        let mut labels = HashSet::new();
        for label in self.seed_labels() {
            if !labels.insert(label) {
                return Err(SeasonError::InvalidGrouping(format!(
                    "seed label `{label}` is used more than once"
                )));
            }
        }

        let structural = self
            .contests
            .iter()
            .filter(|c| c.runner_up == RunnerUp::WildCard)
            .count();
        if structural > self.wild_card_slots {
            return Err(SeasonError::InvalidGrouping(format!(
                "{structural} contests award a wild card but only {} slots exist",
                self.wild_card_slots
            )));
        }

        let mut placed = HashSet::new();
        let named = self
            .contests
            .iter()
            .flat_map(|c| c.contenders.iter())
            .chain(self.fixed_seeds.iter().map(|f| &f.team));
        for team in named {
            if !standings_teams.contains(team.as_str()) {
                return Err(SeasonError::UnknownTeam(team.clone()));
            }
            if !placed.insert(team.as_str()) {
                return Err(SeasonError::DuplicateTeam(team.clone()));
            }
        }
        Ok(())
    }
}

/// Where a team finishes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Division winner or numbered seed, by slot label
    Seed(String),
    /// Wild-card slot, 1-based
    WildCard(usize),
    Eliminated,
}

impl Category {
    pub fn is_playoff(&self) -> bool {
        !matches!(self, Category::Eliminated)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Seed(label) => f.write_str(label),
            Category::WildCard(n) => write!(f, "WC{n}"),
            Category::Eliminated => f.write_str(ELIMINATED_LABEL),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Playoff picture for one grouping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedingResult {
    /// (slot label, team) in assignment order
    pub seeds: Vec<(String, String)>,
    /// Wild-card holders; index 0 is WC1
    pub wild_cards: Vec<String>,
    pub eliminated: Vec<String>,
}

impl SeedingResult {
    pub fn seed(&self, slot: &str) -> Option<&str> {
        self.seeds
            .iter()
            .find(|(label, _)| label.as_str() == slot)
            .map(|(_, team)| team.as_str())
    }

    pub fn category_of(&self, team: &str) -> Option<Category> {
        if let Some((label, _)) = self.seeds.iter().find(|(_, t)| t.as_str() == team) {
            return Some(Category::Seed(label.clone()));
        }
        if let Some(i) = self.wild_cards.iter().position(|t| t.as_str() == team) {
            return Some(Category::WildCard(i + 1));
        }
        if self.eliminated.iter().any(|t| t.as_str() == team) {
            return Some(Category::Eliminated);
        }
        None
    }

    /// Wild-card round pairings as (seed holder, wild card).
    ///
    /// The first seed meets the last wild card, the second seed the one
    /// before it, and so on; WC1 is left unpaired.
    pub fn wild_card_matchups(&self) -> Vec<(&str, &str)> {
        let pairs = self.wild_cards.len().saturating_sub(1);
        self.seeds
            .iter()
            .zip(self.wild_cards.iter().rev())
            .take(pairs)
            .map(|((_, seed), wild_card)| (seed.as_str(), wild_card.as_str()))
            .collect()
    }

    /// Every (team, category) pair.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, Category)> {
        let seeds = self
            .seeds
            .iter()
            .map(|(label, team)| (team.as_str(), Category::Seed(label.clone())));
        let wild_cards = self
            .wild_cards
            .iter()
            .enumerate()
            .map(|(i, team)| (team.as_str(), Category::WildCard(i + 1)));
        let eliminated = self
            .eliminated
            .iter()
            .map(|team| (team.as_str(), Category::Eliminated));
        seeds.chain(wild_cards).chain(eliminated)
    }

    /// True when every team of `standings` holds exactly one role.
    pub fn is_partition_of(&self, standings: &FinalStandings) -> bool {
        let mut seen = HashSet::new();
        for (team, _) in self.assignments() {
            if !standings.contains(team) || !seen.insert(team) {
                return false;
            }
        }
        seen.len() == standings.len()
    }
}

/// Decide one contest: override, then wins, then the tiebreak table.
fn contest_winner<'a>(
    contest: &'a DivisionContest,
    standings: &FinalStandings,
    tiebreaks: &TiebreakTable,
    overrides: &SlotOverrides,
) -> Result<(&'a str, &'a str)> {
    let (a, b) = (contest.contenders[0].as_str(), contest.contenders[1].as_str());

    if let Some(team) = overrides.get(&contest.slot).map(String::as_str) {
        trace!(slot = %contest.slot, %team, "slot decided by override");
        return if team == a {
            Ok((a, b))
        } else if team == b {
            Ok((b, a))
        } else {
            Err(SeasonError::InvalidOverride {
                slot: contest.slot.clone(),
                team: team.to_string(),
            })
        };
    }

    let (wins_a, wins_b) = (standings.wins(a)?, standings.wins(b)?);
    if wins_a > wins_b {
        Ok((a, b))
    } else if wins_b > wins_a {
        Ok((b, a))
    } else {
        let winner = tiebreaks.resolve(a, b)?;
        trace!(slot = %contest.slot, %winner, "slot decided by tiebreak");
        if winner == a {
            Ok((a, b))
        } else {
            Ok((b, a))
        }
    }
}

/// Order a group of teams tied in wins by their pairwise tiebreaks.
///
/// Only the first `decided` positions of the group take wild-card slots; an
/// equal count reaching into them is a cycle, below them id order stands.
fn order_tied<'a>(
    group: &[&'a str],
    decided: usize,
    tiebreaks: &TiebreakTable,
) -> Result<Vec<&'a str>> {
    let mut won: Vec<(&str, usize)> = group.iter().map(|&t| (t, 0)).collect();
    for i in 0..group.len() {
        for j in (i + 1)..group.len() {
            let winner = tiebreaks.resolve(group[i], group[j])?;
            let idx = if winner == group[i] { i } else { j };
            won[idx].1 += 1;
        }
    }
    won.sort_by(|a, b| b.1.cmp(&a.1));
    if won.windows(2).take(decided).any(|w| w[0].1 == w[1].1) {
        let mut teams: Vec<String> = group.iter().map(|t| t.to_string()).collect();
        teams.sort();
        return Err(SeasonError::TiebreakCycle(teams));
    }
    Ok(won.into_iter().map(|(t, _)| t).collect())
}

/// Rank wild-card contenders. Tie groups reaching into the first
/// `open_slots` positions are ordered by the tiebreak table; groups wholly
/// below the cut keep id order.
fn rank_pool<'a>(
    pool: Vec<(&'a str, u32)>,
    open_slots: usize,
    tiebreaks: &TiebreakTable,
) -> Result<Vec<&'a str>> {
    let mut ranked = Vec::with_capacity(pool.len());
    let mut start = 0;
    while start < pool.len() {
        let wins = pool[start].1;
        let end = pool[start..]
            .iter()
            .position(|&(_, w)| w != wins)
            .map_or(pool.len(), |offset| start + offset);
        let group: Vec<&str> = pool[start..end].iter().map(|&(t, _)| t).collect();

        if group.len() > 1 && start < open_slots {
            ranked.extend(order_tied(&group, open_slots - start, tiebreaks)?);
        } else {
            ranked.extend(group);
        }
        start = end;
    }
    Ok(ranked)
}

/// Assign every team of the grouping to a seed, a wild card or elimination.
///
/// Contests are decided by override first, then final wins, then the
/// tiebreak table. Runners-up follow their contest's [`RunnerUp`] rule.
/// Fixed seeds are placed next, and everyone left is ranked by wins for the
/// remaining wild-card slots.
///
/// # Errors
/// * [`SeasonError::UnknownSlot`] for an override naming no contest
/// * [`SeasonError::InvalidOverride`] for an override naming a non-contender
/// * [`SeasonError::TiebreakUndefined`] for a deciding tie with no table entry
/// * [`SeasonError::TiebreakCycle`] when tied wild-card contenders cannot be
///   ordered
/// * [`SeasonError::UnknownTeam`] / [`SeasonError::DuplicateTeam`] when the
///   rules do not fit the standings
pub fn resolve_seeding(
    standings: &FinalStandings,
    rules: &SeedingRules,
    tiebreaks: &TiebreakTable,
    overrides: &SlotOverrides,
) -> Result<SeedingResult> {
    if let Some(slot) = overrides
        .keys()
        .find(|slot| !rules.contests.iter().any(|c| &c.slot == *slot))
    {
        return Err(SeasonError::UnknownSlot(slot.clone()));
    }

    let mut result = SeedingResult::default();
    let mut placed: HashSet<String> = HashSet::new();
    let mut place = |team: &str| -> Result<()> {
        if !standings.contains(team) {
            return Err(SeasonError::UnknownTeam(team.to_string()));
        }
        if !placed.insert(team.to_string()) {
            return Err(SeasonError::DuplicateTeam(team.to_string()));
        }
        Ok(())
    };

    for contest in &rules.contests {
        let (winner, runner_up) = contest_winner(contest, standings, tiebreaks, overrides)?;
        place(winner)?;
        result.seeds.push((contest.slot.clone(), winner.to_string()));

        match &contest.runner_up {
            RunnerUp::WildCard => {
                place(runner_up)?;
                result.wild_cards.push(runner_up.to_string());
            }
            RunnerUp::Seed(label) => {
                place(runner_up)?;
                result.seeds.push((label.clone(), runner_up.to_string()));
            }
            RunnerUp::Pool => {}
        }
    }

    for fixed in &rules.fixed_seeds {
        place(&fixed.team)?;
        result.seeds.push((fixed.slot.clone(), fixed.team.clone()));
    }

    let pool: Vec<(&str, u32)> = standings
        .by_wins()
        .into_iter()
        .filter(|(team, _)| !placed.contains(*team))
        .collect();
    let open_slots = rules.wild_card_slots.saturating_sub(result.wild_cards.len());
    let ranked = rank_pool(pool, open_slots, tiebreaks)?;

    for (i, team) in ranked.into_iter().enumerate() {
        if i < open_slots {
            result.wild_cards.push(team.to_string());
        } else {
            result.eliminated.push(team.to_string());
        }
    }

    debug_assert!(result.is_partition_of(standings));
    Ok(result)
}
