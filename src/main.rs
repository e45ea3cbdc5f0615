// playoff-odds: resolve a playoff picture or enumerate playoff odds for a
// league race from the command line.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use playoff_core::{config, Grouping, SlotOverrides, TiebreakTable};

#[derive(Debug, Parser)]
#[command(name = "playoff-odds", version, about = "End-of-season standings and playoff odds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Final standings and seeding for one set of series results
    Resolve {
        #[command(flatten)]
        source: Source,

        /// Series result as `<series>=<home wins>` (repeatable)
        #[arg(long = "outcome", value_name = "SERIES=K")]
        outcomes: Vec<String>,

        /// Home wins used for every series not given with --outcome
        #[arg(long)]
        fill: Option<u32>,
    },
    /// Odds for every team over all combinations of series results
    Enumerate {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Debug, Args)]
struct Source {
    /// Grouping file (TOML)
    #[arg(long, conflicts_with = "builtin")]
    grouping: Option<PathBuf>,

    /// Built-in grouping: al or nl
    #[arg(long, default_value = "al")]
    builtin: String,

    /// Extra tiebreaks as CSV rows `team1,team2,winner`
    #[arg(long)]
    tiebreaks: Option<PathBuf>,

    /// Force a slot winner as `<slot>=<team>` (repeatable)
    #[arg(long = "override", value_name = "SLOT=TEAM")]
    overrides: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Source {
    fn load(&self) -> anyhow::Result<Grouping> {
        let grouping = match &self.grouping {
            Some(path) => config::load_grouping(path)
                .with_context(|| format!("failed to load grouping {}", path.display()))?,
            None => config::builtin(&self.builtin).context("failed to load built-in grouping")?,
        };
        let grouping = match &self.tiebreaks {
            Some(path) => {
                let extra = TiebreakTable::read_from_file(path)
                    .with_context(|| format!("failed to read tiebreaks {}", path.display()))?;
                info!("Merged {} tiebreaks from {}", extra.len(), path.display());
                grouping.with_tiebreaks(&extra)
            }
            None => grouping,
        };
        info!(
            "Loaded {}: {} teams, {} series",
            grouping.name(),
            grouping.records().len(),
            grouping.series().len()
        );
        Ok(grouping)
    }

    fn slot_overrides(&self) -> anyhow::Result<SlotOverrides> {
        self.overrides
            .iter()
            .map(|raw| {
                let (slot, team) = split_pair(raw)?;
                Ok((slot.to_string(), team.to_string()))
            })
            .collect()
    }
}

fn split_pair(raw: &str) -> anyhow::Result<(&str, &str)> {
    let (left, right) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected `name=value`, got `{raw}`"))?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        bail!("expected `name=value`, got `{raw}`");
    }
    Ok((left, right))
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve {
            source,
            outcomes,
            fill,
        } => run_resolve(&source, &outcomes, fill),
        Command::Enumerate { source } => run_enumerate(&source),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_resolve(source: &Source, raw_outcomes: &[String], fill: Option<u32>) -> anyhow::Result<()> {
    let grouping = source.load()?;
    let overrides = source.slot_overrides()?;

    let mut pairs = Vec::with_capacity(raw_outcomes.len());
    for raw in raw_outcomes {
        let (series, k) = split_pair(raw)?;
        let k: u32 = k
            .parse()
            .with_context(|| format!("series result must be a number of wins: `{raw}`"))?;
        pairs.push((series, k));
    }

    let outcomes = grouping.outcomes_from(pairs, fill)?;
    let res = grouping
        .resolve(&outcomes, &overrides)
        .context("failed to resolve standings")?;

    if source.json {
        println!("{}", serde_json::to_string_pretty(&res)?);
        return Ok(());
    }

    println!("{}", grouping.name());
    println!("{:<14} {:>8}  Outcome", "Team", "Record");
    for (team, _) in res.standings.by_wins() {
        let record = res
            .standings
            .get(team)
            .map(ToString::to_string)
            .unwrap_or_default();
        let outcome = res
            .seeding
            .category_of(team)
            .map(|c| c.to_string())
            .unwrap_or_default();
        let name = grouping.display_name(team);
        println!("{name:<14} {record:>8}  {outcome}");
    }

    let matchups = res.seeding.wild_card_matchups();
    if !matchups.is_empty() {
        println!();
        println!("Wild Card Series");
        for (seed, wild_card) in matchups {
            println!(
                "  {} vs {}",
                grouping.display_name(seed),
                grouping.display_name(wild_card)
            );
        }
    }
    Ok(())
}

fn run_enumerate(source: &Source) -> anyhow::Result<()> {
    let grouping = source.load()?;
    let overrides = source.slot_overrides()?;
    let agg = grouping
        .enumerate_with(&overrides)
        .context("failed to enumerate outcome space")?;

    let categories = grouping.rules().categories();

    if source.json {
        let table: BTreeMap<&str, BTreeMap<String, f64>> = agg
            .teams()
            .map(|team| {
                let row = categories
                    .iter()
                    .map(|c| (c.to_string(), agg.percentage(team, c)))
                    .collect();
                (team, row)
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("{} ({} permutations)", grouping.name(), agg.total());
    print!("{:<14}", "Team");
    for c in &categories {
        print!(" {:>11}", c.to_string());
    }
    println!(" {:>9}", "Playoffs");
    for team in agg.teams() {
        print!("{:<14}", grouping.display_name(team));
        for c in &categories {
            print!(" {:>10.1}%", agg.percentage(team, c));
        }
        println!(" {:>8.1}%", agg.playoff_percentage(team));
    }
    Ok(())
}
