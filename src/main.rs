mod analysis;
mod api;
mod collector;
mod config;
mod display;
mod error;

use analysis::composition::analyze_compositions;
use analysis::win_rates::{analyze_win_rates, MatchDataset};
use api::client::{RiotApi, RiotApiClient};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use collector::DataCollector;
use config::Config;
use display::output::{
    display_error, display_info, display_league_entries, display_mastery_table, display_success,
    display_warn,
};
use error::AppError;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "League Harvest")]
#[command(about = "Collect ranked match data from the Riot API and explore it", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a ladder page, resolve its players and collect their recent matches
    Collect {
        /// Ranked queue (e.g. RANKED_SOLO_5x5)
        #[arg(long, default_value = "RANKED_SOLO_5x5")]
        queue: String,

        /// Ladder tier (e.g. BRONZE, DIAMOND)
        #[arg(long, default_value = "BRONZE")]
        tier: String,

        /// Division within the tier (I-IV)
        #[arg(long, default_value = "I")]
        division: String,

        /// Ladder page to fetch
        #[arg(long, default_value = "1")]
        page: u32,

        /// Number of players from the page to collect
        #[arg(short, long, default_value = "10")]
        players: usize,

        /// Matches to fetch per player
        #[arg(short, long, default_value = "10")]
        matches: usize,

        /// Keep only matches created at or after this instant (RFC 3339)
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Keep only matches created at or before this instant (RFC 3339)
        #[arg(long)]
        until: Option<DateTime<Utc>>,

        /// Output CSV for the flattened match table
        #[arg(short, long, default_value = "match_data.csv")]
        out: PathBuf,

        /// Output CSV for the derived champion winrate table
        #[arg(long, default_value = "champion_winrates.csv")]
        winrates_out: PathBuf,
    },

    /// Analyze a previously collected match CSV
    Analyze {
        /// Input CSV produced by `collect`
        #[arg(short, long, default_value = "match_data.csv")]
        input: PathBuf,

        /// Number of top team compositions to report
        #[arg(short, long, default_value = "10")]
        top_n: usize,
    },

    /// Show champion mastery for one player
    Mastery {
        /// Summoner display name
        name: String,

        /// Number of top masteries to display
        #[arg(short, long, default_value = "10")]
        top_n: usize,
    },

    /// Fetch aggregate champion statistics and save them verbatim
    ChampionStats {
        /// Filter conditions as key=value pairs (e.g. tier=DIAMOND)
        #[arg(short, long)]
        condition: Vec<String>,

        /// Output CSV for the statistics table
        #[arg(short, long, default_value = "champion_stats.csv")]
        out: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    match args.command {
        Command::Collect {
            queue,
            tier,
            division,
            page,
            players,
            matches,
            since,
            until,
            out,
            winrates_out,
        } => run_collect(CollectParams {
            queue,
            tier,
            division,
            page,
            players,
            matches,
            since,
            until,
            out,
            winrates_out,
        }),
        Command::Analyze { input, top_n } => run_analyze(&input, top_n),
        Command::Mastery { name, top_n } => run_mastery(&name, top_n),
        Command::ChampionStats { condition, out } => run_champion_stats(&condition, &out),
    }
}

struct CollectParams {
    queue: String,
    tier: String,
    division: String,
    page: u32,
    players: usize,
    matches: usize,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    out: PathBuf,
    winrates_out: PathBuf,
}

fn run_collect(params: CollectParams) -> Result<(), AppError> {
    let config = Config::from_env()?;
    display_info(&format!(
        "Collecting {} {} {} (page {}) in region {}",
        params.queue, params.tier, params.division, params.page, config.region
    ));

    let client = RiotApiClient::new(config);

    display_info("Step 1: Fetching league entries...");
    let entries = client.get_league_entries(
        &params.queue,
        &params.tier,
        &params.division,
        params.page,
    )?;
    if entries.is_empty() {
        display_warn("League page came back empty, nothing to collect");
        return Ok(());
    }
    display_success(&format!("Retrieved {} league entries", entries.len()));
    display_league_entries(&entries, params.players);

    display_info("Step 2: Resolving summoner names...");
    let names: Vec<String> = entries
        .iter()
        .take(params.players)
        .map(|entry| entry.summoner_name.clone())
        .filter(|name| !name.is_empty())
        .collect();

    let mut collector = DataCollector::new(&client);
    let (puuids, _skipped) = collector.resolve_puuids(&names);
    if puuids.is_empty() {
        display_warn("No summoner names could be resolved, nothing to collect");
        return Ok(());
    }
    display_success(&format!("Resolved {} PUUID(s)", puuids.len()));

    display_info("Step 3: Collecting match data...");
    let fetched = collector.collect_match_data(&puuids, params.matches);

    if params.since.is_some() || params.until.is_some() {
        let start = params.since.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = params.until.unwrap_or(DateTime::<Utc>::MAX_UTC);
        collector.filter_matches_by_time(start, end);
    }

    display_info("Step 4: Deriving champion win rates...");
    collector.process_match_data(&fetched);

    collector.save_match_data_to_csv(&params.out)?;
    collector.save_champion_winrate_to_csv(&params.winrates_out)?;

    Ok(())
}

fn run_analyze(input: &Path, top_n: usize) -> Result<(), AppError> {
    display_info(&format!("Loading match data from {}", input.display()));
    let dataset = MatchDataset::load(input)?;

    if dataset.is_empty() {
        display_warn("Dataset is empty, nothing to analyze");
        return Ok(());
    }
    display_success(&format!("Loaded {} participant rows", dataset.rows().len()));

    let rates = analyze_win_rates(&dataset);
    display_success(&format!("Computed win rates for {} champion(s)", rates.len()));

    let compositions = analyze_compositions(&dataset, top_n);
    display_success(&format!(
        "Ranked {} team composition(s)",
        compositions.len()
    ));

    Ok(())
}

fn run_mastery(name: &str, top_n: usize) -> Result<(), AppError> {
    let config = Config::from_env()?;
    let client = RiotApiClient::new(config);

    display_info(&format!("Resolving summoner '{}'...", name));
    let summoner = client.get_summoner_by_name(name)?;

    let mut masteries = client.get_champion_masteries(&summoner.puuid)?;
    masteries.sort_by(|a, b| b.champion_points.cmp(&a.champion_points));
    masteries.truncate(top_n);

    display_mastery_table(name, &masteries);
    Ok(())
}

fn run_champion_stats(conditions: &[String], out: &Path) -> Result<(), AppError> {
    let query = parse_conditions(conditions)?;

    let config = Config::from_env()?;
    let client = RiotApiClient::new(config);

    let mut collector = DataCollector::new(&client);
    collector.collect_champion_winrate_data(&query);
    collector.save_champion_stats_to_csv(out)?;

    Ok(())
}

fn parse_conditions(raw: &[String]) -> Result<Vec<(String, String)>, AppError> {
    raw.iter()
        .map(|item| match item.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                Ok((key.to_string(), value.to_string()))
            }
            _ => Err(AppError::ConfigError(format!(
                "Invalid condition '{}', expected key=value",
                item
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions_parse_into_query_pairs() {
        let parsed = parse_conditions(&[
            "tier=DIAMOND".to_string(),
            "queue=RANKED_SOLO_5x5".to_string(),
        ])
        .unwrap();
        assert_eq!(
            parsed,
            vec![
                ("tier".to_string(), "DIAMOND".to_string()),
                ("queue".to_string(), "RANKED_SOLO_5x5".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_conditions_are_rejected() {
        assert!(parse_conditions(&["no-equals".to_string()]).is_err());
        assert!(parse_conditions(&["=value".to_string()]).is_err());
    }
}
