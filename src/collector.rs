use crate::api::client::RiotApi;
use crate::api::models::MatchDto;
use crate::display::output::{display_info, display_success, display_warn};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

/// One participant in one fetched match, flattened for tabular persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub match_id: String,
    pub game_creation: i64,
    pub game_duration: i64,
    pub queue_id: i64,
    pub puuid: String,
    pub champion_name: String,
    pub team_id: i32,
    pub win: bool,
}

/// Cumulative win/loss counts for one champion.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinLoss {
    pub wins: usize,
    pub losses: usize,
}

impl WinLoss {
    /// wins / (wins + losses); NaN when the champion has no games yet.
    pub fn win_rate(&self) -> f64 {
        self.wins as f64 / (self.wins + self.losses) as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChampionWinrateRow {
    pub champion_name: String,
    pub wins: usize,
    pub losses: usize,
    pub winrate: f64,
}

/// Accumulates match rows and champion counters over one collection run.
/// Owns its tables exclusively; nothing here is shared across threads.
pub struct DataCollector<'a, C: RiotApi> {
    api: &'a C,
    match_rows: Vec<MatchRow>,
    champion_counters: HashMap<String, WinLoss>,
    champion_stats_rows: Vec<Map<String, Value>>,
}

impl<'a, C: RiotApi> DataCollector<'a, C> {
    pub fn new(api: &'a C) -> Self {
        DataCollector {
            api,
            match_rows: Vec::new(),
            champion_counters: HashMap::new(),
            champion_stats_rows: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn match_rows(&self) -> &[MatchRow] {
        &self.match_rows
    }

    /// Resolve display names to PUUIDs, dropping any that fail to resolve.
    /// Returns the resolved identifiers and the number of names skipped.
    pub fn resolve_puuids(&self, summoner_names: &[String]) -> (Vec<String>, usize) {
        let mut puuids = Vec::new();
        let mut skipped = 0;

        for name in summoner_names {
            match self.api.get_summoner_by_name(name) {
                Ok(summoner) => puuids.push(summoner.puuid),
                Err(err) => {
                    display_warn(&format!("Could not resolve '{}': {}", name, err));
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            display_warn(&format!("Skipped {} unresolved summoner name(s)", skipped));
        }

        (puuids, skipped)
    }

    /// Fetch up to `matches_per_puuid` recent matches for each PUUID and
    /// flatten them into participant rows. Per-fetch failures are logged and
    /// skipped; partial results are kept. Matches shared between players are
    /// collected once.
    pub fn collect_match_data(
        &mut self,
        puuids: &[String],
        matches_per_puuid: usize,
    ) -> Vec<MatchDto> {
        let mut seen_match_ids: HashSet<String> =
            self.match_rows.iter().map(|r| r.match_id.clone()).collect();
        let mut fetched = Vec::new();

        for puuid in puuids {
            display_info(&format!(
                "Collecting match data for PUUID {}...",
                short_id(puuid)
            ));

            let match_ids = match self.api.get_match_ids(puuid, matches_per_puuid) {
                Ok(ids) => ids,
                Err(err) => {
                    display_warn(&format!(
                        "Failed to fetch match ids for {}: {}",
                        short_id(puuid),
                        err
                    ));
                    continue;
                }
            };

            let pb = ProgressBar::new(match_ids.len() as u64);
            pb.set_message("Fetching match details");

            let mut duplicates = 0;
            for match_id in &match_ids {
                pb.inc(1);

                if !seen_match_ids.insert(match_id.clone()) {
                    duplicates += 1;
                    continue;
                }

                let match_data = match self.api.get_match(match_id) {
                    Ok(data) => data,
                    Err(err) => {
                        display_warn(&format!("Skipping match {}: {}", match_id, err));
                        continue;
                    }
                };

                self.flatten_match(&match_data);
                fetched.push(match_data);
            }

            pb.finish_and_clear();
            if duplicates > 0 {
                display_info(&format!("{} match(es) already collected, skipped", duplicates));
            }
        }

        display_success(&format!(
            "Match data collection complete: {} matches, {} participant rows",
            fetched.len(),
            self.match_rows.len()
        ));

        fetched
    }

    fn flatten_match(&mut self, match_data: &MatchDto) {
        for participant in &match_data.info.participants {
            // A participant record without a champion carries nothing usable.
            if participant.champion_name.is_empty() {
                continue;
            }
            self.match_rows.push(MatchRow {
                match_id: match_data.metadata.match_id.clone(),
                game_creation: match_data.info.game_creation,
                game_duration: match_data.info.game_duration,
                queue_id: match_data.info.queue_id,
                puuid: participant.puuid.clone(),
                champion_name: participant.champion_name.clone(),
                team_id: participant.team_id,
                win: participant.win,
            });
        }
    }

    /// Retain only rows whose creation timestamp falls within [start, end].
    pub fn filter_matches_by_time(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        if self.match_rows.is_empty() {
            display_warn("No match data available to filter");
            return;
        }

        let start_ms = start.timestamp_millis();
        let end_ms = end.timestamp_millis();
        let before = self.match_rows.len();
        self.match_rows
            .retain(|row| row.game_creation >= start_ms && row.game_creation <= end_ms);

        display_info(&format!(
            "Filtered matches between {} and {} ({} -> {} rows)",
            start,
            end,
            before,
            self.match_rows.len()
        ));
    }

    /// Fetch aggregate champion statistics for the given conditions and store
    /// the rows verbatim. The query is built fresh by the caller per run.
    pub fn collect_champion_winrate_data(&mut self, query: &[(String, String)]) {
        display_info("Collecting champion win rate data...");
        match self.api.get_champion_statistics(query) {
            Ok(rows) => {
                display_success(&format!("Fetched {} champion statistics row(s)", rows.len()));
                self.champion_stats_rows = rows;
            }
            Err(err) => {
                display_warn(&format!("Failed to fetch champion statistics: {}", err));
            }
        }
    }

    /// Walk participant lists and increment per-champion win/loss counters.
    pub fn process_match_data(&mut self, matches: &[MatchDto]) {
        for match_data in matches {
            for participant in &match_data.info.participants {
                if participant.champion_name.is_empty() {
                    continue;
                }
                let counter = self
                    .champion_counters
                    .entry(participant.champion_name.clone())
                    .or_default();
                if participant.win {
                    counter.wins += 1;
                } else {
                    counter.losses += 1;
                }
            }
        }
    }

    /// Counters converted to a reporting table, ranked by win rate descending.
    pub fn champion_winrate_rows(&self) -> Vec<ChampionWinrateRow> {
        let mut rows: Vec<ChampionWinrateRow> = self
            .champion_counters
            .iter()
            .map(|(name, counter)| ChampionWinrateRow {
                champion_name: name.clone(),
                wins: counter.wins,
                losses: counter.losses,
                winrate: counter.win_rate(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.winrate
                .partial_cmp(&a.winrate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    pub fn save_match_data_to_csv(&self, path: &Path) -> Result<(), AppError> {
        if self.match_rows.is_empty() {
            display_warn("No match data to save");
            return Ok(());
        }

        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.match_rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        display_success(&format!("Match data saved to {}", path.display()));
        Ok(())
    }

    pub fn save_champion_winrate_to_csv(&self, path: &Path) -> Result<(), AppError> {
        let rows = self.champion_winrate_rows();
        if rows.is_empty() {
            display_warn("No champion winrate data to save");
            return Ok(());
        }

        let mut writer = csv::Writer::from_path(path)?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        display_success(&format!("Champion winrate data saved to {}", path.display()));
        Ok(())
    }

    pub fn save_champion_stats_to_csv(&self, path: &Path) -> Result<(), AppError> {
        if self.champion_stats_rows.is_empty() {
            display_warn("No champion statistics to save");
            return Ok(());
        }

        // Columns are whatever keys the endpoint happened to return.
        let mut columns: BTreeSet<String> = BTreeSet::new();
        for row in &self.champion_stats_rows {
            columns.extend(row.keys().cloned());
        }
        let columns: Vec<String> = columns.into_iter().collect();

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&columns)?;
        for row in &self.champion_stats_rows {
            let record: Vec<String> = columns
                .iter()
                .map(|column| match row.get(column) {
                    Some(Value::String(s)) => s.clone(),
                    Some(value) => value.to_string(),
                    None => String::new(),
                })
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;

        display_success(&format!("Champion statistics saved to {}", path.display()));
        Ok(())
    }
}

fn short_id(puuid: &str) -> &str {
    &puuid[..puuid.len().min(8)]
}
