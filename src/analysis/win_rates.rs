use crate::collector::MatchRow;
use crate::display::output::display_win_rate_chart;
use crate::error::AppError;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

/// A persisted match table loaded back for analysis.
pub struct MatchDataset {
    rows: Vec<MatchRow>,
}

impl MatchDataset {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: MatchRow = result?;
            rows.push(row);
        }
        Ok(MatchDataset { rows })
    }

    #[allow(dead_code)]
    pub fn from_rows(rows: Vec<MatchRow>) -> Self {
        MatchDataset { rows }
    }

    pub fn rows(&self) -> &[MatchRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ChampionWinRate {
    pub champion_name: String,
    pub games: usize,
    pub wins: usize,
    /// Percentage over all appearances of the champion.
    pub win_rate: f64,
}

/// Win rate per champion over all participant rows, ranked descending.
pub fn champion_win_rates(dataset: &MatchDataset) -> Vec<ChampionWinRate> {
    #[derive(Default)]
    struct Tally {
        games: usize,
        wins: usize,
    }

    let mut tallies: HashMap<String, Tally> = HashMap::new();
    for row in dataset.rows() {
        let tally = tallies.entry(row.champion_name.clone()).or_default();
        tally.games += 1;
        if row.win {
            tally.wins += 1;
        }
    }

    let mut rates: Vec<ChampionWinRate> = tallies
        .into_iter()
        .map(|(champion_name, tally)| ChampionWinRate {
            champion_name,
            games: tally.games,
            wins: tally.wins,
            win_rate: (tally.wins as f64 / tally.games as f64) * 100.0,
        })
        .collect();
    rates.sort_by(|a, b| b.win_rate.partial_cmp(&a.win_rate).unwrap_or(Ordering::Equal));
    rates
}

/// Compute champion win rates, render the chart, and hand the table back.
pub fn analyze_win_rates(dataset: &MatchDataset) -> Vec<ChampionWinRate> {
    let rates = champion_win_rates(dataset);
    display_win_rate_chart(&rates);
    rates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(match_id: &str, champion: &str, team_id: i32, win: bool) -> MatchRow {
        MatchRow {
            match_id: match_id.to_string(),
            game_creation: 0,
            game_duration: 1800,
            queue_id: 420,
            puuid: format!("{}-{}", match_id, champion),
            champion_name: champion.to_string(),
            team_id,
            win,
        }
    }

    #[test]
    fn win_rate_is_wins_over_appearances() {
        let dataset = MatchDataset::from_rows(vec![
            row("m1", "Ahri", 100, true),
            row("m2", "Ahri", 100, false),
            row("m3", "Zed", 200, true),
        ]);

        let rates = champion_win_rates(&dataset);
        assert_eq!(rates.len(), 2);

        // Ranked descending: Zed at 100% first
        assert_eq!(rates[0].champion_name, "Zed");
        assert!((rates[0].win_rate - 100.0).abs() < f64::EPSILON);

        assert_eq!(rates[1].champion_name, "Ahri");
        assert_eq!(rates[1].games, 2);
        assert_eq!(rates[1].wins, 1);
        assert!((rates[1].win_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_dataset_yields_empty_table() {
        let dataset = MatchDataset::from_rows(Vec::new());
        assert!(champion_win_rates(&dataset).is_empty());
    }

    #[test]
    fn saved_match_table_round_trips_through_load() {
        let rows = vec![
            row("m1", "Ahri", 100, true),
            row("m1", "Zed", 200, false),
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.csv");
        let mut writer = csv::Writer::from_path(&path).unwrap();
        for r in &rows {
            writer.serialize(r).unwrap();
        }
        writer.flush().unwrap();

        let dataset = MatchDataset::load(&path).unwrap();
        assert_eq!(dataset.rows(), rows.as_slice());
    }
}
