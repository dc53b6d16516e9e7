use crate::analysis::win_rates::MatchDataset;
use crate::display::output::display_composition_chart;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CompositionWinRate {
    /// Sorted champion names; the sort makes the key order-independent.
    pub champions: Vec<String>,
    pub games: usize,
    pub wins: usize,
    /// Percentage over all games the composition was fielded in.
    pub win_rate: f64,
}

impl CompositionWinRate {
    pub fn label(&self) -> String {
        self.champions.join(", ")
    }
}

/// Win rate per distinct team composition. A composition is the unordered set
/// of champions one team fielded in one match, so rows are grouped by
/// (match, team) and keyed by the sorted champion names.
pub fn composition_win_rates(dataset: &MatchDataset) -> Vec<CompositionWinRate> {
    #[derive(Default)]
    struct Team {
        champions: Vec<String>,
        won: bool,
    }

    let mut teams: HashMap<(String, i32), Team> = HashMap::new();
    for row in dataset.rows() {
        let team = teams
            .entry((row.match_id.clone(), row.team_id))
            .or_default();
        team.champions.push(row.champion_name.clone());
        // Every row of a team carries the same outcome
        team.won = team.won || row.win;
    }

    #[derive(Default)]
    struct Tally {
        games: usize,
        wins: usize,
    }

    let mut tallies: HashMap<Vec<String>, Tally> = HashMap::new();
    for (_, mut team) in teams {
        team.champions.sort();
        let tally = tallies.entry(team.champions).or_default();
        tally.games += 1;
        if team.won {
            tally.wins += 1;
        }
    }

    let mut rates: Vec<CompositionWinRate> = tallies
        .into_iter()
        .map(|(champions, tally)| CompositionWinRate {
            champions,
            games: tally.games,
            wins: tally.wins,
            win_rate: (tally.wins as f64 / tally.games as f64) * 100.0,
        })
        .collect();
    rates.sort_by(|a, b| b.win_rate.partial_cmp(&a.win_rate).unwrap_or(Ordering::Equal));
    rates
}

/// Compute the top-N compositions, render the chart, and return the table.
pub fn analyze_compositions(dataset: &MatchDataset, top_n: usize) -> Vec<CompositionWinRate> {
    let mut rates = composition_win_rates(dataset);
    rates.truncate(top_n);
    display_composition_chart(&rates, top_n);
    rates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MatchRow;

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
    fn composition_key_ignores_champion_order() {
        let dataset = MatchDataset::from_rows(vec![
            // Same three champions, encountered in different row orders
            row("m1", "Ahri", 100, true),
            row("m1", "Braum", 100, true),
            row("m1", "Caitlyn", 100, true),
            row("m2", "Caitlyn", 100, false),
            row("m2", "Ahri", 100, false),
            row("m2", "Braum", 100, false),
        ]);

        let rates = composition_win_rates(&dataset);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].champions, vec!["Ahri", "Braum", "Caitlyn"]);
        assert_eq!(rates[0].games, 2);
        assert_eq!(rates[0].wins, 1);
        assert!((rates[0].win_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn teams_in_the_same_match_are_separate_compositions() {
        let dataset = MatchDataset::from_rows(vec![
            row("m1", "Ahri", 100, true),
            row("m1", "Zed", 200, false),
        ]);

        let rates = composition_win_rates(&dataset);
        assert_eq!(rates.len(), 2);

        let winner = rates.iter().find(|r| r.champions == vec!["Ahri"]).unwrap();
        assert_eq!(winner.wins, 1);
        let loser = rates.iter().find(|r| r.champions == vec!["Zed"]).unwrap();
        assert_eq!(loser.wins, 0);
    }

    #[test]
    fn top_n_truncates_the_ranking() {
        let dataset = MatchDataset::from_rows(vec![
            row("m1", "Ahri", 100, true),
            row("m2", "Zed", 100, false),
            row("m3", "Lux", 100, true),
        ]);

        let top = analyze_compositions(&dataset, 2);
        assert_eq!(top.len(), 2);
        // All winners rank ahead of the losing composition
        assert!(top.iter().all(|c| c.wins == 1));
    }
}
