use crate::analysis::composition::CompositionWinRate;
use crate::analysis::win_rates::ChampionWinRate;
use crate::api::models::{ChampionMasteryDto, LeagueEntryDto};
use colored::*;
use tabled::{settings::Style, Table, Tabled};

const BAR_WIDTH: usize = 30;

#[derive(Tabled)]
struct LeagueRow {
    #[tabled(rename = "#")]
    number: String,
    summoner: String,
    tier: String,
    lp: String,
    record: String,
}

#[derive(Tabled)]
struct WinRateRow {
    rank: String,
    champion: String,
    games: String,
    wins: String,
    #[tabled(rename = "win rate")]
    win_rate: String,
    chart: String,
}

#[derive(Tabled)]
struct CompositionRow {
    rank: String,
    composition: String,
    record: String,
    #[tabled(rename = "win rate")]
    win_rate: String,
    chart: String,
}

#[derive(Tabled)]
struct MasteryRow {
    rank: String,
    #[tabled(rename = "champion id")]
    champion_id: String,
    level: String,
    points: String,
}

fn bar(value: f64, max: f64) -> String {
    if !value.is_finite() || max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.min(BAR_WIDTH))
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn display_warn(message: &str) {
    println!("{} {}", "⚠️".yellow(), message.yellow());
}

pub fn display_league_entries(entries: &[LeagueEntryDto], limit: usize) {
    println!("\n{}", "🏆 LEAGUE PAGE".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let mut rows = vec![];
    for (idx, entry) in entries.iter().take(limit).enumerate() {
        rows.push(LeagueRow {
            number: format!("{}", idx + 1),
            summoner: entry.summoner_name.clone(),
            tier: format!("{} {}", entry.tier, entry.rank),
            lp: format!("{}", entry.league_points),
            record: format!("{}W / {}L", entry.wins, entry.losses),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_win_rate_chart(rates: &[ChampionWinRate]) {
    println!("\n{}", "📊 CHAMPION WIN RATES".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if rates.is_empty() {
        println!("{}", "No match data available".yellow());
        return;
    }

    let max = rates.iter().map(|r| r.win_rate).fold(0.0f64, f64::max);

    let mut rows = vec![];
    for (idx, rate) in rates.iter().enumerate() {
        rows.push(WinRateRow {
            rank: format!("#{}", idx + 1),
            champion: rate.champion_name.clone(),
            games: format!("{}", rate.games),
            wins: format!("{}", rate.wins),
            win_rate: format!("{:.1}%", rate.win_rate),
            chart: bar(rate.win_rate, max),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    println!("\n{}", "Interpretation".bold().yellow());
    println!("{}", "• Win Rate: wins divided by all appearances of the champion");
    println!("{}", "• Champions are ranked from highest to lowest win rate\n");
}

pub fn display_composition_chart(compositions: &[CompositionWinRate], top_n: usize) {
    println!(
        "\n{}",
        format!("🧩 TOP {} TEAM COMPOSITIONS", top_n).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    if compositions.is_empty() {
        println!("{}", "No composition data available".yellow());
        return;
    }

    let max = compositions
        .iter()
        .map(|c| c.win_rate)
        .fold(0.0f64, f64::max);

    let mut rows = vec![];
    for (idx, comp) in compositions.iter().enumerate() {
        rows.push(CompositionRow {
            rank: format!("#{}", idx + 1),
            composition: comp.label(),
            record: format!("{}W / {}L", comp.wins, comp.games - comp.wins),
            win_rate: format!("{:.1}%", comp.win_rate),
            chart: bar(comp.win_rate, max),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    println!("\n{}", "Interpretation".bold().yellow());
    println!(
        "{}",
        "• A composition is the set of champions one team fielded, order-independent"
    );
    println!("{}", "• Win Rate: games won over all games the composition appeared in\n");
}

pub fn display_mastery_table(player_name: &str, masteries: &[ChampionMasteryDto]) {
    println!(
        "\n{}",
        format!("🎮 Champion Mastery for {}", player_name).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    if masteries.is_empty() {
        println!("{}", "No mastery data available".yellow());
        return;
    }

    let mut rows = vec![];
    for (idx, mastery) in masteries.iter().enumerate() {
        rows.push(MasteryRow {
            rank: format!("#{}", idx + 1),
            champion_id: format!("{}", mastery.champion_id),
            level: format!("{}", mastery.champion_level),
            points: format!("{}", mastery.champion_points),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scales_against_the_maximum() {
        assert_eq!(bar(50.0, 100.0).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(100.0, 100.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn bar_handles_degenerate_inputs() {
        assert!(bar(f64::NAN, 100.0).is_empty());
        assert!(bar(50.0, 0.0).is_empty());
    }
}
