//! League standings: points table with net run rate, and its ranking.

use crate::models::{Match, StandingsRow, Team, Tournament};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Overs per innings (T20). Denominator for net run rate.
pub const OVERS: u32 = 20;

/// Build one row per team from the completed matches.
///
/// Matches without both scores are skipped entirely. A match naming a team that is not in
/// `teams` is skipped as well (logged). Pure: the table is rebuilt from scratch on every call.
pub fn compute_standings(teams: &[Team], matches: &[Match]) -> HashMap<String, StandingsRow> {
    let mut table: HashMap<String, StandingsRow> = teams
        .iter()
        .map(|t| (t.name.clone(), StandingsRow::new(t.name.as_str())))
        .collect();

    for m in matches {
        let Some((a_score, b_score)) = m.scores() else {
            continue;
        };
        if !table.contains_key(&m.a) || !table.contains_key(&m.b) {
            log::warn!("Skipping {} vs {}: team not registered", m.a, m.b);
            continue;
        }
        if let Some(row) = table.get_mut(&m.a) {
            row.record(a_score, b_score);
        }
        if let Some(row) = table.get_mut(&m.b) {
            row.record(b_score, a_score);
        }
    }

    for row in table.values_mut() {
        row.net_run_rate = net_run_rate(row.runs_for, row.runs_against, row.played);
    }
    table
}

/// (runs for / overs faced) - (runs against / overs bowled), rounded to 3 decimals; 0 when unplayed.
pub fn net_run_rate(runs_for: u64, runs_against: u64, played: u32) -> f64 {
    if played == 0 {
        return 0.0;
    }
    let overs = f64::from(played * OVERS);
    let raw = runs_for as f64 / overs - runs_against as f64 / overs;
    let rounded = round_to_thousandths(raw);
    // -0.0 would sort below 0.0 under total_cmp
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round to 3 decimals the way JavaScript's `toFixed(3)` does: the decision is made on the
/// exact stored value, and exact halves go away from zero.
///
/// Scaling by 1000 first is not enough: `-0.91249999…` times 1000 lands on `-912.5`.
fn round_to_thousandths(value: f64) -> f64 {
    // 1100 places print any finite f64 exactly
    let exact = format!("{:.1100}", value.abs());
    let Some((whole, frac)) = exact.split_once('.') else {
        return value;
    };
    let Ok(mut millis) = format!("{whole}{}", &frac[..3]).parse::<u64>() else {
        return (value * 1000.0).round() / 1000.0;
    };
    if frac.as_bytes()[3] >= b'5' {
        millis += 1;
    }
    let magnitude = millis as f64 / 1000.0;
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Sort rows: points desc, then net run rate desc, then team name (case-insensitive) asc.
pub fn rank_standings(table: &HashMap<String, StandingsRow>) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = table.values().cloned().collect();
    rows.sort_by(compare_rows);
    rows
}

fn compare_rows(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.net_run_rate.total_cmp(&a.net_run_rate))
        .then_with(|| a.team.to_lowercase().cmp(&b.team.to_lowercase()))
        .then_with(|| a.team.cmp(&b.team))
}

/// Ranked points table for a tournament's league stage.
pub fn standings(tournament: &Tournament) -> Vec<StandingsRow> {
    rank_standings(&compute_standings(&tournament.teams, &tournament.matches))
}
