//! StandingsRow: one team's line in the points table.

use serde::Serialize;

/// Aggregate league statistics for a team. Derived from the match list, never stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub tied: u32,
    pub runs_for: u64,
    pub runs_against: u64,
    /// Rounded to three decimals.
    pub net_run_rate: f64,
    pub points: u32,
}

impl StandingsRow {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            ..Self::default()
        }
    }

    /// Credit one completed match from this team's point of view.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.runs_for += u64::from(scored);
        self.runs_against += u64::from(conceded);
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won += 1;
                self.points += 2;
            }
            std::cmp::Ordering::Less => self.lost += 1,
            std::cmp::Ordering::Equal => {
                self.tied += 1;
                self.points += 1;
            }
        }
    }
}
