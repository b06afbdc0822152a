//! Tournament business logic: schedule, standings, playoffs, export.

mod export;
mod playoffs;
mod schedule;
mod standings;

pub use export::standings_csv;
pub use playoffs::{
    fill_final, generate_playoffs, record_playoff_result, save_playoff_result, start_playoffs,
    PLAYOFF_TEAMS,
};
pub use schedule::{generate_round_robin, save_match_result};
pub use standings::{compute_standings, net_run_rate, rank_standings, standings, OVERS};
