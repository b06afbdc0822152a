//! Cricket tournament tracker: library with models, standings/playoff logic and storage.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    compute_standings, fill_final, generate_playoffs, generate_round_robin, net_run_rate,
    rank_standings, record_playoff_result, save_match_result, save_playoff_result, standings,
    standings_csv, start_playoffs, OVERS, PLAYOFF_TEAMS,
};
pub use models::{
    Match, MatchState, PlayoffMatch, PlayoffState, ResultEntry, Side, Stage, StandingsRow, Team,
    Tournament, TournamentError, TournamentId, TournamentSummary,
};
pub use store::{FileStorage, MemoryStorage, Storage, StoreError, TournamentStore};
