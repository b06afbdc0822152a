//! Data structures for the cricket tournament: teams, matches, standings, playoffs.

mod game;
mod standings;
mod team;
mod tournament;

pub use game::{Match, MatchState, PlayoffMatch, PlayoffState, ResultEntry, Side, Stage};
pub use standings::StandingsRow;
pub use team::Team;
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentSummary};
