//! Tournament, TournamentSummary and TournamentError.

use crate::models::game::{Match, PlayoffState};
use crate::models::team::Team;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Not enough teams for the requested stage (2 for a schedule, 4 for playoffs).
    InsufficientTeams { required: usize, available: usize },
    /// No match at this index.
    InvalidIndex(usize),
    /// A score is not a non-negative whole number.
    InvalidScore,
    /// Match time is not `HH:MM`.
    InvalidTime,
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    /// Team name is blank.
    EmptyTeamName,
    /// No team with this name.
    TeamNotFound(String),
    /// Playoffs have not been generated yet.
    NoPlayoffs,
    /// Scores entered for a playoff match whose teams are still to be decided.
    ParticipantsUndecided,
    /// A knockout match cannot end level.
    TiedKnockout,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientTeams { required, available } => {
                write!(f, "Need at least {} teams (have {})", required, available)
            }
            TournamentError::InvalidIndex(i) => write!(f, "No match at index {}", i),
            TournamentError::InvalidScore => write!(f, "Enter valid numeric scores"),
            TournamentError::InvalidTime => write!(f, "Enter a valid match time (HH:MM)"),
            TournamentError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            TournamentError::EmptyTeamName => write!(f, "Enter team name"),
            TournamentError::TeamNotFound(name) => write!(f, "Team {} not found", name),
            TournamentError::NoPlayoffs => write!(f, "Playoffs have not been generated"),
            TournamentError::ParticipantsUndecided => {
                write!(f, "Both semifinals must be decided before the final")
            }
            TournamentError::TiedKnockout => write!(f, "A playoff match needs a winner; scores are level"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Counts shown in the page header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TournamentSummary {
    pub teams: usize,
    pub matches: usize,
    pub completed: usize,
    pub upcoming: usize,
}

/// Full tournament state: teams, league schedule and results, playoff bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub teams: Vec<Team>,
    /// League matches in schedule order.
    pub matches: Vec<Match>,
    /// None until playoffs are generated.
    pub playoffs: Option<PlayoffState>,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new()
    }
}

impl Tournament {
    /// Create an empty tournament.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            teams: Vec::new(),
            matches: Vec::new(),
            playoffs: None,
        }
    }

    /// Create a tournament with the given team names and no logos.
    pub fn with_teams<I, S>(names: I) -> Result<Self, TournamentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tournament = Self::new();
        for name in names {
            tournament.add_team(name, None)?;
        }
        Ok(tournament)
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Add a team. Names are trimmed and must be unique (case-insensitive).
    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        logo: Option<String>,
    ) -> Result<(), TournamentError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyTeamName);
        }
        if self.teams.iter().any(|t| t.has_name(name_trimmed)) {
            return Err(TournamentError::DuplicateTeamName);
        }
        self.teams.push(Team::new(name_trimmed, logo));
        log::debug!("Added team {}", name_trimmed);
        Ok(())
    }

    /// Remove a team by exact name, along with every league match it plays in.
    /// The playoff bracket is a snapshot and is left as it is.
    pub fn remove_team(&mut self, name: &str) -> Result<(), TournamentError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| TournamentError::TeamNotFound(name.to_string()))?;
        self.teams.remove(idx);
        let before = self.matches.len();
        self.matches.retain(|m| !m.involves(name));
        log::debug!(
            "Removed team {} and {} of its matches",
            name,
            before - self.matches.len()
        );
        Ok(())
    }

    /// Clear all teams, matches and playoffs, keeping the id.
    pub fn reset(&mut self) {
        self.teams.clear();
        self.matches.clear();
        self.playoffs = None;
    }

    pub fn summary(&self) -> TournamentSummary {
        let completed = self.matches.iter().filter(|m| m.done).count();
        TournamentSummary {
            teams: self.teams.len(),
            matches: self.matches.len(),
            completed,
            upcoming: self.matches.len() - completed,
        }
    }
}
