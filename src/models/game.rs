//! League matches, playoff matches, and the raw result entry used to record them.

use crate::models::tournament::TournamentError;
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Which side of a match won.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Higher score wins; an exact tie has no winner.
    pub fn from_scores(a_score: u32, b_score: u32) -> Option<Side> {
        match a_score.cmp(&b_score) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Playoff round a bracket match belongs to. Serialized with its display label.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Semi 1")]
    Semi1,
    #[serde(rename = "Semi 2")]
    Semi2,
    #[serde(rename = "Final")]
    Final,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Semi1 => write!(f, "Semi 1"),
            Stage::Semi2 => write!(f, "Semi 2"),
            Stage::Final => write!(f, "Final"),
        }
    }
}

/// Where a match is in its lifecycle. Derived from the stored fields, never persisted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// Final whose participants depend on unfinished semifinals.
    AwaitingParticipants,
    /// Participants known, nothing recorded yet.
    Pending,
    /// Venue or time recorded, no result.
    AwaitingScores,
    /// Both scores recorded.
    Done,
}

fn derive_state(participants_known: bool, venue: &str, time: &str, scored: bool) -> MatchState {
    if scored {
        MatchState::Done
    } else if !participants_known {
        MatchState::AwaitingParticipants
    } else if !venue.is_empty() || !time.is_empty() {
        MatchState::AwaitingScores
    } else {
        MatchState::Pending
    }
}

/// A league (round-robin) match between two named teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub a: String,
    pub b: String,
    pub venue: String,
    pub time: String,
    /// Runs scored by `a`; None until recorded.
    pub a_score: Option<u32>,
    pub b_score: Option<u32>,
    /// Set by saving a result, not recomputed on read.
    pub done: bool,
}

impl Match {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            venue: String::new(),
            time: String::new(),
            a_score: None,
            b_score: None,
            done: false,
        }
    }

    /// Both scores, when the match is complete.
    pub fn scores(&self) -> Option<(u32, u32)> {
        self.a_score.zip(self.b_score)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.a == team || self.b == team
    }

    pub fn state(&self) -> MatchState {
        derive_state(true, &self.venue, &self.time, self.scores().is_some())
    }

    /// None while unplayed or tied.
    pub fn winner(&self) -> Option<Side> {
        self.scores().and_then(|(a, b)| Side::from_scores(a, b))
    }
}

/// A bracket match. `a`/`b` are None while still to be decided (the Final before both semis finish).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayoffMatch {
    pub a: Option<String>,
    pub b: Option<String>,
    pub venue: String,
    pub time: String,
    pub a_score: Option<u32>,
    pub b_score: Option<u32>,
    pub done: bool,
    pub stage: Stage,
}

impl PlayoffMatch {
    pub fn new(a: Option<String>, b: Option<String>, stage: Stage) -> Self {
        Self {
            a,
            b,
            venue: String::new(),
            time: String::new(),
            a_score: None,
            b_score: None,
            done: false,
            stage,
        }
    }

    pub fn scores(&self) -> Option<(u32, u32)> {
        self.a_score.zip(self.b_score)
    }

    pub fn participants_known(&self) -> bool {
        self.a.is_some() && self.b.is_some()
    }

    pub fn state(&self) -> MatchState {
        derive_state(
            self.participants_known(),
            &self.venue,
            &self.time,
            self.scores().is_some(),
        )
    }

    /// Name of the winning team once the match is done.
    pub fn winner(&self) -> Option<&str> {
        if !self.done {
            return None;
        }
        let (a_score, b_score) = self.scores()?;
        match Side::from_scores(a_score, b_score)? {
            Side::A => self.a.as_deref(),
            Side::B => self.b.as_deref(),
        }
    }

    /// Forget any recorded result, keeping participants and logistics.
    pub fn clear_result(&mut self) {
        self.a_score = None;
        self.b_score = None;
        self.done = false;
    }
}

/// The two semifinals and the final, plus the champion once the final is decided.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayoffState {
    pub matches: [PlayoffMatch; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion: Option<String>,
}

impl PlayoffState {
    pub const SEMI_1: usize = 0;
    pub const SEMI_2: usize = 1;
    pub const FINAL: usize = 2;

    pub fn final_match(&self) -> &PlayoffMatch {
        &self.matches[Self::FINAL]
    }
}

/// Venue, time and scores as typed by a user. Scores are validated only when both are filled in.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, deserialize_with = "score_text")]
    pub a_score: String,
    #[serde(default, deserialize_with = "score_text")]
    pub b_score: String,
}

impl ResultEntry {
    /// Logistics only: no scores.
    pub fn logistics(venue: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            time: time.into(),
            ..Self::default()
        }
    }

    pub fn with_scores(a_score: u32, b_score: u32) -> Self {
        Self {
            a_score: a_score.to_string(),
            b_score: b_score.to_string(),
            ..Self::default()
        }
    }

    /// Parsed scores, or None when either field is blank (a logistics-only update).
    pub fn scores(&self) -> Result<Option<(u32, u32)>, TournamentError> {
        let (a, b) = (self.a_score.trim(), self.b_score.trim());
        if a.is_empty() || b.is_empty() {
            return Ok(None);
        }
        Ok(Some((parse_score(a)?, parse_score(b)?)))
    }

    /// Blank is allowed; otherwise `HH:MM` or `HH:MM:SS`.
    pub fn validate_time(&self) -> Result<(), TournamentError> {
        let time = self.time.trim();
        if time.is_empty() {
            return Ok(());
        }
        NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map(|_| ())
            .map_err(|_| TournamentError::InvalidTime)
    }
}

fn parse_score(text: &str) -> Result<u32, TournamentError> {
    text.parse::<u32>().map_err(|_| TournamentError::InvalidScore)
}

/// Score fields come from form inputs as text, but plain JSON numbers are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreText {
    Text(String),
    Number(serde_json::Number),
}

fn score_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ScoreText>::deserialize(deserializer)? {
        None => String::new(),
        Some(ScoreText::Text(s)) => s,
        Some(ScoreText::Number(n)) => n.to_string(),
    })
}
