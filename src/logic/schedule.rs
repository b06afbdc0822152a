//! League stage: round-robin schedule and match results.

use crate::models::{Match, ResultEntry, Tournament, TournamentError};

/// Replace the schedule with a single round robin: every team meets every other team once,
/// pairs in team order.
pub fn generate_round_robin(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let teams = &tournament.teams;
    if teams.len() < 2 {
        return Err(TournamentError::InsufficientTeams {
            required: 2,
            available: teams.len(),
        });
    }
    let mut matches = Vec::with_capacity(teams.len() * (teams.len() - 1) / 2);
    for (i, a) in teams.iter().enumerate() {
        for b in &teams[i + 1..] {
            matches.push(Match::new(&a.name, &b.name));
        }
    }
    log::info!(
        "Generated round robin: {} matches for {} teams",
        matches.len(),
        teams.len()
    );
    tournament.matches = matches;
    Ok(())
}

/// Save venue/time and, when both scores are filled in, the result of league match `index`.
/// Level scores are a tie (one point each).
pub fn save_match_result(
    tournament: &mut Tournament,
    index: usize,
    entry: &ResultEntry,
) -> Result<(), TournamentError> {
    let scores = entry.scores()?;
    entry.validate_time()?;
    let m = tournament
        .matches
        .get_mut(index)
        .ok_or(TournamentError::InvalidIndex(index))?;
    m.venue = entry.venue.clone();
    m.time = entry.time.clone();
    if let Some((a_score, b_score)) = scores {
        m.a_score = Some(a_score);
        m.b_score = Some(b_score);
        m.done = true;
    }
    Ok(())
}
