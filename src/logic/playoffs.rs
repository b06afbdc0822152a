//! Playoffs: top four seeded into two semifinals (1v4, 2v3) feeding a final.

use crate::logic::standings::standings;
use crate::models::{
    PlayoffMatch, PlayoffState, ResultEntry, Stage, StandingsRow, Tournament, TournamentError,
};

/// Teams that qualify for the bracket.
pub const PLAYOFF_TEAMS: usize = 4;

/// Seed a fresh bracket from ranked standings: Semi 1 = 1st v 4th, Semi 2 = 2nd v 3rd, Final TBD.
pub fn generate_playoffs(ranked: &[StandingsRow]) -> Result<PlayoffState, TournamentError> {
    if ranked.len() < PLAYOFF_TEAMS {
        return Err(TournamentError::InsufficientTeams {
            required: PLAYOFF_TEAMS,
            available: ranked.len(),
        });
    }
    let seed = |rank: usize| Some(ranked[rank].team.clone());
    Ok(PlayoffState {
        matches: [
            PlayoffMatch::new(seed(0), seed(3), Stage::Semi1),
            PlayoffMatch::new(seed(1), seed(2), Stage::Semi2),
            PlayoffMatch::new(None, None, Stage::Final),
        ],
        champion: None,
    })
}

/// Rank the league and replace the tournament's bracket with a newly seeded one.
/// On error the previous bracket is kept.
pub fn start_playoffs(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let bracket = generate_playoffs(&standings(tournament))?;
    log::info!(
        "Playoffs generated: {} v {}, {} v {}",
        bracket.matches[0].a.as_deref().unwrap_or_default(),
        bracket.matches[0].b.as_deref().unwrap_or_default(),
        bracket.matches[1].a.as_deref().unwrap_or_default(),
        bracket.matches[1].b.as_deref().unwrap_or_default(),
    );
    tournament.playoffs = Some(bracket);
    Ok(())
}

/// Record venue/time and, when both scores are given, the result of bracket match `index`.
///
/// With a blank score only venue and time change and nothing cascades. With scores, the match is
/// marked done; once both semis are done their winners fill the final, and a result in the final
/// crowns the champion. All validation happens before anything is modified.
pub fn record_playoff_result(
    state: &mut PlayoffState,
    index: usize,
    entry: &ResultEntry,
) -> Result<(), TournamentError> {
    if index >= state.matches.len() {
        return Err(TournamentError::InvalidIndex(index));
    }
    let scores = entry.scores()?;
    entry.validate_time()?;

    let Some((a_score, b_score)) = scores else {
        let m = &mut state.matches[index];
        m.venue = entry.venue.clone();
        m.time = entry.time.clone();
        return Ok(());
    };
    if a_score == b_score {
        return Err(TournamentError::TiedKnockout);
    }
    if !state.matches[index].participants_known() {
        return Err(TournamentError::ParticipantsUndecided);
    }

    let m = &mut state.matches[index];
    m.venue = entry.venue.clone();
    m.time = entry.time.clone();
    m.a_score = Some(a_score);
    m.b_score = Some(b_score);
    m.done = true;
    let stage = m.stage;

    fill_final(state);

    if stage == Stage::Final {
        state.champion = state.final_match().winner().map(str::to_string);
        if let Some(champion) = &state.champion {
            log::info!("Champion: {}", champion);
        }
    }
    Ok(())
}

/// Put the semifinal winners into the final once both semis are done.
///
/// Derived purely from the semifinal scores, so repeating it changes nothing. If a finalist changes
/// because a semifinal was re-recorded, the final's stale result and the champion are dropped.
pub fn fill_final(state: &mut PlayoffState) {
    let semi_1 = &state.matches[PlayoffState::SEMI_1];
    let semi_2 = &state.matches[PlayoffState::SEMI_2];
    let (Some(w1), Some(w2)) = (semi_1.winner(), semi_2.winner()) else {
        return;
    };
    let (w1, w2) = (w1.to_string(), w2.to_string());

    let final_match = &mut state.matches[PlayoffState::FINAL];
    if final_match.a.as_deref() == Some(w1.as_str()) && final_match.b.as_deref() == Some(w2.as_str())
    {
        return;
    }
    if final_match.done {
        log::warn!("Finalists changed to {} v {}; clearing final result", w1, w2);
        final_match.clear_result();
        state.champion = None;
    }
    final_match.a = Some(w1);
    final_match.b = Some(w2);
}

/// Record a bracket result on the tournament's playoffs.
pub fn save_playoff_result(
    tournament: &mut Tournament,
    index: usize,
    entry: &ResultEntry,
) -> Result<(), TournamentError> {
    let state = tournament
        .playoffs
        .as_mut()
        .ok_or(TournamentError::NoPlayoffs)?;
    record_playoff_result(state, index, entry)
}
