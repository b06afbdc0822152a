//! Integration tests for the playoff bracket: seeding, result recording and the final/champion cascade.

use cricket_tournament_web::{
    fill_final, generate_playoffs, generate_round_robin, record_playoff_result, save_match_result,
    save_playoff_result, start_playoffs, MatchState, PlayoffState, ResultEntry, Stage,
    StandingsRow, Tournament, TournamentError,
};

/// Bracket seeded T1 v T4, T2 v T3.
fn bracket() -> PlayoffState {
    let ranked: Vec<StandingsRow> = ["T1", "T2", "T3", "T4"]
        .iter()
        .map(|t| StandingsRow::new(*t))
        .collect();
    generate_playoffs(&ranked).unwrap()
}

fn result(a_score: u32, b_score: u32) -> ResultEntry {
    ResultEntry::with_scores(a_score, b_score)
}

/// Semi 1: T1 180-150 T4. Semi 2: T2 160-170 T3.
fn semis_played() -> PlayoffState {
    let mut state = bracket();
    record_playoff_result(&mut state, 0, &result(180, 150)).unwrap();
    record_playoff_result(&mut state, 1, &result(160, 170)).unwrap();
    state
}

#[test]
fn fresh_bracket_is_blank_with_final_to_be_decided() {
    let state = bracket();
    let stages: Vec<Stage> = state.matches.iter().map(|m| m.stage).collect();
    assert_eq!(stages, vec![Stage::Semi1, Stage::Semi2, Stage::Final]);
    for m in &state.matches {
        assert_eq!(m.venue, "");
        assert_eq!(m.time, "");
        assert_eq!(m.scores(), None);
        assert!(!m.done);
    }
    assert_eq!(state.matches[0].state(), MatchState::Pending);
    assert_eq!(state.final_match().state(), MatchState::AwaitingParticipants);
    assert_eq!(state.champion, None);
}

#[test]
fn generate_requires_four_teams() {
    let ranked: Vec<StandingsRow> = ["T1", "T2", "T3"]
        .iter()
        .map(|t| StandingsRow::new(*t))
        .collect();
    assert_eq!(
        generate_playoffs(&ranked),
        Err(TournamentError::InsufficientTeams {
            required: 4,
            available: 3
        })
    );
}

#[test]
fn failed_generation_keeps_previous_bracket() {
    let mut t = Tournament::with_teams(["Kings", "Royals", "Titans", "Giants"]).unwrap();
    start_playoffs(&mut t).unwrap();
    let before = t.playoffs.clone();
    assert!(before.is_some());

    t.remove_team("Giants").unwrap();
    assert_eq!(
        start_playoffs(&mut t),
        Err(TournamentError::InsufficientTeams {
            required: 4,
            available: 3
        })
    );
    assert_eq!(t.playoffs, before);
}

#[test]
fn regenerating_overwrites_existing_bracket() {
    let mut t = Tournament::with_teams(["Kings", "Royals", "Titans", "Giants"]).unwrap();
    start_playoffs(&mut t).unwrap();
    save_playoff_result(&mut t, 0, &result(150, 120)).unwrap();

    start_playoffs(&mut t).unwrap();
    let state = t.playoffs.unwrap();
    assert!(state.matches.iter().all(|m| !m.done));
}

#[test]
fn semifinal_winners_meet_in_the_final() {
    let state = semis_played();
    let final_match = state.final_match();
    assert_eq!(final_match.a.as_deref(), Some("T1"));
    assert_eq!(final_match.b.as_deref(), Some("T3"));
    assert_eq!(final_match.state(), MatchState::Pending);
    assert_eq!(state.champion, None);
}

#[test]
fn one_semifinal_is_not_enough_for_the_final() {
    let mut state = bracket();
    record_playoff_result(&mut state, 0, &result(180, 150)).unwrap();
    assert_eq!(state.matches[0].state(), MatchState::Done);
    assert_eq!(state.matches[0].winner(), Some("T1"));
    assert_eq!(state.final_match().a, None);
    assert_eq!(state.final_match().b, None);
}

#[test]
fn final_result_crowns_champion_and_cascade_is_stable() {
    let mut state = semis_played();
    let entry = ResultEntry {
        venue: "Eden Gardens".into(),
        time: "19:30".into(),
        ..result(200, 190)
    };
    record_playoff_result(&mut state, 2, &entry).unwrap();
    assert_eq!(state.champion.as_deref(), Some("T1"));
    assert!(state.final_match().done);
    assert_eq!(state.final_match().venue, "Eden Gardens");

    let settled = state.clone();
    fill_final(&mut state);
    assert_eq!(state, settled);

    // re-saving a semifinal with the same outcome leaves the final alone
    record_playoff_result(&mut state, 1, &result(160, 170)).unwrap();
    assert_eq!(state, settled);
}

#[test]
fn final_won_by_second_finalist() {
    let mut state = semis_played();
    record_playoff_result(&mut state, 2, &result(140, 141)).unwrap();
    assert_eq!(state.champion.as_deref(), Some("T3"));
}

#[test]
fn blank_scores_update_only_logistics() {
    let mut state = bracket();
    record_playoff_result(&mut state, 0, &result(180, 150)).unwrap();

    let entry = ResultEntry::logistics("Wankhede", "15:30");
    record_playoff_result(&mut state, 1, &entry).unwrap();
    let semi_2 = &state.matches[1];
    assert_eq!(semi_2.venue, "Wankhede");
    assert_eq!(semi_2.time, "15:30");
    assert!(!semi_2.done);
    assert_eq!(semi_2.state(), MatchState::AwaitingScores);
    assert_eq!(state.final_match().a, None);
}

#[test]
fn one_blank_score_is_logistics_only() {
    let mut state = bracket();
    let entry = ResultEntry {
        venue: "Chepauk".into(),
        a_score: "180".into(),
        ..ResultEntry::default()
    };
    record_playoff_result(&mut state, 0, &entry).unwrap();
    assert_eq!(state.matches[0].venue, "Chepauk");
    assert_eq!(state.matches[0].scores(), None);
    assert!(!state.matches[0].done);
}

#[test]
fn out_of_range_index_is_rejected() {
    let mut state = bracket();
    assert_eq!(
        record_playoff_result(&mut state, 3, &result(1, 0)),
        Err(TournamentError::InvalidIndex(3))
    );
    assert_eq!(state, bracket());
}

#[test]
fn malformed_scores_change_nothing() {
    let mut state = bracket();
    let entry = ResultEntry {
        venue: "Eden Gardens".into(),
        a_score: "one hundred".into(),
        b_score: "99".into(),
        ..ResultEntry::default()
    };
    assert_eq!(
        record_playoff_result(&mut state, 0, &entry),
        Err(TournamentError::InvalidScore)
    );
    assert_eq!(state, bracket());
}

#[test]
fn malformed_time_changes_nothing() {
    let mut state = bracket();
    let entry = ResultEntry::logistics("Eden Gardens", "half past seven");
    assert_eq!(
        record_playoff_result(&mut state, 0, &entry),
        Err(TournamentError::InvalidTime)
    );
    assert_eq!(state, bracket());
}

#[test]
fn tied_knockout_is_rejected() {
    let mut state = bracket();
    assert_eq!(
        record_playoff_result(&mut state, 0, &result(160, 160)),
        Err(TournamentError::TiedKnockout)
    );
    assert_eq!(state, bracket());
}

#[test]
fn final_cannot_be_scored_before_semis() {
    let mut state = bracket();
    assert_eq!(
        record_playoff_result(&mut state, 2, &result(200, 190)),
        Err(TournamentError::ParticipantsUndecided)
    );
    assert_eq!(state.champion, None);

    // logistics for the final are fine
    record_playoff_result(&mut state, 2, &ResultEntry::logistics("Eden Gardens", "19:30")).unwrap();
    assert_eq!(state.final_match().venue, "Eden Gardens");
    assert_eq!(state.final_match().state(), MatchState::AwaitingParticipants);
}

#[test]
fn changed_semifinal_outcome_resets_decided_final() {
    let mut state = semis_played();
    record_playoff_result(&mut state, 2, &result(200, 190)).unwrap();
    assert_eq!(state.champion.as_deref(), Some("T1"));

    // T4 now wins Semi 1
    record_playoff_result(&mut state, 0, &result(150, 180)).unwrap();
    let final_match = state.final_match();
    assert_eq!(final_match.a.as_deref(), Some("T4"));
    assert_eq!(final_match.b.as_deref(), Some("T3"));
    assert!(!final_match.done);
    assert_eq!(final_match.scores(), None);
    assert_eq!(state.champion, None);
}

#[test]
fn saving_without_playoffs_fails() {
    let mut t = Tournament::with_teams(["Kings", "Royals", "Titans", "Giants"]).unwrap();
    assert_eq!(
        save_playoff_result(&mut t, 0, &result(1, 0)),
        Err(TournamentError::NoPlayoffs)
    );
}

#[test]
fn league_to_champion() {
    let mut t = Tournament::with_teams(["Kings", "Royals", "Titans", "Giants", "Knights"]).unwrap();
    generate_round_robin(&mut t).unwrap();
    // Kings beat everyone, Royals beat the rest, and so on down the list
    for i in 0..t.matches.len() {
        save_match_result(&mut t, i, &result(170, 150)).unwrap();
    }
    start_playoffs(&mut t).unwrap();

    let state = t.playoffs.as_ref().unwrap();
    assert_eq!(state.matches[0].a.as_deref(), Some("Kings"));
    assert_eq!(state.matches[0].b.as_deref(), Some("Giants"));
    assert_eq!(state.matches[1].a.as_deref(), Some("Royals"));
    assert_eq!(state.matches[1].b.as_deref(), Some("Titans"));

    save_playoff_result(&mut t, 0, &result(190, 150)).unwrap();
    save_playoff_result(&mut t, 1, &result(140, 150)).unwrap();
    save_playoff_result(&mut t, 2, &result(175, 176)).unwrap();

    let state = t.playoffs.unwrap();
    assert_eq!(state.final_match().a.as_deref(), Some("Kings"));
    assert_eq!(state.final_match().b.as_deref(), Some("Titans"));
    assert_eq!(state.champion.as_deref(), Some("Titans"));
}
