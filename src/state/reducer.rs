use crate::state::match_state::{
    Ball, BallKind, FallenWicket, MatchState, NEW_BATTER, Partnership, run_rate,
};
use crate::state::outcome::{BallOutcome, ScoreError};

/// Apply one delivery's outcome to a match state, producing the next state.
///
/// Pure: same state + same outcome always yields the same result — the
/// delivery id comes from the state's own monotonic counter, and all
/// randomness belongs to the outcome source. All-or-nothing: validation
/// failures leave the input untouched and nothing is recorded.
pub fn apply_ball_outcome(
    state: &MatchState,
    outcome: &BallOutcome,
) -> Result<MatchState, ScoreError> {
    outcome.validate()?;
    if state.striker > 1 {
        return Err(ScoreError::InvariantViolation(format!(
            "striker index {} out of range",
            state.striker
        )));
    }

    let runs = outcome.runs as u32;
    let mut next = state.clone();

    // Live-feed outcomes may carry authoritative names. Display renames
    // only — counters belong to the slot, not the name.
    if let Some(name) = &outcome.striker_name {
        next.batsmen[next.striker].name = name.clone();
    }
    if let Some(name) = &outcome.non_striker_name {
        next.batsmen[1 - next.striker].name = name.clone();
    }
    if let Some(name) = &outcome.bowler_name {
        next.bowler.name = name.clone();
    }

    // 1. Classify. Wicket wins over boundary classification.
    let kind = classify(outcome);

    // 2. Delivery record, tagged with the on-strike batter for audit.
    let ball = Ball {
        id: next.next_ball_id,
        kind,
        runs: runs as u8,
        display: display_value(kind, runs),
        shot_type: outcome.shot_type.clone(),
        shot_angle: outcome.shot_angle.map(|a| a as u16),
        shot_direction: outcome.shot_direction.clone(),
        pitch_map: outcome.pitch_map.clone(),
        commentary: outcome.commentary.clone(),
        batter_name: Some(next.striker().name.clone()),
    };
    next.next_ball_id += 1;

    // 3. Runs and wicket are independent axes; a wicket adds no runs by
    // itself, and the reducer doesn't police the zero-runs convention.
    next.total_runs += runs;

    // 4. Over counter. On rollover the whole over, new ball included,
    // becomes last_over and current_over empties.
    let over_complete = next.overs.advance();
    if over_complete {
        let mut finished = std::mem::take(&mut next.current_over);
        finished.push(ball);
        next.last_over = finished;
    } else {
        next.current_over.push(ball);
    }

    // 5. Striker figures. A wicket ball still counts as a ball faced.
    {
        let striker = &mut next.batsmen[next.striker];
        striker.balls += 1;
        striker.runs += runs;
        if outcome.runs == 4 {
            striker.fours += 1;
        }
        if outcome.runs == 6 {
            striker.sixes += 1;
        }
    }

    // 6. Wicket branch: snapshot the dismissed batter's updated figures
    // before the slot is handed to the incoming batter.
    if outcome.is_wicket {
        next.wickets += 1;
        let dismissed = &next.batsmen[next.striker];
        next.last_wicket = Some(FallenWicket {
            batter_name: dismissed.name.clone(),
            runs: dismissed.runs,
            balls: dismissed.balls,
            how_out: outcome
                .wicket_type
                .clone()
                .filter(|t| !t.is_empty() && t != "none")
                .unwrap_or_else(|| "out".into()),
            at_score: next.total_runs,
        });
        next.partnership = Partnership::default();
        let replacement = outcome
            .new_batter
            .clone()
            .unwrap_or_else(|| NEW_BATTER.into());
        next.batsmen[next.striker].reset_to(replacement);
    } else {
        next.partnership.runs += runs;
        next.partnership.balls += 1;
    }

    // 7. Strike rotation: XOR of odd-runs and over-completed-without-wicket.
    // When both hold the toggles cancel and nobody crosses.
    let odd_runs = outcome.runs % 2 == 1;
    let over_end_swap = over_complete && !outcome.is_wicket;
    if odd_runs ^ over_end_swap {
        next.striker = 1 - next.striker;
    }

    // 8. Bowler figures, same ball encoding as the match overs. A maiden
    // is credited when the completed over conceded nothing.
    next.bowler.runs_conceded += runs;
    if outcome.is_wicket {
        next.bowler.wickets += 1;
    }
    next.bowler.overs.advance();
    if over_complete
        && next
            .last_over
            .iter()
            .map(|b| u32::from(b.runs))
            .sum::<u32>()
            == 0
    {
        next.bowler.maidens += 1;
    }

    // 9. Run rates against the post-advance ball count.
    next.crr = run_rate(next.total_runs, next.overs);
    next.rrr = next.required_run_rate();

    // 10. Narrative fields overwritten unconditionally.
    next.last_commentary = outcome.commentary.clone();
    next.last_shot_type = outcome.shot_type.clone();
    next.last_shot_angle = outcome.shot_angle.map(|a| a as u16);

    Ok(next)
}

fn classify(outcome: &BallOutcome) -> BallKind {
    if outcome.is_wicket {
        return BallKind::Wicket;
    }
    match outcome.runs {
        4 => BallKind::Four,
        6 => BallKind::Six,
        0 => BallKind::Dot,
        _ => BallKind::Run,
    }
}

fn display_value(kind: BallKind, runs: u32) -> String {
    match kind {
        BallKind::Wicket => "W".into(),
        _ if runs == 0 => "·".into(),
        _ => runs.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::match_state::Overs;

    fn runs_outcome(runs: i32) -> BallOutcome {
        BallOutcome { runs, ..BallOutcome::default() }
    }

    fn wicket_outcome() -> BallOutcome {
        BallOutcome {
            runs: 0,
            is_wicket: true,
            wicket_type: Some("caught".into()),
            new_batter: Some("A. Carse".into()),
            ..BallOutcome::default()
        }
    }

    fn mid_innings_state() -> MatchState {
        let mut state = MatchState::new();
        state.batsmen[0].name = "A".into();
        state.batsmen[0].runs = 10;
        state.batsmen[0].balls = 8;
        state.batsmen[1].name = "B".into();
        state.total_runs = 10;
        state.overs = Overs::new(1, 3);
        state.partnership = Partnership { runs: 10, balls: 9 };
        state
    }

    #[test]
    fn runs_add_to_total_and_wickets_only_on_dismissal() {
        let state = MatchState::new();
        let next = apply_ball_outcome(&state, &runs_outcome(2)).unwrap();
        assert_eq!(next.total_runs, 2);
        assert_eq!(next.wickets, 0);

        let after_wicket = apply_ball_outcome(&next, &wicket_outcome()).unwrap();
        assert_eq!(after_wicket.total_runs, 2);
        assert_eq!(after_wicket.wickets, 1);
    }

    #[test]
    fn six_deliveries_roll_the_over_into_last_over_in_order() {
        let mut state = MatchState::new();
        for runs in [0, 2, 0, 4, 0, 2] {
            state = apply_ball_outcome(&state, &runs_outcome(runs)).unwrap();
        }
        assert!(state.current_over.is_empty());
        assert_eq!(state.last_over.len(), 6);
        let ids: Vec<u64> = state.last_over.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(state.overs, Overs::new(1, 0));
        assert_eq!(state.bowler.overs, Overs::new(1, 0));
        assert_eq!(state.total_runs, 8);
    }

    #[test]
    fn maiden_credited_for_a_wicketless_scoreless_over() {
        let mut state = MatchState::new();
        for _ in 0..6 {
            state = apply_ball_outcome(&state, &runs_outcome(0)).unwrap();
        }
        assert_eq!(state.bowler.maidens, 1);
        assert_eq!(state.bowler.runs_conceded, 0);
    }

    #[test]
    fn odd_runs_mid_over_rotate_strike() {
        let state = mid_innings_state();
        let next = apply_ball_outcome(&state, &runs_outcome(1)).unwrap();
        assert_eq!(next.striker, 1);
        assert_eq!(next.striker().name, "B");
    }

    #[test]
    fn over_completion_without_wicket_rotates_strike() {
        let mut state = mid_innings_state();
        state.overs = Overs::new(1, 5);
        let next = apply_ball_outcome(&state, &runs_outcome(0)).unwrap();
        assert_eq!(next.overs, Overs::new(2, 0));
        assert_eq!(next.striker, 1);
    }

    #[test]
    fn odd_runs_on_the_final_ball_cancel_the_over_end_swap() {
        let mut state = mid_innings_state();
        state.overs = Overs::new(1, 5);
        let next = apply_ball_outcome(&state, &runs_outcome(1)).unwrap();
        assert_eq!(next.overs, Overs::new(2, 0));
        // Both triggers fired; the XOR leaves the striker unchanged.
        assert_eq!(next.striker, 0);
    }

    #[test]
    fn wicket_on_the_final_ball_suppresses_the_over_end_swap() {
        let mut state = mid_innings_state();
        state.overs = Overs::new(1, 5);
        let next = apply_ball_outcome(&state, &wicket_outcome()).unwrap();
        assert_eq!(next.overs, Overs::new(2, 0));
        assert_eq!(next.striker, 0);
    }

    #[test]
    fn wicket_resets_partnership_and_records_pre_replacement_figures() {
        let state = mid_innings_state();
        let next = apply_ball_outcome(&state, &wicket_outcome()).unwrap();

        assert_eq!(next.partnership, Partnership::default());
        let fallen = next.last_wicket.as_ref().unwrap();
        assert_eq!(fallen.batter_name, "A");
        assert_eq!(fallen.runs, 10);
        assert_eq!(fallen.balls, 9); // the dismissal ball counts as faced
        assert_eq!(fallen.how_out, "caught");
        assert_eq!(fallen.at_score, next.total_runs);

        // Slot handed to the incoming batter, figures zeroed.
        assert_eq!(next.batsmen[0].name, "A. Carse");
        assert_eq!(next.batsmen[0].runs, 0);
        assert_eq!(next.batsmen[0].balls, 0);
        assert_eq!(next.bowler.wickets, 1);
    }

    #[test]
    fn wicket_without_replacement_name_uses_placeholder() {
        let state = mid_innings_state();
        let outcome = BallOutcome { new_batter: None, ..wicket_outcome() };
        let next = apply_ball_outcome(&state, &outcome).unwrap();
        assert_eq!(next.batsmen[0].name, NEW_BATTER);
    }

    #[test]
    fn run_rate_recomputed_against_effective_overs() {
        let mut state = MatchState::new();
        state.total_runs = 24;
        state.overs = Overs::new(4, 5);
        let next = apply_ball_outcome(&state, &runs_outcome(6)).unwrap();
        assert_eq!(next.total_runs, 30);
        assert_eq!(next.overs, Overs::new(5, 0));
        assert_eq!(next.crr, 6.0);
    }

    #[test]
    fn required_rate_tracks_a_chase() {
        let mut state = MatchState::new();
        state.target = Some(180);
        state.overs_limit = Some(20);
        state.overs = Overs::new(9, 5);
        state.total_runs = 89;
        let next = apply_ball_outcome(&state, &runs_outcome(1)).unwrap();
        // 90 needed off 60 balls.
        assert_eq!(next.rrr, Some(9.0));
    }

    #[test]
    fn boundary_scenario_updates_striker_and_partnership() {
        // spec scenario: 10/0 at 1.3, striker A on 10 off 8, four hit.
        let state = mid_innings_state();
        let next = apply_ball_outcome(&state, &runs_outcome(4)).unwrap();

        assert_eq!(next.total_runs, 14);
        assert_eq!(next.overs, Overs::new(1, 4));
        assert_eq!(next.striker().name, "A");
        assert_eq!(next.striker().runs, 14);
        assert_eq!(next.striker().balls, 9);
        assert_eq!(next.striker().fours, 1);
        assert_eq!(next.partnership, Partnership { runs: 14, balls: 10 });
        assert_eq!(next.current_over.len(), 1);
    }

    #[test]
    fn invalid_outcome_is_rejected_whole() {
        let state = mid_innings_state();
        assert!(matches!(
            apply_ball_outcome(&state, &runs_outcome(9)),
            Err(ScoreError::InvalidOutcome(_))
        ));
        assert!(matches!(
            apply_ball_outcome(&state, &runs_outcome(-2)),
            Err(ScoreError::InvalidOutcome(_))
        ));
    }

    #[test]
    fn out_of_range_striker_index_is_an_invariant_violation() {
        let mut state = MatchState::new();
        state.striker = 2;
        assert!(matches!(
            apply_ball_outcome(&state, &runs_outcome(1)),
            Err(ScoreError::InvariantViolation(_))
        ));
    }

    #[test]
    fn override_names_rename_slots_without_touching_figures() {
        let state = mid_innings_state();
        let outcome = BallOutcome {
            runs: 0,
            striker_name: Some("V. Kohli".into()),
            bowler_name: Some("M. Starc".into()),
            ..BallOutcome::default()
        };
        let next = apply_ball_outcome(&state, &outcome).unwrap();
        assert_eq!(next.striker().name, "V. Kohli");
        assert_eq!(next.striker().runs, 10);
        assert_eq!(next.bowler.name, "M. Starc");
    }

    #[test]
    fn narrative_fields_overwritten_each_ball() {
        let state = mid_innings_state();
        let outcome = BallOutcome {
            runs: 4,
            shot_type: Some("Pull".into()),
            shot_angle: Some(300),
            commentary: Some("Short and punished.".into()),
            ..BallOutcome::default()
        };
        let next = apply_ball_outcome(&state, &outcome).unwrap();
        assert_eq!(next.last_shot_type.as_deref(), Some("Pull"));
        assert_eq!(next.last_shot_angle, Some(300));

        // A bare outcome clears them again.
        let cleared = apply_ball_outcome(&next, &runs_outcome(0)).unwrap();
        assert!(cleared.last_shot_type.is_none());
        assert!(cleared.last_commentary.is_none());
    }

    #[test]
    fn ball_display_values_follow_broadcast_convention() {
        let state = MatchState::new();
        let dot = apply_ball_outcome(&state, &runs_outcome(0)).unwrap();
        assert_eq!(dot.current_over[0].display, "·");
        let four = apply_ball_outcome(&dot, &runs_outcome(4)).unwrap();
        assert_eq!(four.current_over[1].display, "4");
        let w = apply_ball_outcome(&four, &wicket_outcome()).unwrap();
        assert_eq!(w.current_over[2].display, "W");
        assert_eq!(w.current_over[2].batter_name.as_deref(), Some("BATTER 1"));
    }
}
