use crate::state::match_state::{
    Batter, BattingStyle, BowlerFigures, MatchState, NAME_POOL_BATTERS, NAME_POOL_BOWLERS, Overs,
    PLACEHOLDER_BATTERS, PLACEHOLDER_BOWLER, Partnership, Team, inning_team_name, run_rate,
};
use cric_api::{BatterLine, InningsCard, Squad};
use rand::Rng;

/// Everything one sync cycle learned from the feed, flattened to the
/// current innings. The worker assembles it from the match-info call plus
/// whatever of scorecard and squads succeeded; absent pieces stay None or
/// empty and the merge degrades around them.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    /// Current-innings label, e.g. "Australia Inning 1".
    pub inning: String,
    pub total_runs: u32,
    pub wickets: u32,
    /// Lossy feed decimal (18.2 = 18 overs 2 balls), None when the feed
    /// sent no overs figure.
    pub overs: Option<f64>,
    pub card: Option<InningsCard>,
    pub squads: Vec<Squad>,
}

/// Fold a feed snapshot into the session state, field by field. The
/// aggregate score is authoritative; names resolve through the scorecard,
/// then the squad, then the local pool; anything the snapshot doesn't
/// carry keeps its current value.
pub fn merge_external_snapshot(state: &MatchState, snap: &FeedSnapshot) -> MatchState {
    let mut next = state.clone();

    // Innings change first: if the label now names the side we had
    // bowling, the sides cross and every per-innings counter restarts.
    // The previous total becomes the chase target.
    let swapped = innings_changed(&next, &snap.inning);
    if swapped {
        std::mem::swap(&mut next.batting_team, &mut next.bowling_team);
        next.target = Some(next.total_runs + 1);
        next.batsmen = [
            Batter::placeholder(PLACEHOLDER_BATTERS[0]),
            Batter::placeholder(PLACEHOLDER_BATTERS[1]),
        ];
        next.striker = 0;
        next.bowler = BowlerFigures::placeholder();
        next.current_over.clear();
        next.last_over.clear();
        next.partnership = Partnership::default();
        next.last_wicket = None;
    }

    next.total_runs = snap.total_runs;
    next.wickets = snap.wickets;
    // A malformed overs decimal leaves both overs and the rate untouched
    // rather than corrupting the ball count.
    if let Some(overs) = snap.overs.and_then(Overs::from_feed_decimal) {
        next.overs = overs;
        next.crr = run_rate(next.total_runs, overs);
    }
    next.rrr = next.required_run_rate();

    merge_batters(&mut next, snap, swapped);
    merge_bowler(&mut next, snap, swapped);
    apply_batting_styles(&mut next, snap);

    next
}

fn innings_changed(state: &MatchState, inning_label: &str) -> bool {
    let label_team = inning_team_name(inning_label).to_uppercase();
    if label_team.is_empty() {
        return false;
    }
    team_matches(&state.bowling_team, &label_team) && !team_matches(&state.batting_team, &label_team)
}

fn team_matches(team: &Team, upper_name: &str) -> bool {
    team.name.contains(upper_name) || upper_name.contains(&team.name)
}

/// Resolve the two batting slots. Tiers, first non-empty wins:
/// scorecard rows still batting, then the last two scorecard rows raw,
/// then the top of the squad list, then the local pool — the pool only
/// ever overwrites generated placeholder names, and never in the merge
/// that swapped the sides (the next sync's scorecard names the new
/// pair; a pool guess made now would be misattributed to the old side).
fn merge_batters(state: &mut MatchState, snap: &FeedSnapshot, swapped: bool) {
    let card = snap.card.as_ref();

    let active: Vec<&BatterLine> = card
        .map(|c| c.batting.iter().filter(|b| b.is_active()).collect())
        .unwrap_or_default();
    let pair: Vec<&BatterLine> = if !active.is_empty() {
        last_two(&active)
    } else if let Some(c) = card.filter(|c| !c.batting.is_empty()) {
        last_two(&c.batting.iter().collect::<Vec<_>>())
    } else {
        Vec::new()
    };

    if !pair.is_empty() {
        for (slot, line) in state.batsmen.iter_mut().zip(pair) {
            if !slot.name.eq_ignore_ascii_case(&line.name) {
                slot.reset_to(line.name.clone());
            }
            slot.runs = line.runs;
            slot.balls = line.balls;
            slot.fours = line.fours;
            slot.sixes = line.sixes;
        }
        return;
    }

    let squad_names: Vec<&str> = batting_squad(state, snap)
        .map(|s| s.players.iter().map(|p| p.name.as_str()).collect())
        .unwrap_or_default();
    if squad_names.len() >= 2 {
        for (slot, name) in state.batsmen.iter_mut().zip(squad_names) {
            if !slot.name.eq_ignore_ascii_case(name) {
                slot.reset_to(name);
            }
        }
        return;
    }

    if !swapped && state.has_placeholder_batters() {
        let mut rng = rand::thread_rng();
        let first = rng.gen_range(0..NAME_POOL_BATTERS.len());
        let second = (first + 1 + rng.gen_range(0..NAME_POOL_BATTERS.len() - 1))
            % NAME_POOL_BATTERS.len();
        state.batsmen[0].reset_to(NAME_POOL_BATTERS[first]);
        state.batsmen[1].reset_to(NAME_POOL_BATTERS[second]);
    }
}

fn last_two<'a>(lines: &[&'a BatterLine]) -> Vec<&'a BatterLine> {
    lines[lines.len().saturating_sub(2)..].to_vec()
}

fn merge_bowler(state: &mut MatchState, snap: &FeedSnapshot, swapped: bool) {
    let line = snap
        .card
        .as_ref()
        .and_then(|c| c.bowling.last());
    if let Some(line) = line {
        state.bowler.name = line.name.clone();
        state.bowler.runs_conceded = line.runs;
        state.bowler.wickets = line.wickets;
        state.bowler.maidens = line.maidens;
        if let Some(overs) = Overs::from_feed_decimal(line.overs) {
            state.bowler.overs = overs;
        }
    } else if !swapped && state.bowler.name == PLACEHOLDER_BOWLER {
        let mut rng = rand::thread_rng();
        state.bowler.name =
            NAME_POOL_BOWLERS[rng.gen_range(0..NAME_POOL_BOWLERS.len())].to_string();
    }
}

fn apply_batting_styles(state: &mut MatchState, snap: &FeedSnapshot) {
    let Some(squad) = batting_squad(state, snap) else {
        return;
    };
    for slot in state.batsmen.iter_mut() {
        let style = squad
            .players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&slot.name))
            .and_then(|p| p.batting_style.as_deref());
        if let Some(style) = style {
            slot.batting_style = if style.to_lowercase().contains("left") {
                BattingStyle::LeftHand
            } else {
                BattingStyle::RightHand
            };
        }
    }
}

fn batting_squad<'a>(state: &MatchState, snap: &'a FeedSnapshot) -> Option<&'a Squad> {
    snap.squads
        .iter()
        .find(|s| team_matches(&state.batting_team, &s.team_name.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cric_api::SquadPlayer;

    fn named_state() -> MatchState {
        let mut state = MatchState::new();
        state.batting_team.name = "AUSTRALIA".into();
        state.bowling_team.name = "INDIA".into();
        state.batsmen[0].name = "T. Head".into();
        state.batsmen[0].runs = 31;
        state.batsmen[0].balls = 18;
        state.batsmen[1].name = "M. Marsh".into();
        state.bowler.name = "J. Bumrah".into();
        state.total_runs = 52;
        state.wickets = 1;
        state.overs = Overs::new(6, 2);
        state.partnership = Partnership { runs: 20, balls: 15 };
        state
    }

    fn totals_snapshot() -> FeedSnapshot {
        FeedSnapshot {
            inning: "Australia Inning 1".into(),
            total_runs: 58,
            wickets: 1,
            overs: Some(7.1),
            ..FeedSnapshot::default()
        }
    }

    fn batter_line(name: &str, dismissal: &str, runs: u32, balls: u32) -> BatterLine {
        BatterLine {
            name: name.into(),
            dismissal: dismissal.into(),
            runs,
            balls,
            fours: runs / 8,
            sixes: 0,
        }
    }

    #[test]
    fn totals_only_snapshot_touches_only_the_aggregate() {
        let state = named_state();
        let next = merge_external_snapshot(&state, &totals_snapshot());

        assert_eq!(next.total_runs, 58);
        assert_eq!(next.overs, Overs::new(7, 1));
        assert_eq!(next.crr, run_rate(58, Overs::new(7, 1)));

        // Named slots and local context survive untouched.
        assert_eq!(next.batsmen[0].name, "T. Head");
        assert_eq!(next.batsmen[0].runs, 31);
        assert_eq!(next.bowler.name, "J. Bumrah");
        assert_eq!(next.partnership, Partnership { runs: 20, balls: 15 });
    }

    #[test]
    fn malformed_overs_decimal_keeps_existing_overs_and_rate() {
        let state = named_state();
        let before_crr = state.crr;
        let snap = FeedSnapshot { overs: Some(7.8), ..totals_snapshot() };
        let next = merge_external_snapshot(&state, &snap);
        assert_eq!(next.overs, Overs::new(6, 2));
        assert_eq!(next.crr, before_crr);
        assert_eq!(next.total_runs, 58);
    }

    #[test]
    fn innings_change_swaps_sides_and_restarts_counters() {
        let state = named_state();
        let snap = FeedSnapshot {
            inning: "India Inning 2".into(),
            total_runs: 4,
            wickets: 0,
            overs: Some(0.3),
            ..FeedSnapshot::default()
        };
        let next = merge_external_snapshot(&state, &snap);

        assert_eq!(next.batting_team.name, "INDIA");
        assert_eq!(next.bowling_team.name, "AUSTRALIA");
        assert_eq!(next.target, Some(53)); // previous total + 1
        assert_eq!(next.total_runs, 4);
        assert!(next.last_over.is_empty());
        assert!(next.last_wicket.is_none());
        assert_eq!(next.partnership, Partnership::default());

        // Slots and bowler reset to placeholders with zeroed stats; the
        // pool does not guess in the swap merge itself.
        assert_eq!(next.batsmen[0].name, PLACEHOLDER_BATTERS[0]);
        assert_eq!(next.batsmen[0].runs, 0);
        assert_eq!(next.bowler.name, PLACEHOLDER_BOWLER);
        assert_eq!(next.bowler.runs_conceded, 0);
    }

    #[test]
    fn active_scorecard_batters_overlay_names_and_figures() {
        let state = MatchState::new();
        let snap = FeedSnapshot {
            card: Some(InningsCard {
                inning: "Australia Inning 1".into(),
                batting: vec![
                    batter_line("D. Warner", "c Kohli b Bumrah", 12, 10),
                    batter_line("T. Head", "batting", 40, 22),
                    batter_line("M. Marsh", "not out", 8, 5),
                ],
                bowling: Vec::new(),
            }),
            ..totals_snapshot()
        };
        let next = merge_external_snapshot(&state, &snap);

        assert_eq!(next.batsmen[0].name, "T. Head");
        assert_eq!(next.batsmen[0].runs, 40);
        assert_eq!(next.batsmen[0].balls, 22);
        assert_eq!(next.batsmen[1].name, "M. Marsh");
        assert_eq!(next.batsmen[1].runs, 8);
    }

    #[test]
    fn all_out_card_falls_back_to_last_two_raw_rows() {
        let state = MatchState::new();
        let snap = FeedSnapshot {
            card: Some(InningsCard {
                inning: String::new(),
                batting: vec![
                    batter_line("D. Warner", "b Bumrah", 12, 10),
                    batter_line("T. Head", "c & b Jadeja", 40, 22),
                    batter_line("M. Marsh", "run out", 8, 5),
                ],
                bowling: Vec::new(),
            }),
            ..totals_snapshot()
        };
        let next = merge_external_snapshot(&state, &snap);
        assert_eq!(next.batsmen[0].name, "T. Head");
        assert_eq!(next.batsmen[1].name, "M. Marsh");
    }

    #[test]
    fn squad_fills_names_when_no_scorecard_exists() {
        let mut state = MatchState::new();
        state.batting_team.name = "AUSTRALIA".into();
        let snap = FeedSnapshot {
            squads: vec![Squad {
                team_name: "Australia".into(),
                short_name: "AUS".into(),
                players: vec![
                    SquadPlayer { name: "D. Warner".into(), batting_style: Some("Left Handed Bat".into()) },
                    SquadPlayer { name: "S. Smith".into(), batting_style: None },
                ],
            }],
            ..totals_snapshot()
        };
        let next = merge_external_snapshot(&state, &snap);
        assert_eq!(next.batsmen[0].name, "D. Warner");
        assert_eq!(next.batsmen[0].batting_style, BattingStyle::LeftHand);
        assert_eq!(next.batsmen[1].name, "S. Smith");
        // Squad carries no figures; the slots start from zero.
        assert_eq!(next.batsmen[0].runs, 0);
    }

    #[test]
    fn name_pool_fires_only_over_placeholders() {
        // Placeholder slots with nothing usable in the snapshot get pool
        // names, and the two picks never collide.
        let next = merge_external_snapshot(&MatchState::new(), &totals_snapshot());
        assert!(NAME_POOL_BATTERS.contains(&next.batsmen[0].name.as_str()));
        assert!(NAME_POOL_BATTERS.contains(&next.batsmen[1].name.as_str()));
        assert_ne!(next.batsmen[0].name, next.batsmen[1].name);
        assert!(NAME_POOL_BOWLERS.contains(&next.bowler.name.as_str()));

        // Real names are never pool-overwritten.
        let kept = merge_external_snapshot(&named_state(), &totals_snapshot());
        assert_eq!(kept.batsmen[0].name, "T. Head");
        assert_eq!(kept.bowler.name, "J. Bumrah");
    }

    #[test]
    fn bowler_figures_come_from_the_last_bowling_row() {
        let state = named_state();
        let snap = FeedSnapshot {
            card: Some(InningsCard {
                inning: String::new(),
                batting: vec![batter_line("T. Head", "batting", 31, 18)],
                bowling: vec![
                    cric_api::BowlerLine {
                        name: "M. Siraj".into(),
                        overs: 3.0,
                        maidens: 0,
                        runs: 29,
                        wickets: 0,
                    },
                    cric_api::BowlerLine {
                        name: "J. Bumrah".into(),
                        overs: 3.2,
                        maidens: 1,
                        runs: 14,
                        wickets: 1,
                    },
                ],
            }),
            ..totals_snapshot()
        };
        let next = merge_external_snapshot(&state, &snap);
        assert_eq!(next.bowler.name, "J. Bumrah");
        assert_eq!(next.bowler.overs, Overs::new(3, 2));
        assert_eq!(next.bowler.maidens, 1);
        assert_eq!(next.bowler.runs_conceded, 14);
    }

    #[test]
    fn renamed_slot_drops_stale_figures_before_overlay() {
        let mut state = named_state();
        state.batsmen[1].runs = 99;
        state.batsmen[1].portrait_url = Some("https://img/old.jpg".into());
        let snap = FeedSnapshot {
            card: Some(InningsCard {
                inning: String::new(),
                batting: vec![
                    batter_line("T. Head", "batting", 31, 18),
                    batter_line("G. Maxwell", "not out", 2, 4),
                ],
                bowling: Vec::new(),
            }),
            ..totals_snapshot()
        };
        let next = merge_external_snapshot(&state, &snap);
        assert_eq!(next.batsmen[1].name, "G. Maxwell");
        assert_eq!(next.batsmen[1].runs, 2);
        assert!(next.batsmen[1].portrait_url.is_none());
    }
}
