use cric_api::MatchSummary;
use std::fmt;

pub const PLACEHOLDER_BATTERS: [&str; 2] = ["BATTER 1", "BATTER 2"];
pub const PLACEHOLDER_BOWLER: &str = "BOWLER";
pub const NEW_BATTER: &str = "NEW BATTER";

/// Pool of plausible names, used when every feed tier fails and for
/// simulated replacements after a wicket.
pub const NAME_POOL_BATTERS: [&str; 15] = [
    "R. Sharma", "T. Head", "J. Root", "K. Williamson", "B. Azam",
    "S. Smith", "D. Warner", "S. Gill", "H. Klaasen", "G. Maxwell",
    "R. Ravindra", "Y. Jaiswal", "M. Marsh", "Q. de Kock", "J. Buttler",
];

pub const NAME_POOL_BOWLERS: [&str; 10] = [
    "J. Bumrah", "P. Cummins", "K. Rabada", "S. Afridi", "T. Boult",
    "M. Starc", "R. Rashid", "A. Zampa", "M. Siraj", "T. Southee",
];

// ---------------------------------------------------------------------------
// Overs — explicit (completed, balls) pair
// ---------------------------------------------------------------------------

/// Over progress as an explicit pair. `balls` is always in [0,5] after any
/// scoring step; the feed's lossy decimal ("18.2" meaning 18 overs 2 balls)
/// exists only at the wire/display boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overs {
    pub completed: u16,
    pub balls: u8,
}

impl Overs {
    pub fn new(completed: u16, balls: u8) -> Self {
        Self { completed, balls }
    }

    /// Count one legal delivery. Returns true when this ball completed the
    /// over (balls rolled back to 0).
    pub fn advance(&mut self) -> bool {
        self.balls += 1;
        if self.balls >= 6 {
            self.completed += 1;
            self.balls = 0;
            return true;
        }
        false
    }

    pub fn legal_balls(&self) -> u32 {
        u32::from(self.completed) * 6 + u32::from(self.balls)
    }

    /// Effective overs as a real number (balls are sixths, not tenths).
    pub fn as_real(&self) -> f64 {
        f64::from(self.completed) + f64::from(self.balls) / 6.0
    }

    /// Decode the feed's lossy decimal. The fractional digit is a ball
    /// count; a digit above 5 is malformed and yields None.
    pub fn from_feed_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let completed = value.trunc() as u16;
        let balls = ((value.fract() * 10.0).round()) as u8;
        if balls > 5 {
            return None;
        }
        Some(Self { completed, balls })
    }
}

impl fmt::Display for Overs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.completed, self.balls)
    }
}

/// Current run rate: runs per over against effective overs, 2 decimals.
/// Zero legal balls reads as 0.00 — the broadcast strip shows a dash
/// before the first delivery anyway.
pub fn run_rate(total_runs: u32, overs: Overs) -> f64 {
    let balls = overs.legal_balls();
    if balls == 0 {
        return 0.0;
    }
    round2(f64::from(total_runs) * 6.0 / f64::from(balls))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Team {
    pub name: String,
    pub short_name: String,
    pub color: Option<String>, // hex, from the feed or a default
    pub flag_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BattingStyle {
    #[default]
    RightHand,
    LeftHand,
}

impl BattingStyle {
    pub fn label(&self) -> &'static str {
        match self {
            BattingStyle::RightHand => "RHB",
            BattingStyle::LeftHand => "LHB",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Batter {
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub batting_style: BattingStyle,
    pub portrait_url: Option<String>,
}

impl Batter {
    pub fn placeholder(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    /// Replace this slot with a fresh batter: new name, zeroed figures.
    pub fn reset_to(&mut self, name: impl Into<String>) {
        *self = Self { name: name.into(), batting_style: self.batting_style, ..Self::default() };
    }

    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        round2(f64::from(self.runs) * 100.0 / f64::from(self.balls))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BowlerFigures {
    pub name: String,
    pub wickets: u32,
    pub runs_conceded: u32,
    pub overs: Overs,
    pub maidens: u32,
}

impl BowlerFigures {
    pub fn placeholder() -> Self {
        Self { name: PLACEHOLDER_BOWLER.to_string(), ..Self::default() }
    }

    /// Runs conceded per over bowled.
    pub fn economy(&self) -> f64 {
        let overs = self.overs.as_real();
        if overs == 0.0 {
            return 0.0;
        }
        round2(f64::from(self.runs_conceded) / overs)
    }
}

// ---------------------------------------------------------------------------
// Deliveries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallKind {
    Dot,
    Run,
    Four,
    Six,
    Wicket,
    // Classification placeholders: illegal-delivery scoring (extra run, no
    // legal-ball consumption) is an open question and not applied yet.
    Wide,
    NoBall,
}

/// Immutable record of one delivery. Created once by the reducer, never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u64,
    pub kind: BallKind,
    pub runs: u8,
    pub display: String, // "W", "·", or the run count
    pub shot_type: Option<String>,
    pub shot_angle: Option<u16>, // wagon-wheel degrees, 0 = straight down the ground
    pub shot_direction: Option<String>,
    pub pitch_map: Option<String>,
    pub commentary: Option<String>,
    pub batter_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Partnership {
    pub runs: u32,
    pub balls: u32,
}

#[derive(Debug, Clone)]
pub struct FallenWicket {
    pub batter_name: String,
    pub runs: u32,
    pub balls: u32,
    pub how_out: String,
    pub at_score: u32,
}

// ---------------------------------------------------------------------------
// MatchState — the session aggregate
// ---------------------------------------------------------------------------

/// Full broadcast-overlay state for one innings in progress. Owned by a
/// single session; mutated only through the reducer and the merge adapter.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub total_runs: u32,
    pub wickets: u32,
    pub overs: Overs,
    pub crr: f64,
    pub target: Option<u32>,
    pub rrr: Option<f64>,
    pub overs_limit: Option<u16>,
    /// Fixed two-slot batting pair; `striker` indexes into it and is always
    /// 0 or 1 — there is no "neither batter on strike" state to violate.
    pub batsmen: [Batter; 2],
    pub striker: usize,
    pub bowler: BowlerFigures,
    pub current_over: Vec<Ball>,
    pub last_over: Vec<Ball>,
    pub partnership: Partnership,
    pub last_wicket: Option<FallenWicket>,
    pub last_commentary: Option<String>,
    pub last_shot_type: Option<String>,
    pub last_shot_angle: Option<u16>,
    /// Monotonic delivery-id counter. Uniqueness only — never scoring.
    pub next_ball_id: u64,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    /// Placeholder session shown before a match is selected.
    pub fn new() -> Self {
        Self {
            batting_team: Team {
                name: "HOME TEAM".into(),
                short_name: "HOM".into(),
                color: Some("#334155".into()),
                flag_url: None,
            },
            bowling_team: Team {
                name: "AWAY TEAM".into(),
                short_name: "AWY".into(),
                color: Some("#475569".into()),
                flag_url: None,
            },
            total_runs: 0,
            wickets: 0,
            overs: Overs::default(),
            crr: 0.0,
            target: None,
            rrr: None,
            overs_limit: None,
            batsmen: [
                Batter::placeholder(PLACEHOLDER_BATTERS[0]),
                Batter::placeholder(PLACEHOLDER_BATTERS[1]),
            ],
            striker: 0,
            bowler: BowlerFigures::placeholder(),
            current_over: Vec::new(),
            last_over: Vec::new(),
            partnership: Partnership::default(),
            last_wicket: None,
            last_commentary: Some("Waiting for match selection...".into()),
            last_shot_type: None,
            last_shot_angle: None,
            next_ball_id: 0,
        }
    }

    /// Bootstrap a session from a catalog entry: assign sides from the
    /// current inning label, seed the aggregate score, reset everything the
    /// summary feed doesn't carry.
    pub fn from_catalog(summary: &MatchSummary) -> Self {
        let mut state = Self::new();

        let current = summary.current_inning();
        let batting_name = current
            .map(|i| inning_team_name(&i.inning))
            .filter(|n| !n.is_empty())
            .or_else(|| summary.team_info.first().map(|t| t.name.clone()))
            .unwrap_or_default();

        let batting_info = summary
            .team_info
            .iter()
            .find(|t| t.name.contains(&batting_name) || batting_name.contains(&t.name))
            .or_else(|| summary.team_info.first())
            .cloned()
            .unwrap_or_default();
        let bowling_info = summary
            .team_info
            .iter()
            .find(|t| t.name != batting_info.name)
            .or_else(|| summary.team_info.get(1))
            .cloned()
            .unwrap_or_default();

        state.batting_team = Team {
            name: batting_info.name.to_uppercase(),
            short_name: batting_info.short_name.to_uppercase(),
            color: Some("#1e293b".into()),
            flag_url: batting_info.img,
        };
        state.bowling_team = Team {
            name: bowling_info.name.to_uppercase(),
            short_name: bowling_info.short_name.to_uppercase(),
            color: Some("#334155".into()),
            flag_url: bowling_info.img,
        };

        if let Some(inning) = current {
            state.total_runs = inning.runs;
            state.wickets = inning.wickets;
            state.overs = Overs::from_feed_decimal(inning.overs).unwrap_or_default();
            state.crr = run_rate(state.total_runs, state.overs);
        }

        state.overs_limit = summary.overs_limit();
        state.last_commentary = Some(format!("Live score synced from {}", summary.venue));
        state
    }

    pub fn striker(&self) -> &Batter {
        &self.batsmen[self.striker]
    }

    pub fn non_striker(&self) -> &Batter {
        &self.batsmen[1 - self.striker]
    }

    /// "112/3" broadcast score line.
    pub fn score_line(&self) -> String {
        format!("{}/{}", self.total_runs, self.wickets)
    }

    /// Required run rate for a chase, None outside one (no target, no
    /// overs cap, or no balls left).
    pub fn required_run_rate(&self) -> Option<f64> {
        let target = self.target?;
        let limit = u32::from(self.overs_limit?) * 6;
        let remaining_balls = limit.saturating_sub(self.overs.legal_balls());
        if remaining_balls == 0 {
            return None;
        }
        let needed = target.saturating_sub(self.total_runs);
        Some(round2(f64::from(needed) * 6.0 / f64::from(remaining_balls)))
    }

    /// True while both batting slots still hold generated placeholder
    /// names — the only situation in which the name pool may overwrite.
    pub fn has_placeholder_batters(&self) -> bool {
        self.batsmen.iter().all(|b| {
            PLACEHOLDER_BATTERS.contains(&b.name.as_str()) || b.name == NEW_BATTER
        })
    }
}

/// "India Inning 1" → "India". The feed prefixes the label with the side.
pub fn inning_team_name(label: &str) -> String {
    label.split("Inning").next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cric_api::{InningTotal, TeamInfo};

    #[test]
    fn overs_feed_decimal_round_trips_legal_values() {
        let o = Overs::from_feed_decimal(18.2).unwrap();
        assert_eq!(o, Overs::new(18, 2));
        assert_eq!(o.to_string(), "18.2");
        assert_eq!(o.legal_balls(), 110);
    }

    #[test]
    fn overs_feed_decimal_rejects_ball_digits_above_five() {
        assert!(Overs::from_feed_decimal(18.7).is_none());
        assert!(Overs::from_feed_decimal(-1.0).is_none());
        assert!(Overs::from_feed_decimal(f64::NAN).is_none());
    }

    #[test]
    fn overs_advance_rolls_at_six_balls() {
        let mut o = Overs::new(4, 5);
        assert!(o.advance());
        assert_eq!(o, Overs::new(5, 0));
        assert!(!o.advance());
        assert_eq!(o, Overs::new(5, 1));
    }

    #[test]
    fn run_rate_uses_sixths_not_tenths() {
        assert_eq!(run_rate(30, Overs::new(5, 0)), 6.0);
        assert_eq!(run_rate(30, Overs::new(5, 3)), 5.45);
        assert_eq!(run_rate(10, Overs::default()), 0.0);
    }

    fn catalog_summary() -> MatchSummary {
        MatchSummary {
            id: "m-1".into(),
            name: "India vs Australia".into(),
            match_type: "t20".into(),
            venue: "Eden Gardens".into(),
            team_info: vec![
                TeamInfo { name: "India".into(), short_name: "IND".into(), img: None },
                TeamInfo { name: "Australia".into(), short_name: "AUS".into(), img: None },
            ],
            innings: vec![InningTotal {
                runs: 112,
                wickets: 3,
                overs: 12.4,
                inning: "Australia Inning 1".into(),
            }],
            ..MatchSummary::default()
        }
    }

    #[test]
    fn bootstrap_assigns_sides_from_inning_label() {
        let state = MatchState::from_catalog(&catalog_summary());
        assert_eq!(state.batting_team.name, "AUSTRALIA");
        assert_eq!(state.bowling_team.short_name, "IND");
        assert_eq!(state.total_runs, 112);
        assert_eq!(state.overs, Overs::new(12, 4));
        assert_eq!(state.overs_limit, Some(20));
        assert_eq!(state.batsmen[0].name, PLACEHOLDER_BATTERS[0]);
        assert_eq!(state.bowler.name, PLACEHOLDER_BOWLER);
    }

    #[test]
    fn bootstrap_without_score_keeps_zeroed_aggregate() {
        let mut summary = catalog_summary();
        summary.innings.clear();
        let state = MatchState::from_catalog(&summary);
        assert_eq!(state.total_runs, 0);
        assert_eq!(state.batting_team.name, "INDIA");
        assert_eq!(state.crr, 0.0);
    }
}
