use crate::state::match_state::NAME_POOL_BATTERS;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde::Deserialize;
use thiserror::Error;

/// Errors the scoring core can reject an update with. Feed-level failures
/// live in cric_api::client::ApiError and never reach here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    /// Outcome failed schema/range validation. Nothing was applied.
    #[error("invalid outcome: {0}")]
    InvalidOutcome(String),
    /// Structural precondition unmet — corrupt match state.
    #[error("corrupt match state: {0}")]
    InvariantViolation(String),
}

/// One delivery's outcome, as produced by any outcome source: the local
/// simulator, a generative JSON feed (camelCase field names match that
/// schema), or a parsed live feed. The reducer accepts anything of this
/// shape and validates ranges itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BallOutcome {
    pub runs: i32,
    pub is_wicket: bool,
    pub wicket_type: Option<String>,
    pub shot_type: Option<String>,
    pub shot_angle: Option<i32>,
    pub shot_direction: Option<String>,
    pub pitch_map: Option<String>,
    pub commentary: Option<String>,
    /// Override names carried by live-feed outcomes; slot renames only.
    pub striker_name: Option<String>,
    pub non_striker_name: Option<String>,
    pub bowler_name: Option<String>,
    /// Replacement batter after a dismissal. Placeholder when absent.
    pub new_batter: Option<String>,
}

impl BallOutcome {
    /// Range validation, all-or-nothing: a rejected outcome must leave the
    /// caller's state untouched. Negative runs and runs above six are
    /// rejected rather than clamped.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if !(0..=6).contains(&self.runs) {
            return Err(ScoreError::InvalidOutcome(format!(
                "runs {} outside 0..=6",
                self.runs
            )));
        }
        if let Some(angle) = self.shot_angle
            && !(0..360).contains(&angle)
        {
            return Err(ScoreError::InvalidOutcome(format!(
                "shot angle {angle} outside 0..360"
            )));
        }
        Ok(())
    }

    pub fn from_json(raw: &str) -> Result<Self, ScoreError> {
        let outcome: BallOutcome = serde_json::from_str(raw)
            .map_err(|e| ScoreError::InvalidOutcome(format!("bad outcome json: {e}")))?;
        outcome.validate()?;
        Ok(outcome)
    }
}

/// Wagon-wheel sector label for a shot angle. 0° is straight down the
/// ground, 180° behind the keeper; sectors read clockwise for a right-hander.
pub fn direction_label(angle: u16) -> &'static str {
    match (angle % 360 + 22) % 360 / 45 {
        0 => "Straight",
        1 => "Long Off",
        2 => "Deep Cover",
        3 => "Backward Point",
        4 => "Third Man",
        5 => "Fine Leg",
        6 => "Deep Square Leg",
        _ => "Deep Mid Wicket",
    }
}

// ---------------------------------------------------------------------------
// Simulated outcome source
// ---------------------------------------------------------------------------

const SHOT_TYPES: [&str; 10] = [
    "Cover Drive", "Pull", "Cut", "Slog Sweep", "Straight Drive",
    "Flick", "Square Drive", "Upper Cut", "Reverse Sweep", "Lofted Drive",
];

const PITCH_MAPS: [&str; 6] = [
    "Good Length", "Full", "Short", "Yorker", "In the Slot", "Back of a Length",
];

const WICKET_TYPES: [&str; 6] = [
    "caught", "bowled", "lbw", "run out", "stumped", "caught behind",
];

/// Local pseudo-random outcome source. Stands in for the generative feed:
/// every outcome it produces satisfies BallOutcome::validate, so the
/// reducer treats both sources identically.
pub struct SimulatedFeed {
    rng: ThreadRng,
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedFeed {
    pub fn new() -> Self {
        Self { rng: rand::thread_rng() }
    }

    pub fn next_outcome(&mut self) -> BallOutcome {
        // Roughly T20-shaped distribution.
        let roll = self.rng.gen_range(0..100);
        let (runs, is_wicket) = match roll {
            0..=4 => (0, true),
            5..=34 => (0, false),
            35..=64 => (1, false),
            65..=74 => (2, false),
            75..=77 => (3, false),
            78..=91 => (4, false),
            _ => (6, false),
        };

        let angle = self.rng.gen_range(0..360) as u16;
        let direction = direction_label(angle);
        let shot = SHOT_TYPES[self.rng.gen_range(0..SHOT_TYPES.len())];
        let pitch = PITCH_MAPS[self.rng.gen_range(0..PITCH_MAPS.len())];

        if is_wicket {
            let how = WICKET_TYPES[self.rng.gen_range(0..WICKET_TYPES.len())];
            let replacement = NAME_POOL_BATTERS[self.rng.gen_range(0..NAME_POOL_BATTERS.len())];
            return BallOutcome {
                runs: 0,
                is_wicket: true,
                wicket_type: Some(how.to_string()),
                shot_type: Some(shot.to_string()),
                shot_angle: Some(i32::from(angle)),
                shot_direction: Some(direction.to_string()),
                pitch_map: Some(pitch.to_string()),
                commentary: Some(format!("Gone! {how}, the {shot} finds the fielder")),
                new_batter: Some(replacement.to_string()),
                ..BallOutcome::default()
            };
        }

        let commentary = match runs {
            0 => format!("{pitch}, defended back down the track"),
            4 => format!("Crashed through {direction} — FOUR!"),
            6 => format!("That is huge! {shot} sails over {direction} for SIX"),
            n => format!("{shot} into {direction}, they come back for {n}"),
        };

        BallOutcome {
            runs,
            is_wicket: false,
            shot_type: Some(shot.to_string()),
            shot_angle: Some(i32::from(angle)),
            shot_direction: Some(direction.to_string()),
            pitch_map: Some(pitch.to_string()),
            commentary: Some(commentary),
            ..BallOutcome::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_runs() {
        let out = BallOutcome { runs: 7, ..BallOutcome::default() };
        assert!(matches!(out.validate(), Err(ScoreError::InvalidOutcome(_))));
        let out = BallOutcome { runs: -1, ..BallOutcome::default() };
        assert!(matches!(out.validate(), Err(ScoreError::InvalidOutcome(_))));
    }

    #[test]
    fn rejects_bad_shot_angle() {
        let out = BallOutcome { runs: 4, shot_angle: Some(360), ..BallOutcome::default() };
        assert!(out.validate().is_err());
        let out = BallOutcome { runs: 4, shot_angle: Some(359), ..BallOutcome::default() };
        assert!(out.validate().is_ok());
    }

    #[test]
    fn parses_generative_feed_schema() {
        let raw = r#"{
            "runs": 4,
            "isWicket": false,
            "wicketType": "none",
            "shotType": "Cover Drive",
            "shotAngle": 115,
            "shotDirection": "Deep Cover",
            "pitchMap": "Full",
            "commentary": "Glorious drive through the covers."
        }"#;
        let out = BallOutcome::from_json(raw).unwrap();
        assert_eq!(out.runs, 4);
        assert!(!out.is_wicket);
        assert_eq!(out.shot_angle, Some(115));
        assert_eq!(out.shot_type.as_deref(), Some("Cover Drive"));
    }

    #[test]
    fn from_json_rejects_invalid_payload() {
        assert!(BallOutcome::from_json(r#"{"runs": 9, "isWicket": false}"#).is_err());
        assert!(BallOutcome::from_json("not json").is_err());
    }

    #[test]
    fn simulated_outcomes_always_validate() {
        let mut feed = SimulatedFeed::new();
        for _ in 0..500 {
            let out = feed.next_outcome();
            out.validate().expect("simulated outcome must be valid");
            if out.is_wicket {
                assert_eq!(out.runs, 0);
                assert!(out.new_batter.is_some());
            }
        }
    }

    #[test]
    fn direction_labels_cover_the_wheel() {
        assert_eq!(direction_label(0), "Straight");
        assert_eq!(direction_label(350), "Straight");
        assert_eq!(direction_label(90), "Deep Cover");
        assert_eq!(direction_label(180), "Third Man");
        assert_eq!(direction_label(270), "Deep Square Leg");
    }
}
