pub mod client;
pub mod portrait;
pub mod wire;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the cricapi wire format
// ---------------------------------------------------------------------------

/// One entry from the current-matches catalog. Carries just enough for the
/// selector list and for bootstrapping a match session: identity, teams, and
/// the per-innings score snapshots.
#[derive(Debug, Clone, Default)]
pub struct MatchSummary {
    pub id: String,
    pub name: String,
    pub match_type: String, // "t20", "odi", "test"
    pub status: String,     // free-text, e.g. "Live" or a result line
    pub venue: String,
    pub start_time: Option<DateTime<Utc>>,
    pub team_info: Vec<TeamInfo>,
    pub innings: Vec<InningTotal>,
}

impl MatchSummary {
    /// The innings currently being batted — by feed convention the last
    /// entry in the score array.
    pub fn current_inning(&self) -> Option<&InningTotal> {
        self.innings.last()
    }

    /// Overs cap for limited-overs formats, None for first-class cricket.
    pub fn overs_limit(&self) -> Option<u16> {
        match self.match_type.to_lowercase().as_str() {
            "t20" => Some(20),
            "odi" => Some(50),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamInfo {
    pub name: String,
    pub short_name: String,
    pub img: Option<String>,
}

/// Aggregate score line for one innings, as the feed reports it.
/// `overs` keeps the feed's lossy decimal encoding (18.2 = 18 ov 2 balls);
/// decoding it is the consumer's concern.
#[derive(Debug, Clone, Default)]
pub struct InningTotal {
    pub runs: u32,
    pub wickets: u32,
    pub overs: f64,
    pub inning: String, // label, e.g. "India Inning 1"
}

/// Full match scorecard: one card per innings.
#[derive(Debug, Clone, Default)]
pub struct Scorecard {
    pub innings: Vec<InningsCard>,
}

impl Scorecard {
    /// Find the card for an innings label, falling back to the last card
    /// (the innings in progress) when labels don't line up.
    pub fn card_for<'a>(&'a self, inning: &str) -> Option<&'a InningsCard> {
        self.innings
            .iter()
            .find(|c| c.inning == inning)
            .or_else(|| self.innings.last())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InningsCard {
    pub inning: String,
    pub batting: Vec<BatterLine>,
    pub bowling: Vec<BowlerLine>,
}

/// One row of a batting table. `dismissal` is empty, "not out", or
/// "batting" while the batter is still in.
#[derive(Debug, Clone, Default)]
pub struct BatterLine {
    pub name: String,
    pub dismissal: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
}

impl BatterLine {
    pub fn is_active(&self) -> bool {
        let d = self.dismissal.trim().to_lowercase();
        d.is_empty() || d == "not out" || d == "batting"
    }
}

#[derive(Debug, Clone, Default)]
pub struct BowlerLine {
    pub name: String,
    pub overs: f64, // lossy feed encoding, same as InningTotal
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
}

/// Squad roster for one side.
#[derive(Debug, Clone, Default)]
pub struct Squad {
    pub team_name: String,
    pub short_name: String,
    pub players: Vec<SquadPlayer>,
}

#[derive(Debug, Clone, Default)]
pub struct SquadPlayer {
    pub name: String,
    pub batting_style: Option<String>,
}
