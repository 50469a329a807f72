/// cricapi.com raw wire types — serde shapes for deserializing feed
/// responses. These map to our clean domain types via the map_* fns in
/// client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Every cricapi endpoint wraps its payload the same way. Quota exhaustion
/// and bad keys come back as HTTP 200 with status != "success".
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Envelope<T> {
    pub status: Option<String>,
    pub data: Option<T>,
    pub reason: Option<String>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

// ---------------------------------------------------------------------------
// Current matches / match info  (v1/currentMatches, v1/match_info)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireMatch {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "matchType")]
    pub match_type: Option<String>,
    pub status: Option<String>,
    pub venue: Option<String>,
    #[serde(rename = "dateTimeGMT")]
    pub date_time_gmt: Option<String>, // ISO 8601, no timezone suffix
    #[serde(rename = "teamInfo")]
    pub team_info: Option<Vec<WireTeamInfo>>,
    pub score: Option<Vec<WireInning>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireTeamInfo {
    pub name: Option<String>,
    pub shortname: Option<String>,
    pub img: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireInning {
    pub r: Option<u32>,
    pub w: Option<u32>,
    pub o: Option<f64>,
    pub inning: Option<String>,
}

// ---------------------------------------------------------------------------
// Scorecard  (v1/match_scorecard)
// ---------------------------------------------------------------------------

/// match_scorecard returns the match object with an extra "scorecard" array.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireScorecardMatch {
    pub scorecard: Option<Vec<WireInningsCard>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireInningsCard {
    pub inning: Option<String>,
    pub batting: Option<Vec<WireBatting>>,
    pub bowling: Option<Vec<WireBowling>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireBatting {
    pub batsman: Option<WirePlayerRef>,
    #[serde(rename = "dismissal-text")]
    pub dismissal_text: Option<String>,
    pub r: Option<u32>,
    pub b: Option<u32>,
    #[serde(rename = "4s")]
    pub fours: Option<u32>,
    #[serde(rename = "6s")]
    pub sixes: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireBowling {
    pub bowler: Option<WirePlayerRef>,
    pub o: Option<f64>,
    pub m: Option<u32>,
    pub r: Option<u32>,
    pub w: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WirePlayerRef {
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Squad  (v1/match_squad)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct WireSquad {
    #[serde(rename = "teamName")]
    pub team_name: Option<String>,
    pub shortname: Option<String>,
    pub players: Option<Vec<WireSquadPlayer>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireSquadPlayer {
    pub name: Option<String>,
    #[serde(rename = "battingStyle")]
    pub batting_style: Option<String>,
}
