use crate::wire::{
    Envelope, WireBatting, WireBowling, WireInningsCard, WireMatch, WireScorecardMatch, WireSquad,
};
use crate::{
    BatterLine, BowlerLine, InningTotal, InningsCard, MatchSummary, Scorecard, Squad, SquadPlayer,
    TeamInfo,
};
use chrono::NaiveDateTime;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const CRICAPI_V1: &str = "https://api.cricapi.com/v1";

/// Cricket score feed client backed by cricapi.com (CricketData.org).
#[derive(Debug, Clone)]
pub struct CricApi {
    client: Client,
    base: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl CricApi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base(CRICAPI_V1, api_key)
    }

    /// Base-URL override, used by tests against a local mock server.
    pub fn with_base(base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("crictui/0.1 (terminal scoreboard overlay)")
                .build()
                .unwrap_or_default(),
            base: base.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Fetch the catalog of candidate matches. Entries without a name or
    /// without exactly two sides can't drive the overlay and are dropped.
    pub async fn fetch_current_matches(&self) -> ApiResult<Vec<MatchSummary>> {
        let url = format!("{}/currentMatches?apikey={}&offset=0", self.base, self.api_key);
        let env: Envelope<Vec<WireMatch>> = self.get(&url).await?;
        let data = unwrap_envelope(env, &url)?;
        let matches = data
            .into_iter()
            .map(map_match)
            .filter(|m| !m.name.is_empty() && m.team_info.len() == 2)
            .collect();
        Ok(matches)
    }

    /// Fetch aggregate score/overs/status for one match.
    pub async fn fetch_match_info(&self, match_id: &str) -> ApiResult<MatchSummary> {
        let url = format!("{}/match_info?apikey={}&id={}", self.base, self.api_key, match_id);
        let env: Envelope<WireMatch> = self.get(&url).await?;
        Ok(map_match(unwrap_envelope(env, &url)?))
    }

    /// Fetch the per-innings batting/bowling tables.
    pub async fn fetch_scorecard(&self, match_id: &str) -> ApiResult<Scorecard> {
        let url = format!(
            "{}/match_scorecard?apikey={}&id={}",
            self.base, self.api_key, match_id
        );
        let env: Envelope<WireScorecardMatch> = self.get(&url).await?;
        let data = unwrap_envelope(env, &url)?;
        Ok(Scorecard {
            innings: data
                .scorecard
                .unwrap_or_default()
                .iter()
                .map(map_innings_card)
                .collect(),
        })
    }

    /// Fetch both teams' squad rosters.
    pub async fn fetch_squads(&self, match_id: &str) -> ApiResult<Vec<Squad>> {
        let url = format!("{}/match_squad?apikey={}&id={}", self.base, self.api_key, match_id);
        let env: Envelope<Vec<WireSquad>> = self.get(&url).await?;
        Ok(unwrap_envelope(env, &url)?.into_iter().map(map_squad).collect())
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

/// Reject non-success envelopes (quota exhaustion, bad key) and missing
/// payloads. The feed reports both as HTTP 200.
fn unwrap_envelope<T>(env: Envelope<T>, url: &str) -> ApiResult<T> {
    if !env.is_success() {
        let reason = env
            .reason
            .or(env.status)
            .unwrap_or_else(|| "feed rejected the request (API limit reached?)".into());
        return Err(ApiError::Other(reason));
    }
    env.data
        .ok_or_else(|| ApiError::NotFound(format!("empty data payload from {url}")))
}

// ---------------------------------------------------------------------------
// Mapping: cricapi wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_match(m: WireMatch) -> MatchSummary {
    let start_time = m.date_time_gmt.as_deref().and_then(|s| {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|n| n.and_utc())
    });

    MatchSummary {
        id: m.id.unwrap_or_default(),
        name: m.name.unwrap_or_default(),
        match_type: m.match_type.unwrap_or_default(),
        status: m.status.unwrap_or_default(),
        venue: m.venue.unwrap_or_default(),
        start_time,
        team_info: m
            .team_info
            .unwrap_or_default()
            .into_iter()
            .map(|t| {
                let name = t.name.unwrap_or_default();
                let short_name = t
                    .shortname
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| name.chars().take(3).collect());
                TeamInfo { name, short_name, img: t.img }
            })
            .collect(),
        innings: m
            .score
            .unwrap_or_default()
            .into_iter()
            .map(|s| InningTotal {
                runs: s.r.unwrap_or_default(),
                wickets: s.w.unwrap_or_default(),
                overs: s.o.unwrap_or_default(),
                inning: s.inning.unwrap_or_default(),
            })
            .collect(),
    }
}

fn map_innings_card(card: &WireInningsCard) -> InningsCard {
    InningsCard {
        inning: card.inning.clone().unwrap_or_default(),
        batting: card.batting.iter().flatten().map(map_batting).collect(),
        bowling: card.bowling.iter().flatten().map(map_bowling).collect(),
    }
}

fn map_batting(b: &WireBatting) -> BatterLine {
    BatterLine {
        name: b
            .batsman
            .as_ref()
            .and_then(|p| p.name.clone())
            .unwrap_or_default(),
        dismissal: b.dismissal_text.clone().unwrap_or_default(),
        runs: b.r.unwrap_or_default(),
        balls: b.b.unwrap_or_default(),
        fours: b.fours.unwrap_or_default(),
        sixes: b.sixes.unwrap_or_default(),
    }
}

fn map_bowling(b: &WireBowling) -> BowlerLine {
    BowlerLine {
        name: b
            .bowler
            .as_ref()
            .and_then(|p| p.name.clone())
            .unwrap_or_default(),
        overs: b.o.unwrap_or_default(),
        maidens: b.m.unwrap_or_default(),
        runs: b.r.unwrap_or_default(),
        wickets: b.w.unwrap_or_default(),
    }
}

fn map_squad(s: WireSquad) -> Squad {
    Squad {
        team_name: s.team_name.unwrap_or_default(),
        short_name: s.shortname.unwrap_or_default(),
        players: s
            .players
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| {
                p.name.map(|name| SquadPlayer {
                    name,
                    batting_style: p.batting_style,
                })
            })
            .collect(),
    }
}
