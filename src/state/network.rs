use crate::state::merge::FeedSnapshot;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use cric_api::client::{ApiError, CricApi};
use cric_api::portrait;
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: CricApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        api_key: String,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: CricApi::new(api_key),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadMatches => self.handle_load_matches().await,
                NetworkRequest::SyncScore { match_id } => self.handle_sync_score(match_id).await,
                NetworkRequest::LoadPortrait { player } => self.handle_load_portrait(player).await,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if self.responses.send(response).await.is_err() {
                break;
            }
        }
    }

    async fn handle_load_matches(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading current matches catalog");
        let matches = self.client.fetch_current_matches().await?;
        Ok(NetworkResponse::MatchesLoaded { matches })
    }

    /// One sync cycle. The match-info call is required; scorecard and
    /// squads are each best-effort and the snapshot degrades around a
    /// failure rather than aborting the whole sync.
    async fn handle_sync_score(&self, match_id: String) -> Result<NetworkResponse, ApiError> {
        debug!("syncing score for {match_id}");
        let summary = self.client.fetch_match_info(&match_id).await?;
        let Some(inning) = summary.current_inning().cloned() else {
            return Ok(NetworkResponse::Error {
                message: "Feed has no score for this match yet.".into(),
            });
        };

        let card = match self.client.fetch_scorecard(&match_id).await {
            Ok(scorecard) => scorecard.card_for(&inning.inning).cloned(),
            Err(err) => {
                warn!("scorecard unavailable for {match_id}: {err}");
                None
            }
        };
        let squads = match self.client.fetch_squads(&match_id).await {
            Ok(squads) => squads,
            Err(err) => {
                warn!("squads unavailable for {match_id}: {err}");
                Vec::new()
            }
        };

        Ok(NetworkResponse::ScoreSynced {
            snapshot: FeedSnapshot {
                inning: inning.inning,
                total_runs: inning.runs,
                wickets: inning.wickets,
                overs: Some(inning.overs),
                card,
                squads,
            },
        })
    }

    async fn handle_load_portrait(&self, player: String) -> Result<NetworkResponse, ApiError> {
        debug!("looking up portrait for {player}");
        // Best-effort: a lookup failure is a missing portrait, not an error.
        let url = portrait::fetch_player_portrait(&self.client, &player)
            .await
            .unwrap_or_default();
        Ok(NetworkResponse::PortraitLoaded { player, url })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
