use crate::state::merge::FeedSnapshot;
use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use cric_api::MatchSummary;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadMatches,
    SyncScore { match_id: String },
    LoadPortrait { player: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    MatchesLoaded { matches: Vec<MatchSummary> },
    /// One sync cycle's feed view of the selected match, ready to merge.
    ScoreSynced { snapshot: FeedSnapshot },
    PortraitLoaded { player: String, url: Option<String> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Periodic score-sync heartbeat. The app decides whether a sync is
    /// actually due; overlapping ticks are dropped, never queued.
    SyncTick,
}
