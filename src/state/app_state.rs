use crate::app::MenuItem;
use crate::state::match_state::MatchState;
use cric_api::MatchSummary;

// ---------------------------------------------------------------------------
// Match selector state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MatchSelectState {
    pub matches: Vec<MatchSummary>,
    pub selected: usize,
    /// Vertical scroll offset for when the list exceeds terminal height.
    pub scroll_offset: u16,
}

impl MatchSelectState {
    /// Store a freshly loaded catalog, clamping the cursor into range.
    pub fn load(&mut self, matches: Vec<MatchSummary>) {
        self.selected = self.selected.min(matches.len().saturating_sub(1));
        self.scroll_offset = 0;
        self.matches = matches;
    }

    pub fn navigate_down(&mut self) {
        let max = self.matches.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_match(&self) -> Option<&MatchSummary> {
        self.matches.get(self.selected)
    }
}

// ---------------------------------------------------------------------------
// Match session — the selected match plus its overlay state
// ---------------------------------------------------------------------------

/// One match being overlaid. `state` is only ever replaced wholesale, by
/// the reducer or the merge adapter — never mutated in place.
#[derive(Debug, Default)]
pub struct MatchSession {
    pub state: MatchState,
    /// Feed id of the selected match, None in pure simulation mode.
    pub match_id: Option<String>,
    /// A sync request is outstanding; further ticks are dropped until the
    /// response lands.
    pub sync_in_flight: bool,
}

impl MatchSession {
    pub fn start(summary: &MatchSummary) -> Self {
        Self {
            state: MatchState::from_catalog(summary),
            match_id: Some(summary.id.clone()),
            sync_in_flight: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub selector: MatchSelectState,
    pub session: MatchSession,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
