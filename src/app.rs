use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, MatchSession};
use crate::state::match_state::{NEW_BATTER, PLACEHOLDER_BATTERS};
use crate::state::merge::{FeedSnapshot, merge_external_snapshot};
use crate::state::outcome::SimulatedFeed;
use crate::state::reducer::apply_ball_outcome;
use cric_api::MatchSummary;
use std::collections::HashSet;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Overlay,
    Selector,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    feed: SimulatedFeed,
    /// Lowercased names already sent off for a portrait lookup. A lookup
    /// that comes back empty is still spent; the name is not asked again.
    portrait_requests: HashSet<String>,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
            feed: SimulatedFeed::new(),
            portrait_requests: HashSet::new(),
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Scoring
    // -----------------------------------------------------------------------

    /// Score the next simulated delivery. A rejected outcome leaves the
    /// session untouched and surfaces a short notice instead.
    pub fn next_ball(&mut self) {
        let outcome = self.feed.next_outcome();
        match apply_ball_outcome(&self.state.session.state, &outcome) {
            Ok(next) => {
                self.state.last_error = None;
                self.state.session.state = next;
            }
            Err(err) => {
                self.state.last_error = Some(format!("Ball not scored: {err}"));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_matches_loaded(&mut self, matches: Vec<MatchSummary>) {
        self.state.last_error = None;
        self.state.selector.load(matches);
    }

    /// Fold a sync result into the session. Returns batter names that
    /// still need a portrait lookup.
    pub fn on_score_synced(&mut self, snapshot: &FeedSnapshot) -> Vec<String> {
        self.state.session.sync_in_flight = false;
        self.state.last_error = None;
        self.state.session.state =
            merge_external_snapshot(&self.state.session.state, snapshot);
        self.portraits_needed()
    }

    pub fn on_portrait_loaded(&mut self, player: &str, url: Option<String>) {
        for slot in self.state.session.state.batsmen.iter_mut() {
            if slot.name.eq_ignore_ascii_case(player) && slot.portrait_url.is_none() {
                slot.portrait_url = url.clone();
            }
        }
    }

    pub fn on_error(&mut self, message: String) {
        self.state.session.sync_in_flight = false;
        self.state.last_error = Some(message);
    }

    fn portraits_needed(&mut self) -> Vec<String> {
        let mut names = Vec::new();
        for slot in &self.state.session.state.batsmen {
            if slot.portrait_url.is_some()
                || PLACEHOLDER_BATTERS.contains(&slot.name.as_str())
                || slot.name == NEW_BATTER
            {
                continue;
            }
            if self.portrait_requests.insert(slot.name.to_lowercase()) {
                names.push(slot.name.clone());
            }
        }
        names
    }

    // -----------------------------------------------------------------------
    // Match selection / sync gating
    // -----------------------------------------------------------------------

    /// Start a session from the selector cursor. Returns the match id so
    /// the caller can trigger an immediate sync.
    pub fn select_match(&mut self) -> Option<String> {
        let summary = self.state.selector.selected_match()?.clone();
        self.state.session = MatchSession::start(&summary);
        self.portrait_requests.clear();
        self.update_tab(MenuItem::Overlay);
        Some(summary.id)
    }

    /// Whether a score sync should go out now. Marks the sync in flight
    /// as a side effect; ticks that land while one is outstanding are
    /// dropped, not queued.
    pub fn sync_due(&mut self) -> Option<String> {
        if !self.settings.has_credentials() || self.state.session.sync_in_flight {
            return None;
        }
        let match_id = self.state.session.match_id.clone()?;
        self.state.session.sync_in_flight = true;
        Some(match_id)
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if self.state.active_tab == MenuItem::Selector {
            self.state.selector.scroll_offset = 0;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_key() -> App {
        let mut app = App {
            settings: AppSettings { api_key: Some("k".into()), ..AppSettings::default() },
            state: AppState::new(),
            feed: SimulatedFeed::new(),
            portrait_requests: HashSet::new(),
        };
        app.state.session.match_id = Some("m-1".into());
        app
    }

    #[test]
    fn sync_due_requires_credentials_match_and_no_inflight() {
        let mut app = app_with_key();
        assert_eq!(app.sync_due().as_deref(), Some("m-1"));
        // Now in flight; the next tick is dropped.
        assert!(app.sync_due().is_none());

        app.state.session.sync_in_flight = false;
        app.settings.api_key = None;
        assert!(app.sync_due().is_none());

        app.settings.api_key = Some("k".into());
        app.state.session.match_id = None;
        assert!(app.sync_due().is_none());
    }

    #[test]
    fn error_response_clears_the_inflight_flag() {
        let mut app = app_with_key();
        app.sync_due();
        app.on_error("quota hit".into());
        assert!(!app.state.session.sync_in_flight);
        assert_eq!(app.sync_due().as_deref(), Some("m-1"));
    }

    #[test]
    fn portrait_lookup_is_one_shot_per_name() {
        let mut app = app_with_key();
        app.state.session.state.batsmen[0].name = "V KOHLI".into();

        assert_eq!(app.portraits_needed(), vec!["V KOHLI".to_string()]);
        // The lookup found nothing; the name stays spent on later syncs.
        app.on_portrait_loaded("V KOHLI", None);
        assert!(app.portraits_needed().is_empty());

        // A resolved slot is skipped outright.
        app.state.session.state.batsmen[1].name = "R SHARMA".into();
        app.state.session.state.batsmen[1].portrait_url = Some("https://img/rs.jpg".into());
        assert!(app.portraits_needed().is_empty());
    }

    #[test]
    fn next_ball_advances_the_session() {
        let mut app = app_with_key();
        let before = app.state.session.state.overs.legal_balls();
        app.next_ball();
        assert_eq!(app.state.session.state.overs.legal_balls(), before + 1);
    }
}
