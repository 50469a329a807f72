use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

pub const SYNC_INTERVAL_SECS: u64 = 10;

/// Periodic sync heartbeat — every 10 seconds while a live match is
/// selected. Emits only the tick; the app decides whether a sync is due
/// (match selected, credentials present, no sync already in flight).
pub struct PeriodicRefresher {
    ui_events: mpsc::Sender<UiEvent>,
}

impl PeriodicRefresher {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events }
    }

    pub async fn run(self) {
        let mut sync_interval = interval(Duration::from_secs(SYNC_INTERVAL_SECS));
        // Skip the immediate first tick so selection isn't double-synced.
        sync_interval.tick().await;

        loop {
            sync_interval.tick().await;
            if self.ui_events.send(UiEvent::SyncTick).await.is_err() {
                break;
            }
        }
    }
}
