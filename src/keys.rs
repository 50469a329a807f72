use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Score the next simulated delivery
        (MenuItem::Overlay, Char('n') | Char(' '), _) => guard.next_ball(),

        // Manual score sync, independent of the periodic tick
        (MenuItem::Overlay, Char('s'), _) => {
            if let Some(match_id) = guard.sync_due() {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::SyncScore { match_id })
                    .await;
                return;
            }
        }

        // Match selector
        (_, Char('m'), _) => {
            guard.update_tab(MenuItem::Selector);
            if guard.state.selector.matches.is_empty() {
                drop(guard);
                let _ = network_requests.send(NetworkRequest::LoadMatches).await;
                return;
            }
        }
        (MenuItem::Selector, Char('j') | KeyCode::Down, _) => {
            guard.state.selector.navigate_down();
        }
        (MenuItem::Selector, Char('k') | KeyCode::Up, _) => {
            guard.state.selector.navigate_up();
        }
        (MenuItem::Selector, Char('r'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadMatches).await;
            return;
        }
        (MenuItem::Selector, KeyCode::Enter, _) => {
            if guard.select_match().is_some()
                && let Some(match_id) = guard.sync_due()
            {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::SyncScore { match_id })
                    .await;
                return;
            }
        }
        (MenuItem::Selector, KeyCode::Esc, _) => guard.update_tab(MenuItem::Overlay),

        // Help
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
