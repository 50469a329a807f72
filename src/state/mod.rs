pub mod app_settings;
pub mod app_state;
pub mod match_state;
pub mod merge;
pub mod messages;
pub mod network;
pub mod outcome;
pub mod reducer;
pub mod refresher;
