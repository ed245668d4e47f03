pub mod app_settings;
pub mod app_state;
pub mod cache;
pub mod debounce;
pub mod filters;
pub mod messages;
pub mod network;
pub mod orchestrator;
pub mod playback;
