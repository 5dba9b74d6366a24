pub mod app_settings;
pub mod app_state;
pub mod cache;
pub mod focus;
pub mod forms;
pub mod messages;
pub mod network;
pub mod notice;
pub mod router;
pub mod session;
pub mod validation;
