pub mod cancel;
pub mod event;
pub mod lifecycle;
pub mod overlay;
pub mod permission;
pub mod sampling;
pub mod service;
pub mod state;
pub mod time;
pub mod ui;
