pub mod api;
pub mod app;
pub mod projection;
pub mod session;
pub mod store;
pub mod task;
pub mod ui;
