// Library target carries the whole module tree so integration tests can drive
// `App` and the gateway without a terminal. The binary entry point is main.rs.

pub mod app;
pub mod config;
pub mod event;
pub mod gateway;
pub mod logging;
pub mod session;
pub mod ui;
