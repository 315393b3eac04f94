/// Shared modules for the signal dashboard
pub mod api;
pub mod chart;
pub mod classify;
pub mod config;
pub mod connection;
pub mod error;
pub mod format;
pub mod log;
pub mod message;
pub mod state;
pub mod types;
pub mod websocket;
pub mod widget;
