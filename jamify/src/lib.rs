pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod middle;
pub mod shared;
pub mod sync;
pub mod sync_api;
pub mod tui;
