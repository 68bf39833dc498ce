//! CLI library components for femview.

pub mod config;
pub mod logging;
pub mod runner;
pub mod terminal;
