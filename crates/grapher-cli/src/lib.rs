//! Library components of the grapher CLI.

pub mod config;
pub mod logging;
