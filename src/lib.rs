//! `sitemix-insights` library crate.
//!
//! The binary (`sitemix`) is a thin wrapper around this library so that:
//!
//! - core analytics are testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod analytics;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod store;
