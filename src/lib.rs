//! portfolio-sync - Repository metadata aggregation for a portfolio site
//!
//! portfolio-sync lists an account's repositories on a forge (GitHub), derives
//! one portfolio entry per repository from its topics, languages and
//! `project-info.md`, mirrors referenced images locally and writes the whole
//! collection to the JSON file the site renders.

pub mod adapters;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod services;
pub mod storage;
pub mod templates;
pub mod types;

// Re-exports for convenience
pub use adapters::{ForgeError, ForgePort, GitHubAdapter, MockForge};
pub use config::PortfolioConfig;
pub use error::{PortfolioError, Result};
pub use types::*;
