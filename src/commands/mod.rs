//! portfolio-sync commands
//!
//! This module contains the implementation of the portfolio-sync CLI commands.

pub mod check;
pub mod schema;
pub mod update;

pub use check::{check, CheckReport, CheckStep};
pub use schema::{output_schema, schema};
pub use update::{update, SkippedRepo, UpdateOptions, UpdateReport};

use crate::auth::AuthProvider;
use crate::error::{PortfolioError, Result};

/// Fail fast when no API token is available under `token_env`
pub async fn require_token(auth: &dyn AuthProvider, token_env: &str) -> Result<()> {
    let missing = || PortfolioError::MissingToken {
        env: token_env.to_string(),
    };
    match auth.get_secret(token_env).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(missing()),
        Err(e) => {
            tracing::debug!("Token lookup failed: {}", e);
            Err(missing())
        }
    }
}
