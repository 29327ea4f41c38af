use thiserror::Error;

use crate::adapters::ForgeError;
use crate::config::ConfigError;

/// Errors that abort a whole run
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("No API token: set the {env} environment variable")]
    MissingToken { env: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Could not list repositories for {account}: {source}")]
    Listing {
        account: String,
        #[source]
        source: ForgeError,
    },

    #[error("Failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PortfolioError {
    /// Abort on a fatal forge error met while fetching a repository
    pub fn fatal(source: ForgeError) -> Self {
        match source {
            ForgeError::AuthenticationFailed { message } => PortfolioError::Authentication(message),
            other => PortfolioError::Authentication(other.to_string()),
        }
    }

    /// Wrap a listing failure, promoting auth errors to `Authentication`
    pub fn listing(account: &str, source: ForgeError) -> Self {
        match source {
            ForgeError::AuthenticationFailed { message } => PortfolioError::Authentication(message),
            source => PortfolioError::Listing {
                account: account.to_string(),
                source,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
