//! Token providers for the hosting API
//!
//! The token itself is a precondition of a run; providers only decide where
//! it is read from.

use async_trait::async_trait;

/// Trait for secret providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Get a secret by key, `Ok(None)` when it is not set
    async fn get_secret(&self, key: &str) -> anyhow::Result<Option<String>>;
}

/// Reads secrets from process environment variables named by the key
#[derive(Debug, Default)]
pub struct EnvAuthProvider;

impl EnvAuthProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthProvider for EnvAuthProvider {
    async fn get_secret(&self, key: &str) -> anyhow::Result<Option<String>> {
        match std::env::var(key) {
            Ok(value) if !value.trim().is_empty() => Ok(Some(value.trim().to_string())),
            Ok(_) | Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("Failed to read {}: {}", key, e)),
        }
    }
}

/// Fixed token, independent of the key (tests and embedding)
#[derive(Debug, Clone)]
pub struct StaticAuthProvider {
    token: Option<String>,
}

impl StaticAuthProvider {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn without_token() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn get_secret(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_env_provider_missing_variable() {
        let provider = EnvAuthProvider::new();
        let value = provider
            .get_secret("PORTFOLIO_SYNC_TEST_SURELY_UNSET_VARIABLE")
            .await
            .unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticAuthProvider::with_token("ghp_test123");
        assert_eq!(
            provider.get_secret("anything").await.unwrap(),
            Some("ghp_test123".to_string())
        );
        assert!(StaticAuthProvider::without_token()
            .get_secret("anything")
            .await
            .unwrap()
            .is_none());
    }
}
