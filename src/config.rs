use std::env;
use std::fmt;

use anyhow::{Context, Result};

/// Static API credentials for the Digibee pipeline.
///
/// Loaded from the environment so secrets never live in the source tree.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Read credentials from `PEDAGIO_API_KEY`, `PEDAGIO_CLIENT_ID` and
    /// `PEDAGIO_CLIENT_SECRET`
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: env::var("PEDAGIO_API_KEY")
                .context("PEDAGIO_API_KEY environment variable is not set")?,
            client_id: env::var("PEDAGIO_CLIENT_ID")
                .context("PEDAGIO_CLIENT_ID environment variable is not set")?,
            client_secret: env::var("PEDAGIO_CLIENT_SECRET")
                .context("PEDAGIO_CLIENT_SECRET environment variable is not set")?,
        })
    }

    pub fn new(
        api_key: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

// Keep secret material out of logs and error chains
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("key-123", "client-abc", "secret-xyz");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("client-abc"));
        assert!(!debug.contains("key-123"));
        assert!(!debug.contains("secret-xyz"));
    }
}
