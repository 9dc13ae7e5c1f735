use anyhow::{Context, Result};

pub const BASE_URL: &str = "https://oauth.reddit.com";
pub const AUTH_URL: &str = "https://www.reddit.com/api/v1/authorize";
pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// See https://www.reddit.com/dev/api/oauth for the scope list.
pub const SCOPE: &str = "identity,read";

/// Reddit requires a unique, descriptive User-Agent on every request.
pub const USER_AGENT: &str = "datapipe demo application/0.1";

/// Reddit OAuth application configuration.
///
/// Loads client ID and secret from environment variables:
/// - `DATAPIPE_OAUTH_REDDIT_CLIENT_ID`
/// - `DATAPIPE_OAUTH_REDDIT_CLIENT_SECRET`
#[derive(Debug)]
pub struct RedditAppConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl RedditAppConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("DATAPIPE_OAUTH_REDDIT_CLIENT_ID")
            .context("DATAPIPE_OAUTH_REDDIT_CLIENT_ID not set")?;
        let client_secret = std::env::var("DATAPIPE_OAUTH_REDDIT_CLIENT_SECRET")
            .context("DATAPIPE_OAUTH_REDDIT_CLIENT_SECRET not set")?;
        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serialize env-var-mutating tests; they share the process-wide env.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_constants() {
        assert_eq!(BASE_URL, "https://oauth.reddit.com");
        assert_eq!(SCOPE, "identity,read");
        assert!(AUTH_URL.contains("reddit.com"));
        assert!(TOKEN_URL.contains("reddit.com"));
    }

    #[test]
    fn test_from_env_missing() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::remove_var("DATAPIPE_OAUTH_REDDIT_CLIENT_ID");
        std::env::remove_var("DATAPIPE_OAUTH_REDDIT_CLIENT_SECRET");

        let result = RedditAppConfig::from_env();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("DATAPIPE_OAUTH_REDDIT_CLIENT_ID"));
    }

    #[test]
    fn test_from_env_success() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::set_var("DATAPIPE_OAUTH_REDDIT_CLIENT_ID", "test_client_id");
        std::env::set_var("DATAPIPE_OAUTH_REDDIT_CLIENT_SECRET", "test_client_secret");

        let config = RedditAppConfig::from_env().unwrap();
        assert_eq!(config.client_id, "test_client_id");
        assert_eq!(config.client_secret, "test_client_secret");

        std::env::remove_var("DATAPIPE_OAUTH_REDDIT_CLIENT_ID");
        std::env::remove_var("DATAPIPE_OAUTH_REDDIT_CLIENT_SECRET");
    }
}
