//! Pre-resolved platform credentials
//!
//! Credentials are acquired outside the deployer (CI secrets, an assumed
//! role); this module only carries them to the gateway.

use secrecy::{ExposeSecret, SecretString};

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

/// Access key, secret and optional session token for one region
#[derive(Debug, Clone)]
pub struct CredentialBundle {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
    pub region: String,
}

impl CredentialBundle {
    /// Read a bundle from the process environment.
    ///
    /// Returns `None` when no access key pair is set, in which case the
    /// gateway falls back to its ambient credentials.
    pub fn from_env(region: &str) -> Option<Self> {
        Self::from_lookup(region, |key| std::env::var(key).ok())
    }

    fn from_lookup(region: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let access_key_id = non_empty(ACCESS_KEY_ID_VAR)?;
        let secret = non_empty(SECRET_ACCESS_KEY_VAR)?;
        Some(Self {
            access_key_id,
            secret_access_key: SecretString::from(secret),
            session_token: non_empty(SESSION_TOKEN_VAR).map(SecretString::from),
            region: region.to_string(),
        })
    }

    /// Header pairs sent with every gateway request, region first
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("X-Region", self.region.clone()),
            ("X-Access-Key-Id", self.access_key_id.clone()),
            (
                "X-Secret-Access-Key",
                self.secret_access_key.expose_secret().to_string(),
            ),
        ];
        if let Some(token) = &self.session_token {
            headers.push(("X-Session-Token", token.expose_secret().to_string()));
        }
        headers
    }
}
