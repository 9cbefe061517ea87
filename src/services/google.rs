//! Google sign-in token verification
//!
//! Exchanges a client-supplied Google ID token for a verified email and
//! display name via the tokeninfo endpoint. The whole flow is delegated;
//! we only check the audience and the verified-email flag.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GoogleConfig;
use crate::utils::errors::{EventFlowError, Result};

/// Verified identity returned by Google
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfoResponse {
    aud: String,
    email: String,
    #[serde(default)]
    email_verified: String,
    #[serde(default)]
    name: String,
}

#[derive(Clone)]
pub struct GoogleAuthService {
    client: reqwest::Client,
    config: Option<GoogleConfig>,
}

impl GoogleAuthService {
    pub fn new(config: Option<GoogleConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Whether Google sign-in is configured
    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Verify an ID token against the tokeninfo endpoint
    pub async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdentity> {
        let config = self.config.as_ref().ok_or_else(|| {
            EventFlowError::ServiceUnavailable("Google sign-in is not configured".to_string())
        })?;

        let response = self
            .client
            .get(&config.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Google tokeninfo rejected the token");
            return Err(EventFlowError::InvalidToken);
        }

        let info: TokenInfoResponse = response.json().await?;

        if info.aud != config.client_id {
            warn!(aud = %info.aud, "Google token issued for a different client");
            return Err(EventFlowError::InvalidToken);
        }

        if info.email_verified != "true" {
            warn!(email = %info.email, "Google account email not verified");
            return Err(EventFlowError::InvalidToken);
        }

        debug!(email = %info.email, "Google identity verified");
        let name = if info.name.is_empty() {
            info.email.clone()
        } else {
            info.name
        };

        Ok(GoogleIdentity {
            email: info.email,
            name,
        })
    }
}
