//! Partner-level provisioning client.
//!
//! Authenticates with the partner `client_id`/`client_secret` pair and is
//! only used server-side: create a user, then mint a connect token the user
//! opens in a browser to link Gmail, Slack or another integration.

use serde::Serialize;

use super::types::{ConnectToken, ProvisionedUser};
use super::{read_json, ApiError, DEFAULT_BASE_URL};

/// Hosted page that runs the OAuth connect flow.
pub const CONNECT_URL: &str = "https://connect.attrove.com/integrations/connect";

#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: url::Url,
    client_id: String,
    client_secret: String,
}

impl AdminClient {
    pub fn new(client_id: &str, client_secret: &str) -> Result<Self, ApiError> {
        Self::with_base_url(client_id, client_secret, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        client_id: &str,
        client_secret: &str,
        base_url: &str,
    ) -> Result<Self, ApiError> {
        if client_id.trim().is_empty() {
            return Err(ApiError::Validation("clientId is required".to_string()));
        }
        if client_secret.trim().is_empty() {
            return Err(ApiError::Validation("clientSecret is required".to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: url::Url::parse(base_url)?,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    /// Provision a user and return its id plus per-user `sk_` key.
    pub async fn create_user(&self, email: &str) -> Result<ProvisionedUser, ApiError> {
        #[derive(Serialize)]
        struct CreateUser<'a> {
            email: &'a str,
        }

        let url = self.base_url.join("/v1/admin/users")?;
        let resp = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .json(&CreateUser { email })
            .send()
            .await?;
        read_json(resp).await
    }

    /// Mint a short-lived `pit_` token for the connect page.
    pub async fn create_connect_token(&self, user_id: &str) -> Result<ConnectToken, ApiError> {
        let url = self
            .base_url
            .join(&format!("/v1/admin/users/{}/connect-token", user_id))?;
        let resp = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .send()
            .await?;
        read_json(resp).await
    }
}

/// Browser URL for connecting integrations with a freshly minted token.
pub fn connect_url(token: &str, user_id: &str) -> String {
    format!("{}?token={}&user_id={}", CONNECT_URL, token, user_id)
}
