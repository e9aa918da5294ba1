use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity token rejected: {0}")]
    Rejected(String),

    #[error("identity provider unreachable: {0}")]
    Http(#[from] reqwest::Error),
}

/// A verified sign-in from the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<Identity, IdentityError>;
}

/// Verifies Google ID tokens through the `tokeninfo` endpoint.
pub struct GoogleIdentityProvider {
    client: Client,
    client_id: String,
}

impl GoogleIdentityProvider {
    pub fn new(client_id: String) -> Result<Self, IdentityError> {
        Ok(Self {
            client: Client::builder().build()?,
            client_id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    // tokeninfo returns booleans as strings
    email_verified: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify(&self, id_token: &str) -> Result<Identity, IdentityError> {
        let response = self
            .client
            .get(GOOGLE_TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("tokeninfo rejected ID token (status {})", response.status());
            return Err(IdentityError::Rejected("invalid ID token".to_string()));
        }

        let info: TokenInfo = response.json().await?;
        identity_from_token_info(info, &self.client_id)
    }
}

fn identity_from_token_info(info: TokenInfo, client_id: &str) -> Result<Identity, IdentityError> {
    if info.aud != client_id {
        return Err(IdentityError::Rejected(
            "token was issued for another client".to_string(),
        ));
    }
    let email = info
        .email
        .ok_or_else(|| IdentityError::Rejected("token carries no email".to_string()))?;
    if info.email_verified.as_deref() != Some("true") {
        return Err(IdentityError::Rejected("email is not verified".to_string()));
    }

    let display_name = info.name.unwrap_or_else(|| email.clone());
    Ok(Identity {
        external_id: info.sub,
        email,
        display_name,
        avatar_url: info.picture,
    })
}
