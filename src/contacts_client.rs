use std::time::Duration;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use crate::domain::{ContactId, SubscriberEmail};

/// Client for the provider's contacts API (Brevo `/v3/contacts`).
pub struct ContactsClient {
    http_client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

#[derive(thiserror::Error, Debug)]
pub enum ContactsError {
    #[error("The contacts provider API key is not configured")]
    MissingApiKey,
    #[error("The contacts provider rejected the contact")]
    Rejected(serde_json::Value),
    #[error("The contacts provider refused our API key")]
    Unauthorized,
    #[error("The contacts provider answered with an unexpected status: {0}")]
    UnexpectedStatus(StatusCode),
    #[error("Failed to reach the contacts provider")]
    Transport(#[from] reqwest::Error),
}

impl ContactsClient {
    pub fn new(
        base_url: String,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        // An empty key is as good as no key.
        let api_key = api_key.filter(|key| !key.expose_secret().trim().is_empty());
        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            base_url,
            api_key,
        })
    }

    #[tracing::instrument(name = "Creating contact with the provider", skip(self))]
    /// The id is `None` when the provider confirms creation without echoing one.
    pub async fn create_contact(&self, email: &SubscriberEmail) -> Result<Option<ContactId>, ContactsError> {
        let api_key = self.api_key.as_ref().ok_or(ContactsError::MissingApiKey)?;

        let address = format!("{}/v3/contacts", self.base_url.trim_end_matches('/'));
        let body = CreateContactRequest {
            email: email.as_ref(),
            update_enabled: false,
        };
        let response = self.http_client
            .post(address)
            .header("accept", "application/json")
            .header("api-key", api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.bytes().await?;
                let created: CreateContactResponse = serde_json::from_slice(&body).unwrap_or_else(|e| {
                    tracing::warn!("Contact created but the provider reply had no readable id: {}", e);
                    CreateContactResponse::default()
                });
                Ok(created.id)
            }
            StatusCode::BAD_REQUEST => {
                let details = response.json().await.unwrap_or(serde_json::Value::Null);
                Err(ContactsError::Rejected(details))
            }
            StatusCode::UNAUTHORIZED => Err(ContactsError::Unauthorized),
            status => Err(ContactsError::UnexpectedStatus(status)),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateContactRequest<'a> {
    email: &'a str,
    update_enabled: bool,
}

#[derive(Deserialize, Default)]
struct CreateContactResponse {
    #[serde(default)]
    id: Option<ContactId>,
}
