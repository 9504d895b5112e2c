use actix_web::error::JsonPayloadError;
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use crate::contacts_client::{ContactsClient, ContactsError};
use crate::domain::{ContactId, NewSubscriber, SubscriberEmail};
use crate::routes::error_chain_fmt;

#[derive(serde::Deserialize)]
pub struct SubscribeBody {
    email: String,
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(body.email)?;
        Ok(NewSubscriber { email })
    }
}

#[derive(Serialize)]
struct SubscribeSuccess<'a> {
    success: bool,
    message: &'static str,
    data: SubscribedContact<'a>,
}

#[derive(Serialize)]
struct SubscribedContact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<ContactId>,
}

#[derive(Serialize)]
struct FailureBody<'a> {
    success: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a serde_json::Value>,
}

impl<'a> FailureBody<'a> {
    fn new(error: &'static str, details: Option<&'a serde_json::Value>) -> Self {
        Self { success: false, error, details }
    }
}

#[tracing::instrument(
    name = "Relaying a new subscriber to the contacts provider",
    skip(body, contacts_client),
    fields(subscriber_email = %body.email, contact_id = tracing::field::Empty)
)]
pub async fn subscribe(
    body: web::Json<SubscribeBody>,
    contacts_client: web::Data<ContactsClient>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = body.0.try_into().map_err(SubscribeError::ValidationError)?;

    let id = contacts_client
        .create_contact(&new_subscriber.email)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create contact: {:?}", e);
            e
        })?;
    if let Some(id) = id {
        tracing::Span::current().record("contact_id", tracing::field::display(id));
    }

    Ok(HttpResponse::Ok().json(SubscribeSuccess {
        success: true,
        message: "Successfully subscribed to newsletter",
        data: SubscribedContact {
            email: new_subscriber.email.as_ref(),
            id,
        },
    }))
}

/// CORS preflight; the CORS headers themselves are added by the app middleware.
pub async fn subscribe_preflight() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({}))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "POST"))
        .json(FailureBody::new("Method not allowed", None))
}

/// Turns body extraction failures (not JSON, missing or non-string `email`)
/// into the same 400 a malformed address gets. Oversized bodies keep their 413.
pub fn subscribe_body_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => err.into(),
        _ => SubscribeError::ValidationError(err.to_string()).into(),
    }
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("The contacts provider rejected the email")]
    RejectedByProvider(serde_json::Value),
    #[error("The contacts provider is not configured")]
    ConfigurationError(#[source] ContactsError),
    #[error("The contacts provider refused our credentials")]
    ProviderAuthenticationError(#[source] ContactsError),
    #[error("Failed to create the contact with the provider")]
    ProviderError(#[source] ContactsError),
}

impl From<ContactsError> for SubscribeError {
    fn from(e: ContactsError) -> Self {
        match e {
            ContactsError::Rejected(details) => SubscribeError::RejectedByProvider(details),
            ContactsError::MissingApiKey => SubscribeError::ConfigurationError(e),
            ContactsError::Unauthorized => SubscribeError::ProviderAuthenticationError(e),
            ContactsError::UnexpectedStatus(_) | ContactsError::Transport(_) => SubscribeError::ProviderError(e),
        }
    }
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) | SubscribeError::RejectedByProvider(_) => StatusCode::BAD_REQUEST,
            SubscribeError::ConfigurationError(_)
            | SubscribeError::ProviderAuthenticationError(_)
            | SubscribeError::ProviderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let validation_details;
        let body = match self {
            SubscribeError::ValidationError(message) => {
                validation_details = serde_json::Value::String(message.clone());
                FailureBody::new("Invalid email format", Some(&validation_details))
            }
            SubscribeError::RejectedByProvider(details) => {
                FailureBody::new("Email already exists or invalid", Some(details))
            }
            SubscribeError::ConfigurationError(_) => FailureBody::new("Server configuration error", None),
            SubscribeError::ProviderAuthenticationError(_) => FailureBody::new("API authentication failed", None),
            SubscribeError::ProviderError(_) => FailureBody::new("Failed to subscribe to newsletter", None),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
