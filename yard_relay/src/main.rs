//! Contact-form mail relay.
//!
//! A two-endpoint HTTP service, entirely independent of the workout
//! system: `POST /api/contact` validates three required string fields and
//! relays them through a hosted email API; `GET /health` is a liveness
//! probe. Configuration comes from the environment.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// A validated contact-form submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MailError(String);

/// Outbound mail seam; the tests swap in a mock.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// Production mailer: one JSON POST to a hosted email API.
pub struct HttpMailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
    to: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String, to: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
            from,
            to,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        let payload = json!({
            "from": self.from,
            "to": self.to,
            "subject": format!("Contact form: {}", message.name),
            "reply_to": message.email,
            "text": message.message,
        });

        self.http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError(e.to_string()))?
            .error_for_status()
            .map_err(|e| MailError(e.to_string()))?;

        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    mailer: Arc<dyn Mailer>,
}

/// Raw request body; every field is optional so validation can answer
/// with the contract's 400 instead of a rejection.
#[derive(Debug, Deserialize)]
struct ContactRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn required(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

async fn contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (name, email, message) = match (
        required(body.name),
        required(body.email),
        required(body.message),
    ) {
        (Some(name), Some(email), Some(message)) => (name, email, message),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "All fields are required" })),
            );
        }
    };

    let submission = ContactMessage {
        name,
        email,
        message,
    };

    match state.mailer.send(&submission).await {
        Ok(()) => {
            tracing::info!("Relayed contact form from {}", submission.email);
            (StatusCode::OK, Json(json!({ "success": true })))
        }
        Err(e) => {
            tracing::error!("Mail relay failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to send email" })),
            )
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn app(mailer: Arc<dyn Mailer>) -> Router {
    Router::new()
        .route("/api/contact", post(contact))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { mailer })
}

fn require_env(key: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(key).map_err(|_| format!("{} must be set", key).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();

    let bind = std::env::var("RELAY_BIND").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let mailer = HttpMailer::new(
        require_env("MAIL_API_URL")?,
        require_env("MAIL_API_KEY")?,
        require_env("CONTACT_FROM")?,
        require_env("CONTACT_TO")?,
    );

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Mail relay listening on {}", bind);

    axum::serve(listener, app(Arc::new(mailer))).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Mock mailer recording sends, optionally failing every send
    struct MockMailer {
        sent: Mutex<Vec<ContactMessage>>,
        fail: bool,
    }

    impl MockMailer {
        fn working() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn broken() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl Mailer for MockMailer {
        async fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError("smtp unreachable".into()));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn contact_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_submission_relays_mail() {
        let mailer = MockMailer::working();
        let app = app(mailer.clone());

        let request = contact_request(json!({
            "name": "Benny",
            "email": "benny@example.com",
            "message": "The og mode is brutal."
        }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": true }));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].email, "benny@example.com");
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let app = app(MockMailer::working());

        let request = contact_request(json!({
            "name": "Benny",
            "email": "benny@example.com"
        }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "All fields are required" })
        );
    }

    #[tokio::test]
    async fn test_blank_field_is_rejected() {
        let app = app(MockMailer::working());

        let request = contact_request(json!({
            "name": "Benny",
            "email": "   ",
            "message": "hello"
        }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mailer_failure_returns_500() {
        let app = app(MockMailer::broken());

        let request = contact_request(json!({
            "name": "Benny",
            "email": "benny@example.com",
            "message": "hello"
        }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to send email" })
        );
    }

    #[tokio::test]
    async fn test_fields_are_trimmed() {
        let mailer = MockMailer::working();
        let app = app(mailer.clone());

        let request = contact_request(json!({
            "name": "  Benny  ",
            "email": "benny@example.com",
            "message": " hello "
        }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].name, "Benny");
        assert_eq!(sent[0].message, "hello");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app(MockMailer::working());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }
}
