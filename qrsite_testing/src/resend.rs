//! A fake email provider implementing the subset of the Resend API used by
//! the contact form.
//!
//! Emails are accepted when the request carries the configured API key and
//! at least one recipient. Recipients in the `reject.test` domain are
//! refused with a validation error, which makes it possible to exercise the
//! provider error path.

use std::{
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex},
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

pub const EMAILS_ROUTE: &str = "/emails";
pub const REJECTED_DOMAIN: &str = "reject.test";

#[derive(Debug, Clone)]
pub struct FakeResend(Arc<FakeResendState>);

#[derive(Debug)]
struct FakeResendState {
    api_key: String,
    outbox: Mutex<Vec<ReceivedEmail>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedEmail {
    #[serde(default)]
    pub id: String,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    pub reply_to: Option<String>,
}

impl FakeResend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self(Arc::new(FakeResendState {
            api_key: api_key.into(),
            outbox: Default::default(),
        }))
    }

    pub fn router(&self) -> Router<()> {
        Router::new()
            .route(
                EMAILS_ROUTE,
                routing::post(send_email).get(list_emails),
            )
            .with_state(self.clone())
    }

    /// Returns all emails accepted so far.
    pub fn outbox(&self) -> Vec<ReceivedEmail> {
        self.0.outbox.lock().unwrap().clone()
    }

    /// Binds to the given address and serves the fake API in a background
    /// task. Returns the address actually bound, which is useful when port
    /// `0` was requested.
    pub async fn spawn(&self, host: IpAddr, port: u16) -> anyhow::Result<SocketAddr> {
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        let addr = listener.local_addr()?;
        let router = self.router();
        tokio::spawn(async move { axum::serve(listener, router).await });
        Ok(addr)
    }
}

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting fake resend server on {host}:{port}");
    info!("Emails endpoint: http://{host}:{port}{EMAILS_ROUTE}");
    info!("API key: {api_key:?}");
    info!("Recipients in the {REJECTED_DOMAIN:?} domain are rejected");

    let router = FakeResend::new(api_key).router();

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router)
        .await
        .context("Failed to start HTTP server")
}

async fn send_email(
    State(fake): State<FakeResend>,
    headers: HeaderMap,
    Json(mut email): Json<ReceivedEmail>,
) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|key| key == fake.0.api_key);
    if !authorized {
        return provider_error(StatusCode::FORBIDDEN, "invalid_api_key", "API key is invalid");
    }

    if email.to.is_empty() {
        return provider_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "Missing `to` field.",
        );
    }

    if let Some(rejected) = email
        .to
        .iter()
        .find(|to| to.ends_with(&format!("@{REJECTED_DOMAIN}")))
    {
        return provider_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            &format!("Invalid `to` field. The recipient {rejected} is not allowed."),
        );
    }

    email.id = Uuid::now_v7().to_string();
    info!(id = %email.id, to = ?email.to, subject = %email.subject, "accepted email");

    let id = email.id.clone();
    fake.0.outbox.lock().unwrap().push(email);

    Json(json!({ "id": id })).into_response()
}

async fn list_emails(State(fake): State<FakeResend>) -> Json<Vec<ReceivedEmail>> {
    Json(fake.outbox())
}

fn provider_error(status: StatusCode, name: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "statusCode": status.as_u16(),
            "name": name,
            "message": message,
        })),
    )
        .into_response()
}
