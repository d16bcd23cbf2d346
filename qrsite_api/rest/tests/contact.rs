use chrono::DateTime;
use pretty_assertions::assert_eq;
use qrsite_core_contact_contracts::{
    ContactSubmitError, DeliveryRejection, MockContactFeatureService,
};
use qrsite_models::contact::{ContactFieldError, ContactSubmission, SubmissionTicket};
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{serve, Services};

mod common;

#[tokio::test]
async fn ok() {
    // Arrange
    let contact = MockContactFeatureService::new().with_submit(
        submission(),
        Ok(SubmissionTicket {
            id: "re_123".into(),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            submission: submission(),
        }),
    );
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = post(&base, json!(submission())).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "success": true, "message": "Correo enviado con éxito", "id": "re_123" })
    );
}

#[tokio::test]
async fn validation_error() {
    // Arrange
    let submission = ContactSubmission {
        name: "A".into(),
        ..submission()
    };
    let contact = MockContactFeatureService::new().with_submit(
        submission.clone(),
        Err(ContactSubmitError::Validation(ContactFieldError::Name)),
    );
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = post(&base, json!(submission)).await;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "El nombre debe tener entre 2 y 100 caracteres" })
    );
}

#[tokio::test]
async fn missing_fields_are_empty() {
    // Arrange
    let contact = MockContactFeatureService::new().with_submit(
        ContactSubmission {
            name: "Al".into(),
            ..Default::default()
        },
        Err(ContactSubmitError::Validation(ContactFieldError::Email)),
    );
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = post(&base, json!({ "name": "Al" })).await;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Dirección de correo inválida" })
    );
}

#[tokio::test]
async fn malformed_json() {
    // Arrange
    let base = serve(Services::default()).await;

    // Act
    let response = reqwest::Client::new()
        .post(format!("{base}/api/contact"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn not_configured() {
    // Arrange
    let contact = MockContactFeatureService::new()
        .with_submit(submission(), Err(ContactSubmitError::Configuration));
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = post(&base, json!(submission())).await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Email service is not configured" })
    );
}

#[tokio::test]
async fn delivery_error() {
    // Arrange
    let contact = MockContactFeatureService::new().with_submit(
        submission(),
        Err(ContactSubmitError::Delivery(DeliveryRejection {
            message: Some("Invalid `to` field.".into()),
            status_code: Some(422),
            name: Some("validation_error".into()),
        })),
    );
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = post(&base, json!(submission())).await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "error": "Invalid `to` field.",
            "details": { "statusCode": 422, "name": "validation_error" },
        })
    );
}

#[tokio::test]
async fn delivery_error_without_message() {
    // Arrange
    let contact = MockContactFeatureService::new().with_submit(
        submission(),
        Err(ContactSubmitError::Delivery(DeliveryRejection::default())),
    );
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = post(&base, json!(submission())).await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Failed to send email (resend error)", "details": {} })
    );
}

#[tokio::test]
async fn transport_error() {
    // Arrange
    let contact = MockContactFeatureService::new().with_submit(
        submission(),
        Err(ContactSubmitError::Transport(anyhow::anyhow!("connection refused"))),
    );
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = post(&base, json!(submission())).await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Failed to send email. Please try again later." })
    );
}

#[tokio::test]
async fn unexpected_error() {
    // Arrange
    let contact = MockContactFeatureService::new().with_submit(
        submission(),
        Err(ContactSubmitError::Other(anyhow::anyhow!("connection reset"))),
    );
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = post(&base, json!(submission())).await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Ocurrió un error inesperado. Por favor, inténtalo de nuevo." })
    );
}

#[tokio::test]
async fn handler_panics() {
    // Arrange
    let mut contact = MockContactFeatureService::new();
    contact
        .expect_submit()
        .returning(|_| panic!("something went terribly wrong"));
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = post(&base, json!(submission())).await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Ocurrió un error inesperado. Por favor, inténtalo de nuevo." })
    );
}

fn submission() -> ContactSubmission {
    ContactSubmission {
        name: "Al".into(),
        email: "x@y.com".into(),
        subject: "Hello there".into(),
        message: "1234567890".into(),
    }
}

async fn post(base: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/api/contact"))
        .json(&body)
        .send()
        .await
        .unwrap()
}
