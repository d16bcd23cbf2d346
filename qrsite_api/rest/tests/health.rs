use pretty_assertions::assert_eq;
use qrsite_core_contact_contracts::MockContactFeatureService;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{serve, Services};

mod common;

#[tokio::test]
async fn healthy() {
    // Arrange
    let contact = MockContactFeatureService::new().with_is_configured(true);
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = reqwest::get(format!("{base}/health")).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "http": true, "email": true })
    );
}

#[tokio::test]
async fn email_not_configured() {
    // Arrange
    let contact = MockContactFeatureService::new().with_is_configured(false);
    let base = serve(Services {
        contact,
        ..Default::default()
    })
    .await;

    // Act
    let response = reqwest::get(format!("{base}/health")).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "http": true, "email": false })
    );
}
