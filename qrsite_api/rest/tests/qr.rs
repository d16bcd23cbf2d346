use chrono::DateTime;
use pretty_assertions::assert_eq;
use qrsite_core_qr_contracts::{MockQrFeatureService, QrEncodeError};
use qrsite_models::qr::{QrImage, QrWidth};
use qrsite_shared_contracts::time::MockTimeService;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use common::{serve, Services};

mod common;

#[tokio::test]
async fn encode() {
    // Arrange
    let qr = MockQrFeatureService::new().with_encode(
        "https://webcode.es/".into(),
        QrWidth::new(300),
        Ok(Some(image(300))),
    );
    let base = serve(Services {
        qr,
        ..Default::default()
    })
    .await;

    // Act
    let response = reqwest::Client::new()
        .post(format!("{base}/api/qr"))
        .json(&json!({ "text": "https://webcode.es/" }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "dataUrl": "data:image/png;base64,cG5n", "width": 300 })
    );
}

#[tokio::test]
async fn encode_reports_actual_width() {
    // Arrange
    let qr = MockQrFeatureService::new().with_encode(
        "x".repeat(2000),
        QrWidth::new(120),
        Ok(Some(image(185))),
    );
    let base = serve(Services {
        qr,
        ..Default::default()
    })
    .await;

    // Act
    let response = reqwest::Client::new()
        .post(format!("{base}/api/qr"))
        .json(&json!({ "text": "x".repeat(2000), "width": 120 }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap()["width"], 185);
}

#[tokio::test]
async fn encode_blank_with_clamped_width() {
    // Arrange
    let qr = MockQrFeatureService::new().with_encode(" ".into(), QrWidth::new(120), Ok(None));
    let base = serve(Services {
        qr,
        ..Default::default()
    })
    .await;

    // Act
    let response = reqwest::Client::new()
        .post(format!("{base}/api/qr"))
        .json(&json!({ "text": " ", "width": 50 }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "dataUrl": null, "width": 120 })
    );
}

#[tokio::test]
async fn encode_too_long() {
    // Arrange
    let text = "x".repeat(2001);
    let qr = MockQrFeatureService::new().with_encode(
        text.clone(),
        QrWidth::default(),
        Err(QrEncodeError::PayloadTooLong),
    );
    let base = serve(Services {
        qr,
        ..Default::default()
    })
    .await;

    // Act
    let response = reqwest::Client::new()
        .post(format!("{base}/api/qr"))
        .json(&json!({ "text": text }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Text is too long. Maximum 2000 characters." })
    );
}

#[tokio::test]
async fn encode_failure() {
    // Arrange
    let qr = MockQrFeatureService::new().with_encode(
        "x".into(),
        QrWidth::default(),
        Err(QrEncodeError::Other(anyhow::anyhow!("task panicked"))),
    );
    let base = serve(Services {
        qr,
        ..Default::default()
    })
    .await;

    // Act
    let response = reqwest::Client::new()
        .post(format!("{base}/api/qr"))
        .json(&json!({ "text": "x" }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Failed to generate QR code. Please try again." })
    );
}

#[tokio::test]
async fn download() {
    // Arrange
    let time = MockTimeService::new()
        .with_now(DateTime::from_timestamp_millis(1_700_000_000_123).unwrap());
    let qr = MockQrFeatureService::new().with_encode(
        "hello world".into(),
        QrWidth::new(200),
        Ok(Some(image(200))),
    );
    let base = serve(Services {
        time,
        qr,
        ..Default::default()
    })
    .await;

    // Act
    let response = reqwest::get(format!("{base}/api/qr.png?text=hello%20world&width=200"))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"qrcode-1700000000123.png\""
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"png");
}

#[tokio::test]
async fn download_blank() {
    // Arrange
    let qr = MockQrFeatureService::new().with_encode("".into(), QrWidth::default(), Ok(None));
    let base = serve(Services {
        qr,
        ..Default::default()
    })
    .await;

    // Act
    let response = reqwest::get(format!("{base}/api/qr.png?text=")).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn download_without_text() {
    // Arrange
    let base = serve(Services::default()).await;

    // Act
    let response = reqwest::get(format!("{base}/api/qr.png")).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>().await.unwrap();
    assert!(body["error"].is_string());
}

fn image(width: u32) -> QrImage {
    QrImage {
        png: b"png".to_vec(),
        width,
    }
}
