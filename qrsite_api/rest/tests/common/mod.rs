use std::net::{Ipv4Addr, SocketAddr};

use qrsite_api_rest::{RestServer, RestServerConfig};
use qrsite_core_contact_contracts::MockContactFeatureService;
use qrsite_core_qr_contracts::MockQrFeatureService;
use qrsite_models::qr::QrWidth;
use qrsite_shared_contracts::time::MockTimeService;
use tokio::net::TcpListener;

#[derive(Default)]
pub struct Services {
    pub time: MockTimeService,
    pub contact: MockContactFeatureService,
    pub qr: MockQrFeatureService,
}

/// Serves the api on an ephemeral port and returns its base url.
pub async fn serve(services: Services) -> String {
    let Services { time, contact, qr } = services;
    let server = RestServer::new(
        time,
        contact,
        qr,
        RestServerConfig {
            qr_default_width: QrWidth::default(),
        },
    );

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, server.router()).await });

    format!("http://{addr}")
}
