use std::{net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use qrsite_core_contact_contracts::ContactFeatureService;
use qrsite_core_qr_contracts::QrFeatureService;
use qrsite_models::qr::QrWidth;
use qrsite_shared_contracts::time::TimeService;
use qrsite_utils::Apply;
use tokio::net::TcpListener;

mod extractors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Time, Contact, Qr> {
    time: Time,
    contact: Contact,
    qr: Qr,
    config: RestServerConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct RestServerConfig {
    /// Width used by the QR endpoints when the request does not specify one.
    pub qr_default_width: QrWidth,
}

impl<Time, Contact, Qr> RestServer<Time, Contact, Qr>
where
    Time: TimeService,
    Contact: ContactFeatureService,
    Qr: QrFeatureService,
{
    pub fn new(time: Time, contact: Contact, qr: Qr, config: RestServerConfig) -> Self {
        Self {
            time,
            contact,
            qr,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        axum::serve(listener, router)
            .await
            .context("Failed to start HTTP server")
    }

    pub fn router(self) -> Router<()> {
        let contact = Arc::new(self.contact);

        Router::new()
            .merge(routes::health::router(Arc::clone(&contact)))
            .merge(routes::contact::router(contact))
            .merge(routes::qr::router(
                self.qr.into(),
                self.time.into(),
                self.config.qr_default_width,
            ))
            .apply(middlewares::panic_handler::add)
            .apply(middlewares::trace::add)
            .apply(middlewares::request_id::add)
    }
}
