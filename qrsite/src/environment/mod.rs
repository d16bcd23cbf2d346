use anyhow::Context;
use qrsite_api_rest::RestServerConfig;
use qrsite_config::Config;
use qrsite_core_contact_impl::{ContactFeatureConfig, ContactFeatureServiceImpl};
use qrsite_core_qr_impl::QrFeatureServiceImpl;
use qrsite_models::qr::QrWidth;
use qrsite_shared_impl::time::TimeServiceImpl;
use qrsite_templates_impl::TemplateServiceImpl;
use types::{ContactFeature, Email, RestServer};

pub mod types;

/// Wires the REST server. `email` is `None` if no delivery strategy is
/// available, see [`crate::email::connect`].
pub fn rest_server(config: &Config, email: Option<Email>) -> anyhow::Result<RestServer> {
    let rest_server_config = RestServerConfig {
        qr_default_width: QrWidth::new(config.qr.default_width),
    };

    Ok(RestServer::new(
        TimeServiceImpl,
        contact_feature(config, email)?,
        QrFeatureServiceImpl,
        rest_server_config,
    ))
}

pub fn contact_feature(config: &Config, email: Option<Email>) -> anyhow::Result<ContactFeature> {
    let template = TemplateServiceImpl::new().context("Failed to load templates")?;

    let contact_feature_config = ContactFeatureConfig {
        from: config.contact.from.as_str().into(),
        recipients: config.contact.recipients.clone().into(),
        subject_prefix: config.contact.subject_prefix.as_str().into(),
    };

    Ok(ContactFeatureServiceImpl::new(
        TimeServiceImpl,
        email,
        template,
        contact_feature_config,
    ))
}
