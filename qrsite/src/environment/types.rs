use qrsite_core_contact_impl::ContactFeatureServiceImpl;
use qrsite_core_qr_impl::QrFeatureServiceImpl;
use qrsite_email_impl::EmailServiceImpl;
use qrsite_shared_impl::time::TimeServiceImpl;
use qrsite_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = qrsite_api_rest::RestServer<Time, ContactFeature, QrFeature>;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<Time, Email, Template>;
pub type QrFeature = QrFeatureServiceImpl;

// Email
pub type Email = EmailServiceImpl<Time>;

// Shared
pub type Time = TimeServiceImpl;

// Templates
pub type Template = TemplateServiceImpl;
