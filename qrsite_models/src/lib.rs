pub mod contact;
pub mod qr;
pub mod validation;
