pub mod email;
pub mod qr;
pub mod serve;
