//! JSON and image endpoints served under `/api`.

pub mod blob;
pub mod qr;
