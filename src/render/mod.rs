//! Rendering of human-facing artifacts: the response form and QR codes.
//!
//! Pure functions of their inputs; no store access.

mod form;
mod qr;

pub use form::*;
pub use qr::*;
