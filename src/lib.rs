//! # paypal-nvp - PayPal express checkout over NVP
//!
//! Formats a checkout request as a form-encoded POST to the PayPal NVP API,
//! parses the `KEY=value&` response into a [`PaymentResponse`], and keeps an
//! up/down signal for the gateway based on consecutive transport failures.
//!
//! Response parsing is strict by default and rejects a body whose last value
//! is not followed by `&`. Live PayPal endpoints usually omit that trailing
//! `&`, so production deployments will want
//! [`PayPalConfig::lenient_parsing`] enabled (`PAYPAL_LENIENT_PARSING=true`).

pub mod config;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod health;
pub mod id;
pub mod nvp;
pub mod service;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use config::{Credentials, PayPalConfig};
pub use error::{PaymentError, Result, TransportError};
pub use service::PayPalPaymentService;
pub use types::*;

// Feature-gated framework support
#[cfg(feature = "axum")]
pub mod axum;

/// Current version of the paypal-nvp library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
