//! # filtimpay - signed checkout links
//!
//! Builds redirect URLs and form payloads for the FiltimPay hosted checkout
//! page. A payment request is validated, normalized, serialized, base64
//! encoded and signed with the merchant's shared secret under one of two
//! signature schemes. The library performs no network I/O.

pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod order;
pub mod types;

// Re-exports for convenience
pub use client::PaymentLinkClient;
pub use config::GatewayConfig;
pub use error::{FiltimPayError, Result};
pub use order::{describe_order, BillingDetails, Order};
pub use types::*;

/// Current version of the filtimpay library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
