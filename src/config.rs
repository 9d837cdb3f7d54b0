//! Merchant gateway configuration
//!
//! Settings are loaded explicitly from a JSON file or the environment and
//! handed to the code that builds checkout links; nothing here is global.

use crate::client::PaymentLinkClient;
use crate::order::Order;
use crate::types::{Language, PaymentRequest, SignatureScheme};
use crate::{FiltimPayError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for one FiltimPay merchant project
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Merchant project identifier
    pub project_id: String,
    /// Shared secret used for signing
    pub token: String,
    pub signature_scheme: SignatureScheme,
    /// Checkout page override
    pub checkout_url: Option<String>,
    /// Checkout interface language, also used for order descriptions
    pub language: Language,
    /// Send payments to the processor's sandbox
    pub sandbox: bool,
    /// Processor gate to forward the shopper to
    pub payment_gate: Option<String>,
    /// Skip the processor's intermediate page and go straight to payment
    pub redirect_to_payment_page: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            token: String::new(),
            signature_scheme: SignatureScheme::default(),
            checkout_url: None,
            language: Language::default(),
            sandbox: false,
            payment_gate: None,
            redirect_to_payment_page: true,
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("project_id", &self.project_id)
            .field("token", &"[REDACTED]")
            .field("signature_scheme", &self.signature_scheme)
            .field("checkout_url", &self.checkout_url)
            .field("language", &self.language)
            .field("sandbox", &self.sandbox)
            .field("payment_gate", &self.payment_gate)
            .field("redirect_to_payment_page", &self.redirect_to_payment_page)
            .finish()
    }
}

impl GatewayConfig {
    pub fn new(project_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            token: token.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FiltimPayError::config(format!("Failed to read config file: {}", e)))?;

        let config: GatewayConfig = serde_json::from_str(&content)
            .map_err(|e| FiltimPayError::config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source using the
    /// `FILTIMPAY_*` variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(project_id) = lookup("FILTIMPAY_PROJECT_ID") {
            config.project_id = project_id;
        }

        if let Some(token) = lookup("FILTIMPAY_TOKEN") {
            config.token = token;
        }

        if let Some(scheme) = lookup("FILTIMPAY_SIGNATURE_SCHEME") {
            config.signature_scheme = scheme.parse()?;
        }

        if let Some(checkout_url) = lookup("FILTIMPAY_CHECKOUT_URL") {
            config.checkout_url = Some(checkout_url);
        }

        if let Some(language) = lookup("FILTIMPAY_LANGUAGE") {
            config.language = language
                .parse()
                .map_err(|e| FiltimPayError::config(format!("Invalid FILTIMPAY_LANGUAGE: {}", e)))?;
        }

        if let Some(sandbox) = lookup("FILTIMPAY_SANDBOX") {
            config.sandbox = parse_flag("FILTIMPAY_SANDBOX", &sandbox)?;
        }

        if let Some(payment_gate) = lookup("FILTIMPAY_PAYMENT_GATE") {
            config.payment_gate = Some(payment_gate);
        }

        if let Some(get_url) = lookup("FILTIMPAY_GET_URL") {
            // get_url=0 means the processor forwards straight to the payment page
            config.redirect_to_payment_page = !parse_flag("FILTIMPAY_GET_URL", &get_url)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.project_id.is_empty() {
            return Err(FiltimPayError::config("FILTIMPAY_PROJECT_ID is required"));
        }

        if self.token.is_empty() {
            return Err(FiltimPayError::config("FILTIMPAY_TOKEN is required"));
        }

        if let Some(checkout_url) = &self.checkout_url {
            let parsed = url::Url::parse(checkout_url)
                .map_err(|e| FiltimPayError::config(format!("Invalid checkout URL: {}", e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(FiltimPayError::config(format!(
                    "Checkout URL must be http or https, got {}",
                    parsed.scheme()
                )));
            }
        }

        Ok(())
    }

    /// Build a checkout link client from this configuration
    pub fn client(&self) -> Result<PaymentLinkClient> {
        let client = PaymentLinkClient::new(
            self.project_id.clone(),
            self.token.clone(),
            self.signature_scheme,
        )?;

        Ok(match &self.checkout_url {
            Some(url) => client.with_checkout_url(url.clone()),
            None => client,
        })
    }

    /// Build the payment request for an order with the configured language
    /// and processor options
    pub fn checkout_request(&self, order: &Order, return_url: &str) -> PaymentRequest {
        let mut request = PaymentRequest::from_order(order, self.language, return_url);

        if self.sandbox {
            request = request.with_extra("sandbox", "1");
        }
        if let Some(gate) = &self.payment_gate {
            request = request.with_extra("payment_gate", gate.clone());
        }
        let get_url = if self.redirect_to_payment_page { "0" } else { "1" };
        request.with_extra("get_url", get_url)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(FiltimPayError::config(format!("Invalid {}: {}", name, other))),
    }
}
