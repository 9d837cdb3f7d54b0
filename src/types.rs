//! Core types for FiltimPay checkout requests

use crate::crypto;
use crate::{FiltimPayError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::str::FromStr;

/// Hosted checkout page used when no override is configured
pub const DEFAULT_CHECKOUT_URL: &str = "https://filtimpay.com/api/";

/// Longest description the processor accepts, in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

/// Currencies accepted by the processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    Kes,
    Rub,
    /// Legacy ruble code, sent to the processor as `RUB`
    Rur,
}

impl Currency {
    /// Every currency code the processor understands
    pub const SUPPORTED: [Currency; 5] = [
        Currency::Eur,
        Currency::Usd,
        Currency::Kes,
        Currency::Rub,
        Currency::Rur,
    ];

    /// Look up a currency by its ISO-style code. Codes are case-sensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::SUPPORTED.into_iter().find(|c| c.as_str() == code)
    }

    /// Get the currency code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Kes => "KES",
            Currency::Rub => "RUB",
            Currency::Rur => "RUR",
        }
    }

    /// The code that goes on the wire
    pub fn normalized(self) -> Self {
        match self {
            Currency::Rur => Currency::Rub,
            other => other,
        }
    }
}

/// Language of the checkout interface and of generated descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Ru,
    Uk,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Uk => "uk",
        }
    }
}

impl FromStr for Language {
    type Err = FiltimPayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            "uk" => Ok(Language::Uk),
            other => Err(FiltimPayError::validation(
                "language",
                format!("unsupported language: {}", other),
            )),
        }
    }
}

/// How a payment payload is signed.
///
/// Both schemes are in use by different processor integrations and are not
/// interchangeable: the counterpart decides which one it verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureScheme {
    /// Variant A: lowercase hex MD5 of `json(params) + token`, sent as `sign`
    #[default]
    #[serde(alias = "A", alias = "a")]
    Md5Json,
    /// Variant B: base64 SHA-1 of `token + data + token`, sent as `signature`
    #[serde(alias = "B", alias = "b")]
    Sha1Base64,
}

impl SignatureScheme {
    /// Name of the query parameter carrying the signature
    pub fn signature_param(&self) -> &'static str {
        match self {
            SignatureScheme::Md5Json => "sign",
            SignatureScheme::Sha1Base64 => "signature",
        }
    }
}

impl FromStr for SignatureScheme {
    type Err = FiltimPayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" | "a" | "md5_json" => Ok(SignatureScheme::Md5Json),
            "B" | "b" | "sha1_base64" => Ok(SignatureScheme::Sha1Base64),
            other => Err(FiltimPayError::config(format!("unknown signature scheme: {}", other))),
        }
    }
}

/// Customer and billing address details attached to a payment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub forename: Option<String>,
    pub surname: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub addr_line1: Option<String>,
    pub addr_line2: Option<String>,
    pub addr_city: Option<String>,
    pub addr_postal_code: Option<String>,
    pub addr_state: Option<String>,
    pub addr_country: Option<String>,
    pub phone: Option<String>,
}

impl Customer {
    /// Present fields keyed by their wire name, in wire order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [
            ("customer_forename", &self.forename),
            ("customer_surname", &self.surname),
            ("customer_company", &self.company),
            ("customer_email", &self.email),
            ("customer_addr_line1", &self.addr_line1),
            ("customer_addr_line2", &self.addr_line2),
            ("customer_addr_city", &self.addr_city),
            ("customer_addr_postal_code", &self.addr_postal_code),
            ("customer_addr_state", &self.addr_state),
            ("customer_addr_country", &self.addr_country),
            ("customer_phone", &self.phone),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
    }
}

/// One checkout attempt.
///
/// Required fields are optional here so that an incomplete request can be
/// represented and rejected by [`PaymentLinkClient::build_params`].
///
/// [`PaymentLinkClient::build_params`]: crate::PaymentLinkClient::build_params
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentRequest {
    pub order_id: Option<u64>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub customer: Customer,
    pub language: Option<Language>,
    pub success_link: Option<String>,
    pub error_link: Option<String>,
    /// Processor-specific fields appended after the standard ones
    pub extra: Vec<(String, Value)>,
}

impl PaymentRequest {
    /// Create a request with the three required fields set
    pub fn new(
        amount: Decimal,
        currency: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount: Some(amount),
            currency: Some(currency.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn with_order_id(mut self, order_id: u64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = customer;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Set where the shopper lands after a successful payment
    pub fn with_success_link(mut self, url: impl Into<String>) -> Self {
        self.success_link = Some(url.into());
        self
    }

    /// Set where the shopper lands after a failed payment
    pub fn with_error_link(mut self, url: impl Into<String>) -> Self {
        self.error_link = Some(url.into());
        self
    }

    /// Append a processor-specific field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

/// Normalized, ordered field mapping that is both encoded and signed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentParams(Map<String, Value>);

impl PaymentParams {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn project_id(&self) -> Option<&str> {
        self.get_str("project_id")
    }

    pub fn currency(&self) -> Option<&str> {
        self.get_str("currency")
    }

    /// Get the amount as a decimal
    pub fn amount(&self) -> Option<Decimal> {
        match self.0.get("amount")? {
            Value::Number(n) => decimal_from_number(n),
            Value::String(s) => Decimal::from_str(s).ok(),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for PaymentParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Read a JSON number back as the decimal it spells out
pub(crate) fn decimal_from_number(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Signed, transport-ready result of processing a [`PaymentRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// Base64 of the canonical JSON serialization
    pub encoded_data: String,
    pub signature: String,
    pub checkout_url: String,
    pub scheme: SignatureScheme,
}

impl SignedPayload {
    /// Compose the redirect URL for this payload
    pub fn link(&self) -> String {
        format!(
            "{}?{}",
            self.checkout_url,
            crypto::query_string(&[
                ("data", &self.encoded_data),
                (self.scheme.signature_param(), &self.signature),
            ])
        )
    }
}

/// Raw values for rendering a checkout form manually
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPayload {
    pub url: String,
    pub data: String,
    pub signature: String,
}

impl From<SignedPayload> for FormPayload {
    fn from(signed: SignedPayload) -> Self {
        Self {
            url: signed.checkout_url,
            data: signed.encoded_data,
            signature: signed.signature,
        }
    }
}
