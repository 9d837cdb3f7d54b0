//! Checkout link client for the FiltimPay hosted payment page

use crate::crypto;
use crate::types::*;
use crate::{FiltimPayError, Result};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Builds signed checkout links for one merchant project.
///
/// The client holds only immutable configuration and performs no I/O, so a
/// single instance can be shared freely between threads.
#[derive(Clone)]
pub struct PaymentLinkClient {
    project_id: String,
    token: String,
    checkout_url: String,
    scheme: SignatureScheme,
}

impl PaymentLinkClient {
    /// Create a client for the given merchant credentials
    pub fn new(
        project_id: impl Into<String>,
        token: impl Into<String>,
        scheme: SignatureScheme,
    ) -> Result<Self> {
        let project_id = project_id.into();
        let token = token.into();

        if project_id.is_empty() {
            return Err(FiltimPayError::config("project_id is empty"));
        }
        if token.is_empty() {
            return Err(FiltimPayError::config("token is empty"));
        }

        Ok(Self {
            project_id,
            token,
            checkout_url: DEFAULT_CHECKOUT_URL.to_string(),
            scheme,
        })
    }

    /// Point the client at a different checkout page
    pub fn with_checkout_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_url = url.into();
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn checkout_url(&self) -> &str {
        &self.checkout_url
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Validate a request and produce the normalized field mapping.
    ///
    /// `RUR` is rewritten to `RUB` here and nowhere else; the result is the
    /// snapshot that both [`encode`](Self::encode) and [`sign`](Self::sign)
    /// operate on.
    pub fn build_params(&self, request: &PaymentRequest) -> Result<PaymentParams> {
        let amount = request
            .amount
            .ok_or_else(|| FiltimPayError::validation("amount", "amount is null"))?;
        if amount <= Decimal::ZERO {
            return Err(FiltimPayError::validation(
                "amount",
                format!("amount must be positive, got {}", amount),
            ));
        }

        let code = request
            .currency
            .as_deref()
            .ok_or_else(|| FiltimPayError::validation("currency", "currency is null"))?;
        let currency = Currency::from_code(code)
            .ok_or_else(|| {
                FiltimPayError::validation(
                    "currency",
                    format!("currency {} is not supported", code),
                )
            })?
            .normalized();

        let description = request
            .description
            .as_deref()
            .ok_or_else(|| FiltimPayError::validation("description", "description is null"))?;
        if description.trim().is_empty() {
            return Err(FiltimPayError::validation("description", "description is empty"));
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(FiltimPayError::validation(
                "description",
                format!(
                    "description is longer than {} characters",
                    MAX_DESCRIPTION_LENGTH
                ),
            ));
        }

        let mut params = Map::new();
        params.insert("project_id".into(), self.project_id.clone().into());
        if let Some(order_id) = request.order_id {
            params.insert("order_id".into(), order_id.into());
        }
        params.insert("amount".into(), amount_value(amount)?);
        params.insert("currency".into(), currency.as_str().into());
        params.insert("description".into(), description.into());

        for (key, value) in request.customer.fields() {
            params.insert(key.into(), value.into());
        }
        if let Some(language) = request.language {
            params.insert("language".into(), language.as_str().into());
        }
        if let Some(link) = &request.success_link {
            params.insert("success_link".into(), link.clone().into());
        }
        if let Some(link) = &request.error_link {
            params.insert("error_link".into(), link.clone().into());
        }

        let mut extra_keys = HashSet::new();
        for (key, value) in &request.extra {
            if !extra_keys.insert(key.as_str()) {
                return Err(FiltimPayError::validation(key.clone(), "duplicate extra field"));
            }
            if params.contains_key(key) {
                return Err(FiltimPayError::validation(
                    key.clone(),
                    "extra field collides with a standard field",
                ));
            }
            params.insert(key.clone(), value.clone());
        }

        Ok(PaymentParams::from(params))
    }

    /// Encode normalized params for transport: base64 of the canonical JSON
    pub fn encode(&self, params: &PaymentParams) -> Result<String> {
        let json = crypto::json::to_string(params)?;
        Ok(crypto::base64_encode(json))
    }

    /// Inverse of [`encode`](Self::encode)
    pub fn decode(&self, data: &str) -> Result<PaymentParams> {
        let bytes = crypto::base64_decode(data)?;
        match serde_json::from_slice(&bytes)? {
            Value::Object(map) => Ok(PaymentParams::from(map)),
            _ => Err(FiltimPayError::validation("data", "payload is not a JSON object")),
        }
    }

    /// Compute the signature of normalized params under the configured scheme
    pub fn sign(&self, params: &PaymentParams) -> Result<String> {
        let json = crypto::json::to_string(params)?;
        let data = crypto::base64_encode(&json);
        Ok(self.signature_for(&json, &data))
    }

    fn signature_for(&self, json: &str, data: &str) -> String {
        match self.scheme {
            SignatureScheme::Md5Json => crypto::md5_hex(format!("{}{}", json, self.token)),
            SignatureScheme::Sha1Base64 => {
                crypto::str_to_sign(&format!("{}{}{}", self.token, data, self.token))
            }
        }
    }

    /// Validate, encode and sign a request in one pass
    pub fn sign_request(&self, request: &PaymentRequest) -> Result<SignedPayload> {
        let params = self.build_params(request)?;
        let json = crypto::json::to_string(&params)?;
        let encoded_data = crypto::base64_encode(&json);
        let signature = self.signature_for(&json, &encoded_data);

        Ok(SignedPayload {
            encoded_data,
            signature,
            checkout_url: self.checkout_url.clone(),
            scheme: self.scheme,
        })
    }

    /// Build the redirect URL for a request
    pub fn build_link(&self, request: &PaymentRequest) -> Result<String> {
        let link = self.sign_request(request)?.link();
        debug!(
            project_id = %self.project_id,
            scheme = ?self.scheme,
            order_id = ?request.order_id,
            "Built checkout link"
        );
        Ok(link)
    }

    /// Build the raw values for a manually rendered checkout form
    pub fn build_form_payload(&self, request: &PaymentRequest) -> Result<FormPayload> {
        let payload = FormPayload::from(self.sign_request(request)?);
        debug!(
            project_id = %self.project_id,
            scheme = ?self.scheme,
            order_id = ?request.order_id,
            "Built checkout form payload"
        );
        Ok(payload)
    }

    /// Check a `data`/signature pair the way the processor does and return
    /// the decoded params
    pub fn verify(&self, data: &str, signature: &str) -> Result<PaymentParams> {
        let params = self.decode(data)?;
        let json = crypto::json::to_string(&params)?;
        let expected = self.signature_for(&json, data);

        if !crypto::constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
            warn!(project_id = %self.project_id, scheme = ?self.scheme, "Signature mismatch");
            return Err(FiltimPayError::invalid_signature("signature does not match payload"));
        }

        match params.project_id() {
            Some(project_id) if project_id == self.project_id => Ok(params),
            other => {
                warn!(expected = %self.project_id, got = ?other, "Payload project_id mismatch");
                Err(FiltimPayError::invalid_signature("payload belongs to a different project"))
            }
        }
    }
}

impl fmt::Debug for PaymentLinkClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentLinkClient")
            .field("project_id", &self.project_id)
            .field("token", &"[REDACTED]")
            .field("checkout_url", &self.checkout_url)
            .field("scheme", &self.scheme)
            .finish()
    }
}

/// Amount as a JSON number in its shortest decimal form.
///
/// JSON numbers are carried as `f64`, so amounts that `f64` cannot hold
/// exactly are rejected instead of being rounded before signing.
fn amount_value(amount: Decimal) -> Result<Value> {
    let number = Number::from_str(&amount.normalize().to_string())?;
    if decimal_from_number(&number) != Some(amount) {
        return Err(FiltimPayError::validation(
            "amount",
            format!("amount {} cannot be represented exactly", amount),
        ));
    }
    Ok(Value::Number(number))
}
