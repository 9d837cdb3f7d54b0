//! Mapping from shop orders to payment requests

use crate::types::{Customer, Language, PaymentRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Billing details as a shop stores them. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingDetails {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub postcode: String,
    pub state: String,
    pub country: String,
    pub phone: String,
}

/// The slice of a shop order needed to start a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    pub total: Decimal,
    pub currency: String,
    #[serde(default)]
    pub billing: BillingDetails,
}

impl Order {
    pub fn new(order_id: u64, total: Decimal, currency: impl Into<String>) -> Self {
        Self {
            order_id,
            total,
            currency: currency.into(),
            billing: BillingDetails::default(),
        }
    }

    pub fn with_billing(mut self, billing: BillingDetails) -> Self {
        self.billing = billing;
        self
    }
}

impl From<&BillingDetails> for Customer {
    fn from(billing: &BillingDetails) -> Self {
        fn present(value: &str) -> Option<String> {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }

        Customer {
            forename: present(&billing.first_name),
            surname: present(&billing.last_name),
            company: present(&billing.company),
            email: present(&billing.email),
            addr_line1: present(&billing.address_1),
            addr_line2: present(&billing.address_2),
            addr_city: present(&billing.city),
            addr_postal_code: present(&billing.postcode),
            addr_state: present(&billing.state),
            addr_country: present(&billing.country),
            phone: present(&billing.phone),
        }
    }
}

/// Human-readable payment description shown on the checkout page
pub fn describe_order(order_id: u64, language: Language) -> String {
    match language {
        Language::Ru => format!("Оплата заказа № {}", order_id),
        Language::En => format!("Order payment # {}", order_id),
        Language::Uk => format!("Оплата замовлення № {}", order_id),
    }
}

impl PaymentRequest {
    /// Build a request for `order`. The shopper returns to `return_url`
    /// whether the payment succeeds or fails.
    pub fn from_order(order: &Order, language: Language, return_url: &str) -> Self {
        PaymentRequest::new(
            order.total,
            order.currency.clone(),
            describe_order(order.order_id, language),
        )
        .with_order_id(order.order_id)
        .with_customer(Customer::from(&order.billing))
        .with_language(language)
        .with_success_link(return_url)
        .with_error_link(return_url)
    }
}
