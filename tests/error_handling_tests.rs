//! Error handling tests for filtimpay

use filtimpay::{FiltimPayError, GatewayConfig, PaymentLinkClient, PaymentRequest, SignatureScheme};
use rust_decimal::Decimal;
use std::io::Write;

fn client() -> PaymentLinkClient {
    PaymentLinkClient::new("shop42", "secret", SignatureScheme::Md5Json).unwrap()
}

fn assert_validation(result: filtimpay::Result<impl std::fmt::Debug>, expected_field: &str) {
    match result {
        Err(FiltimPayError::Validation { field, message }) => {
            assert_eq!(
                field, expected_field,
                "Validation error MUST name the offending field - message: {}",
                message
            );
        }
        other => panic!("expected validation error for {}, got {:?}", expected_field, other),
    }
}

#[test]
fn test_empty_project_id_rejected() {
    let err = PaymentLinkClient::new("", "secret", SignatureScheme::Md5Json).unwrap_err();

    let error_msg = err.to_string();
    assert!(
        error_msg.contains("Configuration error"),
        "Error message MUST contain 'Configuration error' - actual: {}",
        error_msg
    );
    assert!(
        error_msg.contains("project_id"),
        "Error message MUST name the missing credential - actual: {}",
        error_msg
    );
}

#[test]
fn test_empty_token_rejected() {
    let err = PaymentLinkClient::new("shop42", "", SignatureScheme::Sha1Base64).unwrap_err();
    assert!(matches!(err, FiltimPayError::Configuration { .. }));
    assert!(err.to_string().contains("token"));
}

#[test]
fn test_missing_amount() {
    let request = PaymentRequest {
        currency: Some("EUR".to_string()),
        description: Some("Order #1".to_string()),
        ..Default::default()
    };
    assert_validation(client().build_params(&request), "amount");
}

#[test]
fn test_amount_beyond_json_precision() {
    let amount: Decimal = "1234567890123456.78".parse().unwrap();
    let request = PaymentRequest::new(amount, "EUR", "Order #1");

    let err = client().build_link(&request).unwrap_err();
    let error_msg = err.to_string();
    assert!(
        error_msg.contains("1234567890123456.78"),
        "Error message MUST quote the rejected amount - actual: {}",
        error_msg
    );
    assert_validation(client().sign_request(&request), "amount");
}

#[test]
fn test_missing_currency() {
    let request = PaymentRequest {
        amount: Some(Decimal::ONE),
        description: Some("Order #1".to_string()),
        ..Default::default()
    };
    assert_validation(client().build_params(&request), "currency");
}

#[test]
fn test_unsupported_currency() {
    let request = PaymentRequest::new(Decimal::ONE, "XYZ", "Order #1");
    let result = client().build_params(&request);

    let error_msg = result.as_ref().unwrap_err().to_string();
    assert!(
        error_msg.contains("XYZ"),
        "Error message MUST contain the rejected currency - actual: {}",
        error_msg
    );
    assert_validation(result, "currency");
}

#[test]
fn test_missing_description() {
    let request = PaymentRequest {
        amount: Some(Decimal::ONE),
        currency: Some("EUR".to_string()),
        ..Default::default()
    };
    assert_validation(client().build_params(&request), "description");
}

#[test]
fn test_empty_description() {
    let request = PaymentRequest::new(Decimal::ONE, "EUR", "");
    assert_validation(client().build_params(&request), "description");

    let request = PaymentRequest::new(Decimal::ONE, "EUR", "   ");
    assert_validation(client().build_params(&request), "description");
}

#[test]
fn test_validation_fails_before_any_artifact() {
    let request = PaymentRequest::new(Decimal::ONE, "XYZ", "Order #1");
    let client = client();

    assert_validation(client.build_link(&request), "currency");
    assert_validation(client.build_form_payload(&request), "currency");
    assert_validation(client.sign_request(&request), "currency");
}

#[test]
fn test_invalid_signature_error() {
    let client = client();
    let form = client
        .build_form_payload(&PaymentRequest::new(Decimal::ONE, "EUR", "Order #1"))
        .unwrap();

    let err = client.verify(&form.data, "0".repeat(32).as_str()).unwrap_err();
    let error_msg = err.to_string();
    assert!(
        error_msg.contains("Invalid signature"),
        "Error message MUST contain 'Invalid signature' - actual: {}",
        error_msg
    );
}

#[test]
fn test_signature_from_other_token_rejected() {
    let request = PaymentRequest::new(Decimal::ONE, "EUR", "Order #1");
    let other = PaymentLinkClient::new("shop42", "other-secret", SignatureScheme::Md5Json).unwrap();
    let form = other.build_form_payload(&request).unwrap();

    assert!(matches!(
        client().verify(&form.data, &form.signature),
        Err(FiltimPayError::InvalidSignature { .. })
    ));
}

#[test]
fn test_malformed_data() {
    let client = client();
    assert!(matches!(client.decode("***"), Err(FiltimPayError::Base64(_))));
    assert!(matches!(client.verify("***", "sig"), Err(FiltimPayError::Base64(_))));
}

#[test]
fn test_config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "project_id": "shop42",
            "token": "secret",
            "signature_scheme": "B",
            "checkout_url": "https://sandbox.filtimpay.com/api/",
            "language": "uk"
        }}"#
    )
    .unwrap();

    let config = GatewayConfig::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.signature_scheme, SignatureScheme::Sha1Base64);
    assert!(config.redirect_to_payment_page);

    let client = config.client().unwrap();
    assert_eq!(client.checkout_url(), "https://sandbox.filtimpay.com/api/");
}

#[test]
fn test_config_file_errors() {
    let err = GatewayConfig::from_file("/nonexistent/filtimpay.json").unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Failed to read config file"));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"project_id": "shop42"}}"#).unwrap();
    let err = GatewayConfig::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("FILTIMPAY_TOKEN is required"));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    let err = GatewayConfig::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
