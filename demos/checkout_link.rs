//! Build a signed checkout link for a sample order
//!
//! Reads `FILTIMPAY_*` variables when `FILTIMPAY_PROJECT_ID` is set, otherwise
//! uses demo credentials.

use filtimpay::{BillingDetails, GatewayConfig, Order, Result};
use rust_decimal::Decimal;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    let client = config.client()?;

    let order = Order::new(100, Decimal::new(1999, 2), "RUR").with_billing(BillingDetails {
        first_name: "Ivan".to_string(),
        last_name: "Petrov".to_string(),
        email: "ivan@example.com".to_string(),
        city: "Moscow".to_string(),
        country: "RU".to_string(),
        ..Default::default()
    });
    let request =
        config.checkout_request(&order, "https://shop.example.com/checkout/order-received/100");

    println!("Checkout link ({:?}):", config.signature_scheme);
    println!("  {}", client.build_link(&request)?);

    let form = client.build_form_payload(&request)?;
    println!("\nForm payload:");
    println!("{}", serde_json::to_string_pretty(&form)?);

    let params = client.verify(&form.data, &form.signature)?;
    println!("\nDecoded params:");
    println!("{}", serde_json::to_string_pretty(&params)?);

    Ok(())
}

fn load_config() -> Result<GatewayConfig> {
    if std::env::var("FILTIMPAY_PROJECT_ID").is_ok() {
        GatewayConfig::from_env()
    } else {
        Ok(GatewayConfig::new("demo-project", "demo-token"))
    }
}
