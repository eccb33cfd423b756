//! Payment Flow Example
//!
//! This example walks the full browser-redirect payment flow offline:
//! - Configure a client for the test environment
//! - Build the signed hidden-field set for the payment form
//! - Verify the asynchronous notification the gateway would POST back
//!
//! # Usage
//!
//! ```bash
//! cargo run --example payment_flow
//! ```

use cecabank_lib::fields::{self, VERIFICATION_SIGNATURE_ORDER};
use cecabank_lib::signature::sign_fields;
use cecabank_lib::{Client, ConfigParams, FieldSet, Notification, PaymentRequest};

fn main() -> cecabank_lib::Result<()> {
    // Credentials are assigned by the bank; these are the documentation
    // placeholders for the test environment.
    let client = Client::new(ConfigParams {
        environment: Some("test".to_string()),
        secret_key: Some("your_secret_key_here".to_string()),
        merchant_id: Some("123456789".to_string()),
        acquirer_bin: Some("0000000000".to_string()),
        terminal_id: Some("00000001".to_string()),
        cipher: Some("SHA2".to_string()),
        ..ConfigParams::default()
    })?;

    // Step 1: assemble the signed form for an order.
    let order_number = "ORDER-0001";
    let form = client.build_payment_form(&PaymentRequest {
        order_number: order_number.to_string(),
        amount: "25.99".to_string(),
        url_ok: "https://shop.example/payment/ok".to_string(),
        url_nok: "https://shop.example/payment/nok".to_string(),
        description: Some(format!("Order #{order_number}")),
        ..PaymentRequest::default()
    })?;

    println!("POST the shopper's browser to: {}", client.payment_url());
    println!("<form method=\"POST\" action=\"{}\">", client.payment_url());
    println!("{}", form.hidden_inputs());
    println!("  <button type=\"submit\">Proceed to payment</button>");
    println!("</form>");

    // Step 2: simulate the notification the gateway sends after the
    // shopper pays. A real integration would parse the POST body with
    // `Notification::from_urlencoded` instead.
    let reference = "101234567890";
    let mut echoed = FieldSet::new();
    for field in VERIFICATION_SIGNATURE_ORDER {
        echoed.insert(field, form.get(field).unwrap_or_default());
    }
    echoed.insert(fields::REFERENCE, reference);
    let signature = sign_fields(
        "your_secret_key_here",
        &echoed,
        &VERIFICATION_SIGNATURE_ORDER,
        "SHA2",
        true,
    )?;

    let notification = Notification {
        merchant_id: form.get(fields::MERCHANT_ID).unwrap_or_default().to_string(),
        acquirer_bin: form.get(fields::ACQUIRER_BIN).unwrap_or_default().to_string(),
        terminal_id: form.get(fields::TERMINAL_ID).unwrap_or_default().to_string(),
        order_number: order_number.to_string(),
        amount: form.get(fields::AMOUNT).unwrap_or_default().to_string(),
        currency: form.get(fields::CURRENCY).unwrap_or_default().to_string(),
        exponent: form.get(fields::EXPONENT).unwrap_or_default().to_string(),
        reference: reference.to_string(),
        signature,
        description: client.success_code().to_string(),
    };

    // Step 3: verify. A signature mismatch here means tampering (or a
    // configuration mismatch with the gateway).
    let verified = client.verify_notification(&notification)?;
    println!();
    println!("notification verified, signature {verified}");

    if notification.description == client.success_code() {
        println!("payment approved for order {order_number}, reference {reference}");
    } else {
        println!("payment declined: {}", notification.description);
    }

    Ok(())
}
