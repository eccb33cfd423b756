//! Verify command - check a notification signature

use anyhow::Result;
use cecabank_lib::{Client, Notification};

pub fn run(client: &Client, body: &str) -> Result<()> {
    let notification = Notification::from_urlencoded(body)?;
    let signature = client.verify_notification(&notification)?;

    println!("signature valid: {signature}");
    if notification.description == client.success_code() {
        println!(
            "payment approved for order {}, reference {}",
            notification.order_number, notification.reference
        );
    } else {
        println!("payment not approved: {}", notification.description);
    }

    Ok(())
}
