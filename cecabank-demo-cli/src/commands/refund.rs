//! Refund command - submit an anulación to the gateway

use anyhow::Result;
use cecabank_lib::{Client, RefundOutcome, RefundRequest};

pub async fn run(
    client: &Client,
    order: String,
    amount: String,
    reference: String,
    partial: bool,
) -> Result<()> {
    let request = RefundRequest {
        order_number: order,
        amount,
        reference,
        refund_type: partial.then(|| "P".to_string()),
        ..RefundRequest::default()
    };

    tracing::debug!("posting refund to {}", client.refund_url());
    match client.refund(&request).await? {
        RefundOutcome::Accepted => println!("refund accepted"),
        RefundOutcome::Declined { code } => println!("refund declined by the gateway ({code})"),
    }

    Ok(())
}
