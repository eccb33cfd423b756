//! Form command - build the signed payment form

use anyhow::Result;
use cecabank_lib::{Client, PaymentRequest};

pub fn run(
    client: &Client,
    order: String,
    amount: String,
    url_ok: String,
    url_nok: String,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let form = client.build_payment_form(&PaymentRequest {
        order_number: order,
        amount,
        url_ok,
        url_nok,
        description,
        ..PaymentRequest::default()
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&form)?);
    } else {
        println!("<form method=\"POST\" action=\"{}\">", client.payment_url());
        println!("{}", form.hidden_inputs());
        println!("  <button type=\"submit\">Proceed to payment</button>");
        println!("</form>");
    }

    Ok(())
}
