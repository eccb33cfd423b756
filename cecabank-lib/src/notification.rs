//! Inbound payment notifications and their signature verification.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::CecabankError;
use crate::fields;
use crate::signature::hash_with_secret;
use crate::Result;

/// Asynchronous payment notification POSTed by the gateway.
///
/// Field names map to the wire parameters; the struct deserializes directly
/// from the notification's urlencoded body via [`Notification::from_urlencoded`].
/// The notification is read-only input to verification and is never
/// mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    #[serde(rename = "MerchantID")]
    pub merchant_id: String,
    #[serde(rename = "AcquirerBIN")]
    pub acquirer_bin: String,
    #[serde(rename = "TerminalID")]
    pub terminal_id: String,
    #[serde(rename = "Num_operacion")]
    pub order_number: String,
    #[serde(rename = "Importe")]
    pub amount: String,
    #[serde(rename = "TipoMoneda")]
    pub currency: String,
    #[serde(rename = "Exponente")]
    pub exponent: String,
    #[serde(rename = "Referencia")]
    pub reference: String,
    /// Keyed digest supplied by the gateway.
    #[serde(rename = "Firma")]
    pub signature: String,
    /// Free-text description echoed back by the gateway; carries the
    /// success token on approved payments. Not part of the signed fields.
    #[serde(rename = "Descripcion")]
    pub description: String,
}

impl Notification {
    /// Parse a notification from the raw urlencoded POST body.
    pub fn from_urlencoded(body: &str) -> Result<Self> {
        serde_urlencoded::from_str(body)
            .map_err(|err| CecabankError::MalformedNotification(err.to_string()))
    }

    fn value(&self, field: &str) -> &str {
        match field {
            fields::MERCHANT_ID => &self.merchant_id,
            fields::ACQUIRER_BIN => &self.acquirer_bin,
            fields::TERMINAL_ID => &self.terminal_id,
            fields::ORDER_NUMBER => &self.order_number,
            fields::AMOUNT => &self.amount,
            fields::CURRENCY => &self.currency,
            fields::EXPONENT => &self.exponent,
            fields::REFERENCE => &self.reference,
            _ => "",
        }
    }

    fn is_empty(&self) -> bool {
        fields::VERIFICATION_SIGNATURE_ORDER
            .iter()
            .all(|field| self.value(field).is_empty())
            && self.signature.is_empty()
    }
}

/// Recompute the expected digest over the verification field order and
/// compare it to the supplied signature.
///
/// Fails with [`CecabankError::EmptyNotification`] when there is nothing to
/// verify, with [`CecabankError::MissingNotificationField`] naming the first
/// empty verification field, and with [`CecabankError::SignatureMismatch`]
/// carrying both digests when they differ. Returns the verified signature.
pub(crate) fn verify(config: &Config, notification: &Notification) -> Result<String> {
    if notification.is_empty() || notification.signature.is_empty() {
        return Err(CecabankError::EmptyNotification);
    }

    let mut message = String::new();
    for &field in &fields::VERIFICATION_SIGNATURE_ORDER {
        let value = notification.value(field);
        if value.is_empty() {
            return Err(CecabankError::MissingNotificationField { field });
        }
        message.push_str(value);
    }

    let computed = hash_with_secret(config.secret_key(), &message, config.cipher(), true);
    if computed != notification.signature {
        return Err(CecabankError::SignatureMismatch {
            computed,
            supplied: notification.signature.clone(),
        });
    }

    Ok(notification.signature.clone())
}
