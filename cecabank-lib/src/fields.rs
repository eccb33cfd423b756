//! Gateway field names, signature field orders and the ordered field set.
//!
//! The gateway protocol is a fixed set of named form fields authenticated by
//! a keyed digest over an ordered subset of the values. The three orders
//! below are dictated by the gateway and must be reproduced exactly; they are
//! kept as named constants so wire compatibility stays auditable and
//! independently testable.

use indexmap::IndexMap;
use serde::Serialize;

/// Merchant identifier, zero-padded to 9 digits before signing.
pub const MERCHANT_ID: &str = "MerchantID";
/// Acquirer identifier, zero-padded to 10 digits before signing.
pub const ACQUIRER_BIN: &str = "AcquirerBIN";
/// Terminal identifier, zero-padded to 8 digits before signing.
pub const TERMINAL_ID: &str = "TerminalID";
/// Numeric currency code (`978` = EUR).
pub const CURRENCY: &str = "TipoMoneda";
/// Decimal exponent hint for the currency's minor unit.
pub const EXPONENT: &str = "Exponente";
/// Digest algorithm selector (`SHA1` or `SHA2`).
pub const CIPHER: &str = "Cifrado";
/// Supported payment method marker.
pub const SUPPORTED_PAYMENT: &str = "Pago_soportado";
/// Optional integration version tag.
pub const VERSION_TAG: &str = "versionMod";
/// Gateway UI language selector.
pub const LANGUAGE: &str = "Idioma";
/// Merchant order number.
pub const ORDER_NUMBER: &str = "Num_operacion";
/// Amount in minor currency units.
pub const AMOUNT: &str = "Importe";
/// Redirect URL on successful payment.
pub const URL_OK: &str = "URL_OK";
/// Redirect URL on failed payment.
pub const URL_NOK: &str = "URL_NOK";
/// Free-text order description.
pub const DESCRIPTION: &str = "Descripcion";
/// Operation type.
pub const OPERATION_TYPE: &str = "Tipo_operacion";
/// Operation data.
pub const OPERATION_DATA: &str = "Datos_operaciones";
/// Auxiliary 3-D Secure 2.0 payload.
pub const ACS_DATA: &str = "datos_acs_20";
/// Card number.
pub const PAN: &str = "PAN";
/// Card expiry.
pub const EXPIRY: &str = "Caducidad";
/// Card verification value.
pub const CVV2: &str = "CVV2";
/// Chosen payment method marker, forced when card data is present.
pub const CHOSEN_PAYMENT: &str = "Pago_elegido";
/// Keyed digest authenticating a request or notification.
pub const SIGNATURE: &str = "Firma";
/// Keyed digest over the auxiliary 3-D Secure payload.
pub const ACS_SIGNATURE: &str = "firma_acs_20";
/// Gateway-assigned reference of a completed transaction.
pub const REFERENCE: &str = "Referencia";
/// Partial-refund marker.
pub const REFUND_TYPE: &str = "TIPO_ANU";

/// Field order of the primary payment signature.
pub const PAYMENT_SIGNATURE_ORDER: [&str; 10] = [
    MERCHANT_ID,
    ACQUIRER_BIN,
    TERMINAL_ID,
    ORDER_NUMBER,
    AMOUNT,
    CURRENCY,
    EXPONENT,
    CIPHER,
    URL_OK,
    URL_NOK,
];

/// Field order of the refund signature. `Referencia` precedes the algorithm
/// name, unlike the payment order.
pub const REFUND_SIGNATURE_ORDER: [&str; 9] = [
    MERCHANT_ID,
    ACQUIRER_BIN,
    TERMINAL_ID,
    ORDER_NUMBER,
    AMOUNT,
    CURRENCY,
    EXPONENT,
    REFERENCE,
    CIPHER,
];

/// Field order recomputed when verifying an inbound notification. The
/// algorithm name is not part of this list.
pub const VERIFICATION_SIGNATURE_ORDER: [&str; 8] = [
    MERCHANT_ID,
    ACQUIRER_BIN,
    TERMINAL_ID,
    ORDER_NUMBER,
    AMOUNT,
    CURRENCY,
    EXPONENT,
    REFERENCE,
];

/// Insertion-ordered set of wire fields, the result of an assembly operation.
///
/// Produced by [`Client::build_payment_form`](crate::Client::build_payment_form)
/// and [`Client::build_refund_fields`](crate::Client::build_refund_fields);
/// each build returns a fresh set, so nothing leaks between invocations.
/// Serializes as a flat map in insertion order, ready for urlencoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSet {
    fields: IndexMap<&'static str, String>,
}

impl FieldSet {
    /// Create an empty set, e.g. to drive
    /// [`sign_fields`](crate::signature::sign_fields) directly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. An existing name keeps its original position and only
    /// the value is replaced, mirroring the gateway's form layout.
    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.insert(name, value.into());
    }

    #[cfg(test)]
    pub(crate) fn remove(&mut self, name: &str) {
        self.fields.shift_remove(name);
    }

    /// Look up a field value by wire name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// Number of fields in the set.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no assembly output is present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the set as `<input type="hidden" .../>` lines for embedding in
    /// a payment form, one field per line, in insertion order.
    pub fn hidden_inputs(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| {
                format!("<input type=\"hidden\" name=\"{name}\" value=\"{value}\" />")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_first_position_on_overwrite() {
        let mut fields = FieldSet::new();
        fields.insert(CURRENCY, "978");
        fields.insert(ORDER_NUMBER, "000001");
        fields.insert(CURRENCY, "840");

        let names: Vec<&str> = fields.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![CURRENCY, ORDER_NUMBER]);
        assert_eq!(fields.get(CURRENCY), Some("840"));
    }

    #[test]
    fn hidden_inputs_render_one_field_per_line() {
        let mut fields = FieldSet::new();
        fields.insert(ORDER_NUMBER, "000001");
        fields.insert(AMOUNT, "1050");

        assert_eq!(
            fields.hidden_inputs(),
            "<input type=\"hidden\" name=\"Num_operacion\" value=\"000001\" />\n\
             <input type=\"hidden\" name=\"Importe\" value=\"1050\" />"
        );
    }

    #[test]
    fn field_set_serializes_in_insertion_order() {
        let mut fields = FieldSet::new();
        fields.insert(ORDER_NUMBER, "000001");
        fields.insert(AMOUNT, "1050");
        fields.insert(REFERENCE, "123456789012");

        let body = serde_urlencoded::to_string(&fields).unwrap();
        assert_eq!(body, "Num_operacion=000001&Importe=1050&Referencia=123456789012");
    }

    #[test]
    fn signature_orders_match_the_gateway_tables() {
        assert_eq!(
            PAYMENT_SIGNATURE_ORDER.as_slice(),
            &[
                "MerchantID",
                "AcquirerBIN",
                "TerminalID",
                "Num_operacion",
                "Importe",
                "TipoMoneda",
                "Exponente",
                "Cifrado",
                "URL_OK",
                "URL_NOK",
            ]
        );
        assert_eq!(
            REFUND_SIGNATURE_ORDER.as_slice(),
            &[
                "MerchantID",
                "AcquirerBIN",
                "TerminalID",
                "Num_operacion",
                "Importe",
                "TipoMoneda",
                "Exponente",
                "Referencia",
                "Cifrado",
            ]
        );
        // The verification order is the refund order minus the algorithm name.
        assert_eq!(
            VERIFICATION_SIGNATURE_ORDER.as_slice(),
            &REFUND_SIGNATURE_ORDER[..8]
        );
    }
}
