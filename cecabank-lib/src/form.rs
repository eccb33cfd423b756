//! Typed payment and refund requests, and their assembly into ordered,
//! signed field sets.
//!
//! Each build returns a fresh [`FieldSet`]; nothing is retained between
//! calls, so assemblies never contaminate each other.

use crate::amount::normalize_amount;
use crate::config::Config;
use crate::fields::{self, FieldSet};
use crate::signature::{hash_with_secret, sign_fields};
use crate::Result;

/// Marker value forced into `Pago_elegido` when card data is present.
const CARD_PRESENT_PAYMENT: &str = "SSL";

const MERCHANT_ID_WIDTH: usize = 9;
const ACQUIRER_BIN_WIDTH: usize = 10;
const TERMINAL_ID_WIDTH: usize = 8;

/// Card data for a card-present payment request.
///
/// When supplied, the assembler copies the three values through and forces
/// the chosen-payment marker.
#[derive(Debug, Clone)]
pub struct CardData {
    /// Primary account number.
    pub pan: String,
    /// Expiry in the gateway's `YYYYMM` form.
    pub expiry: String,
    /// Card verification value.
    pub cvv2: String,
}

/// Caller-supplied inputs for a browser-redirected payment.
///
/// Configuration supplies the identifiers and defaults; the request can
/// override currency, exponent, algorithm name, supported payment, version
/// tag and language per operation. The amount is accepted in human form and
/// normalized by the assembler (see [`normalize_amount`]).
#[derive(Debug, Clone, Default)]
pub struct PaymentRequest {
    /// Merchant order number.
    pub order_number: String,
    /// Human-form amount, e.g. `"25.99"`.
    pub amount: String,
    /// Redirect URL on success.
    pub url_ok: String,
    /// Redirect URL on failure.
    pub url_nok: String,
    /// Free-text description shown by the gateway.
    pub description: Option<String>,
    /// Operation type.
    pub operation_type: Option<String>,
    /// Operation data.
    pub operation_data: Option<String>,
    /// Auxiliary 3-D Secure 2.0 payload; signed separately.
    pub acs_data: String,
    /// Card data for card-present operations.
    pub card: Option<CardData>,
    /// Override of the configured currency code.
    pub currency: Option<String>,
    /// Override of the configured exponent.
    pub exponent: Option<String>,
    /// Override of the signed algorithm name. Digest selection still follows
    /// the configured name.
    pub cipher: Option<String>,
    /// Override of the supported payment marker.
    pub supported_payment: Option<String>,
    /// Override of the version tag.
    pub version_tag: Option<String>,
    /// Override of the gateway UI language.
    pub language: Option<String>,
}

/// Caller-supplied inputs for a refund (anulación) of a completed
/// transaction.
#[derive(Debug, Clone, Default)]
pub struct RefundRequest {
    /// Order number of the original payment.
    pub order_number: String,
    /// Human-form amount to reverse.
    pub amount: String,
    /// Gateway-assigned reference of the original transaction.
    pub reference: String,
    /// Partial-refund marker (`TIPO_ANU`); only sent when non-empty.
    pub refund_type: Option<String>,
    /// Override of the configured currency code.
    pub currency: Option<String>,
    /// Override of the configured exponent.
    pub exponent: Option<String>,
    /// Override of the signed algorithm name.
    pub cipher: Option<String>,
    /// Override of the gateway UI language.
    pub language: Option<String>,
}

/// Assemble the ordered hidden-field set for a payment request.
pub(crate) fn build_payment_fields(
    config: &Config,
    request: &PaymentRequest,
) -> Result<FieldSet> {
    let amount = normalize_amount(&request.amount)?;
    let mut set = FieldSet::new();

    set.insert(fields::MERCHANT_ID, config.merchant_id());
    set.insert(fields::ACQUIRER_BIN, config.acquirer_bin());
    set.insert(fields::TERMINAL_ID, config.terminal_id());
    set.insert(fields::CURRENCY, pick(&request.currency, config.currency()));
    set.insert(fields::EXPONENT, pick(&request.exponent, config.exponent()));
    set.insert(fields::CIPHER, pick(&request.cipher, config.cipher()));
    set.insert(
        fields::SUPPORTED_PAYMENT,
        pick(&request.supported_payment, config.supported_payment()),
    );
    set.insert(
        fields::VERSION_TAG,
        pick(&request.version_tag, config.version_tag()),
    );
    set.insert(fields::LANGUAGE, pick(&request.language, config.language()));

    set.insert(fields::ORDER_NUMBER, request.order_number.as_str());
    set.insert(fields::AMOUNT, amount);
    set.insert(fields::URL_OK, request.url_ok.as_str());
    set.insert(fields::URL_NOK, request.url_nok.as_str());
    if let Some(description) = &request.description {
        set.insert(fields::DESCRIPTION, description.as_str());
    }
    if let Some(operation_type) = &request.operation_type {
        set.insert(fields::OPERATION_TYPE, operation_type.as_str());
    }
    if let Some(operation_data) = &request.operation_data {
        set.insert(fields::OPERATION_DATA, operation_data.as_str());
    }
    set.insert(fields::ACS_DATA, request.acs_data.as_str());

    if let Some(card) = &request.card {
        if !card.pan.is_empty() {
            set.insert(fields::PAN, card.pan.as_str());
            set.insert(fields::EXPIRY, card.expiry.as_str());
            set.insert(fields::CVV2, card.cvv2.as_str());
            set.insert(fields::CHOSEN_PAYMENT, CARD_PRESENT_PAYMENT);
        }
    }

    pad_identifiers(&mut set);

    let signature = sign_fields(
        config.secret_key(),
        &set,
        &fields::PAYMENT_SIGNATURE_ORDER,
        config.cipher(),
        true,
    )?;
    // The auxiliary signature covers the raw ACS payload alone and never
    // unescapes.
    let acs_signature =
        hash_with_secret(config.secret_key(), &request.acs_data, config.cipher(), false);

    set.insert(fields::SIGNATURE, signature);
    set.insert(fields::ACS_SIGNATURE, acs_signature);

    Ok(set)
}

/// Assemble the ordered field set POSTed to the refund endpoint.
pub(crate) fn build_refund_fields(config: &Config, request: &RefundRequest) -> Result<FieldSet> {
    let amount = normalize_amount(&request.amount)?;
    let mut set = FieldSet::new();

    set.insert(fields::MERCHANT_ID, config.merchant_id());
    set.insert(fields::ACQUIRER_BIN, config.acquirer_bin());
    set.insert(fields::TERMINAL_ID, config.terminal_id());
    set.insert(fields::CURRENCY, pick(&request.currency, config.currency()));
    set.insert(fields::EXPONENT, pick(&request.exponent, config.exponent()));
    set.insert(fields::CIPHER, pick(&request.cipher, config.cipher()));
    set.insert(fields::LANGUAGE, pick(&request.language, config.language()));

    set.insert(fields::ORDER_NUMBER, request.order_number.as_str());
    set.insert(fields::AMOUNT, amount);
    set.insert(fields::REFERENCE, request.reference.as_str());

    if let Some(refund_type) = &request.refund_type {
        if !refund_type.is_empty() {
            set.insert(fields::REFUND_TYPE, refund_type.as_str());
        }
    }

    pad_identifiers(&mut set);

    let signature = sign_fields(
        config.secret_key(),
        &set,
        &fields::REFUND_SIGNATURE_ORDER,
        config.cipher(),
        true,
    )?;
    set.insert(fields::SIGNATURE, signature);

    Ok(set)
}

fn pick(override_value: &Option<String>, default: &str) -> String {
    match override_value {
        Some(value) => value.clone(),
        None => default.to_string(),
    }
}

/// Zero-pad the merchant, acquirer and terminal identifiers to their fixed
/// widths. Values already at or beyond the width pass through unchanged.
fn pad_identifiers(set: &mut FieldSet) {
    pad(set, fields::MERCHANT_ID, MERCHANT_ID_WIDTH);
    pad(set, fields::ACQUIRER_BIN, ACQUIRER_BIN_WIDTH);
    pad(set, fields::TERMINAL_ID, TERMINAL_ID_WIDTH);
}

fn pad(set: &mut FieldSet, name: &'static str, width: usize) {
    if let Some(value) = set.get(name) {
        let padded = format!("{value:0>width$}");
        set.insert(name, padded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigParams;
    use crate::errors::CecabankError;

    fn test_config() -> Config {
        Config::new(ConfigParams {
            environment: Some("test".to_string()),
            secret_key: Some("test_secret_key".to_string()),
            merchant_id: Some("123456789".to_string()),
            acquirer_bin: Some("0000000000".to_string()),
            terminal_id: Some("00000001".to_string()),
            ..ConfigParams::default()
        })
        .unwrap()
    }

    fn payment_request() -> PaymentRequest {
        PaymentRequest {
            order_number: "000001".to_string(),
            amount: "10.50".to_string(),
            url_ok: "https://example.com/success".to_string(),
            url_nok: "https://example.com/error".to_string(),
            description: Some("Test payment".to_string()),
            ..PaymentRequest::default()
        }
    }

    #[test]
    fn payment_fields_follow_the_form_layout() {
        let set = build_payment_fields(&test_config(), &payment_request()).unwrap();

        let names: Vec<&str> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "MerchantID",
                "AcquirerBIN",
                "TerminalID",
                "TipoMoneda",
                "Exponente",
                "Cifrado",
                "Pago_soportado",
                "versionMod",
                "Idioma",
                "Num_operacion",
                "Importe",
                "URL_OK",
                "URL_NOK",
                "Descripcion",
                "datos_acs_20",
                "Firma",
                "firma_acs_20",
            ]
        );
        assert_eq!(set.get(fields::AMOUNT), Some("1050"));
        assert_eq!(set.get(fields::VERSION_TAG), Some(""));
    }

    #[test]
    fn payment_signature_matches_known_vector() {
        let set = build_payment_fields(&test_config(), &payment_request()).unwrap();
        assert_eq!(
            set.get(fields::SIGNATURE),
            Some("6db223163383fb1227904b560d6bb122d7eee1a2")
        );
        // ACS payload is empty here, so its digest covers the secret alone.
        assert_eq!(
            set.get(fields::ACS_SIGNATURE),
            Some("233243ef95e736679cb1d5664a4c71ba89c10664")
        );
    }

    #[test]
    fn identifiers_are_zero_padded_before_signing() {
        let config = Config::new(ConfigParams {
            environment: Some("test".to_string()),
            secret_key: Some("test_secret_key".to_string()),
            merchant_id: Some("42".to_string()),
            acquirer_bin: Some("77".to_string()),
            terminal_id: Some("1".to_string()),
            ..ConfigParams::default()
        })
        .unwrap();

        let set = build_payment_fields(&config, &payment_request()).unwrap();
        assert_eq!(set.get(fields::MERCHANT_ID), Some("000000042"));
        assert_eq!(set.get(fields::ACQUIRER_BIN), Some("0000000077"));
        assert_eq!(set.get(fields::TERMINAL_ID), Some("00000001"));
    }

    #[test]
    fn nine_digit_merchant_id_is_unchanged() {
        let set = build_payment_fields(&test_config(), &payment_request()).unwrap();
        assert_eq!(set.get(fields::MERCHANT_ID), Some("123456789"));
    }

    #[test]
    fn card_data_adds_the_card_fields_and_marker() {
        let mut request = payment_request();
        request.card = Some(CardData {
            pan: "4507670001000009".to_string(),
            expiry: "203012".to_string(),
            cvv2: "989".to_string(),
        });

        let set = build_payment_fields(&test_config(), &request).unwrap();
        assert_eq!(set.get(fields::PAN), Some("4507670001000009"));
        assert_eq!(set.get(fields::EXPIRY), Some("203012"));
        assert_eq!(set.get(fields::CVV2), Some("989"));
        assert_eq!(set.get(fields::CHOSEN_PAYMENT), Some("SSL"));

        let without_card = build_payment_fields(&test_config(), &payment_request()).unwrap();
        assert_eq!(without_card.get(fields::PAN), None);
        assert_eq!(without_card.get(fields::CHOSEN_PAYMENT), None);
    }

    #[test]
    fn request_overrides_beat_config_defaults() {
        let mut request = payment_request();
        request.currency = Some("840".to_string());
        request.language = Some("6".to_string());

        let set = build_payment_fields(&test_config(), &request).unwrap();
        assert_eq!(set.get(fields::CURRENCY), Some("840"));
        assert_eq!(set.get(fields::LANGUAGE), Some("6"));
        assert_eq!(set.get(fields::EXPONENT), Some("2"));
    }

    #[test]
    fn builds_are_isolated_from_each_other() {
        let config = test_config();
        let mut first_request = payment_request();
        first_request.order_number = "000009".to_string();
        first_request.card = Some(CardData {
            pan: "4507670001000009".to_string(),
            expiry: "203012".to_string(),
            cvv2: "989".to_string(),
        });
        first_request.operation_data = Some("lease-1".to_string());

        let first = build_payment_fields(&config, &first_request).unwrap();
        let second = build_payment_fields(&config, &payment_request()).unwrap();

        // Nothing from the first build leaks into the second.
        assert_eq!(second.get(fields::PAN), None);
        assert_eq!(second.get(fields::OPERATION_DATA), None);
        assert_eq!(second.get(fields::ORDER_NUMBER), Some("000001"));
        assert_ne!(
            first.get(fields::SIGNATURE),
            second.get(fields::SIGNATURE)
        );
    }

    #[test]
    fn refund_fields_follow_the_post_layout() {
        let request = RefundRequest {
            order_number: "000001".to_string(),
            amount: "10.50".to_string(),
            reference: "123456789012".to_string(),
            ..RefundRequest::default()
        };
        let set = build_refund_fields(&test_config(), &request).unwrap();

        let names: Vec<&str> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "MerchantID",
                "AcquirerBIN",
                "TerminalID",
                "TipoMoneda",
                "Exponente",
                "Cifrado",
                "Idioma",
                "Num_operacion",
                "Importe",
                "Referencia",
                "Firma",
            ]
        );
        assert_eq!(
            set.get(fields::SIGNATURE),
            Some("936b965ec24a2fa0fb43e4320701db02e623a296")
        );
    }

    #[test]
    fn partial_refund_marker_is_sent_only_when_non_empty() {
        let mut request = RefundRequest {
            order_number: "000001".to_string(),
            amount: "10.50".to_string(),
            reference: "123456789012".to_string(),
            refund_type: Some("P".to_string()),
            ..RefundRequest::default()
        };
        let set = build_refund_fields(&test_config(), &request).unwrap();
        assert_eq!(set.get(fields::REFUND_TYPE), Some("P"));

        request.refund_type = Some(String::new());
        let set = build_refund_fields(&test_config(), &request).unwrap();
        assert_eq!(set.get(fields::REFUND_TYPE), None);
    }

    #[test]
    fn malformed_amount_propagates_from_the_normalizer() {
        let mut request = payment_request();
        request.amount = "not-a-number".to_string();
        let err = build_payment_fields(&test_config(), &request).unwrap_err();
        assert!(matches!(err, CecabankError::InvalidAmount { .. }));
    }
}
