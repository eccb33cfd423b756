//! Gateway configuration: required/optional parameters, environment
//! endpoint tables and the currency code table.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::CecabankError;
use crate::signature::CIPHER_SHA1;
use crate::Result;

/// Name of the gateway's integration environment.
pub const ENVIRONMENT_TEST: &str = "test";
/// Name of the gateway's production environment.
pub const ENVIRONMENT_REAL: &str = "real";

const PAYMENT_ENDPOINTS: [(&str, &str); 2] = [
    (ENVIRONMENT_TEST, "https://tpv.ceca.es/tpvweb/tpv/compra.action"),
    (ENVIRONMENT_REAL, "https://pgw.ceca.es/tpvweb/tpv/compra.action"),
];

const REFUND_ENDPOINTS: [(&str, &str); 2] = [
    (
        ENVIRONMENT_TEST,
        "https://democonsolatpvvirtual.ceca.es/webapp/ConsTpvVirtWeb/ConsTpvVirtS?modo=anularOperacionExt",
    ),
    (
        ENVIRONMENT_REAL,
        "https://comercios.ceca.es/webapp/ConsTpvVirtWeb/ConsTpvVirtS?modo=anularOperacionExt",
    ),
];

/// Map a currency symbol to the gateway's numeric code.
///
/// Unrecognized symbols silently fall back to `978` (EUR); the gateway
/// treats this as a default, not an error.
pub fn currency_code(symbol: &str) -> &'static str {
    match symbol {
        "EUR" => "978",
        "AUD" => "36",
        "CAD" => "124",
        "CNY" => "156",
        "CZK" => "203",
        "DKK" => "208",
        "JPY" => "392",
        "MXN" => "484",
        "NOK" => "578",
        "RUB" => "643",
        "SEK" => "752",
        "CHF" => "756",
        "GBP" => "826",
        "USD" => "840",
        "RON" => "946",
        "PLN" => "985",
        "ARS" => "32",
        "CLP" => "152",
        "COP" => "170",
        "INR" => "356",
        "PEN" => "604",
        "BRL" => "986",
        "VEF" => "937",
        "TRY" => "949",
        _ => "978",
    }
}

/// A configuration patch, keyed by the gateway's wire parameter names when
/// serialized.
///
/// Every field is optional: [`Config::new`] merges a patch over the gateway
/// defaults, [`Config::update`] merges one over the current values. Fields
/// left `None` preserve whatever was set before.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigParams {
    /// Environment name resolved against the endpoint tables.
    #[serde(rename = "Environment", skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Shared secret for the keyed digest.
    #[serde(rename = "ClaveCifrado", skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(rename = "MerchantID", skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(rename = "AcquirerBIN", skip_serializing_if = "Option::is_none")]
    pub acquirer_bin: Option<String>,
    #[serde(rename = "TerminalID", skip_serializing_if = "Option::is_none")]
    pub terminal_id: Option<String>,
    #[serde(rename = "TipoMoneda", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(rename = "Exponente", skip_serializing_if = "Option::is_none")]
    pub exponent: Option<String>,
    /// Digest algorithm name; signed verbatim, compared case-sensitively
    /// against `SHA2` to pick the digest.
    #[serde(rename = "Cifrado", skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,
    #[serde(rename = "Pago_soportado", skip_serializing_if = "Option::is_none")]
    pub supported_payment: Option<String>,
    #[serde(rename = "Idioma", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "versionMod", skip_serializing_if = "Option::is_none")]
    pub version_tag: Option<String>,
    #[serde(rename = "Descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "URL_OK", skip_serializing_if = "Option::is_none")]
    pub url_ok: Option<String>,
    #[serde(rename = "URL_NOK", skip_serializing_if = "Option::is_none")]
    pub url_nok: Option<String>,
    #[serde(rename = "Tipo_operacion", skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(rename = "Datos_operaciones", skip_serializing_if = "Option::is_none")]
    pub operation_data: Option<String>,
    /// Per-instance overrides of the payment endpoint table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environments: Option<IndexMap<String, String>>,
    /// Per-instance overrides of the refund endpoint table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_environments: Option<IndexMap<String, String>>,
}

/// Validated gateway configuration.
///
/// Constructed once per client and amended with merge-style updates; every
/// construction and update re-validates the required parameters and
/// re-resolves the environment endpoints, so a `Config` in hand is always
/// usable for signing.
#[derive(Clone)]
pub struct Config {
    environment: String,
    secret_key: String,
    merchant_id: String,
    acquirer_bin: String,
    terminal_id: String,
    currency: String,
    exponent: String,
    cipher: String,
    supported_payment: String,
    language: String,
    version_tag: String,
    description: Option<String>,
    url_ok: Option<String>,
    url_nok: Option<String>,
    operation_type: Option<String>,
    operation_data: Option<String>,
    environments: IndexMap<String, String>,
    refund_environments: IndexMap<String, String>,
    payment_endpoint: String,
    refund_endpoint: String,
}

impl Config {
    /// Build a configuration from the gateway defaults plus `params`.
    ///
    /// Defaults: `test` environment, terminal `1`, currency `978`, exponent
    /// `2`, cipher `SHA1`, language `1`, supported payment `SSL`, empty
    /// version tag. The secret key, merchant id and acquirer BIN have no
    /// default and must be supplied.
    pub fn new(params: ConfigParams) -> Result<Self> {
        let mut config = Self {
            environment: ENVIRONMENT_TEST.to_string(),
            secret_key: String::new(),
            merchant_id: String::new(),
            acquirer_bin: String::new(),
            terminal_id: "1".to_string(),
            currency: "978".to_string(),
            exponent: "2".to_string(),
            cipher: CIPHER_SHA1.to_string(),
            supported_payment: "SSL".to_string(),
            language: "1".to_string(),
            version_tag: String::new(),
            description: None,
            url_ok: None,
            url_nok: None,
            operation_type: None,
            operation_data: None,
            environments: to_table(&PAYMENT_ENDPOINTS),
            refund_environments: to_table(&REFUND_ENDPOINTS),
            payment_endpoint: String::new(),
            refund_endpoint: String::new(),
        };
        config.update(params)?;
        Ok(config)
    }

    /// Merge `params` over the current values, then re-validate.
    ///
    /// Previously-set values survive unless the patch overrides them.
    pub fn update(&mut self, params: ConfigParams) -> Result<()> {
        let ConfigParams {
            environment,
            secret_key,
            merchant_id,
            acquirer_bin,
            terminal_id,
            currency,
            exponent,
            cipher,
            supported_payment,
            language,
            version_tag,
            description,
            url_ok,
            url_nok,
            operation_type,
            operation_data,
            environments,
            refund_environments,
        } = params;

        merge(&mut self.environment, environment);
        merge(&mut self.secret_key, secret_key);
        merge(&mut self.merchant_id, merchant_id);
        merge(&mut self.acquirer_bin, acquirer_bin);
        merge(&mut self.terminal_id, terminal_id);
        merge(&mut self.currency, currency);
        merge(&mut self.exponent, exponent);
        merge(&mut self.cipher, cipher);
        merge(&mut self.supported_payment, supported_payment);
        merge(&mut self.language, language);
        merge(&mut self.version_tag, version_tag);
        merge_opt(&mut self.description, description);
        merge_opt(&mut self.url_ok, url_ok);
        merge_opt(&mut self.url_nok, url_nok);
        merge_opt(&mut self.operation_type, operation_type);
        merge_opt(&mut self.operation_data, operation_data);

        if let Some(overrides) = environments {
            self.environments.extend(overrides);
        }
        if let Some(overrides) = refund_environments {
            self.refund_environments.extend(overrides);
        }

        self.validate()
    }

    fn validate(&mut self) -> Result<()> {
        for (option, value) in [
            ("Environment", &self.environment),
            ("ClaveCifrado", &self.secret_key),
            ("MerchantID", &self.merchant_id),
            ("AcquirerBIN", &self.acquirer_bin),
            ("TerminalID", &self.terminal_id),
            ("TipoMoneda", &self.currency),
            ("Exponente", &self.exponent),
            ("Cifrado", &self.cipher),
            ("Pago_soportado", &self.supported_payment),
        ] {
            if value.is_empty() {
                return Err(CecabankError::MissingOption { option });
            }
        }

        self.payment_endpoint = resolve(&self.environments, &self.environment).ok_or_else(|| {
            CecabankError::UnknownEnvironment {
                name: self.environment.clone(),
                valid: names(&self.environments),
            }
        })?;
        self.refund_endpoint =
            resolve(&self.refund_environments, &self.environment).ok_or_else(|| {
                CecabankError::UnknownRefundEnvironment {
                    name: self.environment.clone(),
                    valid: names(&self.refund_environments),
                }
            })?;

        Ok(())
    }

    /// Currently selected environment name.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Merchant identifier as configured (unpadded).
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Acquirer identifier as configured (unpadded).
    pub fn acquirer_bin(&self) -> &str {
        &self.acquirer_bin
    }

    /// Terminal identifier as configured (unpadded).
    pub fn terminal_id(&self) -> &str {
        &self.terminal_id
    }

    /// Default numeric currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Default decimal exponent hint.
    pub fn exponent(&self) -> &str {
        &self.exponent
    }

    /// Configured digest algorithm name.
    pub fn cipher(&self) -> &str {
        &self.cipher
    }

    /// Default supported payment method marker.
    pub fn supported_payment(&self) -> &str {
        &self.supported_payment
    }

    /// Default gateway UI language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Default integration version tag; may be empty.
    pub fn version_tag(&self) -> &str {
        &self.version_tag
    }

    /// Stored default order description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Stored success redirect URL, if any.
    pub fn url_ok(&self) -> Option<&str> {
        self.url_ok.as_deref()
    }

    /// Stored failure redirect URL, if any.
    pub fn url_nok(&self) -> Option<&str> {
        self.url_nok.as_deref()
    }

    /// Stored operation type, if any.
    pub fn operation_type(&self) -> Option<&str> {
        self.operation_type.as_deref()
    }

    /// Stored operation data, if any.
    pub fn operation_data(&self) -> Option<&str> {
        self.operation_data.as_deref()
    }

    /// Payment endpoint resolved for the current environment.
    pub fn payment_url(&self) -> &str {
        &self.payment_endpoint
    }

    /// Refund endpoint resolved for the current environment.
    pub fn refund_url(&self) -> &str {
        &self.refund_endpoint
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("secret_key", &"<redacted>")
            .field("merchant_id", &self.merchant_id)
            .field("acquirer_bin", &self.acquirer_bin)
            .field("terminal_id", &self.terminal_id)
            .field("currency", &self.currency)
            .field("cipher", &self.cipher)
            .finish_non_exhaustive()
    }
}

fn merge(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn merge_opt(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = value;
    }
}

fn to_table(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(name, url)| (name.to_string(), url.to_string()))
        .collect()
}

fn resolve(table: &IndexMap<String, String>, name: &str) -> Option<String> {
    table.get(name).filter(|url| !url.is_empty()).cloned()
}

fn names(table: &IndexMap<String, String>) -> String {
    table
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("|")
}
