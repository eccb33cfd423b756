//! Client façade tying configuration, assembly, signing, verification and
//! the refund transport together.

use crate::config::{currency_code, Config, ConfigParams};
use crate::errors::CecabankError;
use crate::fields::FieldSet;
use crate::form::{self, PaymentRequest, RefundRequest};
use crate::notification::{self, Notification};
use crate::transport::{self, RefundOutcome};
use crate::Result;

/// Token the gateway places in `Descripcion` on an approved payment.
const SUCCESS_CODE: &str = "$*$OKY$*$";

/// Cecabank TPV gateway client.
///
/// Holds a validated [`Config`] and an HTTP client for the refund path.
/// Building forms and verifying notifications are pure operations; only
/// [`Client::refund`] touches the network. The client keeps no per-request
/// state, so a shared instance can serve concurrent flows.
///
/// # Example
///
/// ```no_run
/// use cecabank_lib::{Client, ConfigParams, PaymentRequest};
///
/// # fn main() -> cecabank_lib::Result<()> {
/// let client = Client::new(ConfigParams {
///     environment: Some("test".to_string()),
///     secret_key: Some("your_secret_key".to_string()),
///     merchant_id: Some("123456789".to_string()),
///     acquirer_bin: Some("0000000000".to_string()),
///     terminal_id: Some("00000001".to_string()),
///     cipher: Some("SHA2".to_string()),
///     ..ConfigParams::default()
/// })?;
///
/// let form = client.build_payment_form(&PaymentRequest {
///     order_number: "ORDER-0001".to_string(),
///     amount: "25.99".to_string(),
///     url_ok: "https://shop.example/ok".to_string(),
///     url_nok: "https://shop.example/nok".to_string(),
///     ..PaymentRequest::default()
/// })?;
///
/// println!("<form method=\"POST\" action=\"{}\">", client.payment_url());
/// println!("{}", form.hidden_inputs());
/// println!("</form>");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    config: Config,
    http: reqwest::Client,
}

impl Client {
    /// Library version.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Create a client from a configuration patch over the gateway defaults.
    pub fn new(params: ConfigParams) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| CecabankError::Transport(err.to_string()))?;
        Self::with_http_client(params, http)
    }

    /// Create a client with a caller-built HTTP client.
    ///
    /// The refund call imposes no timeout of its own; build the client with
    /// one where that matters.
    pub fn with_http_client(params: ConfigParams, http: reqwest::Client) -> Result<Self> {
        Ok(Self {
            config: Config::new(params)?,
            http,
        })
    }

    /// Merge a configuration patch over the current values and re-validate.
    pub fn configure(&mut self, params: ConfigParams) -> Result<()> {
        self.config.update(params)
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Payment endpoint for the configured environment.
    pub fn payment_url(&self) -> &str {
        self.config.payment_url()
    }

    /// Refund endpoint for the configured environment.
    pub fn refund_url(&self) -> &str {
        self.config.refund_url()
    }

    /// Numeric gateway code for a currency symbol; unknown symbols fall back
    /// to `978` (EUR).
    pub fn currency_code(&self, symbol: &str) -> &'static str {
        currency_code(symbol)
    }

    /// Token the gateway reports in `Descripcion` for an approved payment.
    pub fn success_code(&self) -> &'static str {
        SUCCESS_CODE
    }

    /// Assemble and sign the hidden-field set for a payment redirect.
    ///
    /// Returns a fresh, immutable [`FieldSet`] per call.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, request), fields(order = %request.order_number))
    )]
    pub fn build_payment_form(&self, request: &PaymentRequest) -> Result<FieldSet> {
        form::build_payment_fields(&self.config, request)
    }

    /// Assemble and sign the field set POSTed to the refund endpoint.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, request), fields(order = %request.order_number))
    )]
    pub fn build_refund_fields(&self, request: &RefundRequest) -> Result<FieldSet> {
        form::build_refund_fields(&self.config, request)
    }

    /// Verify an inbound payment notification; returns the verified
    /// signature.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, notification), fields(order = %notification.order_number))
    )]
    pub fn verify_notification(&self, notification: &Notification) -> Result<String> {
        notification::verify(&self.config, notification)
    }

    /// Request a refund (anulación) of a completed transaction.
    ///
    /// Assembly and signing failures propagate as errors; a request that
    /// reached the gateway resolves to a [`RefundOutcome`]. One attempt, no
    /// retries.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, request), fields(order = %request.order_number))
    )]
    pub async fn refund(&self, request: &RefundRequest) -> Result<RefundOutcome> {
        let refund_fields = form::build_refund_fields(&self.config, request)?;
        transport::submit_refund(&self.http, self.config.refund_url(), &refund_fields).await
    }
}
