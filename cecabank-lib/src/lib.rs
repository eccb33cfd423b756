//! Cecabank TPV gateway client.
//!
//! Protocol client for the bank-hosted payment gateway: assembles outbound,
//! browser-redirected payment requests, verifies inbound asynchronous
//! payment notifications, and issues direct refund (anulación) requests.
//! The wire format is a fixed set of named form fields authenticated by a
//! keyed digest over an ordered subset of the values; reproducing that
//! format bit-exactly is the whole point of this crate.
//!
//! # Flows
//!
//! - **Payment**: [`Client::build_payment_form`] produces the signed,
//!   ordered hidden-field set to POST from the shopper's browser to
//!   [`Client::payment_url`].
//! - **Notification**: [`Client::verify_notification`] recomputes the digest
//!   over an inbound [`Notification`] and compares it to the supplied one.
//! - **Refund**: [`Client::refund`] POSTs a signed refund request to the
//!   refund endpoint and reports the gateway's verdict as a
//!   [`RefundOutcome`].
//!
//! Orders, persistence, retries and emails are the calling application's
//! business, not this crate's.

pub mod amount;
pub mod client;
pub mod config;
pub mod errors;
pub mod fields;
pub mod form;
pub mod notification;
pub mod signature;
mod transport;

pub use amount::normalize_amount;
pub use client::Client;
pub use config::{currency_code, Config, ConfigParams};
pub use errors::CecabankError;
pub use fields::FieldSet;
pub use form::{CardData, PaymentRequest, RefundRequest};
pub use notification::Notification;
pub use transport::RefundOutcome;

/// Common result alias for gateway operations.
pub type Result<T> = std::result::Result<T, CecabankError>;
