//! Error types for Cecabank gateway operations.
//!
//! Every error carries the offending field, option or environment name so
//! integrators can diagnose a misconfiguration without inspecting internals.

/// Comprehensive error type for Cecabank operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CecabankError {
    /// A required configuration option is missing or empty.
    #[error("option \"{option}\" is required")]
    MissingOption {
        /// Wire name of the option (e.g. `MerchantID`)
        option: &'static str,
    },

    /// The selected environment has no payment endpoint.
    #[error("environment \"{name}\" is not valid [{valid}]")]
    UnknownEnvironment {
        /// Environment name that failed to resolve
        name: String,
        /// `|`-separated list of valid environment names
        valid: String,
    },

    /// The selected environment has no refund endpoint.
    #[error("refund environment \"{name}\" is not valid [{valid}]")]
    UnknownRefundEnvironment {
        /// Environment name that failed to resolve
        name: String,
        /// `|`-separated list of valid environment names
        valid: String,
    },

    /// An amount without a decimal separator could not be read as a number.
    #[error("amount \"{value}\" is not numeric")]
    InvalidAmount {
        /// The rejected input
        value: String,
    },

    /// A field listed in a signature field order is absent from the field set.
    #[error("field \"{field}\" is empty and is required to create signature key")]
    MissingSignatureField {
        /// Wire name of the absent field
        field: &'static str,
    },

    /// An inbound notification carried no data or no signature.
    #[error("notification data is empty")]
    EmptyNotification,

    /// An inbound notification body could not be parsed.
    #[error("malformed notification: {0}")]
    MalformedNotification(String),

    /// A verification field of an inbound notification is empty.
    #[error("field \"{field}\" is empty and is required to verify transaction")]
    MissingNotificationField {
        /// Wire name of the empty field
        field: &'static str,
    },

    /// The recomputed signature differs from the supplied one.
    #[error("signature not valid ({computed} != {supplied})")]
    SignatureMismatch {
        /// Signature recomputed from the notification fields
        computed: String,
        /// Signature supplied by the gateway
        supplied: String,
    },

    /// The refund request could not be sent or the endpoint answered with a
    /// non-success status.
    #[error("refund transport error: {0}")]
    Transport(String),

    /// The refund endpoint answered, but not with a readable result document.
    #[error("malformed refund response: {0}")]
    InvalidResponse(String),
}

impl CecabankError {
    /// Returns true if this error is potentially recoverable by retrying.
    ///
    /// Only transport failures qualify; everything else is a configuration
    /// or protocol problem that a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_offending_field() {
        let err = CecabankError::MissingOption { option: "MerchantID" };
        assert_eq!(err.to_string(), "option \"MerchantID\" is required");

        let err = CecabankError::UnknownEnvironment {
            name: "staging".to_string(),
            valid: "test|real".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "environment \"staging\" is not valid [test|real]"
        );

        let err = CecabankError::MissingSignatureField { field: "URL_OK" };
        assert!(err.to_string().contains("URL_OK"));
    }

    #[test]
    fn mismatch_carries_both_values() {
        let err = CecabankError::SignatureMismatch {
            computed: "aaa".to_string(),
            supplied: "bbb".to_string(),
        };
        assert_eq!(err.to_string(), "signature not valid (aaa != bbb)");
    }

    #[test]
    fn only_transport_errors_are_retryable() {
        assert!(CecabankError::Transport("connection refused".to_string()).is_retryable());
        assert!(!CecabankError::EmptyNotification.is_retryable());
        assert!(!CecabankError::MissingOption { option: "Cifrado" }.is_retryable());
    }
}
