//! Refund transport: a single synchronous POST to the refund endpoint and
//! the interpretation of its XML result.

use crate::errors::CecabankError;
use crate::fields::FieldSet;
use crate::Result;

/// Result of a refund request that reached the gateway.
///
/// "Could not be sent" and "answered with something unreadable" are *errors*
/// ([`CecabankError::Transport`] and [`CecabankError::InvalidResponse`]), so
/// callers can tell a declined refund from one that never happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefundOutcome {
    /// The gateway confirmed the reversal (`valor="OK"`).
    Accepted,
    /// The gateway answered with a non-`OK` result code.
    Declined {
        /// The literal `valor` attribute value.
        code: String,
    },
}

impl RefundOutcome {
    /// True when the gateway confirmed the reversal.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// POST the assembled refund fields to `url` and interpret the response.
///
/// One attempt, no retries; the caller decides whether to try again. No
/// timeout is imposed here; configure one on the HTTP client.
pub(crate) async fn submit_refund(
    http: &reqwest::Client,
    url: &str,
    refund_fields: &FieldSet,
) -> Result<RefundOutcome> {
    let body = serde_urlencoded::to_string(refund_fields)
        .map_err(|err| CecabankError::Transport(err.to_string()))?;

    let response = http
        .post(url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .map_err(|err| CecabankError::Transport(err.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| CecabankError::Transport(err.to_string()))?;

    if !status.is_success() {
        return Err(CecabankError::Transport(format!(
            "refund endpoint answered {status}"
        )));
    }

    parse_refund_response(&text)
}

/// Read the `valor` attribute off the response's root element.
pub(crate) fn parse_refund_response(body: &str) -> Result<RefundOutcome> {
    let document = roxmltree::Document::parse(body)
        .map_err(|err| CecabankError::InvalidResponse(err.to_string()))?;

    match document.root_element().attribute("valor") {
        Some("OK") => Ok(RefundOutcome::Accepted),
        Some(code) => Ok(RefundOutcome::Declined {
            code: code.to_string(),
        }),
        None => Err(CecabankError::InvalidResponse(
            "missing \"valor\" attribute".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_value_is_accepted() {
        let outcome = parse_refund_response(r#"<ANULACION valor="OK"/>"#).unwrap();
        assert!(outcome.is_accepted());
    }

    #[test]
    fn other_values_are_declined_with_the_code() {
        let outcome = parse_refund_response(r#"<ANULACION valor="KO"/>"#).unwrap();
        assert_eq!(
            outcome,
            RefundOutcome::Declined {
                code: "KO".to_string()
            }
        );
        // The comparison is case-sensitive.
        let outcome = parse_refund_response(r#"<ANULACION valor="ok"/>"#).unwrap();
        assert!(!outcome.is_accepted());
    }

    #[test]
    fn unparseable_documents_are_errors() {
        let err = parse_refund_response("not xml at all").unwrap_err();
        assert!(matches!(err, CecabankError::InvalidResponse(_)));
    }

    #[test]
    fn missing_valor_attribute_is_an_error() {
        let err = parse_refund_response(r#"<ANULACION estado="OK"/>"#).unwrap_err();
        assert!(matches!(err, CecabankError::InvalidResponse(_)));
    }
}
