//! Amount normalization into the gateway's minor-unit representation.

use crate::errors::CecabankError;
use crate::Result;

/// Convert a caller-supplied amount into minor-unit integer text.
///
/// The gateway's policy, reproduced exactly:
///
/// - empty or `"0"` input yields `"000"`;
/// - input containing a decimal separator (`.` or `,`) has the separator
///   characters stripped and the remaining digits are returned verbatim, so
///   `"12.50"` becomes `"1250"`, and `"12.5"` becomes `"125"`, not `"1250"`
///   (the gateway assumes two decimal places and this function does not
///   validate or pad them);
/// - input without a separator is multiplied by 100, so `"15"` becomes
///   `"1500"`.
///
/// Separator-free input that is not numeric is rejected with
/// [`CecabankError::InvalidAmount`].
///
/// # Examples
///
/// ```
/// use cecabank_lib::normalize_amount;
///
/// assert_eq!(normalize_amount("12.50").unwrap(), "1250");
/// assert_eq!(normalize_amount("15").unwrap(), "1500");
/// assert_eq!(normalize_amount("").unwrap(), "000");
/// ```
pub fn normalize_amount(value: &str) -> Result<String> {
    if value.is_empty() || value == "0" {
        return Ok("000".to_string());
    }

    if value.contains(['.', ',']) {
        return Ok(value.replace(['.', ','], ""));
    }

    if let Ok(units) = value.parse::<i64>() {
        return Ok(units.saturating_mul(100).to_string());
    }

    // Out-of-range and exponent-notation values still count as numeric.
    if let Ok(real) = value.parse::<f64>() {
        if real.is_finite() {
            return Ok(format!("{}", (real * 100.0).trunc()));
        }
    }

    Err(CecabankError::InvalidAmount {
        value: value.to_string(),
    })
}
