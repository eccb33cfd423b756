//! Keyed-digest engine authenticating requests and notifications.
//!
//! A signature is the hex digest of the shared secret concatenated with the
//! values of a fixed field order (see [`crate::fields`]). Two requests with
//! identical inputs must yield identical signatures, and changing any signed
//! field must change the result; nothing here is random or stateful.

use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::errors::CecabankError;
use crate::fields::FieldSet;
use crate::Result;

/// Algorithm name selecting the legacy 160-bit digest.
pub const CIPHER_SHA1: &str = "SHA1";
/// Algorithm name selecting the 256-bit digest. The match is exact and
/// case-sensitive; any other value falls back to the legacy digest.
pub const CIPHER_SHA2: &str = "SHA2";

/// Compute the keyed digest over `order`, reading values from `fields`.
///
/// The secret is prepended to the concatenated values before hashing. A
/// field listed in `order` but absent from `fields` fails with
/// [`CecabankError::MissingSignatureField`] naming it. `cipher` selects the
/// digest (see [`CIPHER_SHA2`]); `unescape` applies the HTML-entity
/// correction described at [`hash_with_secret`].
pub fn sign_fields(
    secret: &str,
    fields: &FieldSet,
    order: &[&'static str],
    cipher: &str,
    unescape: bool,
) -> Result<String> {
    let mut message = String::new();

    for &field in order {
        let value = fields
            .get(field)
            .ok_or(CecabankError::MissingSignatureField { field })?;
        message.push_str(value);
    }

    Ok(hash_with_secret(secret, &message, cipher, unescape))
}

/// Hash `secret + message` with the digest selected by `cipher`.
///
/// Under the modern digest, `unescape` first replaces the HTML-entity form
/// `&amp;` with a literal `&` and removes stray `#038;` fragments from the
/// whole message, secret included. Field values pass through HTML rendering
/// before the gateway re-signs them, and this undoes that re-encoding; the
/// auxiliary 3-D Secure signature is the one digest computed without it.
pub(crate) fn hash_with_secret(
    secret: &str,
    message: &str,
    cipher: &str,
    unescape: bool,
) -> String {
    let mut payload = format!("{secret}{message}");

    if cipher == CIPHER_SHA2 {
        if unescape {
            payload = payload.replace("&amp;", "&").replace("#038;", "");
        }
        return hex::encode(Sha256::digest(payload.as_bytes()));
    }

    hex::encode(Sha1::digest(payload.as_bytes()))
}
