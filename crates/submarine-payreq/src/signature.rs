//! Invoice signatures
//!
//! A BOLT11 invoice ends in a 65-byte compact signature: `r ‖ s` followed by
//! a recovery id. The payee key is not transmitted, it is recovered from the
//! signature over `sha256(hrp ‖ data)`, where `data` is everything between the
//! separator and the signature, regrouped into bytes with zero padding.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use crate::bech32;
use crate::error::InvoiceFormatError;
use crate::script::sha256;

/// Hash the payee signs
pub(crate) fn signing_hash(hrp: &str, body: &[u8]) -> Result<[u8; 32], InvoiceFormatError> {
    let mut message = hrp.as_bytes().to_vec();
    message.extend(bech32::convert_bits(body, 5, 8, true)?);
    Ok(sha256(&message))
}

/// Recover the compressed payee key from the signature groups
pub(crate) fn recover_payee(
    hrp: &str,
    body: &[u8],
    signature: &[u8],
) -> Result<[u8; 33], InvoiceFormatError> {
    let bytes = bech32::convert_bits(signature, 5, 8, false)?;
    if bytes.len() != 65 {
        return Err(InvoiceFormatError::InvalidSignature);
    }

    let sig = Signature::from_slice(&bytes[..64]).map_err(|_| InvoiceFormatError::InvalidSignature)?;
    let recid = RecoveryId::from_byte(bytes[64]).ok_or(InvoiceFormatError::InvalidSignature)?;

    // Flipping s to the low half mirrors R, so the y parity flips with it.
    let (sig, recid) = match sig.normalize_s() {
        Some(low) => (low, RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced())),
        None => (sig, recid),
    };

    let hash = signing_hash(hrp, body)?;
    let key = VerifyingKey::recover_from_prehash(&hash, &sig, recid)
        .map_err(|_| InvoiceFormatError::InvalidSignature)?;

    key.to_encoded_point(true)
        .as_bytes()
        .try_into()
        .map_err(|_| InvoiceFormatError::InvalidSignature)
}

/// Sign an invoice body, returning the 104 signature groups
#[cfg(any(test, feature = "test-util"))]
pub(crate) fn sign(hrp: &str, body: &[u8], key: &k256::ecdsa::SigningKey) -> Vec<u8> {
    let hash = signing_hash(hrp, body).expect("padded regrouping cannot fail");
    let (sig, recid) = key
        .sign_prehash_recoverable(&hash)
        .expect("signing a 32-byte hash cannot fail");

    let mut bytes = sig.to_bytes().to_vec();
    bytes.push(recid.to_byte());
    bech32::convert_bits(&bytes, 8, 5, true).expect("padded regrouping cannot fail")
}
