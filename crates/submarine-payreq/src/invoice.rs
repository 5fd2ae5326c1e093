//! BOLT11 Lightning invoice decoding

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::bech32;
use crate::currency::{currency_from_invoice, Currency};
use crate::error::{InvoiceFormatError, PayReqError, Result};
use crate::signature;

/// Number of 5-bit groups in the recoverable signature (65 bytes)
pub(crate) const SIGNATURE_GROUPS: usize = 104;
pub(crate) const TIMESTAMP_GROUPS: usize = 7;

pub(crate) const TAG_PAYMENT_HASH: u8 = 1; // p
pub(crate) const TAG_EXPIRY: u8 = 6; // x
pub(crate) const TAG_DESCRIPTION: u8 = 13; // d
pub(crate) const TAG_PAYEE: u8 = 19; // n
pub(crate) const TAG_DESCRIPTION_HASH: u8 = 23; // h
pub(crate) const TAG_MIN_FINAL_CLTV: u8 = 24; // c

const HASH_GROUPS: usize = 52;
const PUBKEY_GROUPS: usize = 53;

/// Default invoice lifetime when no `x` field is present
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(3600);
pub const DEFAULT_MIN_FINAL_CLTV: u64 = 18;

/// A decoded Lightning payment request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayReq {
    pub invoice: String,
    pub currency: Currency,
    /// Payee node key (compressed, hex), recovered from the signature
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub expiry: Duration,
    pub amount_msat: Option<u64>,
    pub description: Option<String>,
    #[serde(with = "hex_opt")]
    pub description_hash: Option<[u8; 32]>,
    pub min_final_cltv_expiry: u64,
    #[serde(with = "hex_bytes")]
    pub payment_hash: [u8; 32],
}

impl PayReq {
    /// Amount in whole satoshis, rounded down
    pub fn amount_sat(&self) -> Option<u64> {
        self.amount_msat.map(|msat| msat / 1000)
    }

    /// Moment the invoice stops being payable; `None` if it never does
    /// within the representable range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let expiry = chrono::Duration::from_std(self.expiry).ok()?;
        self.created_at.checked_add_signed(expiry)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at(), Some(at) if at <= now)
    }
}

impl fmt::Display for PayReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "currency:     {}", self.currency)?;
        writeln!(f, "payment hash: {}", hex::encode(self.payment_hash))?;
        writeln!(f, "destination:  {}", self.destination)?;
        match self.amount_sat() {
            Some(sat) => writeln!(f, "amount:       {} sat", sat)?,
            None => writeln!(f, "amount:       any")?,
        }
        writeln!(
            f,
            "description:  {}",
            self.description.as_deref().unwrap_or("-")
        )?;
        writeln!(f, "created at:   {}", self.created_at.to_rfc3339())?;
        write!(f, "expiry:       {}s", self.expiry.as_secs())
    }
}

/// Decode a BOLT11 invoice, rejecting it if it has already expired
pub fn decode_invoice(bolt11: &str) -> Result<PayReq> {
    decode_invoice_at(bolt11, Utc::now())
}

/// Decode a BOLT11 invoice against a given clock.
///
/// The payee key is recovered from the signature. An explicit payee field
/// must name the same key.
pub fn decode_invoice_at(bolt11: &str, now: DateTime<Utc>) -> Result<PayReq> {
    let currency = currency_from_invoice(bolt11)?;
    let payreq = parse(bolt11, currency)?;

    if payreq.is_expired(now) {
        return Err(PayReqError::Expired);
    }

    tracing::debug!(
        currency = %payreq.currency,
        amount_msat = ?payreq.amount_msat,
        "decoded invoice"
    );
    Ok(payreq)
}

fn parse(bolt11: &str, currency: Currency) -> std::result::Result<PayReq, InvoiceFormatError> {
    let (hrp, data) = bech32::decode(bolt11)?;

    let prefix = currency.invoice_prefix();
    let amount = hrp
        .strip_prefix(&prefix)
        .ok_or_else(|| InvoiceFormatError::WrongPrefix(currency.hrp.to_string()))?;
    let amount_msat = parse_amount(amount)?;

    if data.len() < TIMESTAMP_GROUPS + SIGNATURE_GROUPS {
        return Err(InvoiceFormatError::TooShort);
    }
    let (body, sig_groups) = data.split_at(data.len() - SIGNATURE_GROUPS);

    let timestamp = groups_to_u64(&body[..TIMESTAMP_GROUPS]);
    let created_at = DateTime::<Utc>::from_timestamp(timestamp as i64, 0)
        .ok_or(InvoiceFormatError::InvalidTimestamp)?;

    let mut payment_hash = None;
    let mut description = None;
    let mut description_hash = None;
    let mut payee_field = None;
    let mut expiry = DEFAULT_EXPIRY;
    let mut min_final_cltv_expiry = DEFAULT_MIN_FINAL_CLTV;

    let mut fields = &body[TIMESTAMP_GROUPS..];
    while !fields.is_empty() {
        if fields.len() < 3 {
            return Err(InvoiceFormatError::TruncatedField);
        }
        let tag = fields[0];
        let len = ((fields[1] as usize) << 5) | fields[2] as usize;
        let rest = &fields[3..];
        if rest.len() < len {
            return Err(InvoiceFormatError::TruncatedField);
        }
        let value = &rest[..len];
        fields = &rest[len..];

        // Known tags with an unexpected length are skipped, as are unknown tags.
        match tag {
            TAG_PAYMENT_HASH if len == HASH_GROUPS && payment_hash.is_none() => {
                payment_hash = Some(groups_to_array(value)?);
            }
            TAG_DESCRIPTION_HASH if len == HASH_GROUPS && description_hash.is_none() => {
                description_hash = Some(groups_to_array(value)?);
            }
            TAG_PAYEE if len == PUBKEY_GROUPS && payee_field.is_none() => {
                payee_field = Some(groups_to_array::<33>(value)?);
            }
            TAG_DESCRIPTION if description.is_none() => {
                let bytes = bech32::convert_bits(value, 5, 8, false)?;
                let text = String::from_utf8(bytes)
                    .map_err(|_| InvoiceFormatError::InvalidDescription)?;
                description = Some(text);
            }
            TAG_EXPIRY if len <= 12 => {
                expiry = Duration::from_secs(groups_to_u64(value));
            }
            TAG_MIN_FINAL_CLTV if len <= 12 => {
                min_final_cltv_expiry = groups_to_u64(value);
            }
            _ => {}
        }
    }

    let payment_hash = payment_hash.ok_or(InvoiceFormatError::MissingPaymentHash)?;
    if description.is_none() && description_hash.is_none() {
        return Err(InvoiceFormatError::MissingDescription);
    }

    let payee = signature::recover_payee(&hrp, body, sig_groups)?;
    if payee_field.is_some_and(|field| field != payee) {
        return Err(InvoiceFormatError::PayeeMismatch);
    }

    Ok(PayReq {
        invoice: bolt11.to_string(),
        currency,
        destination: hex::encode(payee),
        created_at,
        expiry,
        amount_msat,
        description,
        description_hash,
        min_final_cltv_expiry,
        payment_hash,
    })
}

/// Amount in millisatoshi from the part of the HRP after the currency
fn parse_amount(s: &str) -> std::result::Result<Option<u64>, InvoiceFormatError> {
    if s.is_empty() {
        return Ok(None);
    }
    let invalid = || InvoiceFormatError::InvalidAmount(s.to_string());

    let (digits, multiplier) = match s.char_indices().last() {
        Some((i, c)) if !c.is_ascii_digit() => (&s[..i], Some(c)),
        _ => (s, None),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let n: u64 = digits.parse().map_err(|_| invalid())?;

    let msat = match multiplier {
        None => n.checked_mul(100_000_000_000),
        Some('m') => n.checked_mul(100_000_000),
        Some('u') => n.checked_mul(100_000),
        Some('n') => n.checked_mul(100),
        Some('p') if n % 10 == 0 => Some(n / 10),
        _ => None,
    };
    msat.map(Some).ok_or_else(invalid)
}

fn groups_to_u64(groups: &[u8]) -> u64 {
    groups.iter().fold(0u64, |acc, &g| (acc << 5) | g as u64)
}

fn groups_to_array<const N: usize>(groups: &[u8]) -> std::result::Result<[u8; N], InvoiceFormatError> {
    let bytes = bech32::convert_bits(groups, 5, 8, false)?;
    bytes
        .try_into()
        .map_err(|_| InvoiceFormatError::Bech32(crate::error::Bech32Error::InvalidPadding))
}

mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }
}

mod hex_opt {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &Option<[u8; 32]>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => s.serialize_some(&hex::encode(b)),
            None => s.serialize_none(),
        }
    }
}
