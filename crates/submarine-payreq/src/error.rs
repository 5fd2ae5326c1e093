//! Error types for payment request handling

use thiserror::Error;

/// Reasons a bech32 string was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Bech32Error {
    /// Upper and lower case characters were mixed
    #[error("mixed case")]
    MixedCase,

    /// No `1` separator, or an empty human-readable part
    #[error("missing separator")]
    MissingSeparator,

    /// Data part shorter than the checksum
    #[error("data part too short")]
    TooShort,

    /// Character outside the bech32 alphabet
    #[error("invalid character {0:?}")]
    InvalidChar(char),

    /// Checksum mismatch
    #[error("invalid checksum")]
    InvalidChecksum,

    /// Non-zero or oversized padding while regrouping bits
    #[error("invalid padding")]
    InvalidPadding,
}

/// Structural problems inside a BOLT11 invoice
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvoiceFormatError {
    #[error(transparent)]
    Bech32(#[from] Bech32Error),

    #[error("human-readable part does not match currency {0}")]
    WrongPrefix(String),

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("data part too short")]
    TooShort,

    #[error("timestamp out of range")]
    InvalidTimestamp,

    #[error("tagged field overruns data")]
    TruncatedField,

    #[error("missing payment hash")]
    MissingPaymentHash,

    #[error("missing description or description hash")]
    MissingDescription,

    #[error("description is not valid UTF-8")]
    InvalidDescription,

    /// No payee key can be recovered from the signature
    #[error("invalid signature")]
    InvalidSignature,

    /// The signature was not made by the key in the payee field
    #[error("signature does not match payee field")]
    PayeeMismatch,
}

/// Payment request error type
///
/// The `Display` text of each variant is shown to end users verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayReqError {
    #[error("Lightning invoice is required")]
    InvoiceRequired,

    #[error("Invalid index of 1")]
    InvalidSeparatorIndex,

    #[error("Invoice currency is not supported")]
    UnsupportedCurrency,

    #[error("Problem decoding invoice")]
    Decode(#[source] InvoiceFormatError),

    #[error("Invoice has already expired")]
    Expired,

    #[error("payment hash is of wrong length")]
    PaymentHashLength,

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

impl From<InvoiceFormatError> for PayReqError {
    fn from(err: InvoiceFormatError) -> Self {
        PayReqError::Decode(err)
    }
}

impl From<Bech32Error> for PayReqError {
    fn from(err: Bech32Error) -> Self {
        PayReqError::Decode(err.into())
    }
}

/// Result type for payment request operations
pub type Result<T> = std::result::Result<T, PayReqError>;
