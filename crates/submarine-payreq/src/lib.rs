//! Submarine swap payment requests
//!
//! Everything the swap service needs to turn a Lightning invoice and a
//! deposit currency into an on-chain deposit address:
//! - currency table keyed by bech32 HRP
//! - bech32 and BOLT11 decoding, with payee recovery from the signature
//! - submarine swap scripts and P2SH-P2WSH addresses
//! - combined validation of a swap request

pub mod bech32;
pub mod currency;
pub mod error;
pub mod invoice;
pub mod script;
mod signature;
pub mod swap;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use currency::{currency_from_invoice, Currency, Network, DEPOSIT_PLACEHOLDER};
pub use error::{PayReqError, Result};
pub use invoice::{decode_invoice, decode_invoice_at, PayReq};
pub use script::{p2sh_p2wsh_address, swap_script, PublicKey};
pub use swap::{validate_swap, validate_swap_at, SwapErrors, SwapRequest};
