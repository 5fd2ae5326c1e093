//! Supported currencies and their chain parameters

use serde::Serialize;
use std::fmt;

use crate::error::{PayReqError, Result};

/// First option of the deposit select on the swap page, meaning nothing is
/// chosen yet. It never resolves to a currency.
pub const DEPOSIT_PLACEHOLDER: &str = "Choose Deposit Currency";

/// Chain a currency lives on. Deposits and invoices must share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Simnet,
}

/// A cryptocurrency and the parameters needed to build deposit addresses for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Currency {
    /// Display name
    pub name: &'static str,
    /// Bech32 human-readable part for segwit addresses (BIP 173)
    pub hrp: &'static str,
    pub network: Network,
    /// Version byte for base58 P2SH addresses
    pub script_hash_addr_id: u8,
}

impl Currency {
    pub const BTC: Currency = Currency {
        name: "Bitcoin",
        hrp: "bc",
        network: Network::Mainnet,
        script_hash_addr_id: 0x05, // starts with 3
    };

    pub const BTC_TESTNET: Currency = Currency {
        name: "Bitcoin Testnet",
        hrp: "tb",
        network: Network::Testnet,
        script_hash_addr_id: 0xc4, // starts with 2
    };

    pub const BTC_SIMNET: Currency = Currency {
        name: "Bitcoin Simnet",
        hrp: "sb",
        network: Network::Simnet,
        script_hash_addr_id: 0x7b, // starts with s
    };

    pub const LTC: Currency = Currency {
        name: "Litecoin",
        hrp: "ltc",
        network: Network::Mainnet,
        script_hash_addr_id: 0x32, // starts with M
    };

    pub const LTC_TESTNET: Currency = Currency {
        name: "Litecoin Testnet",
        hrp: "tltc",
        network: Network::Testnet,
        script_hash_addr_id: 0x3a, // starts with Q
    };

    pub const LTC_SIMNET: Currency = Currency {
        name: "Litecoin Simnet",
        hrp: "sltc",
        network: Network::Simnet,
        script_hash_addr_id: 0x7b, // starts with s
    };

    /// All supported currencies, in the order they are offered to users
    pub const ALL: [Currency; 6] = [
        Currency::BTC,
        Currency::BTC_TESTNET,
        Currency::BTC_SIMNET,
        Currency::LTC,
        Currency::LTC_TESTNET,
        Currency::LTC_SIMNET,
    ];

    /// Look up a currency by its bech32 HRP
    pub fn from_hrp(hrp: &str) -> Result<Currency> {
        Self::ALL
            .iter()
            .find(|c| c.hrp == hrp)
            .copied()
            .ok_or(PayReqError::UnsupportedCurrency)
    }

    /// Prefix that follows `ln` in a BOLT11 human-readable part
    pub fn invoice_prefix(&self) -> String {
        format!("ln{}", self.hrp)
    }

    /// Units of `other` per unit of `self`
    pub fn rate_to(&self, other: &Currency) -> Option<f64> {
        if self == other {
            return Some(1.0);
        }
        if self.network != other.network {
            return None;
        }
        match (self.is_litecoin(), other.is_litecoin()) {
            (false, true) => Some(10.0),
            (true, false) => Some(0.1),
            _ => None,
        }
    }

    fn is_litecoin(&self) -> bool {
        self.hrp.ends_with("ltc")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Currency of a BOLT11 invoice, read from its human-readable part without
/// validating the checksum.
pub fn currency_from_invoice(bolt11: &str) -> Result<Currency> {
    Currency::from_hrp(&invoice_currency_prefix(bolt11)?)
}

/// Currency prefix of a BOLT11 invoice: everything after the leading `ln`
/// up to the first `1`, cut at the first digit.
pub fn invoice_currency_prefix(bolt11: &str) -> Result<String> {
    if bolt11.trim().is_empty() {
        return Err(PayReqError::InvoiceRequired);
    }

    let lowered = bolt11.to_ascii_lowercase();
    let one = lowered
        .find('1')
        .ok_or(PayReqError::InvalidSeparatorIndex)?;
    if one < 3 || one + 7 > lowered.len() {
        return Err(PayReqError::InvalidSeparatorIndex);
    }

    let hrp = lowered
        .get(2..one)
        .ok_or(PayReqError::InvalidSeparatorIndex)?;
    let end = hrp
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(hrp.len());

    Ok(hrp[..end].to_string())
}
