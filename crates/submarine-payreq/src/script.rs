//! Submarine swap scripts and deposit addresses
//!
//! The deposit script pays the broker once the Lightning preimage is revealed
//! and lets the user reclaim the deposit after a timelock:
//!
//! ```text
//! OP_HASH160 <ripemd160(payment_hash)> OP_EQUAL
//! OP_IF
//!     <broker key>
//! OP_ELSE
//!     <locktime> OP_CHECKLOCKTIMEVERIFY OP_DROP
//!     <user key>
//! OP_ENDIF
//! OP_CHECKSIG
//! ```

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;

use crate::currency::Currency;
use crate::error::{PayReqError, Result};
use crate::invoice::PayReq;

pub const OP_0: u8 = 0x00;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_IF: u8 = 0x63;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_DROP: u8 = 0x75;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;

const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;

/// Compressed secp256k1 public key
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; 33]);

impl PublicKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; 33] = bytes
            .try_into()
            .map_err(|_| PayReqError::InvalidPublicKey(format!("expected 33 bytes, got {}", bytes.len())))?;
        if key[0] != 0x02 && key[0] != 0x03 {
            return Err(PayReqError::InvalidPublicKey(format!(
                "unsupported prefix {:#04x}",
                key[0]
            )));
        }
        Ok(Self(key))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| PayReqError::InvalidPublicKey(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn serialize(&self) -> [u8; 33] {
        self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

/// Minimal script builder covering the opcodes used by swap scripts
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn op(mut self, op: u8) -> Self {
        self.script.push(op);
        self
    }

    pub fn data(mut self, data: &[u8]) -> Self {
        match data.len() {
            n if n < OP_PUSHDATA1 as usize => self.script.push(n as u8),
            n if n <= 0xff => {
                self.script.push(OP_PUSHDATA1);
                self.script.push(n as u8);
            }
            n => {
                self.script.push(OP_PUSHDATA2);
                self.script.extend_from_slice(&(n as u16).to_le_bytes());
            }
        }
        self.script.extend_from_slice(data);
        self
    }

    /// Push an integer using the small-int opcodes where possible
    pub fn int(self, n: i64) -> Self {
        match n {
            0 => self.op(OP_0),
            -1 => self.op(OP_1NEGATE),
            1..=16 => self.op(OP_1 + (n as u8 - 1)),
            _ => self.data(&script_num(n)),
        }
    }

    pub fn build(self) -> Vec<u8> {
        self.script
    }
}

/// Minimal little-endian script number encoding with a sign bit
fn script_num(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

fn submarine_script_from_hash(
    payment_hash: &[u8],
    broker: &PublicKey,
    user: &PublicKey,
    locktime: i64,
) -> Result<Vec<u8>> {
    if payment_hash.len() != 20 {
        return Err(PayReqError::PaymentHashLength);
    }

    Ok(ScriptBuilder::new()
        .op(OP_HASH160)
        .data(payment_hash)
        .op(OP_EQUAL)
        .op(OP_IF)
        .data(&broker.serialize())
        .op(OP_ELSE)
        .int(locktime)
        .op(OP_CHECKLOCKTIMEVERIFY)
        .op(OP_DROP)
        .data(&user.serialize())
        .op(OP_ENDIF)
        .op(OP_CHECKSIG)
        .build())
}

/// Build the swap script for an invoice. The deposit stays locked until
/// `expires` after the invoice itself expires.
pub fn swap_script(
    payreq: &PayReq,
    expires: Duration,
    broker: &PublicKey,
    user: &PublicKey,
) -> Result<Vec<u8>> {
    let locktime = payreq
        .expires_at()
        .and_then(|at| at.checked_add_signed(chrono::Duration::from_std(expires).ok()?))
        .ok_or(PayReqError::Expired)?;

    let hash = ripemd160(&payreq.payment_hash);
    submarine_script_from_hash(&hash, broker, user, locktime.timestamp())
}

/// Version 0 witness program for a script: `OP_0 <sha256(script)>`
pub fn witness_program(script: &[u8]) -> Vec<u8> {
    ScriptBuilder::new().op(OP_0).data(&sha256(script)).build()
}

/// Base58check P2SH address for a script
pub fn p2sh_address(currency: &Currency, script: &[u8]) -> String {
    base58check_encode(currency.script_hash_addr_id, &hash160(script))
}

/// P2SH-nested P2WSH address for a script
pub fn p2sh_p2wsh_address(currency: &Currency, script: &[u8]) -> String {
    p2sh_address(currency, &witness_program(script))
}

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

pub fn base58_encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();

    // base-58 digits, least significant first
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in &data[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(digits.iter().rev().map(|&d| BASE58_ALPHABET[d as usize] as char));
    out
}

pub fn base58check_encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + 4);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = sha256(&sha256(&data));
    data.extend_from_slice(&checksum[..4]);
    base58_encode(&data)
}
