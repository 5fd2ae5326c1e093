//! Bech32 codec (BIP 173) without the 90 character limit
//!
//! BOLT11 invoices reuse the bech32 checksum but are routinely longer than
//! segwit addresses, so no length cap is enforced here.

use crate::error::Bech32Error;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

const CHECKSUM_LEN: usize = 6;

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x1ff_ffff) << 5) ^ v as u32;
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 31));
    out
}

fn create_checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0; CHECKSUM_LEN]);
    let pm = polymod(values) ^ 1;

    let mut out = [0u8; CHECKSUM_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((pm >> (5 * (5 - i))) & 31) as u8;
    }
    out
}

/// Value of a single bech32 character
pub fn char_value(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    CHARSET.iter().position(|&b| b as char == c).map(|p| p as u8)
}

/// Decode a bech32 string into its lowercase human-readable part and
/// 5-bit data groups (checksum removed).
pub fn decode(s: &str) -> Result<(String, Vec<u8>), Bech32Error> {
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(Bech32Error::MixedCase);
    }
    let s = s.to_ascii_lowercase();

    let pos = s.rfind('1').ok_or(Bech32Error::MissingSeparator)?;
    if pos == 0 {
        return Err(Bech32Error::MissingSeparator);
    }
    if pos + 1 + CHECKSUM_LEN > s.len() {
        return Err(Bech32Error::TooShort);
    }

    let (hrp, rest) = s.split_at(pos);
    if let Some(c) = hrp.chars().find(|c| !(33..=126).contains(&(*c as u32))) {
        return Err(Bech32Error::InvalidChar(c));
    }

    let mut data = Vec::with_capacity(rest.len() - 1);
    for c in rest[1..].chars() {
        data.push(char_value(c).ok_or(Bech32Error::InvalidChar(c))?);
    }

    let mut values = hrp_expand(hrp);
    values.extend_from_slice(&data);
    if polymod(values) != 1 {
        return Err(Bech32Error::InvalidChecksum);
    }

    data.truncate(data.len() - CHECKSUM_LEN);
    Ok((hrp.to_string(), data))
}

/// Encode a lowercase human-readable part and 5-bit groups
pub fn encode(hrp: &str, data: &[u8]) -> String {
    let checksum = create_checksum(hrp, data);
    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(hrp);
    out.push('1');
    for &d in data.iter().chain(checksum.iter()) {
        out.push(CHARSET[(d & 31) as usize] as char);
    }
    out
}

/// Regroup bits, e.g. 8-bit bytes into 5-bit groups and back.
///
/// Without `pad`, leftover bits must be fewer than `from` and all zero.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, Bech32Error> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max = (1u32 << to) - 1;
    let max_acc = (1u32 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let v = value as u32;
        if v >> from != 0 {
            return Err(Bech32Error::InvalidPadding);
        }
        acc = ((acc << from) | v) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max) != 0 {
        return Err(Bech32Error::InvalidPadding);
    }

    Ok(out)
}
