//! Hex wire-format canonicalisation: `"0x"` + lowercase, even-length.
//!
//! The gateway never silently normalises case on the way *out* — only when
//! a value is about to be used as a cache key does lower-casing happen, so
//! that `0xAB` and `0xab` address two different filter ids but the same
//! cache entry.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum HexError {
    #[error("hex string must start with 0x")]
    MissingPrefix,
    #[error("hex string must have an even number of digits")]
    OddLength,
    #[error("invalid hex digit")]
    InvalidDigit,
}

/// Checks `^0x([0-9a-fA-F]+)$` with an even digit count, i.e. the exact
/// shape every `eth_*` hex parameter must match.
pub fn is_canonical_hex(s: &str) -> bool {
    decode_hex(s).is_ok()
}

/// Decodes a `"0x..."` string into bytes, rejecting a missing prefix, an odd
/// digit count, or non-hex digits. Case is accepted as-is and preserved by
/// the caller — canonicalisation to lowercase only happens in
/// [`cache_key_lower`].
pub fn decode_hex(s: &str) -> Result<Vec<u8>, HexError> {
    let digits = s.strip_prefix("0x").ok_or(HexError::MissingPrefix)?;
    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }
    hex::decode(digits).map_err(|_| HexError::InvalidDigit)
}

/// Encodes bytes as `"0x"` + lowercase hex — the canonical wire form for
/// every byte-string RPC result.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes.as_ref()))
}

/// Encodes an integer as `"0x"` + lowercase hex with no leading zeros,
/// except for zero itself which encodes as `"0x0"`.
pub fn encode_hex_number(value: impl Into<u128>) -> String {
    let value = value.into();
    if value == 0 {
        return "0x0".to_string();
    }
    format!("0x{value:x}")
}

/// Lower-cases an already-canonical hex string for use as a cache key
/// component. Never used for values returned to the caller.
pub fn cache_key_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_prefix() {
        assert_eq!(decode_hex("abcd"), Err(HexError::MissingPrefix));
    }

    #[test]
    fn rejects_odd_length() {
        assert_eq!(decode_hex("0xabc"), Err(HexError::OddLength));
    }

    #[test]
    fn roundtrips() {
        let bytes = [0xde, 0xad, 0xbe, 0xef];
        let encoded = encode_hex(bytes);
        assert_eq!(encoded, "0xdeadbeef");
        assert_eq!(decode_hex(&encoded).unwrap(), bytes);
    }

    #[test]
    fn zero_encodes_as_0x0() {
        assert_eq!(encode_hex_number(0u128), "0x0");
    }

    #[test]
    fn canonicalisation_is_idempotent() {
        let once = cache_key_lower("0xABCDEF");
        let twice = cache_key_lower(&once);
        assert_eq!(once, twice);
    }
}
