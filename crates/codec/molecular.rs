//! The backend's binary encoding for its native structs ("molecular"
//! encoding, in the style of CKB's molecule format):
//!
//! - fixed vectors/structs: plain concatenation, no header.
//! - dynamic vectors/tables: `4B LE total_size` followed by `(N+1)` `4B LE`
//!   offsets into the payload; the last offset equals `total_size`, offsets
//!   are monotonically non-decreasing, and the first offset equals
//!   `4 * (N + 2)` (the size of the header itself).
//! - unions: `4B LE tag` followed by the tagged variant's own encoding.
//!
//! Every backend struct (`NativeRawTx`, `NativeTx`, ...) is built out of
//! these three primitives, so this module only needs to get them right once.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MolecularDecodeError {
    #[error("buffer too short: need at least {need} bytes, got {got}")]
    TooShort { need: usize, got: usize },
    #[error("header offset count does not match expected field count")]
    BadOffsetCount,
    #[error("first offset {0} does not match header size")]
    BadFirstOffset(u32),
    #[error("offsets are not monotonically non-decreasing")]
    OffsetsNotMonotonic,
    #[error("last offset {last} does not match declared total size {total}")]
    LastOffsetMismatch { last: u32, total: u32 },
    #[error("declared total size {declared} does not match buffer length {actual}")]
    TotalSizeMismatch { declared: u32, actual: usize },
}

/// Encodes a dynamic vector/table: concatenates `fields`, prefixed with the
/// molecular offset-table header.
///
/// `total_size` and the `N+1` offsets are all 4-byte little-endian. The
/// first offset is always `4 * (fields.len() + 2)` (header size: one
/// `total_size` word plus `N+1` offset words), and the final offset equals
/// `total_size`.
pub fn encode_dynamic(fields: &[Vec<u8>]) -> Vec<u8> {
    let header_words = fields.len() + 2; // total_size + (N+1) offsets
    let header_size = 4 * header_words;
    let payload_size: usize = fields.iter().map(Vec::len).sum();
    let total_size = header_size + payload_size;

    let mut out = Vec::with_capacity(total_size);
    out.extend_from_slice(&(total_size as u32).to_le_bytes());

    let mut offset = header_size as u32;
    out.extend_from_slice(&offset.to_le_bytes());
    for field in fields {
        offset += field.len() as u32;
        out.extend_from_slice(&offset.to_le_bytes());
    }

    for field in fields {
        out.extend_from_slice(field);
    }

    debug_assert_eq!(out.len(), total_size);
    out
}

/// Decodes a molecular dynamic vector/table into its constituent field byte
/// slices, validating every structural invariant `encode_dynamic` upholds.
pub fn decode_dynamic(buf: &[u8]) -> Result<Vec<&[u8]>, MolecularDecodeError> {
    if buf.len() < 8 {
        return Err(MolecularDecodeError::TooShort { need: 8, got: buf.len() });
    }
    let total_size = u32::from_le_bytes(buf[0..4].try_into().unwrap());
    if total_size as usize != buf.len() {
        return Err(MolecularDecodeError::TotalSizeMismatch {
            declared: total_size,
            actual: buf.len(),
        });
    }

    let first_offset = u32::from_le_bytes(buf[4..8].try_into().unwrap());
    if first_offset < 8 || (first_offset as usize - 4) % 4 != 0 {
        return Err(MolecularDecodeError::BadFirstOffset(first_offset));
    }
    let field_count = (first_offset as usize - 4) / 4 - 1;
    let offsets_end = 4 + 4 * (field_count + 1);
    if buf.len() < offsets_end {
        return Err(MolecularDecodeError::TooShort { need: offsets_end, got: buf.len() });
    }

    let mut offsets = Vec::with_capacity(field_count + 1);
    for i in 0..=field_count {
        let start = 4 + 4 * i;
        offsets.push(u32::from_le_bytes(buf[start..start + 4].try_into().unwrap()));
    }

    if offsets[0] != first_offset {
        return Err(MolecularDecodeError::BadFirstOffset(offsets[0]));
    }
    if *offsets.last().unwrap() != total_size {
        return Err(MolecularDecodeError::LastOffsetMismatch {
            last: *offsets.last().unwrap(),
            total: total_size,
        });
    }
    if !offsets.windows(2).all(|w| w[0] <= w[1]) {
        return Err(MolecularDecodeError::OffsetsNotMonotonic);
    }

    let mut fields = Vec::with_capacity(field_count);
    for w in offsets.windows(2) {
        fields.push(&buf[w[0] as usize..w[1] as usize]);
    }
    Ok(fields)
}

/// Encodes a union: `4B LE tag` followed by the variant's own encoding.
pub fn encode_union(tag: u32, variant: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + variant.len());
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(variant);
    out
}

/// Decodes a union's tag and leaves the variant payload for the caller to
/// interpret according to that tag.
pub fn decode_union(buf: &[u8]) -> Result<(u32, &[u8]), MolecularDecodeError> {
    if buf.len() < 4 {
        return Err(MolecularDecodeError::TooShort { need: 4, got: buf.len() });
    }
    let tag = u32::from_le_bytes(buf[0..4].try_into().unwrap());
    Ok((tag, &buf[4..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_roundtrips() {
        let fields = vec![vec![1u8, 2, 3], vec![], vec![9u8; 5]];
        let encoded = encode_dynamic(&fields);
        let decoded = decode_dynamic(&encoded).unwrap();
        assert_eq!(decoded, vec![&[1u8, 2, 3][..], &[][..], &[9u8; 5][..]]);
    }

    #[test]
    fn first_offset_matches_header_size() {
        let fields = vec![vec![0u8; 3], vec![0u8; 4]];
        let encoded = encode_dynamic(&fields);
        let first_offset = u32::from_le_bytes(encoded[4..8].try_into().unwrap());
        assert_eq!(first_offset, 4 * (fields.len() as u32 + 2));
    }

    #[test]
    fn last_offset_matches_total_size() {
        let fields = vec![vec![7u8; 2]];
        let encoded = encode_dynamic(&fields);
        let total = u32::from_le_bytes(encoded[0..4].try_into().unwrap()) as usize;
        assert_eq!(total, encoded.len());
    }

    #[test]
    fn rejects_mismatched_total_size() {
        let mut encoded = encode_dynamic(&[vec![1u8]]);
        encoded[0] = 0xff; // corrupt the declared total_size
        assert!(matches!(
            decode_dynamic(&encoded),
            Err(MolecularDecodeError::TotalSizeMismatch { .. })
        ));
    }

    #[test]
    fn union_roundtrips() {
        let encoded = encode_union(2, &[0xaa, 0xbb]);
        let (tag, payload) = decode_union(&encoded).unwrap();
        assert_eq!(tag, 2);
        assert_eq!(payload, &[0xaa, 0xbb]);
    }
}
