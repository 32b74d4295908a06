//! Ethereum and backend-native transaction types, and the constants used to
//! translate between them.

use crate::molecular;
use crate::types::address::{AccountId, EthAddress};
use bytes::Bytes;
use ethereum_types::{H256, U256};
use gw_rlp::decode::RLPDecode;
use gw_rlp::encode::RLPEncode;
use gw_rlp::error::{RLPDecodeError, RLPEncodeError};
use gw_rlp::structs::{Decoder, Encoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A signed Ethereum transaction, decoded from the raw RLP an
/// `eth_sendRawTransaction` caller submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthRawTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub to: Option<EthAddress>,
    pub value: U256,
    pub data: Bytes,
    pub v: u64,
    pub r: H256,
    pub s: H256,
}

impl RLPEncode for EthRawTransaction {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.nonce)
            .encode_field(&self.gas_price)
            .encode_field(&self.gas_limit)
            .encode_field(&self.to)
            .encode_field(&self.value)
            .encode_field(&self.data)
            .encode_field(&self.v)
            .encode_field(&self.r)
            .encode_field(&self.s)
            .finish();
    }
}

impl RLPDecode for EthRawTransaction {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (nonce, decoder) = decoder.decode_field("nonce")?;
        let (gas_price, decoder) = decoder.decode_field("gasPrice")?;
        let (gas_limit, decoder) = decoder.decode_field("gasLimit")?;
        let (to, decoder) = decoder.decode_field("to")?;
        let (value, decoder) = decoder.decode_field("value")?;
        let (data, decoder) = decoder.decode_field("data")?;
        let (v, decoder) = decoder.decode_field("v")?;
        let (r, decoder) = decoder.decode_field("r")?;
        let (s, decoder) = decoder.decode_field("s")?;
        let rest = decoder.finish()?;
        Ok((
            EthRawTransaction { nonce, gas_price, gas_limit, to, value, data, v, r, s },
            rest,
        ))
    }
}

impl EthRawTransaction {
    /// Derives the EIP-155 chain id from `v`, or `None` for a pre-EIP-155
    /// signature (`v` of 27 or 28).
    pub fn chain_id(&self) -> Option<u64> {
        if self.v >= 35 {
            Some((self.v - 35) / 2)
        } else {
            None
        }
    }

    /// The normalized recovery id (0 or 1) implied by `v`.
    pub fn recovery_id(&self) -> u8 {
        if self.v >= 35 {
            ((self.v - 35) % 2) as u8
        } else {
            (self.v - 27) as u8
        }
    }

    /// `r || s || recoveryId`, the 65-byte form [`gw_crypto::recover_signer`]
    /// expects.
    pub fn signature_65(&self) -> [u8; 65] {
        let mut sig = [0u8; 65];
        sig[0..32].copy_from_slice(self.r.as_bytes());
        sig[32..64].copy_from_slice(self.s.as_bytes());
        sig[64] = self.recovery_id();
        sig
    }

    /// The keccak of the RLP-encoded *signed* transaction — the canonical
    /// Ethereum transaction hash (`ethHash`).
    pub fn eth_hash(&self) -> H256 {
        H256(gw_crypto::keccak_hash(self.encode_to_vec()))
    }

    /// The keccak of the RLP-encoded *unsigned* transaction view, used both
    /// to recover the sender and to re-validate `r`/`s`/`v` on resubmission.
    /// EIP-155 transactions append `(chainId, 0, 0)` to the signed fields.
    pub fn unsigned_signing_hash(&self) -> H256 {
        let mut buf = Vec::new();
        match self.chain_id() {
            Some(chain_id) => {
                Encoder::new(&mut buf)
                    .encode_field(&self.nonce)
                    .encode_field(&self.gas_price)
                    .encode_field(&self.gas_limit)
                    .encode_field(&self.to)
                    .encode_field(&self.value)
                    .encode_field(&self.data)
                    .encode_field(&chain_id)
                    .encode_field(&0u8)
                    .encode_field(&0u8)
                    .finish();
            }
            None => {
                Encoder::new(&mut buf)
                    .encode_field(&self.nonce)
                    .encode_field(&self.gas_price)
                    .encode_field(&self.gas_limit)
                    .encode_field(&self.to)
                    .encode_field(&self.value)
                    .encode_field(&self.data)
                    .finish();
            }
        }
        H256(gw_crypto::keccak_hash(buf))
    }
}

/// A decoded Ethereum transaction together with its recovered sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyjuiceTx {
    pub eth_tx: EthRawTransaction,
    pub sender: EthAddress,
}

/// Flag bits inside a polyjuice args blob.
pub const POLYJUICE_FLAG_CREATE: u8 = 0b01;
pub const POLYJUICE_FLAG_TRANSFER: u8 = 0b10;

/// `"POLY"` — the magic 4 bytes opening every polyjuice args blob.
pub const POLYJUICE_MAGIC: [u8; 4] = *b"POLY";
pub const POLYJUICE_VERSION: u8 = 0;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ArgsDecodeError {
    #[error("args too short")]
    TooShort,
    #[error("bad magic bytes")]
    BadMagic,
    #[error("unsupported args version {0}")]
    UnsupportedVersion(u8),
    #[error("declared input size does not match remaining bytes")]
    InputSizeMismatch,
}

/// The polyjuice call arguments embedded in `NativeRawTx::args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyjuiceArgs {
    pub is_create: bool,
    pub is_transfer: bool,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub value: u128,
    pub input: Bytes,
}

impl PolyjuiceArgs {
    pub fn encode(&self) -> Vec<u8> {
        let mut flags = 0u8;
        if self.is_create {
            flags |= POLYJUICE_FLAG_CREATE;
        }
        if self.is_transfer {
            flags |= POLYJUICE_FLAG_TRANSFER;
        }
        let mut out = Vec::with_capacity(4 + 1 + 1 + 8 + 16 + 16 + 4 + self.input.len());
        out.extend_from_slice(&POLYJUICE_MAGIC);
        out.push(POLYJUICE_VERSION);
        out.push(flags);
        out.extend_from_slice(&self.gas_limit.to_le_bytes());
        out.extend_from_slice(&self.gas_price.to_le_bytes());
        out.extend_from_slice(&self.value.to_le_bytes());
        out.extend_from_slice(&(self.input.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.input);
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, ArgsDecodeError> {
        if buf.len() < 4 + 1 + 1 + 8 + 16 + 16 + 4 {
            return Err(ArgsDecodeError::TooShort);
        }
        if buf[0..4] != POLYJUICE_MAGIC {
            return Err(ArgsDecodeError::BadMagic);
        }
        let version = buf[4];
        if version != POLYJUICE_VERSION {
            return Err(ArgsDecodeError::UnsupportedVersion(version));
        }
        let flags = buf[5];
        let mut offset = 6;
        let gas_limit = u64::from_le_bytes(buf[offset..offset + 8].try_into().unwrap());
        offset += 8;
        let gas_price = u128::from_le_bytes(buf[offset..offset + 16].try_into().unwrap());
        offset += 16;
        let value = u128::from_le_bytes(buf[offset..offset + 16].try_into().unwrap());
        offset += 16;
        let input_size = u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap()) as usize;
        offset += 4;
        if buf.len() - offset != input_size {
            return Err(ArgsDecodeError::InputSizeMismatch);
        }
        Ok(PolyjuiceArgs {
            is_create: flags & POLYJUICE_FLAG_CREATE != 0,
            is_transfer: flags & POLYJUICE_FLAG_TRANSFER != 0,
            gas_limit,
            gas_price,
            value,
            input: Bytes::copy_from_slice(&buf[offset..]),
        })
    }
}

/// A backend-native transaction body, pre-signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeRawTx {
    pub chain_id: u64,
    pub from_id: u32,
    pub to_id: u32,
    pub nonce: u32,
    pub args: Bytes,
}

impl NativeRawTx {
    pub fn encode(&self) -> Vec<u8> {
        molecular::encode_dynamic(&[
            self.chain_id.to_le_bytes().to_vec(),
            self.from_id.to_le_bytes().to_vec(),
            self.to_id.to_le_bytes().to_vec(),
            self.nonce.to_le_bytes().to_vec(),
            self.args.to_vec(),
        ])
    }

    pub fn decode(buf: &[u8]) -> Result<Self, molecular::MolecularDecodeError> {
        let fields = molecular::decode_dynamic(buf)?;
        Ok(NativeRawTx {
            chain_id: u64::from_le_bytes(fields[0].try_into().unwrap()),
            from_id: u32::from_le_bytes(fields[1].try_into().unwrap()),
            to_id: u32::from_le_bytes(fields[2].try_into().unwrap()),
            nonce: u32::from_le_bytes(fields[3].try_into().unwrap()),
            args: Bytes::copy_from_slice(fields[4]),
        })
    }

    /// The backend's own hash over this struct's molecular encoding
    /// (`nativeHash`), distinct from any Ethereum-side hash.
    pub fn backend_hash(&self) -> H256 {
        H256(gw_crypto::backend_hash(&self.encode()))
    }
}

/// A backend-native transaction with its signature attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTx {
    pub raw: NativeRawTx,
    /// `r || s || v`, with `v` the normalized recovery id (0 or 1).
    pub signature: [u8; 65],
}

impl NativeTx {
    pub fn encode(&self) -> Vec<u8> {
        molecular::encode_dynamic(&[self.raw.encode(), self.signature.to_vec()])
    }
}

/// The gas an `eth_call`/`eth_sendRawTransaction` must at minimum provide,
/// before the backend even begins execution: a flat base cost, a
/// contract-creation surcharge, and a per-input-byte cost that charges less
/// for zero bytes (compressibility) than non-zero ones.
pub fn intrinsic_gas(to: Option<EthAddress>, data: &[u8]) -> u64 {
    const BASE_GAS: u64 = 21_000;
    const CREATE_GAS: u64 = 53_000;
    const ZERO_BYTE_GAS: u64 = 4;
    const NON_ZERO_BYTE_GAS: u64 = 16;

    let mut gas = BASE_GAS;
    if to.is_none() {
        gas += CREATE_GAS;
    }
    for &byte in data {
        gas += if byte == 0 { ZERO_BYTE_GAS } else { NON_ZERO_BYTE_GAS };
    }
    gas
}

/// The system log polyjuice attaches to every executed transaction,
/// reporting gas accounting and any contract address it created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyjuiceSystemLog {
    pub gas_used: u64,
    pub cumulative_gas_used: u64,
    pub created_address: Option<EthAddress>,
    pub status_code: u32,
}

/// A raw log emitted by the backend, not yet known to be a polyjuice user
/// log or one of the other service flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBackendLog {
    pub service_flag: u8,
    pub account_id: AccountId,
    pub data: Bytes,
}

pub const SERVICE_FLAG_SUDT_OPERATION: u8 = 0x00;
pub const SERVICE_FLAG_SUDT_PAY_FEE: u8 = 0x01;
pub const SERVICE_FLAG_POLYJUICE_SYSTEM: u8 = 0x02;
pub const SERVICE_FLAG_POLYJUICE_USER: u8 = 0x03;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LogDecodeError {
    #[error("log too short")]
    TooShort,
    #[error("parsed log length does not match declared data length")]
    LengthMismatch,
    #[error("not a polyjuice system log")]
    NotSystemLog,
}

impl RawBackendLog {
    /// Decodes a polyjuice system log: `gasUsed:u64 LE || cumulativeGasUsed:u64
    /// LE || createdAddress:20B || statusCode:u32 LE`. `createdAddress` is
    /// all-zero when the call did not create a contract.
    pub fn parse_system_log(&self) -> Result<PolyjuiceSystemLog, LogDecodeError> {
        if self.service_flag != SERVICE_FLAG_POLYJUICE_SYSTEM {
            return Err(LogDecodeError::NotSystemLog);
        }
        if self.data.len() != 8 + 8 + 20 + 4 {
            return Err(LogDecodeError::LengthMismatch);
        }
        let gas_used = u64::from_le_bytes(self.data[0..8].try_into().unwrap());
        let cumulative_gas_used = u64::from_le_bytes(self.data[8..16].try_into().unwrap());
        let created_raw = &self.data[16..36];
        let created_address = if created_raw == [0u8; 20] {
            None
        } else {
            Some(EthAddress::from_slice(created_raw))
        };
        let status_code = u32::from_le_bytes(self.data[36..40].try_into().unwrap());
        Ok(PolyjuiceSystemLog { gas_used, cumulative_gas_used, created_address, status_code })
    }

    /// Decodes a polyjuice user log (`LOG0`..`LOGN`):
    /// `address:20B || dataLen:u32 LE || data || topicCount:u32 LE ||
    /// topic[0..topicCount]:32B`. Rejects a log whose parsed length does not
    /// exactly consume `data`.
    pub fn parse_user_log(&self) -> Result<UserLog, LogDecodeError> {
        if self.service_flag != SERVICE_FLAG_POLYJUICE_USER {
            return Err(LogDecodeError::TooShort);
        }
        let buf = &self.data[..];
        if buf.len() < 24 {
            return Err(LogDecodeError::TooShort);
        }
        let address = EthAddress::from_slice(&buf[0..20]);
        let data_len = u32::from_le_bytes(buf[20..24].try_into().unwrap()) as usize;
        let mut offset = 24;
        if buf.len() < offset + data_len + 4 {
            return Err(LogDecodeError::TooShort);
        }
        let data = Bytes::copy_from_slice(&buf[offset..offset + data_len]);
        offset += data_len;
        let topic_count = u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap()) as usize;
        offset += 4;
        if buf.len() != offset + topic_count * 32 {
            return Err(LogDecodeError::LengthMismatch);
        }
        let mut topics = Vec::with_capacity(topic_count);
        for i in 0..topic_count {
            let start = offset + i * 32;
            topics.push(H256::from_slice(&buf[start..start + 32]));
        }
        Ok(UserLog { address, data, topics })
    }
}

/// A decoded EVM-visible log (what `eth_getLogs` returns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLog {
    pub address: EthAddress,
    pub data: Bytes,
    pub topics: Vec<H256>,
}

#[derive(Debug, Error)]
pub enum TranslateRlpError {
    #[error(transparent)]
    Decode(#[from] RLPDecodeError),
    #[error(transparent)]
    Encode(#[from] RLPEncodeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn sample_tx() -> EthRawTransaction {
        EthRawTransaction {
            nonce: 1,
            gas_price: U256::from(1_000_000_000u64),
            gas_limit: 21_000,
            to: Some(EthAddress::from_low_u64_be(0xcafe)),
            value: U256::from(100u64),
            data: Bytes::new(),
            v: 37, // chain id 1, recovery id 0
            r: H256::from_low_u64_be(1),
            s: H256::from_low_u64_be(2),
        }
    }

    #[test]
    fn rlp_roundtrip() {
        let tx = sample_tx();
        let encoded = tx.encode_to_vec();
        assert_eq!(EthRawTransaction::decode(&encoded).unwrap(), tx);
    }

    #[test]
    fn eip155_chain_id_derivation() {
        let tx = sample_tx();
        assert_eq!(tx.chain_id(), Some(1));
        assert_eq!(tx.recovery_id(), 0);
    }

    #[test]
    fn pre_eip155_v_has_no_chain_id() {
        let mut tx = sample_tx();
        tx.v = 28;
        assert_eq!(tx.chain_id(), None);
        assert_eq!(tx.recovery_id(), 1);
    }

    #[test]
    fn differing_fields_yield_differing_eth_hash() {
        let a = sample_tx();
        let mut b = sample_tx();
        b.nonce = 2;
        assert_ne!(a.eth_hash(), b.eth_hash());
    }

    #[test]
    fn native_raw_tx_roundtrips_and_hashes_deterministically() {
        let raw = NativeRawTx {
            chain_id: 1,
            from_id: 5,
            to_id: 9,
            nonce: 0,
            args: Bytes::from_static(b"hello"),
        };
        let encoded = raw.encode();
        assert_eq!(NativeRawTx::decode(&encoded).unwrap(), raw);
        assert_eq!(raw.backend_hash(), raw.backend_hash());
    }

    #[test]
    fn polyjuice_args_roundtrip() {
        let args = PolyjuiceArgs {
            is_create: true,
            is_transfer: false,
            gas_limit: 21_000,
            gas_price: 1,
            value: 0,
            input: Bytes::from_static(b"input"),
        };
        let encoded = args.encode();
        assert_eq!(PolyjuiceArgs::decode(&encoded).unwrap(), args);
    }

    #[test]
    fn intrinsic_gas_charges_creation_surcharge() {
        let call_gas = intrinsic_gas(Some(EthAddress::zero()), &[]);
        let create_gas = intrinsic_gas(None, &[]);
        assert_eq!(create_gas - call_gas, 53_000);
    }

    #[test]
    fn intrinsic_gas_charges_zero_and_nonzero_bytes_differently() {
        let zero = intrinsic_gas(Some(EthAddress::zero()), &[0, 0]);
        let nonzero = intrinsic_gas(Some(EthAddress::zero()), &[1, 1]);
        assert!(nonzero > zero);
    }

    #[test]
    fn system_log_parses() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x6000u64.to_le_bytes());
        data.extend_from_slice(&0x6000u64.to_le_bytes());
        data.extend_from_slice(&[0u8; 20]);
        data.extend_from_slice(&0u32.to_le_bytes());
        let log = RawBackendLog {
            service_flag: SERVICE_FLAG_POLYJUICE_SYSTEM,
            account_id: AccountId(1),
            data: Bytes::from(data),
        };
        let parsed = log.parse_system_log().unwrap();
        assert_eq!(parsed.gas_used, 0x6000);
        assert_eq!(parsed.created_address, None);
    }

    #[test]
    fn user_log_rejects_length_mismatch() {
        let log = RawBackendLog {
            service_flag: SERVICE_FLAG_POLYJUICE_USER,
            account_id: AccountId(1),
            data: Bytes::from_static(&[0u8; 10]),
        };
        assert_eq!(log.parse_user_log(), Err(LogDecodeError::TooShort));
    }
}
