//! Per-argument validators. A handler's `parse` pulls each positional
//! parameter through one of these; any failure short-circuits before any
//! outbound I/O, as required by `§4.7`.

use crate::rpc_types::RpcErr;
use ethereum_types::{H256, U256};
use gw_codec::{hex_canon, EthAddress};
use serde_json::Value;

fn err(index: usize, path: &str, detail: impl Into<String>) -> RpcErr {
    RpcErr::invalid_params(index, path, detail)
}

pub fn required<'a>(params: &'a [Value], index: usize, path: &str) -> Result<&'a Value, RpcErr> {
    params.get(index).ok_or_else(|| err(index, path, "missing parameter"))
}

pub fn hex_string(value: &Value, index: usize, path: &str) -> Result<String, RpcErr> {
    let s = value.as_str().ok_or_else(|| err(index, path, "expected a string"))?;
    if !hex_canon::is_canonical_hex(s) {
        return Err(err(index, path, "expected 0x-prefixed even-length hex"));
    }
    Ok(s.to_string())
}

pub fn hex_bytes(value: &Value, index: usize, path: &str) -> Result<Vec<u8>, RpcErr> {
    let s = hex_string(value, index, path)?;
    hex_canon::decode_hex(&s).map_err(|e| err(index, path, e.to_string()))
}

pub fn hex_number_u64(value: &Value, index: usize, path: &str) -> Result<u64, RpcErr> {
    let s = hex_string(value, index, path)?;
    let bytes = hex_canon::decode_hex(&s).map_err(|e| err(index, path, e.to_string()))?;
    if bytes.len() > 8 {
        return Err(err(index, path, "number too large for u64"));
    }
    let mut padded = [0u8; 8];
    padded[8 - bytes.len()..].copy_from_slice(&bytes);
    Ok(u64::from_be_bytes(padded))
}

pub fn hex_number_u256(value: &Value, index: usize, path: &str) -> Result<U256, RpcErr> {
    let s = hex_string(value, index, path)?;
    let bytes = hex_canon::decode_hex(&s).map_err(|e| err(index, path, e.to_string()))?;
    if bytes.len() > 32 {
        return Err(err(index, path, "number too large for u256"));
    }
    Ok(U256::from_big_endian(&bytes))
}

pub fn address(value: &Value, index: usize, path: &str) -> Result<EthAddress, RpcErr> {
    let bytes = hex_bytes(value, index, path)?;
    if bytes.len() != 20 {
        return Err(err(index, path, "expected a 20-byte address"));
    }
    Ok(EthAddress::from_slice(&bytes))
}

pub fn hash(value: &Value, index: usize, path: &str) -> Result<H256, RpcErr> {
    let bytes = hex_bytes(value, index, path)?;
    if bytes.len() != 32 {
        return Err(err(index, path, "expected a 32-byte hash"));
    }
    Ok(H256::from_slice(&bytes))
}

pub fn boolean(value: &Value, index: usize, path: &str) -> Result<bool, RpcErr> {
    value.as_bool().ok_or_else(|| err(index, path, "expected a boolean"))
}

/// `"latest"` | `"earliest"` | `"pending"` | hex number | `{blockHash,
/// requireCanonical?}` | `{blockNumber}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockParameter {
    Earliest,
    Latest,
    Pending,
    Number(u64),
    Hash { hash: H256, require_canonical: bool },
}

pub fn block_parameter(value: &Value, index: usize, path: &str) -> Result<BlockParameter, RpcErr> {
    if let Some(s) = value.as_str() {
        return match s {
            "earliest" => Ok(BlockParameter::Earliest),
            "latest" => Ok(BlockParameter::Latest),
            "pending" => Ok(BlockParameter::Pending),
            hex if hex_canon::is_canonical_hex(hex) => Ok(BlockParameter::Number(hex_number_u64(value, index, path)?)),
            _ => Err(err(index, path, "expected a block tag or hex number")),
        };
    }
    if let Some(obj) = value.as_object() {
        if let Some(block_hash) = obj.get("blockHash") {
            let parsed = hash(block_hash, index, path)?;
            let require_canonical = obj.get("requireCanonical").and_then(Value::as_bool).unwrap_or(false);
            return Ok(BlockParameter::Hash { hash: parsed, require_canonical });
        }
        if let Some(block_number) = obj.get("blockNumber") {
            return Ok(BlockParameter::Number(hex_number_u64(block_number, index, path)?));
        }
    }
    Err(err(index, path, "expected a block parameter"))
}

/// Resolves a [`BlockParameter`] to a concrete block number, given the
/// current tip. Under instant-finality configuration `"latest"` resolves
/// as `"pending"` so wallets see their own submissions immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBlock {
    Number(u64),
    Pending,
}

pub fn resolve_block_tag(param: &BlockParameter, tip: Option<u64>, instant_finality: bool) -> ResolvedBlock {
    match param {
        BlockParameter::Earliest => ResolvedBlock::Number(0),
        BlockParameter::Latest if instant_finality => ResolvedBlock::Pending,
        BlockParameter::Latest => ResolvedBlock::Number(tip.unwrap_or(0)),
        BlockParameter::Pending => ResolvedBlock::Pending,
        BlockParameter::Number(n) => ResolvedBlock::Number(*n),
        BlockParameter::Hash { .. } => ResolvedBlock::Number(tip.unwrap_or(0)),
    }
}

/// The `eth_call`/`eth_estimateGas`/`eth_sendTransaction`-shaped call
/// object: everything is optional except that a caller needs at least one
/// of `to`/`data` to mean anything.
#[derive(Debug, Clone, Default)]
pub struct CallObject {
    pub from: Option<EthAddress>,
    pub to: Option<EthAddress>,
    pub gas: Option<u64>,
    pub gas_price: Option<U256>,
    pub value: Option<U256>,
    pub data: Option<Vec<u8>>,
}

pub fn call_object(value: &Value, index: usize, path: &str) -> Result<CallObject, RpcErr> {
    let obj = value.as_object().ok_or_else(|| err(index, path, "expected a call object"))?;

    let from = obj.get("from").map(|v| address(v, index, path)).transpose()?;
    let to = obj.get("to").map(|v| address(v, index, path)).transpose()?;
    let gas = obj.get("gas").map(|v| hex_number_u64(v, index, path)).transpose()?;
    let gas_price = obj.get("gasPrice").map(|v| hex_number_u256(v, index, path)).transpose()?;
    let value_field = obj.get("value").map(|v| hex_number_u256(v, index, path)).transpose()?;
    let data = obj
        .get("data")
        .or_else(|| obj.get("input"))
        .map(|v| hex_bytes(v, index, path))
        .transpose()?;

    Ok(CallObject { from, to, gas, gas_price, value: value_field, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn block_tag_parses() {
        assert_eq!(block_parameter(&json!("latest"), 0, "block").unwrap(), BlockParameter::Latest);
        assert_eq!(block_parameter(&json!("earliest"), 0, "block").unwrap(), BlockParameter::Earliest);
    }

    #[test]
    fn hex_number_parses() {
        assert_eq!(block_parameter(&json!("0x10"), 0, "block").unwrap(), BlockParameter::Number(16));
    }

    #[test]
    fn latest_resolves_as_pending_under_instant_finality() {
        let resolved = resolve_block_tag(&BlockParameter::Latest, Some(100), true);
        assert_eq!(resolved, ResolvedBlock::Pending);
    }

    #[test]
    fn latest_resolves_to_tip_without_instant_finality() {
        let resolved = resolve_block_tag(&BlockParameter::Latest, Some(100), false);
        assert_eq!(resolved, ResolvedBlock::Number(100));
    }

    #[test]
    fn rejects_odd_length_hex() {
        assert!(hex_string(&json!("0xabc"), 0, "x").is_err());
    }

    #[test]
    fn call_object_reads_data_or_input() {
        let obj = call_object(&json!({"to": "0x0000000000000000000000000000000000000001", "input": "0xdead"}), 0, "call").unwrap();
        assert_eq!(obj.data, Some(vec![0xde, 0xad]));
    }
}
