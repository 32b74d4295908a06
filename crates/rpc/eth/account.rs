use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use crate::validator::{self, BlockParameter};
use async_trait::async_trait;
use ethereum_types::H256;
use gw_codec::{AccountId, EthAddress, EthRegistryAddress};
use serde_json::Value;
use tracing::info;

/// The CKB-sUDT id the backend reserves for its native fee-paying token —
/// a fixed system-wide constant, not something the gateway configures.
const CKB_SUDT_ACCOUNT_ID: u32 = 1;

/// A block tag naming a specific hash that the relational store does not
/// know about is a hard error; every other tag just resolves to "current"
/// for the purposes of a balance/storage/code read (the backend itself has
/// no notion of historical state to query against).
async fn require_known_tag(context: &RpcApiContext, tag: &BlockParameter) -> Result<(), RpcErr> {
    if let BlockParameter::Hash { hash, .. } = tag {
        if context.store.get_block_by_hash(*hash).await?.is_none() {
            return Err(RpcErr::HeaderNotFound);
        }
    }
    Ok(())
}

pub struct GetBalance {
    address: EthAddress,
    block: BlockParameter,
}

#[async_trait]
impl RpcHandler for GetBalance {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let address = validator::address(validator::required(params, 0, "address")?, 0, "address")?;
        let block = validator::block_parameter(validator::required(params, 1, "block")?, 1, "block")?;
        Ok(GetBalance { address, block })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        info!("Requested balance of account {:?} at block {:?}", self.address, self.block);
        require_known_tag(&context, &self.block).await?;

        let registry_address = EthRegistryAddress::new(self.address).serialize();
        let balance = context.backend.get_balance(&registry_address, CKB_SUDT_ACCOUNT_ID).await?;
        Ok(Value::String(format!("0x{balance:x}")))
    }
}

pub struct GetStorageAt {
    address: EthAddress,
    key: H256,
    block: BlockParameter,
}

#[async_trait]
impl RpcHandler for GetStorageAt {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let address = validator::address(validator::required(params, 0, "address")?, 0, "address")?;
        let key = normalise_storage_key(validator::required(params, 1, "key")?, 1)?;
        let block = validator::block_parameter(validator::required(params, 2, "block")?, 2, "block")?;
        Ok(GetStorageAt { address, key, block })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        info!("Requested storage slot {:?} of account {:?} at block {:?}", self.key, self.address, self.block);
        require_known_tag(&context, &self.block).await?;

        match context.translator.resolver().account_id_of(self.address).await? {
            Some(account_id) => {
                let value = context.backend.get_storage_at(account_id, self.key).await?;
                Ok(Value::String(gw_codec::hex_canon::encode_hex(value.as_bytes())))
            }
            None => Ok(Value::String(gw_codec::hex_canon::encode_hex([0u8; 32]))),
        }
    }
}

/// Left-pads a shorter value, left-truncates a longer one — the same
/// left-alignment Ethereum clients use for any input expected to be a
/// 32-byte word.
fn normalise_storage_key(value: &Value, index: usize) -> Result<H256, RpcErr> {
    let bytes = validator::hex_bytes(value, index, "key")?;
    let mut key = [0u8; 32];
    if bytes.len() >= 32 {
        key.copy_from_slice(&bytes[bytes.len() - 32..]);
    } else {
        key[32 - bytes.len()..].copy_from_slice(&bytes);
    }
    Ok(H256(key))
}

pub struct GetCode {
    address: EthAddress,
    block: BlockParameter,
}

/// The synthetic storage key the backend stores a contract's code hash
/// under: `accountId:u32 LE || 0xFF || 0x01 || 26 zero bytes`.
fn code_hash_key(account_id: AccountId) -> H256 {
    let mut key = [0u8; 32];
    key[0..4].copy_from_slice(&account_id.0.to_le_bytes());
    key[4] = 0xFF;
    key[5] = 0x01;
    H256(key)
}

#[async_trait]
impl RpcHandler for GetCode {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let address = validator::address(validator::required(params, 0, "address")?, 0, "address")?;
        let block = validator::block_parameter(validator::required(params, 1, "block")?, 1, "block")?;
        Ok(GetCode { address, block })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        info!("Requested code of account {:?} at block {:?}", self.address, self.block);
        require_known_tag(&context, &self.block).await?;

        let Some(account_id) = context.translator.resolver().account_id_of(self.address).await? else {
            return Ok(Value::String("0x".to_string()));
        };

        let code_hash = context.backend.get_storage_at(account_id, code_hash_key(account_id)).await?;
        if code_hash.is_zero() {
            return Ok(Value::String("0x".to_string()));
        }

        match context.backend.get_data(code_hash).await? {
            Some(code) => Ok(Value::String(gw_codec::hex_canon::encode_hex(&code))),
            None => Ok(Value::String("0x".to_string())),
        }
    }
}
