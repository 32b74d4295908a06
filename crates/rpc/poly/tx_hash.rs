use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use crate::validator;
use async_trait::async_trait;
use ethereum_types::H256;
use serde_json::Value;

pub struct GetGwTxHashByEthTxHash {
    eth_hash: H256,
}

#[async_trait]
impl RpcHandler for GetGwTxHashByEthTxHash {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let eth_hash = validator::hash(validator::required(params, 0, "ethTxHash")?, 0, "ethTxHash")?;
        Ok(GetGwTxHashByEthTxHash { eth_hash })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        match context.tx_hash_index.eth_to_native(self.eth_hash).await? {
            Some(native_hash) => Ok(Value::String(gw_codec::hex_canon::encode_hex(native_hash.as_bytes()))),
            None => Ok(Value::Null),
        }
    }
}

pub struct GetEthTxHashByGwTxHash {
    native_hash: H256,
}

#[async_trait]
impl RpcHandler for GetEthTxHashByGwTxHash {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let native_hash = validator::hash(validator::required(params, 0, "gwTxHash")?, 0, "gwTxHash")?;
        Ok(GetEthTxHashByGwTxHash { native_hash })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        match context.tx_hash_index.native_to_eth(self.native_hash).await? {
            Some(eth_hash) => Ok(Value::String(gw_codec::hex_canon::encode_hex(eth_hash.as_bytes()))),
            None => Ok(Value::Null),
        }
    }
}
