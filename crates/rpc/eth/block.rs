use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use async_trait::async_trait;
use serde_json::Value;

pub struct ChainId;

#[async_trait]
impl RpcHandler for ChainId {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(ChainId)
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        Ok(Value::String(gw_codec::hex_canon::encode_hex_number(context.config.chain_id as u128)))
    }
}

pub struct BlockNumber;

#[async_trait]
impl RpcHandler for BlockNumber {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(BlockNumber)
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        match context.store.get_tip_block_number().await? {
            Some(number) => Ok(Value::String(gw_codec::hex_canon::encode_hex_number(number as u128))),
            None => Ok(Value::Null),
        }
    }
}
