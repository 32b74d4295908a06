use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use async_trait::async_trait;
use serde_json::Value;

pub struct GetEthAccountLockHash;

#[async_trait]
impl RpcHandler for GetEthAccountLockHash {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(GetEthAccountLockHash)
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        Ok(Value::String(gw_codec::hex_canon::encode_hex(context.config.eth_account_lock_code_hash.as_bytes())))
    }
}
