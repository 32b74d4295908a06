use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use async_trait::async_trait;
use serde_json::Value;

pub struct GetCreatorId;

#[async_trait]
impl RpcHandler for GetCreatorId {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(GetCreatorId)
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        Ok(Value::String(gw_codec::hex_canon::encode_hex_number(context.config.creator_account_id as u128)))
    }
}
