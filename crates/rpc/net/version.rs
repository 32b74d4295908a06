use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use async_trait::async_trait;
use serde_json::Value;

pub struct Version;

#[async_trait]
impl RpcHandler for Version {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(Version)
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        Ok(Value::String(context.config.chain_id.to_string()))
    }
}
