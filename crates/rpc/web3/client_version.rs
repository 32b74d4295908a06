use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use async_trait::async_trait;
use serde_json::Value;

pub struct ClientVersion;

#[async_trait]
impl RpcHandler for ClientVersion {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(ClientVersion)
    }

    async fn handle(&self, _context: RpcApiContext) -> Result<Value, RpcErr> {
        Ok(Value::String(format!("gateway/v{}", env!("CARGO_PKG_VERSION"))))
    }
}
