use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use async_trait::async_trait;
use serde_json::Value;

/// `eth_sign`, `eth_signTransaction`, `eth_sendTransaction` all require the
/// node to hold the caller's private key, which this gateway never does.
pub struct Unsupported;

#[async_trait]
impl RpcHandler for Unsupported {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(Unsupported)
    }

    async fn handle(&self, _context: RpcApiContext) -> Result<Value, RpcErr> {
        Err(RpcErr::MethodNotSupported)
    }
}
