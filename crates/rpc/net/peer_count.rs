use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use async_trait::async_trait;
use serde_json::Value;

/// The gateway has no peer-to-peer layer of its own to report on; it always
/// answers `0x0`, mirroring how a JSON-RPC-only node with no devp2p stack
/// answers this method.
pub struct PeerCount;

#[async_trait]
impl RpcHandler for PeerCount {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(PeerCount)
    }

    async fn handle(&self, _context: RpcApiContext) -> Result<Value, RpcErr> {
        Ok(Value::String("0x0".to_string()))
    }
}
