mod peer_count;
mod version;

use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::{RpcErr, RpcRequest};
use serde_json::Value;

pub async fn map_net_requests(req: &RpcRequest, context: RpcApiContext) -> Result<Value, RpcErr> {
    match req.method.as_str() {
        "net_version" => version::Version::call(req, context).await,
        "net_peerCount" => peer_count::PeerCount::call(req, context).await,
        "net_listening" => Ok(Value::Bool(true)),
        unknown => Err(RpcErr::MethodNotFound(unknown.to_owned())),
    }
}
