mod client_version;
mod sha3;

use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::{RpcErr, RpcRequest};
use serde_json::Value;

pub async fn map_web3_requests(req: &RpcRequest, context: RpcApiContext) -> Result<Value, RpcErr> {
    match req.method.as_str() {
        "web3_clientVersion" => client_version::ClientVersion::call(req, context).await,
        "web3_sha3" => sha3::Sha3::call(req, context).await,
        unknown => Err(RpcErr::MethodNotFound(unknown.to_owned())),
    }
}
