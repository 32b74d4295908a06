//! The `gw_` namespace: a validated pass-through to the backend's own RPC
//! for methods the gateway has no Ethereum-shaped translation for. Method
//! names beginning `gw_submit`/`gw_send` go to the writer endpoint;
//! everything else is treated as a read.

use crate::context::RpcApiContext;
use crate::rpc_types::{RpcErr, RpcRequest};
use serde_json::Value;

const WRITE_PREFIXES: &[&str] = &["gw_submit", "gw_send"];

pub async fn map_gw_requests(req: &RpcRequest, context: RpcApiContext) -> Result<Value, RpcErr> {
    let params = req.params.clone().unwrap_or_default();
    let write = WRITE_PREFIXES.iter().any(|prefix| req.method.starts_with(prefix));
    context.backend.forward(&req.method, params, write).await
}
