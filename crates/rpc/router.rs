//! Method dispatch: a flat `"module_method"` match per namespace, colocating
//! each handler with its own parameter parsing and validation.

use crate::context::RpcApiContext;
use crate::rpc_types::{RpcErr, RpcNamespace, RpcRequest};
use async_trait::async_trait;
use serde_json::Value;

/// One RPC method. `parse` validates and extracts typed arguments (the
/// per-argument validators from [`crate::validator`]); `handle` does the
/// actual work, suspending at every I/O boundary (backend RPC, relational
/// store, Redis) as it goes.
#[async_trait]
pub trait RpcHandler: Sized {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr>;

    async fn call(req: &RpcRequest, context: RpcApiContext) -> Result<Value, RpcErr> {
        let request = Self::parse(&req.params)?;
        request.handle(context).await
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr>;
}

pub async fn map_http_requests(req: &RpcRequest, context: RpcApiContext) -> Result<Value, RpcErr> {
    match req.namespace()? {
        RpcNamespace::Eth => crate::eth::map_eth_requests(req, context).await,
        RpcNamespace::Net => crate::net::map_net_requests(req, context).await,
        RpcNamespace::Web3 => crate::web3::map_web3_requests(req, context).await,
        RpcNamespace::Poly => crate::poly::map_poly_requests(req, context).await,
        RpcNamespace::Gw => crate::gw::map_gw_requests(req, context).await,
    }
}
