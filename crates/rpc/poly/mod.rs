mod creator_id;
mod eth_account_lock_hash;
mod health_status;
mod tx_hash;
mod version;

use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::{RpcErr, RpcRequest};
use serde_json::Value;

pub async fn map_poly_requests(req: &RpcRequest, context: RpcApiContext) -> Result<Value, RpcErr> {
    match req.method.as_str() {
        "poly_version" => version::PolyVersion::call(req, context).await,
        "poly_getCreatorId" => creator_id::GetCreatorId::call(req, context).await,
        "poly_getEthAccountLockHash" => eth_account_lock_hash::GetEthAccountLockHash::call(req, context).await,
        "poly_getGwTxHashByEthTxHash" => tx_hash::GetGwTxHashByEthTxHash::call(req, context).await,
        "poly_getEthTxHashByGwTxHash" => tx_hash::GetEthTxHashByGwTxHash::call(req, context).await,
        "poly_getHealthStatus" => health_status::GetHealthStatus::call(req, context).await,
        unknown => Err(RpcErr::MethodNotFound(unknown.to_owned())),
    }
}
