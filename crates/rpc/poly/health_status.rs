use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Reports liveness of every collaborator the gateway itself depends on —
/// the relational store and the backend — without going through the full
/// request path any other handler would use.
pub struct GetHealthStatus;

#[async_trait]
impl RpcHandler for GetHealthStatus {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(GetHealthStatus)
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        let store_ok = context.store.get_tip_block_number().await.is_ok();
        let backend_ok = context.backend.get_transaction_by_hash(ethereum_types::H256::zero()).await.is_ok();

        Ok(json!({
            "store": if store_ok { "ok" } else { "unreachable" },
            "backend": if backend_ok { "ok" } else { "unreachable" },
        }))
    }
}
