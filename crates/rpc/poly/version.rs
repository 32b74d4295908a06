use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct PolyVersion;

#[async_trait]
impl RpcHandler for PolyVersion {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(PolyVersion)
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        Ok(json!({
            "version": env!("CARGO_PKG_VERSION"),
            "chainId": gw_codec::hex_canon::encode_hex_number(context.config.chain_id as u128),
        }))
    }
}
