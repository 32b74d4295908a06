//! `eth_sendRawTransaction`.

use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use crate::validator;
use async_trait::async_trait;
use gw_codec::AutoCreateAccountEntry;
use serde_json::Value;
use tracing::info;

pub struct SendRawTransaction {
    rlp: Vec<u8>,
}

#[async_trait]
impl RpcHandler for SendRawTransaction {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let rlp = validator::hex_bytes(validator::required(params, 0, "data")?, 0, "data")?;
        Ok(SendRawTransaction { rlp })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        let translation = context.translator.eth_raw_to_native(&self.rlp).await?;
        info!("submitting transaction ethHash {:?}", translation.eth_hash);

        let native_hash = context.backend.submit_l2transaction(&translation.native.encode()).await?;
        context.tx_hash_index.submit(translation.eth_hash, native_hash).await?;

        if let Some(entry) = translation.auto_create {
            let aca_entry = AutoCreateAccountEntry {
                raw_eth_tx_hex: entry.raw_eth_tx_hex,
                from_address: entry.from_address,
            };
            context.aca_cache.set(translation.eth_hash, &aca_entry).await?;
        }

        Ok(Value::String(gw_codec::hex_canon::encode_hex(translation.eth_hash.as_bytes())))
    }
}
