use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use crate::validator;
use async_trait::async_trait;
use serde_json::Value;

pub struct Sha3 {
    data: Vec<u8>,
}

#[async_trait]
impl RpcHandler for Sha3 {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let data = validator::hex_bytes(validator::required(params, 0, "data")?, 0, "data")?;
        Ok(Sha3 { data })
    }

    async fn handle(&self, _context: RpcApiContext) -> Result<Value, RpcErr> {
        let hash = gw_crypto::keccak_hash(&self.data);
        Ok(Value::String(gw_codec::hex_canon::encode_hex(&hash)))
    }
}
