//! `eth_call` and `eth_estimateGas`: read-only execution against the
//! backend, memoised by [`crate::cache`]'s `DataCache` so that the same
//! call repeated within one tip/mempool window (wallets poll aggressively)
//! costs one backend round trip rather than one per request.

use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use crate::validator::{self, BlockParameter, CallObject};
use async_trait::async_trait;
use ethereum_types::H256;
use gw_codec::{AccountId, RawBackendLog};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

/// The backend's response to `execute_raw_l2transaction`: the call's return
/// data plus every log it emitted, including the polyjuice system log
/// `eth_estimateGas` reads gas accounting from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionResult {
    return_data: String,
    logs: Vec<BackendLogJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendLogJson {
    service_flag: u8,
    account_id: u32,
    data: String,
}

fn parse_execution_result(value: Value) -> Result<ExecutionResult, RpcErr> {
    serde_json::from_value(value).map_err(|err| RpcErr::Internal(format!("malformed execution response: {err}")))
}

impl BackendLogJson {
    fn into_raw(self) -> Result<RawBackendLog, RpcErr> {
        let data = gw_codec::hex_canon::decode_hex(&self.data).map_err(|err| RpcErr::Internal(err.to_string()))?;
        Ok(RawBackendLog { service_flag: self.service_flag, account_id: AccountId(self.account_id), data: data.into() })
    }
}

/// Resolves the tip hash the cache fingerprint keys on. No mempool state
/// root is tracked anywhere in this architecture (there is no mempool
/// store), so the fingerprint varies with the tip hash and the call
/// parameters alone — still exactly once per state the answer could change
/// under, since the tip hash alone determines canonical state here.
async fn tip_hash(context: &RpcApiContext) -> Result<H256, RpcErr> {
    match context.store.get_tip_block_number().await? {
        Some(number) => Ok(context.store.get_block_by_number(number).await?.map(|b| b.hash).unwrap_or_default()),
        None => Ok(H256::zero()),
    }
}

fn call_fingerprint_params(call: &CallObject) -> Value {
    json!({
        "from": call.from.map(|a| format!("{a:#x}")),
        "to": call.to.map(|a| format!("{a:#x}")),
        "gas": call.gas,
        "gasPrice": call.gas_price.map(|v| v.to_string()),
        "value": call.value.map(|v| v.to_string()),
        "data": call.data.as_ref().map(|d| gw_codec::hex_canon::encode_hex(d)),
    })
}

async fn execute(context: &RpcApiContext, prefix: &'static str, call: &CallObject) -> Result<ExecutionResult, RpcErr> {
    let tip_hash = tip_hash(context).await?;
    let params = call_fingerprint_params(call);
    let key = context.data_cache.fingerprint(tip_hash, H256::zero(), &params);
    let deadline = Duration::from_millis(context.config.request_deadline_ms);

    let (raw, registry_address) = context.translator.eth_call_to_native(call).await?;
    let raw_encoded = raw.encode();

    let value = context
        .data_cache
        .get_or_compute(&format!("{prefix}:{key}"), deadline, || async {
            context
                .backend
                .execute_raw_l2transaction(&raw_encoded, &registry_address)
                .await
                .map_err(|err| err.to_string())
                .and_then(|v| serde_json::to_string(&v).map_err(|err| err.to_string()))
        })
        .await?;

    parse_execution_result(serde_json::from_str(&value)?)
}

pub struct Call {
    call: CallObject,
    block: BlockParameter,
}

#[async_trait]
impl RpcHandler for Call {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let call = validator::call_object(validator::required(params, 0, "transaction")?, 0, "transaction")?;
        let block = match params.get(1) {
            Some(value) => validator::block_parameter(value, 1, "block")?,
            None => BlockParameter::Latest,
        };
        Ok(Call { call, block })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        info!("eth_call at block {:?}", self.block);
        let result = execute(&context, "call", &self.call).await?;
        Ok(Value::String(result.return_data))
    }
}

pub struct EstimateGas {
    call: CallObject,
    block: BlockParameter,
}

#[async_trait]
impl RpcHandler for EstimateGas {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let call = validator::call_object(validator::required(params, 0, "transaction")?, 0, "transaction")?;
        let block = match params.get(1) {
            Some(value) => validator::block_parameter(value, 1, "block")?,
            None => BlockParameter::Latest,
        };
        Ok(EstimateGas { call, block })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        info!("eth_estimateGas at block {:?}", self.block);
        let result = execute(&context, "estimateGas", &self.call).await?;

        let system_log = result
            .logs
            .into_iter()
            .map(BackendLogJson::into_raw)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .find_map(|log| log.parse_system_log().ok())
            .ok_or_else(|| RpcErr::Internal("backend did not report a polyjuice system log".to_string()))?;

        let data = self.call.data.clone().unwrap_or_default();
        let intrinsic = gw_codec::intrinsic_gas(self.call.to, &data);
        let estimated = (system_log.gas_used + context.config.extra_estimate_gas).max(intrinsic);

        Ok(Value::String(gw_codec::hex_canon::encode_hex_number(estimated as u128)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::CallObject;

    #[test]
    fn fingerprint_omits_unset_fields_as_null() {
        let call = CallObject { from: None, to: None, gas: None, gas_price: None, value: None, data: None };
        let params = call_fingerprint_params(&call);
        assert_eq!(params["from"], Value::Null);
        assert_eq!(params["data"], Value::Null);
    }

    #[test]
    fn fingerprint_is_stable_for_identical_calls() {
        let call = CallObject {
            from: None,
            to: None,
            gas: Some(21000),
            gas_price: None,
            value: None,
            data: Some(vec![0xde, 0xad]),
        };
        assert_eq!(call_fingerprint_params(&call), call_fingerprint_params(&call));
    }
}
