//! A minimal JSON-RPC client for the rollup backend's native RPC: one
//! `reqwest::Client`, one method that posts a JSON-RPC envelope and unwraps
//! `result`/`error`, and a set of small typed helpers built on top of it.
//!
//! Reads go to `reader_url`, writes (`submit_l2transaction`) go to
//! `writer_url` — the backend may run separate read/write RPC endpoints.

use crate::rpc_types::RpcErr;
use ethereum_types::{H256, U256};
use gw_codec::{AccountId, BackendScriptHash};
use serde_json::{json, Value};

#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    writer_url: String,
    reader_url: String,
}

/// Prefix the backend wraps its own error messages in, allowing the
/// gateway to distinguish "backend rejected the request" from "backend is
/// unreachable".
const BACKEND_ERROR_MARKER: &str = "GodwokenError: ";

impl BackendClient {
    pub fn new(writer_url: impl Into<String>, reader_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), writer_url: writer_url.into(), reader_url: reader_url.into() }
    }

    async fn call(&self, url: &str, method: &str, params: Vec<Value>) -> Result<Value, RpcErr> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| RpcErr::Internal(format!("backend connection error: {err}")))?;

        let envelope: Value = response
            .json()
            .await
            .map_err(|err| RpcErr::Internal(format!("backend returned malformed JSON: {err}")))?;

        if let Some(error) = envelope.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown backend error")
                .to_string();
            return Err(match message.strip_prefix(BACKEND_ERROR_MARKER) {
                Some(inner) => RpcErr::BackendRpcError(inner.to_string()),
                None => RpcErr::BackendRpcError(message),
            });
        }

        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| RpcErr::Internal("backend response missing result".to_string()))
    }

    async fn read(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcErr> {
        self.call(&self.reader_url, method, params).await
    }

    async fn write(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcErr> {
        self.call(&self.writer_url, method, params).await
    }

    pub async fn get_account_id_by_script_hash(&self, script_hash: BackendScriptHash) -> Result<Option<AccountId>, RpcErr> {
        let result = self.read("gw_get_account_id_by_script_hash", vec![json!(gw_codec::hex_canon::encode_hex(script_hash.as_bytes()))]).await?;
        Ok(result.as_u64().map(|id| AccountId(id as u32)))
    }

    pub async fn get_balance(&self, registry_address: &[u8], sudt_id: u32) -> Result<U256, RpcErr> {
        let result = self
            .read(
                "gw_get_balance",
                vec![json!(gw_codec::hex_canon::encode_hex(registry_address)), json!(sudt_id)],
            )
            .await?;
        parse_hex_u256(&result)
    }

    pub async fn get_storage_at(&self, account_id: AccountId, key: H256) -> Result<H256, RpcErr> {
        let result = self
            .read(
                "gw_get_storage_at",
                vec![json!(account_id.0), json!(gw_codec::hex_canon::encode_hex(key.as_bytes()))],
            )
            .await?;
        let bytes = result.as_str().map(gw_codec::hex_canon::decode_hex).transpose()
            .map_err(|err| RpcErr::Internal(err.to_string()))?
            .unwrap_or_default();
        Ok(H256::from_slice(&bytes))
    }

    pub async fn get_data(&self, data_hash: H256) -> Result<Option<Vec<u8>>, RpcErr> {
        let result = self
            .read("gw_get_data", vec![json!(gw_codec::hex_canon::encode_hex(data_hash.as_bytes()))])
            .await?;
        match result.as_str() {
            Some(hex_str) => Ok(Some(
                gw_codec::hex_canon::decode_hex(hex_str).map_err(|err| RpcErr::Internal(err.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// `registry_address` identifies the caller — a `(registryId, addrLen,
    /// addr)` tuple — since an `eth_call`/`eth_estimateGas` request carries
    /// no signature to recover a sender from.
    pub async fn execute_raw_l2transaction(&self, raw_tx_encoded: &[u8], registry_address: &[u8]) -> Result<Value, RpcErr> {
        self.read(
            "gw_execute_raw_l2transaction",
            vec![
                json!(gw_codec::hex_canon::encode_hex(raw_tx_encoded)),
                json!(gw_codec::hex_canon::encode_hex(registry_address)),
            ],
        )
        .await
    }

    pub async fn submit_l2transaction(&self, tx_encoded: &[u8]) -> Result<H256, RpcErr> {
        let result = self
            .write("gw_submit_l2transaction", vec![json!(gw_codec::hex_canon::encode_hex(tx_encoded))])
            .await?;
        let hex_str = result.as_str().ok_or_else(|| RpcErr::Internal("backend did not return a hash".to_string()))?;
        let bytes = gw_codec::hex_canon::decode_hex(hex_str).map_err(|err| RpcErr::Internal(err.to_string()))?;
        Ok(H256::from_slice(&bytes))
    }

    pub async fn get_transaction_by_hash(&self, native_hash: H256) -> Result<Option<Value>, RpcErr> {
        let result = self
            .read("gw_get_transaction", vec![json!(gw_codec::hex_canon::encode_hex(native_hash.as_bytes()))])
            .await?;
        Ok(if result.is_null() { None } else { Some(result) })
    }

    /// Forwards a `gw_*` method verbatim to the backend's reader or writer
    /// endpoint, for methods the gateway does not itself need to interpret.
    pub async fn forward(&self, method: &str, params: Vec<Value>, write: bool) -> Result<Value, RpcErr> {
        if write {
            self.write(method, params).await
        } else {
            self.read(method, params).await
        }
    }
}

/// The backend stores balances as raw little-endian 32-byte integers; this
/// decodes that representation rather than treating the hex string as a
/// standard big-endian Ethereum quantity.
fn parse_hex_u256(value: &Value) -> Result<U256, RpcErr> {
    let hex_str = value.as_str().ok_or_else(|| RpcErr::Internal("expected hex string".to_string()))?;
    let bytes = gw_codec::hex_canon::decode_hex(hex_str).map_err(|err| RpcErr::Internal(err.to_string()))?;
    Ok(U256::from_little_endian(&bytes))
}
