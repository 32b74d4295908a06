//! JSON-RPC wire types and the gateway's error sum type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every way a handler, validator, or outbound call can fail, mapped to the
/// error code table in `§7`. Handlers return this directly via `?`; nothing
/// catches and re-wraps it into a generic "internal error" along the way.
#[derive(Debug, thiserror::Error)]
pub enum RpcErr {
    #[error("parse error")]
    ParseError,
    #[error("invalid request")]
    InvalidRequest,
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("invalid argument {index}: {path} -> {detail}")]
    InvalidParams { index: usize, path: String, detail: String },
    #[error("internal error: {0}")]
    Internal(String),
    #[error("header not found")]
    HeaderNotFound,
    #[error("execution reverted: {message}")]
    TransactionExecutionError { message: String, data: String },
    #[error("method not supported")]
    MethodNotSupported,
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    #[error("backend rpc error: {0}")]
    BackendRpcError(String),
    #[error("web3 error: {0}")]
    Web3Error(String),
}

impl RpcErr {
    pub fn invalid_params(index: usize, path: impl Into<String>, detail: impl Into<String>) -> Self {
        RpcErr::InvalidParams { index, path: path.into(), detail: detail.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcErrorMetadata {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl From<&RpcErr> for RpcErrorMetadata {
    fn from(err: &RpcErr) -> Self {
        let (code, data) = match err {
            RpcErr::ParseError => (-32700, None),
            RpcErr::InvalidRequest => (-32600, None),
            RpcErr::MethodNotFound(_) => (-32601, None),
            RpcErr::InvalidParams { .. } => (-32602, None),
            RpcErr::Internal(_) => (-32603, None),
            RpcErr::HeaderNotFound => (-32000, None),
            RpcErr::TransactionExecutionError { data, .. } => (-32000, Some(data.clone())),
            RpcErr::MethodNotSupported => (-32004, None),
            RpcErr::LimitExceeded(_) => (-32005, None),
            RpcErr::BackendRpcError(_) => (-32098, None),
            RpcErr::Web3Error(_) => (-32099, None),
        };
        RpcErrorMetadata { code, message: err.to_string(), data }
    }
}

impl From<serde_json::Error> for RpcErr {
    fn from(err: serde_json::Error) -> Self {
        RpcErr::Internal(format!("serialisation error: {err}"))
    }
}

impl From<gw_store::StoreError> for RpcErr {
    fn from(err: gw_store::StoreError) -> Self {
        RpcErr::Internal(format!("store error: {err}"))
    }
}

impl From<gw_cache::CacheError> for RpcErr {
    fn from(err: gw_cache::CacheError) -> Self {
        match err {
            gw_cache::CacheError::Timeout => RpcErr::Internal("cache timed out".to_string()),
            gw_cache::CacheError::Failed(message) => RpcErr::TransactionExecutionError { message, data: "0x".to_string() },
            other => RpcErr::Internal(format!("cache error: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RpcRequestId {
    Number(i64),
    String(String),
}

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub id: RpcRequestId,
    pub method: String,
    #[serde(default)]
    pub params: Option<Vec<Value>>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RpcNamespace {
    Eth,
    Net,
    Web3,
    Poly,
    Gw,
}

impl RpcRequest {
    pub fn namespace(&self) -> Result<RpcNamespace, RpcErr> {
        match self.method.split('_').next() {
            Some("eth") => Ok(RpcNamespace::Eth),
            Some("net") => Ok(RpcNamespace::Net),
            Some("web3") => Ok(RpcNamespace::Web3),
            Some("poly") => Ok(RpcNamespace::Poly),
            Some("gw") => Ok(RpcNamespace::Gw),
            _ => Err(RpcErr::MethodNotFound(self.method.clone())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RpcSuccessResponse {
    pub id: RpcRequestId,
    pub jsonrpc: &'static str,
    pub result: Value,
}

#[derive(Debug, Serialize)]
pub struct RpcErrorResponse {
    pub id: RpcRequestId,
    pub jsonrpc: &'static str,
    pub error: RpcErrorMetadata,
}

impl RpcSuccessResponse {
    pub fn new(id: RpcRequestId, result: Value) -> Self {
        Self { id, jsonrpc: "2.0", result }
    }
}

impl RpcErrorResponse {
    pub fn new(id: RpcRequestId, err: &RpcErr) -> Self {
        Self { id, jsonrpc: "2.0", error: err.into() }
    }
}
