//! `eth_newFilter`, `eth_newBlockFilter`, `eth_newPendingTransactionFilter`,
//! `eth_uninstallFilter`, `eth_getFilterChanges`, `eth_getFilterLogs`.
//!
//! Filter state itself lives in [`crate::filter_manager::FilterManager`];
//! these handlers only translate between the wire shapes and it, and do
//! the store queries a poll actually needs.

use crate::context::RpcApiContext;
use crate::eth_types::build_api_log;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use crate::validator::{self, BlockParameter};
use async_trait::async_trait;
use gw_codec::{BlockTag, EthAddress, Filter, FilterId, FilterKind, LogFilterParams};
use gw_store::LogQuery;
use serde_json::Value;
use tracing::info;

fn parse_filter_id(value: &Value, index: usize) -> Result<FilterId, RpcErr> {
    let bytes = validator::hex_bytes(value, index, "filterId")?;
    if bytes.len() != 16 {
        return Err(RpcErr::invalid_params(index, "filterId", "expected a 16-byte filter id"));
    }
    let mut id = [0u8; 16];
    id.copy_from_slice(&bytes);
    Ok(FilterId(id))
}

fn touch_or_err(context: &RpcApiContext, id: FilterId) -> Result<Filter, RpcErr> {
    context.filters.touch(id).ok_or_else(|| RpcErr::invalid_params(0, "filterId", "unknown or expired filter"))
}

/// `fromBlock`/`toBlock` accept a tag (`"latest"`, `"earliest"`, `"pending"`)
/// or a hex number — never a block-hash object, which `block_parameter`
/// otherwise allows for the single-block `eth_call`-style parameter.
fn block_tag(value: &Value, index: usize, path: &str) -> Result<BlockTag, RpcErr> {
    match validator::block_parameter(value, index, path)? {
        BlockParameter::Earliest => Ok(BlockTag::Earliest),
        BlockParameter::Latest => Ok(BlockTag::Latest),
        BlockParameter::Pending => Ok(BlockTag::Pending),
        BlockParameter::Number(n) => Ok(BlockTag::Number(n)),
        BlockParameter::Hash { .. } => Err(RpcErr::invalid_params(index, path, "expected a block tag or number")),
    }
}

fn parse_log_filter_params(value: &Value) -> Result<LogFilterParams, RpcErr> {
    let obj = value.as_object().ok_or_else(|| RpcErr::invalid_params(0, "filter", "expected an object"))?;

    let from_block = obj.get("fromBlock").map(|v| block_tag(v, 0, "fromBlock")).transpose()?;
    let to_block = obj.get("toBlock").map(|v| block_tag(v, 0, "toBlock")).transpose()?;

    let addresses: Vec<EthAddress> = match obj.get("address") {
        Some(Value::Array(values)) => values.iter().map(|v| validator::address(v, 0, "address")).collect::<Result<_, _>>()?,
        Some(other) => vec![validator::address(other, 0, "address")?],
        None => Vec::new(),
    };

    let topics = match obj.get("topics") {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| match entry {
                Value::Null => Ok(Vec::new()),
                Value::Array(alternatives) => alternatives.iter().map(|v| validator::hash(v, 0, "topics")).collect(),
                other => Ok(vec![validator::hash(other, 0, "topics")?]),
            })
            .collect::<Result<_, RpcErr>>()?,
        _ => Vec::new(),
    };

    Ok(LogFilterParams { from_block, to_block, addresses, topics })
}

pub struct NewFilter {
    params: LogFilterParams,
}

#[async_trait]
impl RpcHandler for NewFilter {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let filter = parse_log_filter_params(validator::required(params, 0, "filter")?)?;
        Ok(NewFilter { params: filter })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        let id = context.filters.install(FilterKind::LogFilter(self.params.clone()), 0);
        Ok(Value::String(id.to_string()))
    }
}

pub struct NewBlockFilter;

#[async_trait]
impl RpcHandler for NewBlockFilter {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(NewBlockFilter)
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        let tip = context.store.get_tip_block_number().await?.unwrap_or(0);
        let id = context.filters.install(FilterKind::BlockFilter, tip);
        Ok(Value::String(id.to_string()))
    }
}

pub struct NewPendingTransactionFilter;

#[async_trait]
impl RpcHandler for NewPendingTransactionFilter {
    fn parse(_params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        Ok(NewPendingTransactionFilter)
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        let id = context.filters.install(FilterKind::PendingTxFilter, 0);
        Ok(Value::String(id.to_string()))
    }
}

pub struct UninstallFilter {
    id: FilterId,
}

#[async_trait]
impl RpcHandler for UninstallFilter {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let id = parse_filter_id(validator::required(params, 0, "filterId")?, 0)?;
        Ok(UninstallFilter { id })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        Ok(Value::Bool(context.filters.uninstall(self.id)))
    }
}

pub struct GetFilterChanges {
    id: FilterId,
}

#[async_trait]
impl RpcHandler for GetFilterChanges {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let id = parse_filter_id(validator::required(params, 0, "filterId")?, 0)?;
        Ok(GetFilterChanges { id })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        info!("eth_getFilterChanges {:?}", self.id);
        let filter = touch_or_err(&context, self.id)?;

        match filter.kind {
            FilterKind::BlockFilter => {
                let tip = context.store.get_tip_block_number().await?.unwrap_or(filter.last_poll);
                let blocks = context.store.get_blocks_since(filter.last_poll, tip).await?;
                if let Some(last) = blocks.last() {
                    context.filters.advance(self.id, last.number);
                }
                let hashes: Vec<Value> = blocks.iter().map(|b| Value::String(gw_codec::hex_canon::encode_hex(b.hash.as_bytes()))).collect();
                Ok(Value::Array(hashes))
            }
            FilterKind::PendingTxFilter => Ok(Value::Array(Vec::new())),
            FilterKind::LogFilter(params) => {
                let tip = context.store.get_tip_block_number().await?.unwrap_or(0);
                let query = LogQuery {
                    from_block: params.from_block.map(|t| t.resolve(tip)).unwrap_or(0),
                    to_block: params.to_block.map(|t| t.resolve(tip)).unwrap_or(tip),
                    addresses: params.addresses,
                    topics: params.topics,
                    after_id: filter.last_poll,
                };
                let rows = context.store.get_logs(query).await?;
                if let Some(last) = rows.last() {
                    context.filters.advance(self.id, last.id);
                }
                let logs: Vec<_> = rows.iter().map(build_api_log).collect();
                Ok(serde_json::to_value(logs)?)
            }
        }
    }
}

pub struct GetFilterLogs {
    id: FilterId,
}

#[async_trait]
impl RpcHandler for GetFilterLogs {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let id = parse_filter_id(validator::required(params, 0, "filterId")?, 0)?;
        Ok(GetFilterLogs { id })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        let filter = touch_or_err(&context, self.id)?;
        let FilterKind::LogFilter(params) = filter.kind else {
            return Err(RpcErr::invalid_params(0, "filterId", "not a log filter"));
        };

        let tip = context.store.get_tip_block_number().await?.unwrap_or(0);
        let query = LogQuery {
            from_block: params.from_block.map(|t| t.resolve(tip)).unwrap_or(0),
            to_block: params.to_block.map(|t| t.resolve(tip)).unwrap_or(tip),
            addresses: params.addresses,
            topics: params.topics,
            after_id: 0,
        };
        let rows = context.store.get_logs(query).await?;
        let logs: Vec<_> = rows.iter().map(build_api_log).collect();
        Ok(serde_json::to_value(logs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_id_round_trips_through_hex() {
        let id = FilterId([7u8; 16]);
        let value = json!(id.to_string());
        assert_eq!(parse_filter_id(&value, 0).unwrap(), id);
    }

    #[test]
    fn filter_id_rejects_wrong_length() {
        let value = json!("0xabcd");
        assert!(parse_filter_id(&value, 0).is_err());
    }

    #[test]
    fn log_filter_params_default_to_open_range() {
        let params = parse_log_filter_params(&json!({})).unwrap();
        assert_eq!(params.from_block, None);
        assert_eq!(params.to_block, None);
        assert!(params.addresses.is_empty());
        assert!(params.topics.is_empty());
    }

    #[test]
    fn log_filter_params_reads_single_address() {
        let params = parse_log_filter_params(&json!({
            "address": "0x0000000000000000000000000000000000000001",
            "fromBlock": "0x1",
            "toBlock": "0x10"
        }))
        .unwrap();
        assert_eq!(params.addresses.len(), 1);
        assert_eq!(params.from_block, Some(BlockTag::Number(1)));
        assert_eq!(params.to_block, Some(BlockTag::Number(16)));
    }

    #[test]
    fn log_filter_params_accepts_block_tags() {
        let params = parse_log_filter_params(&json!({"fromBlock": "latest", "toBlock": "latest"})).unwrap();
        assert_eq!(params.from_block, Some(BlockTag::Latest));
        assert_eq!(params.to_block, Some(BlockTag::Latest));
    }

    #[test]
    fn log_filter_params_rejects_block_hash_object() {
        let value = json!({"fromBlock": {"blockHash": format!("0x{}", "11".repeat(32))}});
        assert!(parse_log_filter_params(&value).is_err());
    }
}
