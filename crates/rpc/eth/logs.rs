//! `eth_getLogs`.

use crate::context::RpcApiContext;
use crate::eth_types::build_api_log;
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use crate::validator;
use async_trait::async_trait;
use ethereum_types::H256;
use gw_codec::EthAddress;
use gw_store::LogQuery;
use serde_json::Value;
use tracing::info;

/// The maximum block range a single `eth_getLogs` call may span — unbounded
/// ranges against a growing log table would let one caller starve every
/// other request.
const MAX_BLOCK_RANGE: u64 = 10_000;

pub struct GetLogs {
    from_block: u64,
    to_block: u64,
    addresses: Vec<EthAddress>,
    topics: Vec<Vec<H256>>,
}

fn parse_addresses(value: &Value, index: usize) -> Result<Vec<EthAddress>, RpcErr> {
    if let Some(array) = value.as_array() {
        array.iter().map(|v| validator::address(v, index, "address")).collect()
    } else {
        Ok(vec![validator::address(value, index, "address")?])
    }
}

fn parse_topics(value: &Value, index: usize) -> Result<Vec<Vec<H256>>, RpcErr> {
    let array = value.as_array().ok_or_else(|| RpcErr::invalid_params(index, "topics", "expected an array"))?;
    array
        .iter()
        .map(|entry| match entry {
            Value::Null => Ok(Vec::new()),
            Value::Array(alternatives) => alternatives.iter().map(|v| validator::hash(v, index, "topics")).collect(),
            other => Ok(vec![validator::hash(other, index, "topics")?]),
        })
        .collect()
}

#[async_trait]
impl RpcHandler for GetLogs {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let filter = validator::required(params, 0, "filter")?;
        let obj = filter.as_object().ok_or_else(|| RpcErr::invalid_params(0, "filter", "expected an object"))?;

        let from_block = obj.get("fromBlock").map(|v| validator::hex_number_u64(v, 0, "fromBlock")).transpose()?.unwrap_or(0);
        let to_block = match obj.get("toBlock") {
            Some(v) => validator::hex_number_u64(v, 0, "toBlock")?,
            None => u64::MAX,
        };
        if to_block.saturating_sub(from_block) > MAX_BLOCK_RANGE {
            return Err(RpcErr::LimitExceeded(format!("block range exceeds {MAX_BLOCK_RANGE}")));
        }

        let addresses = obj.get("address").map(|v| parse_addresses(v, 0)).transpose()?.unwrap_or_default();
        let topics = obj.get("topics").map(|v| parse_topics(v, 0)).transpose()?.unwrap_or_default();

        Ok(GetLogs { from_block, to_block, addresses, topics })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        info!("eth_getLogs from {} to {}", self.from_block, self.to_block);
        let to_block = match self.to_block {
            u64::MAX => context.store.get_tip_block_number().await?.unwrap_or(0),
            n => n,
        };

        let query = LogQuery {
            from_block: self.from_block,
            to_block,
            addresses: self.addresses.clone(),
            topics: self.topics.clone(),
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
    fn single_address_wraps_into_one_element_vec() {
        let value = json!("0x0000000000000000000000000000000000000001");
        let addresses = parse_addresses(&value, 0).unwrap();
        assert_eq!(addresses.len(), 1);
    }

    #[test]
    fn address_array_parses_every_element() {
        let value = json!(["0x0000000000000000000000000000000000000001", "0x0000000000000000000000000000000000000002"]);
        let addresses = parse_addresses(&value, 0).unwrap();
        assert_eq!(addresses.len(), 2);
    }

    #[test]
    fn null_topic_slot_means_any_value() {
        let value = json!([null, "0x0000000000000000000000000000000000000000000000000000000000000001"]);
        let topics = parse_topics(&value, 0).unwrap();
        assert!(topics[0].is_empty());
        assert_eq!(topics[1].len(), 1);
    }

    #[test]
    fn topic_alternatives_parse_as_or() {
        let value = json!([[
            "0x0000000000000000000000000000000000000000000000000000000000000001",
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        ]]);
        let topics = parse_topics(&value, 0).unwrap();
        assert_eq!(topics[0].len(), 2);
    }
}
