//! JSON-facing Ethereum view types — the shapes `eth_getTransactionByHash`,
//! `eth_getTransactionReceipt` and friends actually serialize, as distinct
//! from the backend-native [`gw_codec::NativeTx`]/[`gw_codec::NativeRawTx`]
//! wire shapes.

use ethereum_types::{H256, U256};
use gw_codec::EthAddress;
use serde::Serialize;

fn hex_u64(value: u64) -> String {
    format!("0x{value:x}")
}

fn hex_bytes(value: &[u8]) -> String {
    format!("0x{}", hex::encode(value))
}

/// A `newHeads`-shaped block view — no transactions, as the subscription
/// only ever reports headers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBlockHead {
    pub number: String,
    pub hash: H256,
    pub parent_hash: H256,
    pub timestamp: String,
}

pub fn build_api_block_head(row: &gw_store::BlockRow) -> ApiBlockHead {
    ApiBlockHead {
        number: hex_u64(row.number),
        hash: row.hash,
        parent_hash: row.parent_hash,
        timestamp: hex_u64(row.timestamp),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTransaction {
    pub hash: H256,
    pub nonce: String,
    pub block_hash: Option<H256>,
    pub block_number: Option<String>,
    pub transaction_index: Option<String>,
    pub from: EthAddress,
    pub to: Option<EthAddress>,
    pub value: U256,
    pub gas_price: U256,
    pub gas: String,
    pub input: String,
    pub v: String,
    pub r: H256,
    pub s: H256,
    pub chain_id: Option<String>,
}

/// Builds the `eth_getTransactionByHash`/filter-log transaction view from a
/// decoded Ethereum transaction, its hash, and the block it landed in —
/// or `None` for a still-pending (mempool/ACA) transaction.
pub struct ApiTransactionInputs<'a> {
    pub eth_tx: &'a gw_codec::EthRawTransaction,
    pub eth_hash: H256,
    pub from: EthAddress,
    pub block_hash: Option<H256>,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u32>,
}

pub fn build_api_transaction(inputs: ApiTransactionInputs<'_>) -> ApiTransaction {
    let tx = inputs.eth_tx;
    ApiTransaction {
        hash: inputs.eth_hash,
        nonce: hex_u64(tx.nonce),
        block_hash: inputs.block_hash,
        block_number: inputs.block_number.map(hex_u64),
        transaction_index: inputs.transaction_index.map(|i| hex_u64(i as u64)),
        from: inputs.from,
        to: tx.to,
        value: tx.value,
        gas_price: tx.gas_price,
        gas: hex_u64(tx.gas_limit),
        input: hex_bytes(&tx.data),
        v: hex_u64(tx.v),
        r: tx.r,
        s: tx.s,
        chain_id: tx.chain_id().map(hex_u64),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReceipt {
    pub transaction_hash: H256,
    pub transaction_index: String,
    pub block_hash: H256,
    pub block_number: String,
    pub from: EthAddress,
    pub to: Option<EthAddress>,
    pub cumulative_gas_used: String,
    pub gas_used: String,
    pub contract_address: Option<EthAddress>,
    pub logs: Vec<ApiLog>,
    pub logs_bloom: String,
    pub status: String,
}

pub struct ApiReceiptInputs<'a> {
    pub receipt: &'a gw_store::ReceiptRow,
    pub from: EthAddress,
    pub to: Option<EthAddress>,
    pub logs: Vec<ApiLog>,
}

pub fn build_api_receipt(inputs: ApiReceiptInputs<'_>) -> ApiReceipt {
    let receipt = inputs.receipt;
    ApiReceipt {
        transaction_hash: receipt.eth_hash,
        transaction_index: hex_u64(receipt.transaction_index as u64),
        block_hash: receipt.block_hash,
        block_number: hex_u64(receipt.block_number),
        from: inputs.from,
        to: inputs.to,
        cumulative_gas_used: hex_u64(receipt.cumulative_gas_used),
        gas_used: hex_u64(receipt.gas_used),
        contract_address: receipt.contract_address,
        logs: inputs.logs,
        logs_bloom: hex_bytes(&receipt.logs_bloom),
        status: if receipt.status { "0x1".to_string() } else { "0x0".to_string() },
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLog {
    pub address: EthAddress,
    pub topics: Vec<H256>,
    pub data: String,
    pub block_number: String,
    pub transaction_hash: H256,
    pub log_index: String,
}

pub fn build_api_log(row: &gw_store::LogRow) -> ApiLog {
    ApiLog {
        address: row.address,
        topics: row.topics.clone(),
        data: hex_bytes(&row.data),
        block_number: hex_u64(row.block_number),
        transaction_hash: row.transaction_hash,
        log_index: hex_u64(row.log_index as u64),
    }
}
