//! DTOs returned by [`crate::ReadStore`]. These mirror the columns the
//! assumed relational schema exposes — see `PgReadStore`'s queries for the
//! exact shape.

use ethereum_types::H256;
use gw_codec::EthAddress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    pub number: u64,
    pub hash: H256,
    pub parent_hash: H256,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub eth_hash: H256,
    pub native_hash: H256,
    pub block_number: u64,
    pub block_hash: H256,
    pub transaction_index: u32,
    pub from_address: EthAddress,
    pub to_address: Option<EthAddress>,
    pub raw_eth_tx: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptRow {
    pub eth_hash: H256,
    pub block_number: u64,
    pub block_hash: H256,
    pub transaction_index: u32,
    pub cumulative_gas_used: u64,
    pub gas_used: u64,
    pub status: bool,
    pub contract_address: Option<EthAddress>,
    pub logs_bloom: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub id: u64,
    pub block_number: u64,
    pub block_hash: H256,
    pub transaction_hash: H256,
    pub log_index: u32,
    pub address: EthAddress,
    pub data: Vec<u8>,
    pub topics: Vec<H256>,
}
