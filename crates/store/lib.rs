//! # gw-store
//!
//! The `ReadStore` trait the RPC crate queries for anything the backend
//! itself cannot answer directly: finalised blocks, transactions, receipts
//! and logs, as indexed by whatever relational schema ingests the rollup.
//! The schema itself is out of scope here — `PgReadStore` is a runnable
//! adapter against a minimal assumed table shape, not the schema's owner.

pub mod error;
pub mod pg;
pub mod types;

pub use error::StoreError;
pub use types::*;

use async_trait::async_trait;
use ethereum_types::H256;
use gw_codec::EthAddress;

/// Read-only access to the relational store. One implementation
/// (`PgReadStore`) is provided; `RpcApiContext` depends on this trait, not
/// on `sqlx` directly, so handler code never needs to know the backing
/// engine.
#[async_trait]
pub trait ReadStore: Send + Sync + std::fmt::Debug {
    async fn get_tip_block_number(&self) -> Result<Option<u64>, StoreError>;

    async fn get_block_by_number(&self, number: u64) -> Result<Option<BlockRow>, StoreError>;

    async fn get_block_by_hash(&self, hash: H256) -> Result<Option<BlockRow>, StoreError>;

    /// Blocks with `number` in `(from, to]`, ascending — the range
    /// `BlockEmitter` re-reads on every tip advance.
    async fn get_blocks_since(&self, from_exclusive: u64, to_inclusive: u64) -> Result<Vec<BlockRow>, StoreError>;

    async fn get_transaction_by_eth_hash(&self, eth_hash: H256) -> Result<Option<TransactionRow>, StoreError>;

    async fn get_transaction_by_native_hash(&self, native_hash: H256) -> Result<Option<TransactionRow>, StoreError>;

    async fn get_receipt_by_eth_hash(&self, eth_hash: H256) -> Result<Option<ReceiptRow>, StoreError>;

    /// Logs matching the filter within `[from_block, to_block]`, ordered by
    /// ascending row id. `after_id` is `0` for a fresh poll and the filter's
    /// cursor otherwise.
    async fn get_logs(&self, query: LogQuery) -> Result<Vec<LogRow>, StoreError>;
}

/// The parameters common to `eth_getLogs` and `LogFilter` polling.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    pub from_block: u64,
    pub to_block: u64,
    pub addresses: Vec<EthAddress>,
    pub topics: Vec<Vec<H256>>,
    pub after_id: u64,
}

pub use pg::PgReadStore;
