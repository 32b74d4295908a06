//! Postgres-backed [`crate::ReadStore`].
//!
//! Assumed schema (built and migrated elsewhere — out of scope here):
//!
//! ```sql
//! -- blocks(number bigint primary key, hash bytea, parent_hash bytea, timestamp bigint)
//! -- transactions(eth_hash bytea primary key, native_hash bytea, block_number bigint,
//! --   block_hash bytea, transaction_index int, from_address bytea, to_address bytea null,
//! --   raw_eth_tx bytea)
//! -- receipts(eth_hash bytea primary key, block_number bigint, block_hash bytea,
//! --   transaction_index int, cumulative_gas_used bigint, gas_used bigint, status bool,
//! --   contract_address bytea null, logs_bloom bytea)
//! -- logs(id bigserial primary key, block_number bigint, block_hash bytea,
//! --   transaction_hash bytea, log_index int, address bytea, data bytea, topics bytea[])
//! ```

use async_trait::async_trait;
use ethereum_types::H256;
use gw_codec::EthAddress;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::{BlockRow, LogQuery, LogRow, ReadStore, ReceiptRow, StoreError, TransactionRow};

#[derive(Debug, Clone)]
pub struct PgReadStore {
    pool: PgPool,
}

impl PgReadStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn h256(bytes: &[u8]) -> H256 {
    H256::from_slice(bytes)
}

fn eth_address(bytes: &[u8]) -> EthAddress {
    EthAddress::from_slice(bytes)
}

/// Each position in `wanted` is an OR of alternatives (empty = wildcard);
/// the positions themselves are ANDed, matching `eth_getLogs`' `topics`
/// filter semantics.
fn topics_match(wanted: &[Vec<H256>], actual: &[H256]) -> bool {
    wanted.iter().enumerate().all(|(i, alternatives)| {
        alternatives.is_empty() || actual.get(i).is_some_and(|topic| alternatives.contains(topic))
    })
}

#[async_trait]
impl ReadStore for PgReadStore {
    async fn get_tip_block_number(&self) -> Result<Option<u64>, StoreError> {
        let row = sqlx::query("SELECT max(number) AS number FROM blocks")
            .fetch_one(&self.pool)
            .await?;
        let number: Option<i64> = row.try_get("number").map_err(StoreError::Database)?;
        Ok(number.map(|n| n as u64))
    }

    async fn get_block_by_number(&self, number: u64) -> Result<Option<BlockRow>, StoreError> {
        let row = sqlx::query(
            "SELECT number, hash, parent_hash, timestamp FROM blocks WHERE number = $1",
        )
        .bind(number as i64)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| BlockRow {
            number: row.get::<i64, _>("number") as u64,
            hash: h256(row.get::<Vec<u8>, _>("hash").as_slice()),
            parent_hash: h256(row.get::<Vec<u8>, _>("parent_hash").as_slice()),
            timestamp: row.get::<i64, _>("timestamp") as u64,
        }))
    }

    async fn get_block_by_hash(&self, hash: H256) -> Result<Option<BlockRow>, StoreError> {
        let row = sqlx::query(
            "SELECT number, hash, parent_hash, timestamp FROM blocks WHERE hash = $1",
        )
        .bind(hash.as_bytes())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| BlockRow {
            number: row.get::<i64, _>("number") as u64,
            hash: h256(row.get::<Vec<u8>, _>("hash").as_slice()),
            parent_hash: h256(row.get::<Vec<u8>, _>("parent_hash").as_slice()),
            timestamp: row.get::<i64, _>("timestamp") as u64,
        }))
    }

    async fn get_blocks_since(&self, from_exclusive: u64, to_inclusive: u64) -> Result<Vec<BlockRow>, StoreError> {
        let rows = sqlx::query(
            "SELECT number, hash, parent_hash, timestamp FROM blocks \
             WHERE number > $1 AND number <= $2 ORDER BY number ASC",
        )
        .bind(from_exclusive as i64)
        .bind(to_inclusive as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| BlockRow {
                number: row.get::<i64, _>("number") as u64,
                hash: h256(row.get::<Vec<u8>, _>("hash").as_slice()),
                parent_hash: h256(row.get::<Vec<u8>, _>("parent_hash").as_slice()),
                timestamp: row.get::<i64, _>("timestamp") as u64,
            })
            .collect())
    }

    async fn get_transaction_by_eth_hash(&self, eth_hash: H256) -> Result<Option<TransactionRow>, StoreError> {
        let row = sqlx::query(
            "SELECT eth_hash, native_hash, block_number, block_hash, transaction_index, \
             from_address, to_address, raw_eth_tx FROM transactions WHERE eth_hash = $1",
        )
        .bind(eth_hash.as_bytes())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| TransactionRow {
            eth_hash: h256(row.get::<Vec<u8>, _>("eth_hash").as_slice()),
            native_hash: h256(row.get::<Vec<u8>, _>("native_hash").as_slice()),
            block_number: row.get::<i64, _>("block_number") as u64,
            block_hash: h256(row.get::<Vec<u8>, _>("block_hash").as_slice()),
            transaction_index: row.get::<i32, _>("transaction_index") as u32,
            from_address: eth_address(row.get::<Vec<u8>, _>("from_address").as_slice()),
            to_address: row
                .get::<Option<Vec<u8>>, _>("to_address")
                .map(|bytes| eth_address(bytes.as_slice())),
            raw_eth_tx: row.get::<Vec<u8>, _>("raw_eth_tx"),
        }))
    }

    async fn get_transaction_by_native_hash(&self, native_hash: H256) -> Result<Option<TransactionRow>, StoreError> {
        let row = sqlx::query(
            "SELECT eth_hash, native_hash, block_number, block_hash, transaction_index, \
             from_address, to_address, raw_eth_tx FROM transactions WHERE native_hash = $1",
        )
        .bind(native_hash.as_bytes())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| TransactionRow {
            eth_hash: h256(row.get::<Vec<u8>, _>("eth_hash").as_slice()),
            native_hash: h256(row.get::<Vec<u8>, _>("native_hash").as_slice()),
            block_number: row.get::<i64, _>("block_number") as u64,
            block_hash: h256(row.get::<Vec<u8>, _>("block_hash").as_slice()),
            transaction_index: row.get::<i32, _>("transaction_index") as u32,
            from_address: eth_address(row.get::<Vec<u8>, _>("from_address").as_slice()),
            to_address: row
                .get::<Option<Vec<u8>>, _>("to_address")
                .map(|bytes| eth_address(bytes.as_slice())),
            raw_eth_tx: row.get::<Vec<u8>, _>("raw_eth_tx"),
        }))
    }

    async fn get_receipt_by_eth_hash(&self, eth_hash: H256) -> Result<Option<ReceiptRow>, StoreError> {
        let row = sqlx::query(
            "SELECT eth_hash, block_number, block_hash, transaction_index, cumulative_gas_used, \
             gas_used, status, contract_address, logs_bloom FROM receipts WHERE eth_hash = $1",
        )
        .bind(eth_hash.as_bytes())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| ReceiptRow {
            eth_hash: h256(row.get::<Vec<u8>, _>("eth_hash").as_slice()),
            block_number: row.get::<i64, _>("block_number") as u64,
            block_hash: h256(row.get::<Vec<u8>, _>("block_hash").as_slice()),
            transaction_index: row.get::<i32, _>("transaction_index") as u32,
            cumulative_gas_used: row.get::<i64, _>("cumulative_gas_used") as u64,
            gas_used: row.get::<i64, _>("gas_used") as u64,
            status: row.get::<bool, _>("status"),
            contract_address: row
                .get::<Option<Vec<u8>>, _>("contract_address")
                .map(|bytes| eth_address(bytes.as_slice())),
            logs_bloom: row.get::<Vec<u8>, _>("logs_bloom"),
        }))
    }

    async fn get_logs(&self, query: LogQuery) -> Result<Vec<LogRow>, StoreError> {
        // Address/topic filtering happens in-process below; only the block
        // range and cursor are pushed down to SQL, keeping this query shape
        // stable regardless of how exotic a caller's topic filter is.
        let rows = sqlx::query(
            "SELECT id, block_number, block_hash, transaction_hash, log_index, address, data, topics \
             FROM logs WHERE block_number >= $1 AND block_number <= $2 AND id > $3 \
             ORDER BY id ASC",
        )
        .bind(query.from_block as i64)
        .bind(query.to_block as i64)
        .bind(query.after_id as i64)
        .fetch_all(&self.pool)
        .await?;

        let logs: Vec<LogRow> = rows
            .into_iter()
            .map(|row| LogRow {
                id: row.get::<i64, _>("id") as u64,
                block_number: row.get::<i64, _>("block_number") as u64,
                block_hash: h256(row.get::<Vec<u8>, _>("block_hash").as_slice()),
                transaction_hash: h256(row.get::<Vec<u8>, _>("transaction_hash").as_slice()),
                log_index: row.get::<i32, _>("log_index") as u32,
                address: eth_address(row.get::<Vec<u8>, _>("address").as_slice()),
                data: row.get::<Vec<u8>, _>("data"),
                topics: row
                    .get::<Vec<Vec<u8>>, _>("topics")
                    .iter()
                    .map(|bytes| h256(bytes))
                    .collect(),
            })
            .collect();

        Ok(logs
            .into_iter()
            .filter(|log| query.addresses.is_empty() || query.addresses.contains(&log.address))
            .filter(|log| topics_match(&query.topics, &log.topics))
            .collect())
    }
}
