//! Resolves between Ethereum transaction hashes and backend native
//! transaction hashes.
//!
//! Resolution order for both directions: the relational store first (it is
//! authoritative once a transaction is finalised), then the Redis mapping
//! written at submission time (pre-finality). Both directions are written
//! together with the same TTL so neither can answer for the other once one
//! expires.

use crate::error::CacheError;
use crate::redis_client::RedisClient;
use ethereum_types::H256;
use gw_store::ReadStore;
use std::sync::Arc;
use std::time::Duration;

const MAPPING_TTL: Duration = Duration::from_secs(10 * 60);

fn eth_key(eth_hash: H256) -> String {
    format!("tx:mapping:eth:{}", hex::encode(eth_hash.as_bytes()))
}

fn native_key(native_hash: H256) -> String {
    format!("tx:mapping:gw:{}", hex::encode(native_hash.as_bytes()))
}

#[derive(Clone)]
pub struct TxHashIndex {
    redis: RedisClient,
    store: Arc<dyn ReadStore>,
}

impl TxHashIndex {
    pub fn new(redis: RedisClient, store: Arc<dyn ReadStore>) -> Self {
        Self { redis, store }
    }

    pub async fn submit(&self, eth_hash: H256, native_hash: H256) -> Result<(), CacheError> {
        let eth_hex = hex::encode(native_hash.as_bytes());
        let native_hex = hex::encode(eth_hash.as_bytes());
        self.redis.set_ex(&eth_key(eth_hash), &eth_hex, MAPPING_TTL).await?;
        self.redis.set_ex(&native_key(native_hash), &native_hex, MAPPING_TTL).await?;
        Ok(())
    }

    pub async fn eth_to_native(&self, eth_hash: H256) -> Result<Option<H256>, CacheError> {
        if let Some(tx) = self.store.get_transaction_by_eth_hash(eth_hash).await? {
            return Ok(Some(tx.native_hash));
        }
        match self.redis.get(&eth_key(eth_hash)).await? {
            Some(hex_str) => Ok(Some(parse_h256(&hex_str))),
            None => Ok(None),
        }
    }

    pub async fn native_to_eth(&self, native_hash: H256) -> Result<Option<H256>, CacheError> {
        if let Some(tx) = self.store.get_transaction_by_native_hash(native_hash).await? {
            return Ok(Some(tx.eth_hash));
        }
        match self.redis.get(&native_key(native_hash)).await? {
            Some(hex_str) => Ok(Some(parse_h256(&hex_str))),
            None => Ok(None),
        }
    }
}

fn parse_h256(hex_str: &str) -> H256 {
    let bytes = hex::decode(hex_str).unwrap_or_else(|_| vec![0u8; 32]);
    H256::from_slice(&bytes)
}
