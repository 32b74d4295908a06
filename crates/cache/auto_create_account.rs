//! `aca:<ethHash> → {rawEthTxHex, fromAddress}` — the stash for a
//! transaction submitted before its signer had a backend account. Kept
//! until the relational store has a finalised entry for the transaction;
//! carries a longer TTL than [`crate::tx_hash_index::TxHashIndex`]'s
//! mappings since account creation can lag submission by more than one
//! poll interval.

use crate::error::CacheError;
use crate::redis_client::RedisClient;
use ethereum_types::H256;
use gw_codec::AutoCreateAccountEntry;
use std::time::Duration;

const ACA_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct AutoCreateAccountCache {
    redis: RedisClient,
}

fn key(eth_hash: H256) -> String {
    format!("aca:{}", hex::encode(eth_hash.as_bytes()))
}

impl AutoCreateAccountCache {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }

    pub async fn set(&self, eth_hash: H256, entry: &AutoCreateAccountEntry) -> Result<(), CacheError> {
        let json = serde_json::to_string(entry)?;
        self.redis.set_ex(&key(eth_hash), &json, ACA_TTL).await
    }

    pub async fn get(&self, eth_hash: H256) -> Result<Option<AutoCreateAccountEntry>, CacheError> {
        match self.redis.get(&key(eth_hash)).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Removed once the relational store has a finalised entry for this
    /// transaction.
    pub async fn delete(&self, eth_hash: H256) -> Result<(), CacheError> {
        self.redis.del(&key(eth_hash)).await
    }
}
