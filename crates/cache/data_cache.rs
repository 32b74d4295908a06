//! Read-through, single-flight cache for `eth_call` / `eth_estimateGas` /
//! `execute_raw_l2transaction`.
//!
//! Keyed by a fingerprint of the tip state (`tipHash`, `memPoolStateRoot`)
//! and the call parameters, so the key changes exactly when the answer
//! could change. A `PENDING` entry is claimed atomically with `SET key
//! PENDING NX PX ttl_claim`; the winner runs the compute and transitions to
//! `READY`/`FAILED`, everyone else polls.

use crate::error::CacheError;
use crate::redis_client::RedisClient;
use ethereum_types::H256;
use gw_codec::CacheEntry;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(30);
const CLAIM_TTL: Duration = Duration::from_secs(30);
/// How long a `FAILED` entry blocks a retry before a fresh attempt is let
/// through — short enough that a transient backend error self-heals within
/// one or two user-visible retries.
const NEGATIVE_CACHE_TTL: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct DataCache {
    redis: RedisClient,
    prefix: &'static str,
}

impl DataCache {
    pub fn new(redis: RedisClient, prefix: &'static str) -> Self {
        Self { redis, prefix }
    }

    /// `first64(tipHash) || first64(memPoolStateRoot) || first64(keccak(params))`.
    /// Params are the caller's JSON object with a fixed field order and
    /// `"0x"` placeholders for absent fields, so two calls that are
    /// semantically identical always serialise to the same bytes.
    pub fn fingerprint(&self, tip_hash: H256, mempool_state_root: H256, params: &serde_json::Value) -> String {
        let params_bytes = serde_json::to_vec(params).expect("Value always serialises");
        let params_hash = gw_crypto::keccak_hash(params_bytes);
        format!(
            "dataCache:{}:{}{}{}",
            self.prefix,
            hex::encode(&tip_hash.as_bytes()[..8]),
            hex::encode(&mempool_state_root.as_bytes()[..8]),
            hex::encode(&params_hash[..8]),
        )
    }

    /// Returns the memoised value for `key`, computing it via `compute` if
    /// absent. Concurrent callers for the same `key` (in this process or
    /// any other sharing this Redis) are guaranteed exactly one `compute`
    /// invocation; all see the same result.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        deadline: Duration,
        compute: F,
    ) -> Result<String, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<String, String>>,
    {
        let pending_json = serde_json::to_string(&CacheEntry::Pending)?;
        let started = tokio::time::Instant::now();

        if self.redis.claim_pending(key, &pending_json, CLAIM_TTL).await? {
            return self.run_compute(key, compute).await;
        }

        loop {
            match self.read_entry(key).await? {
                Some(CacheEntry::Ready { value }) => return Ok(value),
                Some(CacheEntry::Failed { error }) => return Err(CacheError::Failed(error)),
                Some(CacheEntry::Pending) | None => {
                    if started.elapsed() >= deadline {
                        return Err(CacheError::Timeout);
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
    }

    async fn run_compute<F, Fut>(&self, key: &str, compute: F) -> Result<String, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<String, String>>,
    {
        match compute().await {
            Ok(value) => {
                let entry = CacheEntry::Ready { value: value.clone() };
                self.redis.set_ex(key, &serde_json::to_string(&entry)?, CLAIM_TTL).await?;
                Ok(value)
            }
            Err(message) => {
                let entry = CacheEntry::Failed { error: message.clone() };
                self.redis.set_ex(key, &serde_json::to_string(&entry)?, NEGATIVE_CACHE_TTL).await?;
                Err(CacheError::Failed(message))
            }
        }
    }

    /// Releases a claim this process holds because the caller was
    /// cancelled, by writing a terminal `FAILED("cancelled")` entry so
    /// waiters don't block for the full claim TTL.
    pub async fn release_cancelled(&self, key: &str) -> Result<(), CacheError> {
        let entry = CacheEntry::Failed { error: "cancelled".to_string() };
        self.redis.set_ex(key, &serde_json::to_string(&entry)?, NEGATIVE_CACHE_TTL).await?;
        Ok(())
    }

    async fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        match self.redis.get(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_changes_with_tip_hash() {
        // Pure string-formatting check; no Redis connection needed.
        let a = hex::encode(&H256::from_low_u64_be(1).as_bytes()[..8]);
        let b = hex::encode(&H256::from_low_u64_be(2).as_bytes()[..8]);
        assert_ne!(a, b);
    }
}
