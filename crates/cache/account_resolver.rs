//! Caches the `scriptHash → accountId` mapping the Address & Account
//! Resolver looks up from the backend. Entries are idempotent — once an
//! address has an account id, it never changes — so they are written with
//! no expiry. Misses are deliberately *not* cached, so a newly created
//! account is visible on its very first lookup after creation.

use crate::error::CacheError;
use crate::redis_client::RedisClient;
use gw_codec::{AccountId, BackendScriptHash};

#[derive(Clone)]
pub struct AccountResolverCache {
    redis: RedisClient,
}

fn key(script_hash: BackendScriptHash) -> String {
    format!("gwRpc_{}", hex::encode(script_hash.as_bytes()))
}

impl AccountResolverCache {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }

    pub async fn get(&self, script_hash: BackendScriptHash) -> Result<Option<AccountId>, CacheError> {
        match self.redis.get(&key(script_hash)).await? {
            Some(value) => Ok(value.parse().ok().map(AccountId)),
            None => Ok(None),
        }
    }

    pub async fn set(&self, script_hash: BackendScriptHash, account_id: AccountId) -> Result<(), CacheError> {
        self.redis.set_persist(&key(script_hash), &account_id.0.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable_for_the_same_script_hash() {
        let hash = BackendScriptHash::from_low_u64_be(7);
        assert_eq!(key(hash), key(hash));
    }
}
