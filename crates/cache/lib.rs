//! # gw-cache
//!
//! Everything that lives in Redis: the single-flight `DataCache` used by
//! `eth_call`/`eth_estimateGas`/`execute_raw_l2transaction`, the
//! account-resolver cache, the eth-hash/native-hash index, and the
//! auto-create-account stash. Redis is the gateway's only cross-process
//! coordination point — every shared mutation here goes through an atomic
//! Redis primitive (`SET NX`, a plain `SET`), never a lock held across an
//! await point.

pub mod account_resolver;
pub mod auto_create_account;
pub mod data_cache;
pub mod error;
pub mod redis_client;
pub mod tx_hash_index;

pub use account_resolver::AccountResolverCache;
pub use auto_create_account::AutoCreateAccountCache;
pub use data_cache::DataCache;
pub use error::CacheError;
pub use redis_client::RedisClient;
pub use tx_hash_index::TxHashIndex;
