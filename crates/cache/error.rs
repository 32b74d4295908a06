use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("serialisation error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("store error: {0}")]
    Store(#[from] gw_store::StoreError),
    #[error("timed out waiting for cache entry to settle")]
    Timeout,
    #[error("{0}")]
    Failed(String),
}
