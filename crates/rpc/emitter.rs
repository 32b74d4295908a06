//! The single-writer loop that tails the relational store's tip and
//! publishes `newHeads`/`logs` to every subscriber process over Redis
//! pub/sub — the gateway's only fan-out mechanism for chain-tip events.

use crate::eth_types::build_api_log;
use gw_cache::{CacheError, RedisClient};
use gw_store::{LogQuery, ReadStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// How long the supervisor waits before restarting a crashed tick loop —
/// long enough that a transient store/Redis blip does not turn into a
/// restart storm.
const RESTART_DELAY: Duration = Duration::from_secs(5);

pub const NEW_HEADS_CHANNEL: &str = "gwRpc:newHeads";
pub const LOGS_CHANNEL: &str = "gwRpc:logs";

pub struct BlockEmitter {
    store: Arc<dyn ReadStore>,
    redis: RedisClient,
    last_known: AtomicU64,
}

impl BlockEmitter {
    pub fn new(store: Arc<dyn ReadStore>, redis: RedisClient) -> Self {
        Self { store, redis, last_known: AtomicU64::new(0) }
    }

    /// Runs forever, restarting the tailing loop after [`RESTART_DELAY`]
    /// whenever a tick fails. Emitted events are best-effort: a subscriber
    /// that misses one across a restart is expected to tolerate the gap.
    pub async fn run(&self) {
        if let Ok(Some(tip)) = self.store.get_tip_block_number().await {
            self.last_known.store(tip, Ordering::SeqCst);
        }

        loop {
            match self.tick().await {
                Ok(()) => tokio::time::sleep(TICK_INTERVAL).await,
                Err(err) => {
                    error!("block emitter tick failed, restarting in {RESTART_DELAY:?}: {err}");
                    tokio::time::sleep(RESTART_DELAY).await;
                }
            }
        }
    }

    async fn tick(&self) -> Result<(), CacheError> {
        let Some(tip) = self.store.get_tip_block_number().await? else {
            return Ok(());
        };
        let last_known = self.last_known.load(Ordering::SeqCst);
        if tip <= last_known {
            return Ok(());
        }

        let blocks = self.store.get_blocks_since(last_known, tip).await?;
        for block in &blocks {
            let head = crate::eth_types::build_api_block_head(block);
            self.redis.publish(NEW_HEADS_CHANNEL, &serde_json::to_string(&head)?).await?;
        }

        let query = LogQuery { from_block: last_known + 1, to_block: tip, addresses: Vec::new(), topics: Vec::new(), after_id: 0 };
        let logs = self.store.get_logs(query).await?;
        for log in &logs {
            self.redis.publish(LOGS_CHANNEL, &serde_json::to_string(&build_api_log(log))?).await?;
        }

        info!("block emitter advanced {} -> {} ({} blocks, {} logs)", last_known, tip, blocks.len(), logs.len());
        self.last_known.store(tip, Ordering::SeqCst);
        Ok(())
    }
}
