//! The dependency bag threaded through every handler. Built once in
//! `cmd/gateway`'s `main.rs` and cloned (cheaply — everything inside is an
//! `Arc` or a handle) into each request.

use crate::backend_client::BackendClient;
use crate::config::GatewayConfig;
use crate::filter_manager::FilterManager;
use crate::translator::TxTranslator;
use gw_cache::{AccountResolverCache, AutoCreateAccountCache, DataCache, RedisClient, TxHashIndex};
use gw_store::ReadStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct RpcApiContext {
    pub config: Arc<GatewayConfig>,
    pub store: Arc<dyn ReadStore>,
    pub backend: BackendClient,
    pub redis: RedisClient,
    pub data_cache: DataCache,
    pub account_resolver: AccountResolverCache,
    pub tx_hash_index: TxHashIndex,
    pub aca_cache: AutoCreateAccountCache,
    pub filters: FilterManager,
    pub translator: TxTranslator,
}
