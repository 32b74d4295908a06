//! Process entrypoint: load configuration from the environment, wire every
//! crate's pieces into one [`gw_rpc::RpcApiContext`], and run the HTTP
//! server until it shuts down.

use gw_cache::{AccountResolverCache, AutoCreateAccountCache, DataCache, RedisClient, TxHashIndex};
use gw_rpc::backend_client::BackendClient;
use gw_rpc::config::GatewayConfig;
use gw_rpc::context::RpcApiContext;
use gw_rpc::filter_manager::FilterManager;
use gw_rpc::translator::{AddressResolver, TxTranslator};
use gw_store::PgReadStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Arc::new(GatewayConfig::from_env().expect("invalid GATEWAY_ configuration"));

    let redis = RedisClient::connect(&config.redis_url).await.expect("failed to connect to redis");
    let store: Arc<dyn gw_store::ReadStore> =
        Arc::new(PgReadStore::connect(&config.database_url).await.expect("failed to connect to postgres"));
    let backend = BackendClient::new(&config.backend_writer_url, &config.backend_reader_url);

    let account_resolver = AccountResolverCache::new(redis.clone());
    let data_cache = DataCache::new(redis.clone(), "gwRpc");
    let tx_hash_index = TxHashIndex::new(redis.clone(), store.clone());
    let aca_cache = AutoCreateAccountCache::new(redis.clone());
    let filters = FilterManager::new();

    let resolver = AddressResolver::new(config.clone(), backend.clone(), account_resolver.clone());
    let translator = TxTranslator::new(config.clone(), resolver);

    let context = RpcApiContext {
        config,
        store,
        backend,
        redis,
        data_cache,
        account_resolver,
        tx_hash_index,
        aca_cache,
        filters,
        translator,
    };

    gw_rpc::start_api(context).await
}
