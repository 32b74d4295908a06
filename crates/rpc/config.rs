//! Gateway configuration, loaded from environment variables with `envy`.
//! CLI wiring and config-file loading are out of scope — `cmd/gateway`
//! reads the process environment directly.

use ethereum_types::H256;
use gw_codec::EthAddress;
use serde::Deserialize;

fn default_http_addr() -> String {
    "0.0.0.0:8545".to_string()
}

fn default_request_deadline_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    pub backend_writer_url: String,
    pub backend_reader_url: String,
    pub redis_url: String,
    pub database_url: String,

    pub chain_id: u64,
    pub rollup_type_hash: H256,
    pub eth_account_lock_code_hash: H256,
    pub creator_account_id: u32,

    /// Present only when gasless-transaction validation is enabled.
    pub entrypoint_contract: Option<EthAddress>,
    #[serde(default)]
    pub extra_estimate_gas: u64,

    /// When set, `"latest"` resolves as `"pending"` so wallets see their own
    /// submissions immediately rather than waiting for the next block.
    #[serde(default)]
    pub instant_finality: bool,

    #[serde(default = "default_request_deadline_ms")]
    pub request_deadline_ms: u64,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("GATEWAY_").from_env::<Self>()
    }
}
