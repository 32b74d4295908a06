//! # gw-rpc
//!
//! The gateway's JSON-RPC surface: an Ethereum-shaped `eth_*`/`net_*`/
//! `web3_*` API plus `poly_*` gateway-specific methods and a `gw_*`
//! pass-through to the rollup backend, fronted by one axum HTTP server.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`eth`] | `eth_*` handlers: accounts, blocks, calls, transactions, logs, filters |
//! | [`net`], [`web3`], [`poly`], [`gw`] | The remaining namespaces |
//! | [`translator`] | Ethereum ↔ backend-native transaction translation |
//! | [`filter_manager`] | In-process installed-filter bookkeeping |
//! | [`emitter`] | Tip-tailing loop publishing `newHeads`/`logs` |
//!
//! `start_api` wires a [`context::RpcApiContext`] into the HTTP server and
//! runs until shut down.

pub mod backend_client;
pub mod config;
pub mod context;
pub mod eth;
pub mod eth_types;
pub mod emitter;
pub mod filter_manager;
pub mod gw;
pub mod net;
pub mod poly;
pub mod router;
pub mod rpc_types;
pub mod server;
pub mod translator;
pub mod validator;
pub mod web3;

pub use context::RpcApiContext;
pub use router::{map_http_requests, RpcHandler};
pub use rpc_types::{RpcErr, RpcErrorMetadata, RpcNamespace};
pub use server::start_api;
