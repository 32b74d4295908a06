//! HTTP transport: one axum route accepting single or batched JSON-RPC
//! envelopes, a permissive CORS layer (wallets call this from arbitrary
//! origins), a periodic filter-cleanup sweep, and the `BlockEmitter`
//! supervisor, all spawned alongside the server itself.

use crate::context::RpcApiContext;
use crate::emitter::BlockEmitter;
use crate::filter_manager::FILTER_DURATION;
use crate::router::map_http_requests;
use crate::rpc_types::{RpcErr, RpcErrorResponse, RpcRequest, RpcRequestId, RpcSuccessResponse};
use axum::extract::State;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

#[derive(Deserialize)]
#[serde(untagged)]
enum RpcRequestWrapper {
    Single(RpcRequest),
    Multiple(Vec<RpcRequest>),
}

pub async fn start_api(context: RpcApiContext) -> std::io::Result<()> {
    let http_addr = context.config.http_addr.clone();

    tokio::task::spawn(run_filter_cleanup_task(context.clone()));
    tokio::task::spawn(run_block_emitter(context.clone()));

    let cors = CorsLayer::permissive();
    let router = Router::new()
        .route("/", axum::routing::post(handle_http_request))
        .layer(cors)
        .with_state(context);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("gateway listening on {http_addr}");

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await
}

async fn run_filter_cleanup_task(context: RpcApiContext) {
    let mut interval = tokio::time::interval(FILTER_DURATION);
    loop {
        interval.tick().await;
        info!("pruning expired filters");
        context.filters.prune_expired();
    }
}

async fn run_block_emitter(context: RpcApiContext) {
    let emitter = BlockEmitter::new(context.store.clone(), context.redis.clone());
    emitter.run().await;
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
}

async fn handle_http_request(State(context): State<RpcApiContext>, body: String) -> Json<Value> {
    let response = match serde_json::from_str::<RpcRequestWrapper>(&body) {
        Ok(RpcRequestWrapper::Single(request)) => {
            let result = map_http_requests(&request, context).await;
            rpc_response(request.id, result)
        }
        Ok(RpcRequestWrapper::Multiple(requests)) => {
            let mut responses = Vec::with_capacity(requests.len());
            for request in requests {
                let result = map_http_requests(&request, context.clone()).await;
                responses.push(rpc_response(request.id, result));
            }
            serde_json::to_value(responses).expect("Vec<Value> always serialises")
        }
        Err(_) => rpc_response(RpcRequestId::String(String::new()), Err(RpcErr::ParseError)),
    };
    Json(response)
}

fn rpc_response(id: RpcRequestId, result: Result<Value, RpcErr>) -> Value {
    match result {
        Ok(result) => serde_json::to_value(RpcSuccessResponse::new(id, result)),
        Err(err) => serde_json::to_value(RpcErrorResponse::new(id, &err)),
    }
    .expect("response envelope always serialises")
}
