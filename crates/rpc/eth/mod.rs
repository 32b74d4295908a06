mod account;
mod block;
mod call;
mod logs;
mod send_raw_transaction;
mod transaction;
mod unsupported;

pub mod filter;

use crate::context::RpcApiContext;
use crate::router::RpcHandler;
use crate::rpc_types::{RpcErr, RpcRequest};
use serde_json::Value;

pub async fn map_eth_requests(req: &RpcRequest, context: RpcApiContext) -> Result<Value, RpcErr> {
    match req.method.as_str() {
        "eth_chainId" => block::ChainId::call(req, context).await,
        "eth_blockNumber" => block::BlockNumber::call(req, context).await,
        "eth_getBalance" => account::GetBalance::call(req, context).await,
        "eth_getStorageAt" => account::GetStorageAt::call(req, context).await,
        "eth_getCode" => account::GetCode::call(req, context).await,
        "eth_call" => call::Call::call(req, context).await,
        "eth_estimateGas" => call::EstimateGas::call(req, context).await,
        "eth_sendRawTransaction" => send_raw_transaction::SendRawTransaction::call(req, context).await,
        "eth_getTransactionByHash" => transaction::GetTransactionByHash::call(req, context).await,
        "eth_getTransactionReceipt" => transaction::GetTransactionReceipt::call(req, context).await,
        "eth_getLogs" => logs::GetLogs::call(req, context).await,
        "eth_newFilter" => filter::NewFilter::call(req, context).await,
        "eth_newBlockFilter" => filter::NewBlockFilter::call(req, context).await,
        "eth_newPendingTransactionFilter" => filter::NewPendingTransactionFilter::call(req, context).await,
        "eth_uninstallFilter" => filter::UninstallFilter::call(req, context).await,
        "eth_getFilterChanges" => filter::GetFilterChanges::call(req, context).await,
        "eth_getFilterLogs" => filter::GetFilterLogs::call(req, context).await,
        "eth_sign" | "eth_signTransaction" | "eth_sendTransaction" => unsupported::Unsupported::call(req, context).await,
        unknown => Err(RpcErr::MethodNotFound(unknown.to_owned())),
    }
}
