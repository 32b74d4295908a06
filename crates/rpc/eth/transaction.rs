//! `eth_getTransactionByHash` and `eth_getTransactionReceipt`.
//!
//! A transaction goes through three distinct places before it is
//! queryable the same way every time: the relational store once
//! finalised, the backend's own mempool before that, and — for a sender
//! the backend didn't recognise at submission time — a standalone ACA
//! entry that only becomes resolvable once the sender's account exists.

use crate::context::RpcApiContext;
use crate::eth_types::{build_api_log, build_api_transaction, build_api_receipt, ApiTransaction, ApiTransactionInputs, ApiReceiptInputs};
use crate::router::RpcHandler;
use crate::rpc_types::RpcErr;
use crate::validator;
use async_trait::async_trait;
use ethereum_types::H256;
use gw_codec::EthRawTransaction;
use gw_rlp::decode::RLPDecode;
use gw_store::LogQuery;
use serde_json::Value;
use tracing::info;

/// Looks up the transaction by ethHash across all three tiers, returning
/// `None` only when it is genuinely unknown anywhere.
async fn resolve(context: &RpcApiContext, eth_hash: H256) -> Result<Option<ApiTransaction>, RpcErr> {
    if let Some(row) = context.store.get_transaction_by_eth_hash(eth_hash).await? {
        let eth_tx = EthRawTransaction::decode(&row.raw_eth_tx)
            .map_err(|err| RpcErr::Internal(format!("stored raw tx does not decode: {err}")))?;
        return Ok(Some(build_api_transaction(ApiTransactionInputs {
            eth_tx: &eth_tx,
            eth_hash,
            from: row.from_address,
            block_hash: Some(row.block_hash),
            block_number: Some(row.block_number),
            transaction_index: Some(row.transaction_index),
        })));
    }

    if let Some(native_hash) = context.tx_hash_index.eth_to_native(eth_hash).await? {
        if let Some(backend_tx) = context.backend.get_transaction_by_hash(native_hash).await? {
            if let Some(raw_hex) = backend_tx.get("rawEthTxHex").and_then(Value::as_str) {
                let rlp = gw_codec::hex_canon::decode_hex(raw_hex).map_err(|err| RpcErr::Internal(err.to_string()))?;
                let eth_tx = EthRawTransaction::decode(&rlp)
                    .map_err(|err| RpcErr::Internal(format!("mempool raw tx does not decode: {err}")))?;
                let signing_hash = eth_tx.unsigned_signing_hash();
                let from = gw_crypto::recover_signer(&eth_tx.signature_65(), signing_hash.as_fixed_bytes())
                    .map_err(|_| RpcErr::Internal("mempool tx has an invalid signature".to_string()))?;
                return Ok(Some(build_api_transaction(ApiTransactionInputs {
                    eth_tx: &eth_tx,
                    eth_hash,
                    from,
                    block_hash: None,
                    block_number: None,
                    transaction_index: None,
                })));
            }
        }
    }

    if let Some(entry) = context.aca_cache.get(eth_hash).await? {
        let rlp = gw_codec::hex_canon::decode_hex(&entry.raw_eth_tx_hex).map_err(|err| RpcErr::Internal(err.to_string()))?;
        let eth_tx = EthRawTransaction::decode(&rlp)
            .map_err(|err| RpcErr::Internal(format!("ACA raw tx does not decode: {err}")))?;

        let Some(from_id) = context.translator.resolver().account_id_of(entry.from_address).await? else {
            return Ok(None);
        };

        let native_hash = context.translator.derive_native_hash(&eth_tx, from_id).await?;
        if context.backend.get_transaction_by_hash(native_hash).await?.is_some() {
            context.tx_hash_index.submit(eth_hash, native_hash).await?;
            context.aca_cache.delete(eth_hash).await?;
            return Ok(Some(build_api_transaction(ApiTransactionInputs {
                eth_tx: &eth_tx,
                eth_hash,
                from: entry.from_address,
                block_hash: None,
                block_number: None,
                transaction_index: None,
            })));
        }
    }

    Ok(None)
}

pub struct GetTransactionByHash {
    eth_hash: H256,
}

#[async_trait]
impl RpcHandler for GetTransactionByHash {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let eth_hash = validator::hash(validator::required(params, 0, "hash")?, 0, "hash")?;
        Ok(GetTransactionByHash { eth_hash })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        info!("eth_getTransactionByHash {:?}", self.eth_hash);
        match resolve(&context, self.eth_hash).await? {
            Some(tx) => Ok(serde_json::to_value(tx)?),
            None => Ok(Value::Null),
        }
    }
}

pub struct GetTransactionReceipt {
    eth_hash: H256,
}

#[async_trait]
impl RpcHandler for GetTransactionReceipt {
    fn parse(params: &Option<Vec<Value>>) -> Result<Self, RpcErr> {
        let params = params.as_ref().ok_or_else(|| RpcErr::invalid_params(0, "params", "missing parameters"))?;
        let eth_hash = validator::hash(validator::required(params, 0, "hash")?, 0, "hash")?;
        Ok(GetTransactionReceipt { eth_hash })
    }

    async fn handle(&self, context: RpcApiContext) -> Result<Value, RpcErr> {
        info!("eth_getTransactionReceipt {:?}", self.eth_hash);

        let Some(receipt) = context.store.get_receipt_by_eth_hash(self.eth_hash).await? else {
            return Ok(Value::Null);
        };
        let Some(tx) = context.store.get_transaction_by_eth_hash(self.eth_hash).await? else {
            return Ok(Value::Null);
        };

        let query = LogQuery {
            from_block: receipt.block_number,
            to_block: receipt.block_number,
            addresses: Vec::new(),
            topics: Vec::new(),
            after_id: 0,
        };
        let logs = context
            .store
            .get_logs(query)
            .await?
            .into_iter()
            .filter(|row| row.transaction_hash == self.eth_hash)
            .map(|row| build_api_log(&row))
            .collect();

        let api_receipt = build_api_receipt(ApiReceiptInputs { receipt: &receipt, from: tx.from_address, to: tx.to_address, logs });
        Ok(serde_json::to_value(api_receipt)?)
    }
}
