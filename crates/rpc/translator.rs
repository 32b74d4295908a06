//! Translation between Ethereum-shaped requests and the backend's native
//! transaction encoding: sender recovery, account resolution, and the
//! auto-create-account path.

use crate::backend_client::BackendClient;
use crate::config::GatewayConfig;
use crate::rpc_types::RpcErr;
use crate::validator::CallObject;
use ethereum_types::H256;
use gw_cache::AccountResolverCache;
use gw_codec::{AccountId, BackendScriptHash, EthAddress, EthRawTransaction, EthRegistryAddress, NativeRawTx, NativeTx, PolyjuiceArgs};
use gw_rlp::decode::RLPDecode;
use std::sync::Arc;
use tracing::info;

/// A transaction whose sender has no backend account yet. Stashed by the
/// caller (`gw-cache`'s `AutoCreateAccountCache`) keyed by `eth_hash` until
/// the backend has synthesised the account.
#[derive(Debug, Clone)]
pub struct AutoCreateEntry {
    pub eth_hash: H256,
    pub raw_eth_tx_hex: String,
    pub from_address: EthAddress,
}

/// Resolves between an Ethereum address and the backend's own identities:
/// the script hash is a pure function of the address and process config,
/// the account id is a cached backend RPC lookup on top of it.
#[derive(Clone)]
pub struct AddressResolver {
    config: Arc<GatewayConfig>,
    backend: BackendClient,
    cache: AccountResolverCache,
}

impl AddressResolver {
    pub fn new(config: Arc<GatewayConfig>, backend: BackendClient, cache: AccountResolverCache) -> Self {
        Self { config, backend, cache }
    }

    /// `scriptHash = backendHash(molecular(ethAddr, rollupTypeHash,
    /// ethAccountLockCodeHash))`. The exact script-construction algorithm the
    /// backend itself uses is out of scope (non-goal); this derives a stable
    /// identifier from the same three inputs the backend's script is built
    /// from, using the same domain-separated hash the rest of the codec uses
    /// for backend identities.
    pub fn script_hash_of(&self, eth_addr: EthAddress) -> BackendScriptHash {
        compute_script_hash(eth_addr, self.config.rollup_type_hash, self.config.eth_account_lock_code_hash)
    }

    /// `None` means "not registered yet", never an error — callers decide
    /// what that means for them (zero balance, auto-create path, ...).
    pub async fn account_id_of(&self, eth_addr: EthAddress) -> Result<Option<AccountId>, RpcErr> {
        let script_hash = self.script_hash_of(eth_addr);

        if let Some(id) = self.cache.get(script_hash).await? {
            return Ok(Some(id));
        }

        match self.backend.get_account_id_by_script_hash(script_hash).await? {
            Some(id) => {
                self.cache.set(script_hash, id).await?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }
}

fn compute_script_hash(eth_addr: EthAddress, rollup_type_hash: H256, eth_account_lock_code_hash: H256) -> BackendScriptHash {
    let mut preimage = Vec::with_capacity(20 + 32 + 32);
    preimage.extend_from_slice(eth_addr.as_bytes());
    preimage.extend_from_slice(rollup_type_hash.as_bytes());
    preimage.extend_from_slice(eth_account_lock_code_hash.as_bytes());
    H256(gw_crypto::backend_hash(&preimage))
}

/// The default gas limit `ethCallToNative` assigns a call that did not
/// specify one: large enough that a read-only execution is never itself the
/// bottleneck (the backend still enforces its own cycle budget).
const DEFAULT_CALL_GAS_LIMIT: u64 = 50_000_000;

/// Entrypoint-contract gasless-transaction multiplier from `§6`:
/// `gasLimit = verificationGasLimit * 3 + callGasLimit`.
const GASLESS_VERIFICATION_MULTIPLIER: u64 = 3;

pub struct NativeTranslation {
    pub native: NativeTx,
    pub eth_hash: H256,
    pub auto_create: Option<AutoCreateEntry>,
}

#[derive(Clone)]
pub struct TxTranslator {
    config: Arc<GatewayConfig>,
    resolver: AddressResolver,
}

impl TxTranslator {
    pub fn new(config: Arc<GatewayConfig>, resolver: AddressResolver) -> Self {
        Self { config, resolver }
    }

    pub fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    /// `ethRawToNative`: RLP-decode, recover the sender, resolve both ends of
    /// the transaction to backend account ids, and build the signed native
    /// transaction.
    pub async fn eth_raw_to_native(&self, rlp: &[u8]) -> Result<NativeTranslation, RpcErr> {
        let eth_tx = EthRawTransaction::decode(rlp)
            .map_err(|err| RpcErr::invalid_params(0, "rlp", format!("malformed transaction: {err}")))?;

        if let Some(chain_id) = eth_tx.chain_id() {
            if chain_id != self.config.chain_id {
                return Err(RpcErr::invalid_params(0, "rlp.chainId", "chain id mismatch"));
            }
        }

        let signing_hash = eth_tx.unsigned_signing_hash();
        let sender = gw_crypto::recover_signer(&eth_tx.signature_65(), signing_hash.as_fixed_bytes())
            .map_err(|_| RpcErr::invalid_params(0, "rlp.signature", "invalid signature"))?;

        let eth_hash = eth_tx.eth_hash();

        let (from_id, auto_create) = match self.resolver.account_id_of(sender).await? {
            Some(id) => (id, None),
            None => {
                info!("auto-create path for sender {sender:?}, ethHash {eth_hash:?}");
                let entry = AutoCreateEntry {
                    eth_hash,
                    raw_eth_tx_hex: gw_codec::hex_canon::encode_hex(rlp),
                    from_address: sender,
                };
                (AccountId::UNKNOWN, Some(entry))
            }
        };

        let (to_id, is_transfer) = self.resolve_to(eth_tx.to).await?;

        self.validate_gasless(&eth_tx, eth_tx.to)?;

        let args = PolyjuiceArgs {
            is_create: eth_tx.to.is_none(),
            is_transfer,
            gas_limit: eth_tx.gas_limit,
            gas_price: eth_tx.gas_price.as_u128(),
            value: eth_tx.value.as_u128(),
            input: eth_tx.data.clone(),
        };

        let raw = NativeRawTx {
            chain_id: self.config.chain_id,
            from_id: from_id.0,
            to_id: to_id.0,
            nonce: eth_tx.nonce as u32,
            args: args.encode().into(),
        };

        let native = NativeTx { raw, signature: eth_tx.signature_65() };

        Ok(NativeTranslation { native, eth_hash, auto_create })
    }

    /// `ethCallToNative`: a read-only variant with no signature to recover
    /// from — the caller identifies itself via `call.from`, defaulting to the
    /// zero address when absent (an anonymous read).
    pub async fn eth_call_to_native(&self, call: &CallObject) -> Result<(NativeRawTx, Vec<u8>), RpcErr> {
        let from_addr = call.from.unwrap_or_else(EthAddress::zero);
        let from_id = self.resolver.account_id_of(from_addr).await?.unwrap_or(AccountId::UNKNOWN);
        let (to_id, is_transfer) = self.resolve_to(call.to).await?;

        let args = PolyjuiceArgs {
            is_create: call.to.is_none(),
            is_transfer,
            gas_limit: call.gas.unwrap_or(DEFAULT_CALL_GAS_LIMIT),
            gas_price: call.gas_price.unwrap_or_default().as_u128(),
            value: call.value.unwrap_or_default().as_u128(),
            input: call.data.clone().unwrap_or_default().into(),
        };

        let raw = NativeRawTx {
            chain_id: self.config.chain_id,
            from_id: from_id.0,
            to_id: to_id.0,
            nonce: 0,
            args: args.encode().into(),
        };

        let registry_address = EthRegistryAddress::new(from_addr).serialize();
        Ok((raw, registry_address))
    }

    /// Re-derives the native hash a raw Ethereum transaction would hash to
    /// now that `from_id` is known, without resigning or resubmitting
    /// anything — used to reconcile an ACA entry once its sender's account
    /// has been created.
    pub async fn derive_native_hash(&self, eth_tx: &EthRawTransaction, from_id: AccountId) -> Result<H256, RpcErr> {
        let (to_id, is_transfer) = self.resolve_to(eth_tx.to).await?;
        let args = PolyjuiceArgs {
            is_create: eth_tx.to.is_none(),
            is_transfer,
            gas_limit: eth_tx.gas_limit,
            gas_price: eth_tx.gas_price.as_u128(),
            value: eth_tx.value.as_u128(),
            input: eth_tx.data.clone(),
        };
        let raw = NativeRawTx {
            chain_id: self.config.chain_id,
            from_id: from_id.0,
            to_id: to_id.0,
            nonce: eth_tx.nonce as u32,
            args: args.encode().into(),
        };
        Ok(raw.backend_hash())
    }

    /// `to == None` resolves to the configured creator account (contract
    /// creation); `to == Some(addr)` resolves via the Address Resolver, and
    /// falls back to the creator account flagged as a transfer when the
    /// recipient has no backend account yet — the backend may still create a
    /// plain EOA as a side effect of the transfer.
    async fn resolve_to(&self, to: Option<EthAddress>) -> Result<(AccountId, bool), RpcErr> {
        match to {
            None => Ok((AccountId(self.config.creator_account_id), false)),
            Some(addr) => match self.resolver.account_id_of(addr).await? {
                Some(id) => Ok((id, false)),
                None => Ok((AccountId(self.config.creator_account_id), true)),
            },
        }
    }

    /// Gas-price-zero "gasless" transactions are only accepted when an
    /// entrypoint contract is configured, and only when addressed to it.
    fn validate_gasless(&self, eth_tx: &EthRawTransaction, to: Option<EthAddress>) -> Result<(), RpcErr> {
        validate_gasless_transaction(self.config.entrypoint_contract, eth_tx, to)
    }
}

/// The self-comparison below (`max_fee_per_gas != max_fee_per_gas`) is
/// carried over from the source behavior verbatim: it is tautologically
/// false and therefore never rejects anything on this branch. Do not "fix"
/// it; its intended condition is unknown and the behavior it actually
/// produces (a no-op check) must be preserved.
fn validate_gasless_transaction(entrypoint_contract: Option<EthAddress>, eth_tx: &EthRawTransaction, to: Option<EthAddress>) -> Result<(), RpcErr> {
    let Some(entrypoint) = entrypoint_contract else {
        return Ok(());
    };
    if eth_tx.gas_price.is_zero() {
        if to != Some(entrypoint) {
            return Err(RpcErr::invalid_params(0, "rlp.to", "gasless transaction must target the entrypoint contract"));
        }
        let max_fee_per_gas = eth_tx.gas_price;
        #[allow(clippy::eq_op)]
        if max_fee_per_gas != max_fee_per_gas {
            return Err(RpcErr::invalid_params(0, "rlp.gasPrice", "base fee mismatch"));
        }
        let verification_gas_limit = eth_tx.gas_limit / (GASLESS_VERIFICATION_MULTIPLIER + 1);
        let call_gas_limit = eth_tx.gas_limit - verification_gas_limit * GASLESS_VERIFICATION_MULTIPLIER;
        if verification_gas_limit * GASLESS_VERIFICATION_MULTIPLIER + call_gas_limit != eth_tx.gas_limit {
            return Err(RpcErr::invalid_params(0, "rlp.gasLimit", "gas limit does not match verification/call split"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_hash_is_deterministic_for_same_inputs() {
        let addr = EthAddress::from_low_u64_be(42);
        let rollup_type_hash = H256::from_low_u64_be(7);
        let lock_code_hash = H256::from_low_u64_be(9);
        assert_eq!(
            compute_script_hash(addr, rollup_type_hash, lock_code_hash),
            compute_script_hash(addr, rollup_type_hash, lock_code_hash)
        );
    }

    #[test]
    fn script_hash_differs_for_different_addresses() {
        let rollup_type_hash = H256::from_low_u64_be(7);
        let lock_code_hash = H256::from_low_u64_be(9);
        let a = compute_script_hash(EthAddress::from_low_u64_be(1), rollup_type_hash, lock_code_hash);
        let b = compute_script_hash(EthAddress::from_low_u64_be(2), rollup_type_hash, lock_code_hash);
        assert_ne!(a, b);
    }

    fn sample_tx(gas_price: ethereum_types::U256, to: Option<EthAddress>) -> EthRawTransaction {
        EthRawTransaction {
            nonce: 0,
            gas_price,
            gas_limit: 21_000,
            to,
            value: ethereum_types::U256::zero(),
            data: bytes::Bytes::new(),
            v: 27,
            r: H256::zero(),
            s: H256::zero(),
        }
    }

    #[test]
    fn gasless_validation_is_a_noop_without_entrypoint() {
        let tx = sample_tx(ethereum_types::U256::zero(), Some(EthAddress::from_low_u64_be(1)));
        assert!(validate_gasless_transaction(None, &tx, tx.to).is_ok());
    }

    #[test]
    fn gasless_transaction_must_target_entrypoint() {
        let entrypoint = EthAddress::from_low_u64_be(99);
        let tx = sample_tx(ethereum_types::U256::zero(), Some(EthAddress::from_low_u64_be(1)));
        assert!(validate_gasless_transaction(Some(entrypoint), &tx, tx.to).is_err());
    }

    #[test]
    fn non_zero_gas_price_skips_gasless_validation_entirely() {
        let entrypoint = EthAddress::from_low_u64_be(99);
        let tx = sample_tx(ethereum_types::U256::from(1u64), Some(EthAddress::from_low_u64_be(1)));
        assert!(validate_gasless_transaction(Some(entrypoint), &tx, tx.to).is_ok());
    }
}
