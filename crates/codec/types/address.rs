//! Address and account identity types.

use ethereum_types::{H160, H256};
use serde::{Deserialize, Serialize};

/// A 20-byte Ethereum address.
pub type EthAddress = H160;

/// A 32-byte backend lock/type script hash — the backend's primary key for
/// an account, derived from `(ethAddress, rollupTypeHash,
/// ethAccountLockCodeHash)`.
pub type BackendScriptHash = H256;

/// A 32-byte hash, used for both Ethereum (`keccak`) and backend
/// (domain-separated) hash identities. Which hash produced a given value is
/// a property of how it was computed, not of the type itself.
pub type Hash = H256;

/// The backend's internal numeric account handle. `0` is reserved to mean
/// "unknown sender, backend derives" — used by auto-create-account
/// transactions and by the registry's creator account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u32);

impl AccountId {
    pub const UNKNOWN: AccountId = AccountId(0);

    pub fn is_unknown(self) -> bool {
        self.0 == 0
    }
}

/// `(registryId, addrLen, addr)` tuple identifying an EOA across the
/// backend's address-registry schemes (e.g. the Ethereum registry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthRegistryAddress {
    pub registry_id: u32,
    pub address: EthAddress,
}

impl EthRegistryAddress {
    /// The registry id the backend reserves for Ethereum-shaped addresses.
    pub const ETH_REGISTRY_ID: u32 = 2;

    pub fn new(address: EthAddress) -> Self {
        Self { registry_id: Self::ETH_REGISTRY_ID, address }
    }

    /// Serialises as `registryId:u32 LE || addrLen:u32 LE || addr`, the
    /// shape `eth_call`/`eth_estimateGas` pass to the backend in place of a
    /// resolved account id.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + 20);
        out.extend_from_slice(&self.registry_id.to_le_bytes());
        out.extend_from_slice(&20u32.to_le_bytes());
        out.extend_from_slice(self.address.as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_account_id_is_zero() {
        assert!(AccountId::UNKNOWN.is_unknown());
        assert!(!AccountId(1).is_unknown());
    }

    #[test]
    fn registry_address_serializes_to_28_bytes() {
        let addr = EthRegistryAddress::new(EthAddress::from_low_u64_be(1));
        assert_eq!(addr.serialize().len(), 28);
    }
}
