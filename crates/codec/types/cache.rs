//! Redis-resident value shapes. These are serialized as JSON when stored —
//! simplicity matters more than compactness for values that live at most a
//! few minutes.

use crate::types::address::EthAddress;
use ethereum_types::H256;
use serde::{Deserialize, Serialize};

/// The single-flight compute state backing `DataCache`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "UPPERCASE")]
pub enum CacheEntry {
    Pending,
    Ready { value: String },
    Failed { error: String },
}

/// The two Redis keys recording an eth-hash/native-hash pair. Short-lived —
/// once the relational store has the finalised mapping, these entries are
/// left to expire rather than actively cleaned up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxHashMapping {
    pub eth_hash: H256,
    pub native_hash: H256,
}

/// An auto-create-account transaction stashed under `aca:<ethHash>` until
/// its sender's account id exists and the native hash can be derived.
/// Carries a longer TTL than `TxHashMapping` since account creation can lag
/// behind submission by more than one poll interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoCreateAccountEntry {
    pub raw_eth_tx_hex: String,
    pub from_address: EthAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_entry_serializes_with_tagged_state() {
        let ready = CacheEntry::Ready { value: "0x1".to_string() };
        let json = serde_json::to_string(&ready).unwrap();
        assert!(json.contains("\"READY\""));
        assert_eq!(serde_json::from_str::<CacheEntry>(&json).unwrap(), ready);
    }
}
