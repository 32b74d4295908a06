//! Installed-filter bookkeeping types shared between `FilterManager` and the
//! `eth_newFilter`/`eth_getFilterChanges` handlers.

use crate::types::address::EthAddress;
use ethereum_types::H256;
use rand::RngCore;

/// A 16-byte filter id, chosen at random and never reused within a process
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(pub [u8; 16]);

impl FilterId {
    pub fn random() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        FilterId(bytes)
    }
}

impl std::fmt::Display for FilterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A `fromBlock`/`toBlock` bound: either a concrete number or a tag that
/// only resolves to one once a tip is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Earliest,
    Latest,
    Pending,
    Number(u64),
}

impl BlockTag {
    /// Resolves against the current tip. `Pending` resolves to the tip too —
    /// this store has no separate pending-block view to poll against.
    pub fn resolve(self, tip: u64) -> u64 {
        match self {
            BlockTag::Earliest => 0,
            BlockTag::Latest | BlockTag::Pending => tip,
            BlockTag::Number(n) => n,
        }
    }
}

/// The caller-supplied parameters a `LogFilter` matches against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogFilterParams {
    pub from_block: Option<BlockTag>,
    pub to_block: Option<BlockTag>,
    pub addresses: Vec<EthAddress>,
    /// Each position is an OR of alternatives; the list as a whole is an AND
    /// across positions, matching the `eth_newFilter` `topics` shape.
    pub topics: Vec<Vec<H256>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    BlockFilter,
    PendingTxFilter,
    LogFilter(LogFilterParams),
}

/// `lastPoll` means the highest block number already returned (block
/// filters) or the highest log row id already returned (log filters) — two
/// distinct cursor semantics that must never be conflated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub id: FilterId,
    pub kind: FilterKind,
    pub last_poll: u64,
}

impl Filter {
    pub fn new(kind: FilterKind, initial_cursor: u64) -> Self {
        Filter { id: FilterId::random(), kind, last_poll: initial_cursor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_ids_are_distinct() {
        let a = FilterId::random();
        let b = FilterId::random();
        assert_ne!(a, b);
    }

    #[test]
    fn new_filter_starts_at_initial_cursor() {
        let filter = Filter::new(FilterKind::BlockFilter, 42);
        assert_eq!(filter.last_poll, 42);
    }
}
