//! In-memory chain storage.
//!
//! Provides just enough of a local chain for the consensus engine to resolve
//! parents and commit state: a header store keyed by hash, and a
//! state stand-in that reports a fixed root.

mod memory;

pub use memory::{InMemoryChain, MemoryState};

use crate::{
    consensus::pos::{set_unused_fields, BLOCK_GAS_LIMIT},
    primitives::Header,
};

/// Timestamp of the development genesis header.
pub const DEV_GENESIS_TIMESTAMP: u64 = 1_600_000_000;

/// Error type for chain storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainStoreError {
    /// Header carries no block number.
    #[error("header has no block number")]
    MissingNumber,

    /// Genesis header is not at height zero.
    #[error("genesis header at height {0}")]
    NonZeroGenesis(u64),
}

/// Genesis header for development chains.
///
/// Unused fields hold their sentinel values and the gas limit is the fixed
/// block gas limit, so children prepared on top of it verify cleanly.
pub fn dev_genesis() -> Header {
    let mut header = Header {
        number: Some(0),
        gas_limit: BLOCK_GAS_LIMIT,
        timestamp: DEV_GENESIS_TIMESTAMP,
        ..Default::default()
    };
    set_unused_fields(&mut header);
    header
}
