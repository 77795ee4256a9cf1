//! Fixed-interval proof-of-stake consensus engine.
//!
//! A placeholder engine: blocks are produced on a fixed cadence and no seal
//! or signature is checked. It still enforces the full header invariant set,
//! so headers produced by it are interchangeable with those of a future
//! signing engine.
//!
//! # Header rules
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  number == 0                  → accepted (genesis)           │
//! │  already in chain history     → accepted                     │
//! │  parent (hash, number - 1)    → must be known                │
//! │  number                       == parent.number + 1           │
//! │  timestamp                    <= now + 1 year                │
//! │  timestamp                    >= parent.timestamp            │
//! │  uncle hash / coinbase / difficulty / extra / mix / nonce    │
//! │                               == sentinels                   │
//! │  gas limit                    == 10_000_000                  │
//! │  gas used                     <= gas limit                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`PosEngine`]: The engine facade, implements [`ConsensusEngine`]
//! - [`PosConfig`]: Engine configuration
//! - [`PosError`]: Closed set of verification failures
//! - [`PosApiServer`]: Read-only RPC surface
//!
//! [`ConsensusEngine`]: crate::consensus::ConsensusEngine

mod api;
mod config;
mod engine;
mod error;
mod invariants;
mod pipeline;
mod sealer;

pub use api::{PosApi, PosApiServer};
pub use config::PosConfig;
pub use engine::PosEngine;
pub use error::{PosError, PosResult};
pub use invariants::{set_unused_fields, verify_unused_fields};
pub use sealer::seal_hash;

use alloy_consensus::EMPTY_OMMER_ROOT_HASH;
use alloy_primitives::{Address, B256, B64, U256};
use std::time::Duration;

/// Fixed gas limit of every block.
pub const BLOCK_GAS_LIMIT: u64 = 10_000_000;

/// Delay between receiving a block to seal and delivering it.
pub const BLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// How far ahead of local time a header timestamp may be.
pub const ALLOWED_FUTURE_BLOCK_TIME: Duration = Duration::from_secs(365 * 24 * 3600);

/// Required uncle hash: the hash of an empty uncle list.
pub const ZERO_UNCLE_HASH: B256 = EMPTY_OMMER_ROOT_HASH;

/// Required coinbase.
pub const ZERO_COINBASE: Address = Address::ZERO;

/// Required difficulty.
pub const UNITY_DIFFICULTY: U256 = U256::from_limbs([1, 0, 0, 0]);

/// Required mix digest.
pub const ZERO_MIX_DIGEST: B256 = B256::ZERO;

/// Required nonce.
pub const ZERO_NONCE: B64 = B64::ZERO;
