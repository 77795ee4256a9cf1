//! Consensus for N42.
//!
//! # Algorithm
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Fixed-Interval Proof of Stake               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Producer:  prepare ─► execute ─► finalize ─► seal          │
//! │                                                │            │
//! │                              block interval (1s)            │
//! │                                                ▼            │
//! │                                         results channel     │
//! │                                                             │
//! │  Consumer:  verify_header  /  verify_headers (ordered)      │
//! │                                                             │
//! │  No signatures, no uncles, no rewards, unit difficulty.     │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`ConsensusEngine`]: Capability set the host node drives
//! - [`ChainHeaderReader`]: Read-only chain history seam
//! - [`StateRootProvider`]: State commitment seam used by finalize
//! - [`pos`]: The proof-of-stake engine

pub mod pos;
pub mod traits;

pub use traits::{ChainConfig, ChainHeaderReader, ConsensusEngine, StateRootProvider};
