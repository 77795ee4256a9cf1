//! N42 fixed-interval proof-of-stake consensus engine.
//!
//! A placeholder consensus engine plugged into an Ethereum-style block
//! pipeline. It produces blocks on a fixed one second cadence, pays no
//! rewards and checks no signatures, while holding every header to a strict
//! set of field invariants.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           Host node                                 │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │   miner ──prepare/finalize/seal──►  ┌───────────────┐               │
//! │                                     │   PosEngine   │──► RpcModule  │
//! │   sync  ──verify_header(s)───────►  └───────┬───────┘   (pos_*)     │
//! │                                             │                       │
//! │                       ┌─────────────────────┼──────────────┐        │
//! │                       ▼                                    ▼        │
//! │              ChainHeaderReader                    StateRootProvider │
//! │              (InMemoryChain)                      (MemoryState)     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Header, block and receipt types
//! - [`consensus`]: Engine traits and the proof-of-stake engine
//! - [`storage`]: In-memory chain and state collaborators

#![warn(unused_crate_dependencies)]
// Dependencies used by binaries
use eyre as _;
use tracing_subscriber as _;

pub mod consensus;
pub mod primitives;
pub mod storage;

// Re-export primitives
pub use primitives::{Block, Header, Receipt};

// Re-export consensus traits
pub use consensus::{ChainConfig, ChainHeaderReader, ConsensusEngine, StateRootProvider};

// Re-export the proof-of-stake engine
pub use consensus::pos::{
    seal_hash, PosApi, PosApiServer, PosConfig, PosEngine, PosError, PosResult,
    ALLOWED_FUTURE_BLOCK_TIME, BLOCK_GAS_LIMIT, BLOCK_INTERVAL,
};

// Re-export storage types
pub use storage::{dev_genesis, ChainStoreError, InMemoryChain, MemoryState};
