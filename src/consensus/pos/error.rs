//! Proof-of-stake consensus errors.

use alloy_primitives::U256;
use thiserror::Error;

/// Proof-of-stake consensus errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PosError {
    /// Header carries no block number.
    #[error("block number is nil")]
    UnknownBlock,

    /// Parent header is not known to the chain.
    #[error("unknown ancestor")]
    UnknownAncestor,

    /// Block number is not parent + 1.
    #[error("invalid block number: parent {parent}, block {number}")]
    InvalidNumber { parent: u64, number: u64 },

    /// Block is from the future.
    #[error("block in the future: block time {block_time}, max allowed {max_time}")]
    FutureBlock { block_time: u64, max_time: u64 },

    /// Block timestamp is earlier than its parent's.
    #[error("block timestamp less than parent's timestamp: parent {parent_time}, block {block_time}")]
    BackwardTime { parent_time: u64, block_time: u64 },

    /// Seal operations are not defined for the genesis block.
    #[error("verifySeal/Seal operations on genesis block not permitted")]
    GenesisSealNotPermitted,

    /// Uncle hash is not the empty-uncles hash.
    #[error("non empty uncle hash")]
    NonEmptyUncleHash,

    /// Coinbase is not the zero address.
    #[error("non empty coinbase address")]
    NonEmptyCoinbase,

    /// Difficulty is not the fixed unit value.
    #[error("non unit difficulty: {difficulty}")]
    NonUnitDifficulty { difficulty: U256 },

    /// Extra-data is not empty.
    #[error("non empty extra")]
    NonEmptyExtra,

    /// Mix digest is not zero.
    #[error("non-zero mix digest")]
    NonZeroMixDigest,

    /// Nonce is not zero.
    #[error("non-zero nonce")]
    NonZeroNonce,

    /// Gas limit differs from the protocol constant.
    #[error("invalid gasLimit: have {gas_limit}, max {expected}")]
    GasLimitMismatch { gas_limit: u64, expected: u64 },

    /// Gas used exceeds gas limit.
    #[error("invalid gasUsed: have {gas_used}, gasLimit {gas_limit}")]
    GasUsedExceedsLimit { gas_used: u64, gas_limit: u64 },

    /// Block carries uncles.
    #[error("uncles not allowed")]
    UnclesNotAllowed,
}

impl PosError {
    /// Whether the header may become valid later: after syncing the
    /// missing ancestor, or once local time catches up.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::UnknownAncestor | Self::FutureBlock { .. })
    }

    /// Whether the error is caused by one of the unused header fields.
    pub const fn is_unused_field_violation(&self) -> bool {
        matches!(
            self,
            Self::NonEmptyUncleHash
                | Self::NonEmptyCoinbase
                | Self::NonUnitDifficulty { .. }
                | Self::NonEmptyExtra
                | Self::NonZeroMixDigest
                | Self::NonZeroNonce
        )
    }
}

/// Result type for proof-of-stake consensus operations.
pub type PosResult<T> = Result<T, PosError>;
