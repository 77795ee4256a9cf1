//! Consensus trait abstractions.
//!
//! The engine never owns chain data or state. It reaches them through the
//! read-only seams defined here so that storage backends can be swapped and
//! memory-based collaborators used in tests.

use crate::primitives::{Block, Header, Receipt};
use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Minimal chain configuration exposed by the chain-history reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// Height at which EIP-158 state clearing activates, if ever.
    pub eip158_block: Option<u64>,
}

impl ChainConfig {
    /// Config with state clearing active from genesis.
    pub const fn eip158_from_genesis() -> Self {
        Self { eip158_block: Some(0) }
    }

    /// Whether empty-account state clearing is active at `number`.
    pub fn is_eip158(&self, number: u64) -> bool {
        self.eip158_block.is_some_and(|activation| activation <= number)
    }
}

/// Chain header reader trait for accessing blockchain headers.
///
/// Implementations must tolerate concurrent calls from several verification
/// tasks.
pub trait ChainHeaderReader: Send + Sync {
    /// Get the chain configuration.
    fn config(&self) -> &ChainConfig;

    /// Get header by hash and number.
    fn get_header(&self, hash: B256, number: u64) -> Option<Header>;
}

impl<T: ChainHeaderReader + ?Sized> ChainHeaderReader for Arc<T> {
    fn config(&self) -> &ChainConfig {
        (**self).config()
    }

    fn get_header(&self, hash: B256, number: u64) -> Option<Header> {
        (**self).get_header(hash, number)
    }
}

/// Post-execution state commitment provider.
pub trait StateRootProvider {
    /// Compute the current state root.
    ///
    /// `delete_empty_objects` is true when state clearing is active for the
    /// block being finalized.
    fn intermediate_root(&mut self, delete_empty_objects: bool) -> B256;
}

/// The capability set a consensus engine exposes to the host node.
///
/// Producer path: [`prepare`](Self::prepare) → execute →
/// [`finalize`](Self::finalize) → [`seal`](Self::seal).
/// Consumer path: [`verify_header`](Self::verify_header) /
/// [`verify_headers`](Self::verify_headers).
pub trait ConsensusEngine: Send + Sync {
    /// Engine error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Address of the account that minted the block.
    fn author(&self, header: &Header) -> Result<Address, Self::Error>;

    /// Check whether a header conforms to the consensus rules.
    ///
    /// `seal` requests that the seal be verified as well.
    fn verify_header<C>(&self, chain: &C, header: &Header, seal: bool) -> Result<(), Self::Error>
    where
        C: ChainHeaderReader + ?Sized;

    /// Verify a batch of headers concurrently with the caller.
    ///
    /// Returns a token that aborts the batch when cancelled, and a channel
    /// yielding one result per header in input order.
    fn verify_headers<C>(
        &self,
        chain: Arc<C>,
        headers: Vec<Header>,
        seals: Vec<bool>,
    ) -> (CancellationToken, mpsc::Receiver<Result<(), Self::Error>>)
    where
        C: ChainHeaderReader + ?Sized + 'static;

    /// Verify that a block carries no uncles beyond what the engine allows.
    fn verify_uncles(&self, block: &Block, uncles: &[Header]) -> Result<(), Self::Error>;

    /// Check whether the seal of a header is valid.
    fn verify_seal(&self, header: &Header) -> Result<(), Self::Error>;

    /// Initialize the consensus fields of a header before execution.
    fn prepare<C>(&self, chain: &C, header: &mut Header) -> Result<(), Self::Error>
    where
        C: ChainHeaderReader + ?Sized;

    /// Run post-transaction state modifications and assemble the final block.
    fn finalize<C, S>(
        &self,
        chain: &C,
        header: &mut Header,
        state: &mut S,
        transactions: Vec<Bytes>,
        uncles: &[Header],
        receipts: Vec<Receipt>,
    ) -> Result<Block, Self::Error>
    where
        C: ChainHeaderReader + ?Sized,
        S: StateRootProvider + ?Sized;

    /// Start sealing `block` in the background.
    ///
    /// The sealed block, if any, is delivered on `results`; cancelling `stop`
    /// abandons the attempt.
    fn seal(
        &self,
        block: Block,
        results: mpsc::Sender<Block>,
        stop: CancellationToken,
    ) -> Result<(), Self::Error>;

    /// Hash of a header prior to it being sealed.
    fn seal_hash(&self, header: &Header) -> B256;

    /// Difficulty a new block should have on top of `parent`.
    fn calc_difficulty(&self, time: u64, parent: &Header) -> U256;

    /// Release any background resources held by the engine.
    fn close(&self) -> Result<(), Self::Error>;
}
