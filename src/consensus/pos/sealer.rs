//! Block sealing.
//!
//! Sealing is a timed placeholder: no signature is produced. After the block
//! interval elapses the block is handed back unchanged, unless the caller
//! cancelled first.
//!
//! # Delivery
//!
//! ```text
//! seal() ──► spawn ──► select ─┬─ stop cancelled ──► exit, nothing sent
//!                              └─ interval elapsed ─► try_send(block)
//!                                                     ├─ ok
//!                                                     └─ full/closed ─► warn, drop
//! ```
//!
//! Delivery is at most once and never blocks.

use crate::primitives::{Block, Header};
use alloy_primitives::{keccak256, B256};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Hash of a header prior to it being sealed.
///
/// keccak256 over the RLP list of every header field except the mix digest
/// and nonce, in header order.
pub fn seal_hash(header: &Header) -> B256 {
    let mut buf = Vec::with_capacity(header.unsealed_length());
    header.encode_unsealed(&mut buf);
    keccak256(&buf)
}

/// Spawn the delayed delivery of `block` on `results`.
///
/// Must be called from within a tokio runtime.
pub(super) fn spawn_seal(
    block: Block,
    results: mpsc::Sender<Block>,
    stop: CancellationToken,
    interval: Duration,
) {
    tokio::spawn(async move {
        tokio::select! {
            biased;

            _ = stop.cancelled() => {
                trace!(target: "pos::sealer", number = ?block.number(), "Sealing cancelled");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        let header = block.header().clone();
        let sealhash = seal_hash(&header);
        match results.try_send(block.with_seal(header)) {
            Ok(()) => {
                debug!(target: "pos::sealer", number = ?block.number(), %sealhash, "Sealed block");
            }
            Err(err) => {
                warn!(
                    target: "pos::sealer",
                    %sealhash,
                    %err,
                    "Sealing result is not read by miner"
                );
            }
        }
    });
}
