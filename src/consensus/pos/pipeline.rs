//! Batch header verification.
//!
//! Headers are verified one after another on a spawned task, so results come
//! back in input order. The result channel holds one slot per header: the
//! task never blocks on a slow consumer, and it stops as soon as the batch is
//! aborted or the receiver is dropped.

use super::{PosEngine, PosError};
use crate::{consensus::traits::ChainHeaderReader, primitives::Header};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Spawn a task verifying `headers` in order.
///
/// `seals[i]` requests seal verification for `headers[i]`; a missing flag
/// means no seal check. Must be called from within a tokio runtime.
pub(super) fn spawn_verify_headers<C>(
    engine: PosEngine,
    chain: Arc<C>,
    headers: Vec<Header>,
    seals: Vec<bool>,
) -> (CancellationToken, mpsc::Receiver<Result<(), PosError>>)
where
    C: ChainHeaderReader + ?Sized + 'static,
{
    let abort = CancellationToken::new();
    let (results_tx, results_rx) = mpsc::channel(headers.len().max(1));

    let task_abort = abort.clone();
    tokio::spawn(async move {
        let total = headers.len();
        for (index, header) in headers.iter().enumerate() {
            let seal = seals.get(index).copied().unwrap_or(false);
            let result = engine.verify_header(chain.as_ref(), header, seal);
            if let Err(err) = &result {
                debug!(
                    target: "pos::verify",
                    index,
                    number = ?header.number,
                    %err,
                    "Header verification failed"
                );
            }

            tokio::select! {
                biased;

                _ = task_abort.cancelled() => {
                    trace!(target: "pos::verify", index, total, "Batch verification aborted");
                    return;
                }
                sent = results_tx.send(result) => {
                    if sent.is_err() {
                        trace!(target: "pos::verify", index, total, "Result receiver dropped");
                        return;
                    }
                }
            }
        }
        trace!(target: "pos::verify", total, "Batch verification complete");
    });

    (abort, results_rx)
}
