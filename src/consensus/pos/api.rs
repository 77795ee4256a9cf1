//! Read-only RPC API of the proof-of-stake engine.

use super::PosEngine;
use jsonrpsee::{core::RpcResult, proc_macros::rpc};

/// `pos` namespace RPC methods.
#[rpc(server, namespace = "pos")]
pub trait PosApi {
    /// Block production interval in seconds.
    #[method(name = "getBlockInterval")]
    fn block_interval(&self) -> RpcResult<f64>;
}

/// Implementation of [`PosApiServer`] backed by a [`PosEngine`].
#[derive(Debug, Clone, Copy)]
pub struct PosApi {
    engine: PosEngine,
}

impl PosApi {
    /// Create the API for `engine`.
    pub const fn new(engine: PosEngine) -> Self {
        Self { engine }
    }
}

impl PosApiServer for PosApi {
    fn block_interval(&self) -> RpcResult<f64> {
        Ok(self.engine.block_interval().as_secs_f64())
    }
}
