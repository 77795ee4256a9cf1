//! Proof-of-stake consensus engine implementation.

use super::{
    api::PosApi, invariants, pipeline, sealer, PosConfig, PosError, ALLOWED_FUTURE_BLOCK_TIME,
    BLOCK_GAS_LIMIT, BLOCK_INTERVAL, ZERO_COINBASE,
};
use crate::{
    consensus::traits::{ChainHeaderReader, ConsensusEngine, StateRootProvider},
    primitives::{Block, Header, Receipt},
};
use alloy_primitives::{Address, Bytes, B256, U256};
use jsonrpsee::RpcModule;
use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Proof-of-stake consensus engine.
///
/// Holds only its immutable configuration, so it is cheap to clone and safe
/// to share between concurrent verification tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosEngine {
    /// Consensus engine configuration.
    config: PosConfig,
}

impl PosEngine {
    /// Create a new proof-of-stake engine.
    pub const fn new(config: PosConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub const fn config(&self) -> &PosConfig {
        &self.config
    }

    /// Interval between sealing requests and delivered blocks.
    pub const fn block_interval(&self) -> Duration {
        BLOCK_INTERVAL
    }

    /// RPC module exposing the engine's read-only API.
    pub fn rpc_module(&self) -> RpcModule<PosApi> {
        use super::PosApiServer;
        PosApi::new(*self).into_rpc()
    }

    /// Verify a header conforms to consensus rules.
    ///
    /// Genesis and headers already present in the chain are accepted as-is.
    pub fn verify_header<C>(&self, chain: &C, header: &Header, seal: bool) -> Result<(), PosError>
    where
        C: ChainHeaderReader + ?Sized,
    {
        let number = header.number.ok_or(PosError::UnknownBlock)?;
        if number == 0 {
            return Ok(());
        }

        // Already in the local chain, no need to verify again
        if chain.get_header(header.hash(), number).is_some() {
            trace!(target: "pos::engine", number, "Header already known");
            return Ok(());
        }

        let parent =
            chain.get_header(header.parent_hash, number - 1).ok_or(PosError::UnknownAncestor)?;
        let parent_number = parent.number.unwrap_or_default();
        if parent_number.checked_add(1) != Some(number) {
            return Err(PosError::InvalidNumber { parent: parent_number, number });
        }

        // Don't waste time checking blocks from the future
        let max_time = unix_now().saturating_add(ALLOWED_FUTURE_BLOCK_TIME.as_secs());
        if header.timestamp > max_time {
            return Err(PosError::FutureBlock { block_time: header.timestamp, max_time });
        }
        if header.timestamp < parent.timestamp {
            return Err(PosError::BackwardTime {
                parent_time: parent.timestamp,
                block_time: header.timestamp,
            });
        }

        invariants::verify_unused_fields(header)?;

        if header.gas_limit != BLOCK_GAS_LIMIT {
            return Err(PosError::GasLimitMismatch {
                gas_limit: header.gas_limit,
                expected: BLOCK_GAS_LIMIT,
            });
        }
        if header.gas_used > header.gas_limit {
            return Err(PosError::GasUsedExceedsLimit {
                gas_used: header.gas_used,
                gas_limit: header.gas_limit,
            });
        }

        if seal {
            self.verify_seal(header)?;
        }

        // A single rule set applies at every height; there is no fork gating.
        Ok(())
    }

    /// Verify the seal of a header.
    ///
    /// No signature is stored in the block, so only the genesis restriction
    /// applies.
    pub fn verify_seal(&self, header: &Header) -> Result<(), PosError> {
        if header.number.ok_or(PosError::UnknownBlock)? == 0 {
            return Err(PosError::GenesisSealNotPermitted);
        }
        Ok(())
    }

    /// Reject any uncles.
    pub fn verify_uncles(&self, block: &Block, uncles: &[Header]) -> Result<(), PosError> {
        if !uncles.is_empty() || !block.uncles().is_empty() {
            return Err(PosError::UnclesNotAllowed);
        }
        Ok(())
    }

    /// Prepare the consensus fields of a header for running transactions on top.
    pub fn prepare<C>(&self, chain: &C, header: &mut Header) -> Result<(), PosError>
    where
        C: ChainHeaderReader + ?Sized,
    {
        invariants::set_unused_fields(header);

        let number = header.number.ok_or(PosError::UnknownBlock)?;
        let parent = number
            .checked_sub(1)
            .and_then(|parent_number| chain.get_header(header.parent_hash, parent_number))
            .ok_or(PosError::UnknownAncestor)?;

        header.timestamp = parent.timestamp.max(unix_now());
        header.gas_limit = BLOCK_GAS_LIMIT;

        debug!(target: "pos::engine", number, timestamp = header.timestamp, "Prepared header");
        Ok(())
    }

    /// Set the final state root and assemble the block.
    ///
    /// Uncles are dropped and no rewards are paid, so the state is committed
    /// as-is.
    pub fn finalize<C, S>(
        &self,
        chain: &C,
        header: &mut Header,
        state: &mut S,
        transactions: Vec<Bytes>,
        uncles: &[Header],
        receipts: Vec<Receipt>,
    ) -> Block
    where
        C: ChainHeaderReader + ?Sized,
        S: StateRootProvider + ?Sized,
    {
        if !uncles.is_empty() {
            trace!(target: "pos::engine", count = uncles.len(), "Dropping uncles");
        }

        let clearing = chain.config().is_eip158(header.number.unwrap_or_default());
        header.state_root = state.intermediate_root(clearing);
        invariants::set_unused_fields(header);

        Block::new(header.clone(), transactions, receipts)
    }
}

impl ConsensusEngine for PosEngine {
    type Error = PosError;

    fn author(&self, _header: &Header) -> Result<Address, PosError> {
        Ok(ZERO_COINBASE)
    }

    fn verify_header<C>(&self, chain: &C, header: &Header, seal: bool) -> Result<(), PosError>
    where
        C: ChainHeaderReader + ?Sized,
    {
        Self::verify_header(self, chain, header, seal)
    }

    fn verify_headers<C>(
        &self,
        chain: Arc<C>,
        headers: Vec<Header>,
        seals: Vec<bool>,
    ) -> (CancellationToken, mpsc::Receiver<Result<(), PosError>>)
    where
        C: ChainHeaderReader + ?Sized + 'static,
    {
        pipeline::spawn_verify_headers(*self, chain, headers, seals)
    }

    fn verify_uncles(&self, block: &Block, uncles: &[Header]) -> Result<(), PosError> {
        Self::verify_uncles(self, block, uncles)
    }

    fn verify_seal(&self, header: &Header) -> Result<(), PosError> {
        Self::verify_seal(self, header)
    }

    fn prepare<C>(&self, chain: &C, header: &mut Header) -> Result<(), PosError>
    where
        C: ChainHeaderReader + ?Sized,
    {
        Self::prepare(self, chain, header)
    }

    fn finalize<C, S>(
        &self,
        chain: &C,
        header: &mut Header,
        state: &mut S,
        transactions: Vec<Bytes>,
        uncles: &[Header],
        receipts: Vec<Receipt>,
    ) -> Result<Block, PosError>
    where
        C: ChainHeaderReader + ?Sized,
        S: StateRootProvider + ?Sized,
    {
        Ok(Self::finalize(self, chain, header, state, transactions, uncles, receipts))
    }

    fn seal(
        &self,
        block: Block,
        results: mpsc::Sender<Block>,
        stop: CancellationToken,
    ) -> Result<(), PosError> {
        // Sealing the genesis block is not supported
        if block.number().ok_or(PosError::UnknownBlock)? == 0 {
            return Err(PosError::GenesisSealNotPermitted);
        }
        sealer::spawn_seal(block, results, stop, self.block_interval());
        Ok(())
    }

    fn seal_hash(&self, header: &Header) -> B256 {
        sealer::seal_hash(header)
    }

    fn calc_difficulty(&self, _time: u64, _parent: &Header) -> U256 {
        U256::ZERO
    }

    fn close(&self) -> Result<(), PosError> {
        Ok(())
    }
}

/// Current unix time in seconds.
fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consensus::pos::{UNITY_DIFFICULTY, ZERO_NONCE, ZERO_UNCLE_HASH},
        storage::{dev_genesis, InMemoryChain, MemoryState},
    };
    use alloy_primitives::{B64, U256};

    fn genesis() -> Header {
        dev_genesis()
    }

    fn test_chain() -> InMemoryChain {
        InMemoryChain::with_genesis(Default::default(), genesis()).unwrap()
    }

    fn prepared_child(engine: &PosEngine, chain: &InMemoryChain) -> Header {
        let head = chain.current_header().unwrap();
        let mut header = Header::child_of(&head).unwrap();
        engine.prepare(chain, &mut header).unwrap();
        header
    }

    #[test]
    fn test_author_and_difficulty() {
        let engine = PosEngine::default();
        assert_eq!(ConsensusEngine::author(&engine, &Header::default()), Ok(Address::ZERO));
        assert_eq!(engine.calc_difficulty(0, &Header::default()), U256::ZERO);
        assert_eq!(engine.close(), Ok(()));
    }

    #[test]
    fn test_prepare() {
        let engine = PosEngine::default();
        let chain = test_chain();
        let mut header = Header::child_of(&chain.current_header().unwrap()).unwrap();
        header.extra_data = Bytes::from_static(b"junk");
        header.coinbase = Address::repeat_byte(0x42);

        engine.prepare(&chain, &mut header).unwrap();

        assert_eq!(header.uncle_hash, ZERO_UNCLE_HASH);
        assert_eq!(header.coinbase, Address::ZERO);
        assert_eq!(header.difficulty, UNITY_DIFFICULTY);
        assert!(header.extra_data.is_empty());
        assert_eq!(header.mix_digest, B256::ZERO);
        assert_eq!(header.nonce, ZERO_NONCE);
        assert_eq!(header.gas_limit, BLOCK_GAS_LIMIT);
        assert!(header.timestamp >= unix_now() - 1);
    }

    #[test]
    fn test_prepare_keeps_parent_time_when_ahead() {
        let engine = PosEngine::default();
        let mut genesis = genesis();
        genesis.timestamp = unix_now() + 3600;
        let chain = InMemoryChain::with_genesis(Default::default(), genesis.clone()).unwrap();

        let mut header = Header::child_of(&genesis).unwrap();
        engine.prepare(&chain, &mut header).unwrap();

        assert_eq!(header.timestamp, genesis.timestamp);
    }

    #[test]
    fn test_prepare_unknown_parent() {
        let engine = PosEngine::default();
        let chain = test_chain();
        let mut header = Header {
            number: Some(1),
            parent_hash: B256::repeat_byte(0x99),
            ..Default::default()
        };

        assert_eq!(engine.prepare(&chain, &mut header), Err(PosError::UnknownAncestor));

        let mut genesis_child = Header { number: Some(0), ..Default::default() };
        assert_eq!(engine.prepare(&chain, &mut genesis_child), Err(PosError::UnknownAncestor));
    }

    #[test]
    fn test_verify_header() {
        let engine = PosEngine::default();
        let chain = test_chain();
        let mut header = prepared_child(&engine, &chain);

        assert_eq!(engine.verify_header(&chain, &header, false), Ok(()));
        assert_eq!(engine.verify_header(&chain, &header, true), Ok(()));

        let number = header.number;
        header.number = None;
        assert_eq!(engine.verify_header(&chain, &header, false), Err(PosError::UnknownBlock));
        header.number = number;

        header.number = Some(100);
        assert_eq!(
            engine.verify_header(&chain, &header, false),
            Err(PosError::InvalidNumber { parent: 0, number: 100 })
        );
        header.number = number;

        header.parent_hash = B256::repeat_byte(0x99);
        assert_eq!(engine.verify_header(&chain, &header, false), Err(PosError::UnknownAncestor));
        header.parent_hash = genesis().hash();

        header.gas_limit = BLOCK_GAS_LIMIT + 1;
        assert_eq!(
            engine.verify_header(&chain, &header, false),
            Err(PosError::GasLimitMismatch {
                gas_limit: BLOCK_GAS_LIMIT + 1,
                expected: BLOCK_GAS_LIMIT,
            })
        );
        header.gas_limit = BLOCK_GAS_LIMIT;

        header.gas_used = BLOCK_GAS_LIMIT + 1;
        assert_eq!(
            engine.verify_header(&chain, &header, false),
            Err(PosError::GasUsedExceedsLimit {
                gas_used: BLOCK_GAS_LIMIT + 1,
                gas_limit: BLOCK_GAS_LIMIT,
            })
        );
    }

    #[test]
    fn test_verify_header_invalid_number() {
        let engine = PosEngine::default();
        let chain = test_chain();
        let parent = prepared_child(&engine, &chain);
        chain.insert_header(parent.clone()).unwrap();

        let mut header = Header::child_of(&parent).unwrap();
        engine.prepare(&chain, &mut header).unwrap();
        header.number = Some(100);

        assert_eq!(
            engine.verify_header(&chain, &header, false),
            Err(PosError::InvalidNumber { parent: 1, number: 100 })
        );
    }

    #[test]
    fn test_verify_header_genesis_and_known() {
        let engine = PosEngine::default();
        let chain = test_chain();

        let junk_genesis = Header {
            number: Some(0),
            extra_data: Bytes::from_static(b"anything"),
            gas_limit: 1,
            ..Default::default()
        };
        assert_eq!(engine.verify_header(&chain, &junk_genesis, true), Ok(()));

        // Known header with broken fields is still accepted.
        let mut known = Header::child_of(&chain.current_header().unwrap()).unwrap();
        known.gas_limit = 7;
        chain.insert_header(known.clone()).unwrap();
        assert_eq!(engine.verify_header(&chain, &known, false), Ok(()));
    }

    #[test]
    fn test_verify_header_time_rules() {
        let engine = PosEngine::default();
        let chain = test_chain();
        let mut header = prepared_child(&engine, &chain);

        header.timestamp = unix_now() + ALLOWED_FUTURE_BLOCK_TIME.as_secs() + 3600;
        assert!(matches!(
            engine.verify_header(&chain, &header, false),
            Err(PosError::FutureBlock { .. })
        ));

        header.timestamp = genesis().timestamp - 1;
        assert_eq!(
            engine.verify_header(&chain, &header, false),
            Err(PosError::BackwardTime {
                parent_time: genesis().timestamp,
                block_time: genesis().timestamp - 1,
            })
        );

        // Equal to parent is fine.
        header.timestamp = genesis().timestamp;
        assert_eq!(engine.verify_header(&chain, &header, false), Ok(()));
    }

    #[test]
    fn test_verify_header_propagates_invariant_error() {
        let engine = PosEngine::default();
        let chain = test_chain();
        let mut header = prepared_child(&engine, &chain);
        header.nonce = B64::repeat_byte(0x01);

        assert_eq!(engine.verify_header(&chain, &header, false), Err(PosError::NonZeroNonce));
    }

    #[test]
    fn test_verify_seal() {
        let engine = PosEngine::default();
        let genesis = genesis();
        assert_eq!(engine.verify_seal(&genesis), Err(PosError::GenesisSealNotPermitted));

        let header = Header { number: Some(1), ..Default::default() };
        assert_eq!(engine.verify_seal(&header), Ok(()));

        let header = Header { number: None, ..Default::default() };
        assert_eq!(engine.verify_seal(&header), Err(PosError::UnknownBlock));
    }

    #[test]
    fn test_verify_uncles() {
        let engine = PosEngine::default();
        let block = Block::new(Header { number: Some(1), ..Default::default() }, vec![], vec![]);

        assert_eq!(engine.verify_uncles(&block, &[]), Ok(()));
        assert_eq!(
            engine.verify_uncles(&block, &[Header::default()]),
            Err(PosError::UnclesNotAllowed)
        );
    }

    #[test]
    fn test_finalize() {
        let engine = PosEngine::default();
        let chain = test_chain();
        let mut header = Header::child_of(&chain.current_header().unwrap()).unwrap();
        let mut state = MemoryState::new(B256::repeat_byte(0x5a));

        let uncles = vec![Header { number: Some(1), ..Default::default() }];
        let block = engine.finalize(&chain, &mut header, &mut state, vec![], &uncles, vec![]);

        assert!(block.uncles().is_empty());
        assert_eq!(header.state_root, B256::repeat_byte(0x5a));
        assert_eq!(block.header().state_root, B256::repeat_byte(0x5a));
        assert_eq!(invariants::verify_unused_fields(block.header()), Ok(()));
        assert_eq!(state.last_clearing_flag(), Some(false));
    }

    #[test]
    fn test_finalize_passes_state_clearing_flag() {
        let engine = PosEngine::default();
        let chain = InMemoryChain::with_genesis(
            crate::consensus::ChainConfig::eip158_from_genesis(),
            genesis(),
        )
        .unwrap();
        let mut header = prepared_child(&engine, &chain);
        let mut state = MemoryState::default();

        engine.finalize(&chain, &mut header, &mut state, vec![], &[], vec![]);

        assert_eq!(state.last_clearing_flag(), Some(true));
    }

    #[test]
    fn test_seal_genesis_rejected() {
        // No runtime is needed: genesis is rejected before any task is spawned.
        let engine = PosEngine::default();
        let block = Block::new(genesis(), vec![], vec![]);
        let (tx, _rx) = mpsc::channel(1);

        assert_eq!(
            engine.seal(block, tx, CancellationToken::new()),
            Err(PosError::GenesisSealNotPermitted)
        );
    }

    #[test]
    fn test_seal_without_number_rejected() {
        let engine = PosEngine::default();
        let block = Block::new(Header { number: None, ..Default::default() }, vec![], vec![]);
        let (tx, _rx) = mpsc::channel(1);

        assert_eq!(engine.seal(block, tx, CancellationToken::new()), Err(PosError::UnknownBlock));
    }
}
