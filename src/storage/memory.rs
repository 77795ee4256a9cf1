//! In-memory header chain and state.

use super::ChainStoreError;
use crate::{
    consensus::traits::{ChainConfig, ChainHeaderReader, StateRootProvider},
    primitives::Header,
};
use alloy_primitives::B256;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

/// In-memory header store.
///
/// Headers are indexed by hash, like a header cache: a lookup resolves the
/// hash alone and the requested number is not checked against the stored
/// header. The head is the highest header inserted so far; on equal heights
/// the latest insert wins.
///
/// # Example
///
/// ```ignore
/// let chain = InMemoryChain::with_genesis(ChainConfig::default(), dev_genesis())?;
/// chain.insert_header(header)?;
/// let head = chain.current_header();
/// ```
#[derive(Debug, Default)]
pub struct InMemoryChain {
    /// Chain configuration handed to the engine.
    config: ChainConfig,
    /// Headers by hash.
    headers: RwLock<HashMap<B256, Header>>,
    /// Hash and number of the current head.
    head: RwLock<Option<(B256, u64)>>,
}

impl InMemoryChain {
    /// Create an empty chain.
    pub fn new(config: ChainConfig) -> Self {
        Self { config, ..Default::default() }
    }

    /// Create a chain holding only `genesis`.
    pub fn with_genesis(config: ChainConfig, genesis: Header) -> Result<Self, ChainStoreError> {
        match genesis.number {
            Some(0) => {}
            Some(number) => return Err(ChainStoreError::NonZeroGenesis(number)),
            None => return Err(ChainStoreError::MissingNumber),
        }
        let chain = Self::new(config);
        chain.insert_header(genesis)?;
        Ok(chain)
    }

    /// Store a header, advancing the head if it is at least as high.
    ///
    /// Returns the header hash.
    pub fn insert_header(&self, header: Header) -> Result<B256, ChainStoreError> {
        let number = header.number.ok_or(ChainStoreError::MissingNumber)?;
        let hash = header.hash();

        self.headers.write().insert(hash, header);

        let mut head = self.head.write();
        if head.is_none_or(|(_, head_number)| number >= head_number) {
            *head = Some((hash, number));
        }
        trace!(target: "pos::storage", number, %hash, "Inserted header");
        Ok(hash)
    }

    /// Header at the head of the chain.
    pub fn current_header(&self) -> Option<Header> {
        let (hash, _) = (*self.head.read())?;
        self.headers.read().get(&hash).cloned()
    }

    /// Number of stored headers.
    pub fn len(&self) -> usize {
        self.headers.read().len()
    }

    /// Whether no header is stored.
    pub fn is_empty(&self) -> bool {
        self.headers.read().is_empty()
    }
}

impl ChainHeaderReader for InMemoryChain {
    fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn get_header(&self, hash: B256, _number: u64) -> Option<Header> {
        self.headers.read().get(&hash).cloned()
    }
}

/// State stand-in reporting a fixed root.
///
/// Records the clearing flag of the last root computation.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    root: B256,
    last_clearing_flag: Option<bool>,
}

impl MemoryState {
    /// Create a state whose root is `root`.
    pub const fn new(root: B256) -> Self {
        Self { root, last_clearing_flag: None }
    }

    /// Replace the reported root.
    pub fn set_root(&mut self, root: B256) {
        self.root = root;
    }

    /// Flag passed to the last [`StateRootProvider::intermediate_root`] call.
    pub const fn last_clearing_flag(&self) -> Option<bool> {
        self.last_clearing_flag
    }
}

impl StateRootProvider for MemoryState {
    fn intermediate_root(&mut self, delete_empty_objects: bool) -> B256 {
        self.last_clearing_flag = Some(delete_empty_objects);
        self.root
    }
}
