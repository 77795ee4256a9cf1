//! Block header primitives.
//!
//! The header keeps the full legacy field set even though the proof-of-stake
//! engine ignores the proof-of-work fields. Those fields must carry fixed
//! sentinel values, enforced by the engine (see [`crate::consensus::pos`]).
//!
//! # Header Structure
//!
//! ```text
//! Header
//! ├── parent_hash: B256
//! ├── uncle_hash: B256          (sentinel: empty ommers root)
//! ├── coinbase: Address         (sentinel: zero address)
//! ├── state_root: B256
//! ├── transactions_root: B256
//! ├── receipts_root: B256
//! ├── logs_bloom: Bloom
//! ├── difficulty: U256          (sentinel: 1)
//! ├── number: Option<u64>
//! ├── gas_limit: u64
//! ├── gas_used: u64
//! ├── timestamp: u64
//! ├── extra_data: Bytes         (sentinel: empty)
//! ├── mix_digest: B256          (sentinel: zero)  ─┐ seal fields, excluded
//! └── nonce: B64                (sentinel: zero)  ─┘ from the seal hash
//! ```

use alloy_primitives::{keccak256, Address, Bloom, Bytes, B256, B64, U256};
use alloy_rlp::{BufMut, Encodable};
use serde::{Deserialize, Serialize};

/// Execution block header.
///
/// `number` is optional so that a header received without a height can be
/// represented and rejected during verification instead of at decode time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// Hash of the parent block header.
    pub parent_hash: B256,
    /// Hash of the uncle list.
    pub uncle_hash: B256,
    /// Block proposer address.
    pub coinbase: Address,
    /// State trie root after executing the block.
    pub state_root: B256,
    /// Transactions trie root.
    pub transactions_root: B256,
    /// Receipts trie root.
    pub receipts_root: B256,
    /// Union of all receipt blooms.
    pub logs_bloom: Bloom,
    /// Proof-of-work difficulty.
    pub difficulty: U256,
    /// Block height.
    pub number: Option<u64>,
    /// Gas limit of the block.
    pub gas_limit: u64,
    /// Gas consumed by the block's transactions.
    pub gas_used: u64,
    /// Block timestamp in seconds since the unix epoch.
    pub timestamp: u64,
    /// Arbitrary proposer data.
    pub extra_data: Bytes,
    /// Proof-of-work mix digest.
    pub mix_digest: B256,
    /// Proof-of-work nonce.
    pub nonce: B64,
}

impl Header {
    /// Create a child header skeleton pointing at `parent`.
    ///
    /// Returns `None` if the parent carries no number.
    pub fn child_of(parent: &Self) -> Option<Self> {
        let number = parent.number?.checked_add(1)?;
        Some(Self { parent_hash: parent.hash(), number: Some(number), ..Default::default() })
    }

    /// Block hash: keccak256 of the RLP encoding of every header field.
    pub fn hash(&self) -> B256 {
        let mut buf = Vec::with_capacity(self.length());
        self.encode(&mut buf);
        keccak256(&buf)
    }

    /// RLP encode the header without its seal fields (mix digest and nonce).
    ///
    /// This is the preimage of the seal hash.
    pub fn encode_unsealed(&self, out: &mut dyn BufMut) {
        alloy_rlp::Header { list: true, payload_length: self.unsealed_payload_length() }
            .encode(out);
        self.encode_unsealed_fields(out);
    }

    /// Length of the unsealed RLP encoding.
    pub fn unsealed_length(&self) -> usize {
        let payload_length = self.unsealed_payload_length();
        alloy_rlp::length_of_length(payload_length) + payload_length
    }

    fn unsealed_payload_length(&self) -> usize {
        self.parent_hash.length()
            + self.uncle_hash.length()
            + self.coinbase.length()
            + self.state_root.length()
            + self.transactions_root.length()
            + self.receipts_root.length()
            + self.logs_bloom.length()
            + self.difficulty.length()
            + self.number.unwrap_or_default().length()
            + self.gas_limit.length()
            + self.gas_used.length()
            + self.timestamp.length()
            + self.extra_data.length()
    }

    fn encode_unsealed_fields(&self, out: &mut dyn BufMut) {
        self.parent_hash.encode(out);
        self.uncle_hash.encode(out);
        self.coinbase.encode(out);
        self.state_root.encode(out);
        self.transactions_root.encode(out);
        self.receipts_root.encode(out);
        self.logs_bloom.encode(out);
        self.difficulty.encode(out);
        // A missing number encodes as the empty string, same as zero.
        self.number.unwrap_or_default().encode(out);
        self.gas_limit.encode(out);
        self.gas_used.encode(out);
        self.timestamp.encode(out);
        self.extra_data.encode(out);
    }

    fn payload_length(&self) -> usize {
        self.unsealed_payload_length() + self.mix_digest.length() + self.nonce.length()
    }
}

impl Encodable for Header {
    fn encode(&self, out: &mut dyn BufMut) {
        alloy_rlp::Header { list: true, payload_length: self.payload_length() }.encode(out);
        self.encode_unsealed_fields(out);
        self.mix_digest.encode(out);
        self.nonce.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        alloy_rlp::length_of_length(payload_length) + payload_length
    }
}
