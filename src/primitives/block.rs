//! Block and receipt primitives.

use super::Header;
use alloy_consensus::{proofs::ordered_trie_root_with_encoder, EMPTY_OMMER_ROOT_HASH};
use alloy_primitives::{Bloom, Bytes, B256};
use alloy_rlp::{Encodable, RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// Consensus view of a transaction receipt.
#[derive(Clone, Debug, Default, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Whether the transaction executed successfully.
    pub success: bool,
    /// Gas used in the block up to and including this transaction.
    pub cumulative_gas_used: u64,
    /// Bloom filter over the transaction's logs.
    pub logs_bloom: Bloom,
}

/// A block: header, transactions and receipts.
///
/// Transactions are kept in their EIP-2718 encoded form, the engine never
/// looks inside them. There is no uncle list: uncles are rejected outright.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    header: Header,
    transactions: Vec<Bytes>,
    receipts: Vec<Receipt>,
}

impl Block {
    /// Assemble a block.
    ///
    /// The transactions root, receipts root and logs bloom of the header are
    /// derived from the given bodies, and the uncle hash is set to the empty
    /// ommers root. Every other header field is kept as given.
    pub fn new(mut header: Header, transactions: Vec<Bytes>, receipts: Vec<Receipt>) -> Self {
        header.transactions_root = transactions_root(&transactions);
        header.receipts_root = receipts_root(&receipts);
        header.logs_bloom = receipts_bloom(&receipts);
        header.uncle_hash = EMPTY_OMMER_ROOT_HASH;

        Self { header, transactions, receipts }
    }

    /// Return a copy of this block carrying `header` as its sealed header.
    ///
    /// Bodies are kept as-is; the header is not re-derived.
    pub fn with_seal(&self, header: Header) -> Self {
        Self { header, transactions: self.transactions.clone(), receipts: self.receipts.clone() }
    }

    /// Get the header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Get the block number.
    pub fn number(&self) -> Option<u64> {
        self.header.number
    }

    /// Compute the block hash.
    pub fn hash(&self) -> B256 {
        self.header.hash()
    }

    /// Get the encoded transactions.
    pub fn transactions(&self) -> &[Bytes] {
        &self.transactions
    }

    /// Get the receipts.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Uncles are never part of a block.
    pub fn uncles(&self) -> &[Header] {
        &[]
    }

    /// Consume the block, returning its header.
    pub fn into_header(self) -> Header {
        self.header
    }
}

/// Ordered trie root of EIP-2718 encoded transactions.
pub fn transactions_root(transactions: &[Bytes]) -> B256 {
    ordered_trie_root_with_encoder(transactions, |tx, buf| buf.extend_from_slice(tx))
}

/// Ordered trie root of RLP encoded receipts.
pub fn receipts_root(receipts: &[Receipt]) -> B256 {
    ordered_trie_root_with_encoder(receipts, |receipt, buf| receipt.encode(buf))
}

fn receipts_bloom(receipts: &[Receipt]) -> Bloom {
    receipts.iter().fold(Bloom::ZERO, |mut bloom, receipt| {
        bloom.accrue_bloom(&receipt.logs_bloom);
        bloom
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_consensus::EMPTY_ROOT_HASH;

    #[test]
    fn test_empty_block_roots() {
        let header = Header { number: Some(1), ..Default::default() };
        let block = Block::new(header, Vec::new(), Vec::new());

        assert_eq!(block.header().transactions_root, EMPTY_ROOT_HASH);
        assert_eq!(block.header().receipts_root, EMPTY_ROOT_HASH);
        assert_eq!(block.header().uncle_hash, EMPTY_OMMER_ROOT_HASH);
        assert_eq!(block.header().logs_bloom, Bloom::ZERO);
        assert!(block.uncles().is_empty());
    }

    #[test]
    fn test_block_derives_body_commitments() {
        let header = Header { number: Some(3), ..Default::default() };
        let txs = vec![Bytes::from_static(&[0x02, 0x01]), Bytes::from_static(&[0x02, 0x02])];
        let receipts = vec![
            Receipt {
                success: true,
                cumulative_gas_used: 21_000,
                logs_bloom: Bloom::repeat_byte(0x01),
            },
            Receipt {
                success: false,
                cumulative_gas_used: 42_000,
                logs_bloom: Bloom::repeat_byte(0x10),
            },
        ];

        let block = Block::new(header, txs.clone(), receipts.clone());

        assert_eq!(block.header().transactions_root, transactions_root(&txs));
        assert_eq!(block.header().receipts_root, receipts_root(&receipts));
        assert_ne!(block.header().transactions_root, EMPTY_ROOT_HASH);
        assert_eq!(block.header().logs_bloom, Bloom::repeat_byte(0x11));
        assert_eq!(block.transactions().len(), 2);
        assert_eq!(block.receipts().len(), 2);
    }

    #[test]
    fn test_with_seal_keeps_bodies() {
        let block = Block::new(
            Header { number: Some(5), ..Default::default() },
            vec![Bytes::from_static(&[0xaa])],
            Vec::new(),
        );

        let mut header = block.header().clone();
        header.timestamp = 42;
        let sealed = block.with_seal(header.clone());

        assert_eq!(sealed.header(), &header);
        assert_eq!(sealed.transactions(), block.transactions());
        assert_eq!(sealed.number(), Some(5));
    }
}
