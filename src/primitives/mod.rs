//! Primitive chain types consumed and produced by the consensus engine.
//!
//! # Modules
//!
//! - [`header`]: Block header and its hash / seal-hash preimage encoding
//! - [`block`]: Block assembly, receipts and body commitments

pub mod block;
pub mod header;

pub use block::{receipts_root, transactions_root, Block, Receipt};
pub use header::Header;
