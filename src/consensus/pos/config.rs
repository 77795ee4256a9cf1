//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Proof-of-stake engine configuration.
///
/// Protocol constants are compiled in (see [`super::BLOCK_GAS_LIMIT`],
/// [`super::BLOCK_INTERVAL`]) so the configuration carries no tunables yet.
/// It is `non_exhaustive` so fields can be added without breaking callers;
/// build it with [`PosConfig::default`] or from serialized form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct PosConfig {}
