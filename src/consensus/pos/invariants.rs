//! Unused header field discipline.
//!
//! Proof-of-work fields inherited from the legacy header carry no meaning
//! here and must hold fixed sentinel values on every non-genesis header.

use super::{
    PosError, UNITY_DIFFICULTY, ZERO_COINBASE, ZERO_MIX_DIGEST, ZERO_NONCE, ZERO_UNCLE_HASH,
};
use crate::primitives::Header;
use alloy_primitives::Bytes;

/// Check that every unused field of `header` holds its sentinel value.
///
/// Fields are checked in a fixed order and the first violation is returned:
/// uncle hash, coinbase, difficulty, extra-data, mix digest, nonce.
pub fn verify_unused_fields(header: &Header) -> Result<(), PosError> {
    if header.uncle_hash != ZERO_UNCLE_HASH {
        return Err(PosError::NonEmptyUncleHash);
    }
    if header.coinbase != ZERO_COINBASE {
        return Err(PosError::NonEmptyCoinbase);
    }
    if header.difficulty != UNITY_DIFFICULTY {
        return Err(PosError::NonUnitDifficulty { difficulty: header.difficulty });
    }
    if !header.extra_data.is_empty() {
        return Err(PosError::NonEmptyExtra);
    }
    if header.mix_digest != ZERO_MIX_DIGEST {
        return Err(PosError::NonZeroMixDigest);
    }
    if header.nonce != ZERO_NONCE {
        return Err(PosError::NonZeroNonce);
    }
    Ok(())
}

/// Overwrite every unused field of `header` with its sentinel value.
pub fn set_unused_fields(header: &mut Header) {
    header.uncle_hash = ZERO_UNCLE_HASH;
    header.coinbase = ZERO_COINBASE;
    header.difficulty = UNITY_DIFFICULTY;
    header.extra_data = Bytes::new();
    header.mix_digest = ZERO_MIX_DIGEST;
    header.nonce = ZERO_NONCE;
}
