//! Random linear coding over GF(2^8): repair symbols are random GF(2^8)
//! linear combinations of the information symbols, generated from a
//! seeded PRNG so the decoder can regenerate the same coefficients; the
//! decoder recovers erasures by on-line Gaussian elimination as repair
//! symbols arrive.
//!
//! [`RlcEncoder`] / [`RlcDecoder`] follow the same add-then-finish shape
//! as [`crate::ReedSolomonEncoder`] / [`crate::ReedSolomonDecoder`], with
//! one difference: every repair shard carries a `u32` seed alongside its
//! bytes, and that seed must be handed back to the decoder together with
//! the shard.

pub(crate) mod algorithm;
pub(crate) mod linear_system;
pub(crate) mod prng;
pub(crate) mod work;

mod decoder_result;
mod encoder_result;

pub use decoder_result::{RlcDecoderResult, RlcRestoredOriginal};
pub use encoder_result::{RlcEncoderResult, RlcRecovery};

use crate::rlc::work::{DecoderWork, EncoderWork};
use crate::Error;

fn check_shard_count(information_count: usize, repair_count: usize) -> Result<(), Error> {
    if information_count == 0 || repair_count == 0 {
        return Err(Error::UnsupportedShardCount {
            original_count: information_count,
            recovery_count: repair_count,
        });
    }
    Ok(())
}

fn check_shard_bytes(shard_bytes: usize) -> Result<(), Error> {
    if shard_bytes == 0 {
        return Err(Error::InvalidShardSize { shard_bytes });
    }
    Ok(())
}

// ======================================================================
// RlcEncoder - PUBLIC

/// Random-linear-code encoder over GF(2^8).
///
/// Call [`add_original_shard`] once per information symbol (in the order
/// that will later be used as their index), then [`encode`] to produce
/// the repair symbols, each tagged with the seed it was generated from.
///
/// [`add_original_shard`]: RlcEncoder::add_original_shard
/// [`encode`]: RlcEncoder::encode
pub struct RlcEncoder(EncoderWork);

impl RlcEncoder {
    /// Creates a new encoder for `original_count` information shards and
    /// `recovery_count` repair shards, each `shard_bytes` long.
    pub fn new(
        original_count: usize,
        recovery_count: usize,
        shard_bytes: usize,
    ) -> Result<Self, Error> {
        check_shard_count(original_count, recovery_count)?;
        check_shard_bytes(shard_bytes)?;
        let mut work = EncoderWork::new();
        work.reset(original_count, recovery_count, shard_bytes)?;
        Ok(Self(work))
    }

    /// Adds one original (information) shard, in order.
    pub fn add_original_shard<T: AsRef<[u8]>>(&mut self, original_shard: T) -> Result<(), Error> {
        self.0.add_information_symbol(original_shard)
    }

    /// Encodes the added original shards, returning the generated
    /// `(seed, recovery shard)` pairs.
    ///
    /// Each call assigns fresh seeds, continuing a counter that lives for
    /// the whole lifetime of this encoder: the seed sequence is never
    /// reused, even across separate rounds of the same encoder.
    ///
    /// When the returned [`RlcEncoderResult`] is dropped, the encoder is
    /// automatically reset and ready for a new round.
    pub fn encode(&mut self) -> Result<RlcEncoderResult, Error> {
        self.0.encode()?;
        Ok(RlcEncoderResult::new(&mut self.0))
    }

    /// Resets the encoder to a new configuration, forgetting any added
    /// shards and restarting the seed counter from zero.
    pub fn reset(
        &mut self,
        original_count: usize,
        recovery_count: usize,
        shard_bytes: usize,
    ) -> Result<(), Error> {
        check_shard_count(original_count, recovery_count)?;
        check_shard_bytes(shard_bytes)?;
        self.0.reset(original_count, recovery_count, shard_bytes)
    }

    /// Returns `true` if this `original_count`/`recovery_count`
    /// combination is supported, i.e. both are non-zero.
    pub fn supports(original_count: usize, recovery_count: usize) -> bool {
        check_shard_count(original_count, recovery_count).is_ok()
    }
}

// ======================================================================
// RlcDecoder - PUBLIC

/// Random-linear-code decoder over GF(2^8).
///
/// Add whichever original/recovery shards were received (in any order,
/// any mix); each recovery shard must be given together with the seed it
/// was generated with. Call [`decode`] once at least `original_count`
/// shards total have been added.
///
/// [`decode`]: RlcDecoder::decode
pub struct RlcDecoder(DecoderWork);

impl RlcDecoder {
    /// Creates a new decoder for `original_count` information shards and
    /// `recovery_count` repair shards, each `shard_bytes` long.
    pub fn new(
        original_count: usize,
        recovery_count: usize,
        shard_bytes: usize,
    ) -> Result<Self, Error> {
        check_shard_count(original_count, recovery_count)?;
        check_shard_bytes(shard_bytes)?;
        let mut work = DecoderWork::new();
        work.reset(original_count, recovery_count, shard_bytes)?;
        Ok(Self(work))
    }

    /// Adds one original shard, identified by the index it was given at
    /// encode time.
    pub fn add_original_shard<T: AsRef<[u8]>>(
        &mut self,
        index: usize,
        original_shard: T,
    ) -> Result<(), Error> {
        self.0.add_information_symbol(index, original_shard)
    }

    /// Adds one recovery shard, identified by the index and seed it was
    /// given at encode time.
    pub fn add_recovery_shard<T: AsRef<[u8]>>(
        &mut self,
        index: usize,
        seed: u32,
        recovery_shard: T,
    ) -> Result<(), Error> {
        self.0.add_repair_symbol(index, seed, recovery_shard)
    }

    /// Decodes the added shards, returning the restored original shards.
    ///
    /// Returns [`Error::CannotRestore`] both when more shards are missing
    /// than there is repair capacity for, and when the received repair
    /// shards, though enough in number, fail to pin down every missing
    /// information symbol (a rank-deficient linear system).
    ///
    /// When the returned [`RlcDecoderResult`] is dropped, the decoder is
    /// automatically reset and ready for a new round.
    pub fn decode(&mut self) -> Result<RlcDecoderResult, Error> {
        self.0.decode()?;
        Ok(RlcDecoderResult::new(&mut self.0))
    }

    /// Resets the decoder to a new configuration, forgetting any added
    /// shards.
    pub fn reset(
        &mut self,
        original_count: usize,
        recovery_count: usize,
        shard_bytes: usize,
    ) -> Result<(), Error> {
        check_shard_count(original_count, recovery_count)?;
        check_shard_bytes(shard_bytes)?;
        self.0.reset(original_count, recovery_count, shard_bytes)
    }

    /// Returns `true` if this `original_count`/`recovery_count`
    /// combination is supported.
    pub fn supports(original_count: usize, recovery_count: usize) -> bool {
        check_shard_count(original_count, recovery_count).is_ok()
    }
}

// ======================================================================
// TESTS

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use fixedbitset::FixedBitSet;

    use super::*;
    use crate::test_util;

    fn roundtrip(
        original_count: usize,
        recovery_count: usize,
        decoder_original: &[usize],
        decoder_recovery: &[usize],
        seed: u8,
    ) {
        let original = test_util::generate_original(original_count, 16, seed);

        let mut encoder = RlcEncoder::new(original_count, recovery_count, 16).unwrap();
        for original in &original {
            encoder.add_original_shard(original).unwrap();
        }
        let result = encoder.encode().unwrap();
        let recovery: Vec<(u32, Vec<u8>)> = result
            .recovery_iter()
            .map(|(s, b)| (s, b.to_vec()))
            .collect();

        let mut decoder = RlcDecoder::new(original_count, recovery_count, 16).unwrap();

        let mut original_received = FixedBitSet::with_capacity(original_count);
        for &i in decoder_original {
            decoder.add_original_shard(i, &original[i]).unwrap();
            original_received.set(i, true);
        }
        for &i in decoder_recovery {
            let (s, b) = &recovery[i];
            decoder.add_recovery_shard(i, *s, b).unwrap();
        }

        let result = decoder.decode().unwrap();
        let restored: HashMap<_, _> = result.restored_original_iter().collect();

        for i in 0..original_count {
            if !original_received[i] {
                assert_eq!(restored[&i], original[i]);
            }
        }
    }

    #[test]
    fn roundtrip_comfortable_margin() {
        // 20 erasures against 30 of the 50 available repair symbols: a
        // 10-symbol margin over GF(2^8) makes rank deficiency
        // astronomically unlikely, so the fixed seed is effectively
        // deterministic.
        roundtrip(
            100,
            50,
            &(20..100).collect::<Vec<_>>(),
            &(0..30).collect::<Vec<_>>(),
            234,
        );
    }

    #[test]
    fn roundtrip_large_margin() {
        roundtrip(
            150,
            80,
            &(40..150).collect::<Vec<_>>(),
            &(0..55).collect::<Vec<_>>(),
            17,
        );
    }

    #[test]
    fn seeds_must_travel_with_their_shard() {
        let original = test_util::generate_original(10, 8, 1);
        let mut encoder = RlcEncoder::new(10, 5, 8).unwrap();
        for original in &original {
            encoder.add_original_shard(original).unwrap();
        }
        let result = encoder.encode().unwrap();
        let recovery: Vec<(u32, Vec<u8>)> = result
            .recovery_iter()
            .map(|(s, b)| (s, b.to_vec()))
            .collect();

        // Seeds from a single encoder round are distinct (monotone counter).
        let mut seeds: Vec<u32> = recovery.iter().map(|(s, _)| *s).collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), recovery.len());
    }

    #[test]
    fn too_many_erasures_cannot_restore() {
        let original_count = 20;
        let recovery_count = 5;
        let original = test_util::generate_original(original_count, 8, 2);

        let mut encoder = RlcEncoder::new(original_count, recovery_count, 8).unwrap();
        for original in &original {
            encoder.add_original_shard(original).unwrap();
        }
        encoder.encode().unwrap();

        let mut decoder = RlcDecoder::new(original_count, recovery_count, 8).unwrap();
        for i in 0..10 {
            decoder.add_original_shard(i, &original[i]).unwrap();
        }

        assert_eq!(
            decoder.decode(),
            Err(Error::CannotRestore {
                erased: 15,
                capacity: 5,
            })
        );
    }

    #[test]
    fn reset_changes_configuration() {
        let mut encoder = RlcEncoder::new(2, 3, 8).unwrap();
        encoder.reset(3, 2, 8).unwrap();

        let original = test_util::generate_original(3, 8, 1);
        for original in &original {
            encoder.add_original_shard(original).unwrap();
        }
        let result = encoder.encode().unwrap();
        assert_eq!(result.recovery_iter().count(), 2);
    }

    #[test]
    fn supports_rejects_zero() {
        assert!(RlcEncoder::supports(100, 10));
        assert!(!RlcEncoder::supports(0, 10));
        assert!(!RlcEncoder::supports(10, 0));
    }
}
