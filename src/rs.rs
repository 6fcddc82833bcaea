//! Reed-Solomon coding over GF(2^16), using the cyclotomic-coset
//! construction described in [`crate::engine`].
//!
//! [`ReedSolomonEncoder`] / [`ReedSolomonDecoder`] use an add-then-finish
//! shape: add shards one at a time, then call `encode`/`decode` once to
//! produce the rest.

use crate::rs::work::{DecoderWork, EncoderWork};
use crate::{DecoderResult, EncoderResult, Error};

pub(crate) mod algorithm;
pub(crate) mod work;

/// Upper bound on `information_count + repair_count`: the order of the
/// multiplicative group of GF(2^16).
pub const MAX_SYMBOL_COUNT: usize = crate::engine::gf16::N;

fn check_shard_count(information_count: usize, repair_count: usize) -> Result<(), Error> {
    if information_count == 0
        || repair_count == 0
        || information_count + repair_count > MAX_SYMBOL_COUNT
    {
        return Err(Error::UnsupportedShardCount {
            original_count: information_count,
            recovery_count: repair_count,
        });
    }
    Ok(())
}

// ======================================================================
// ReedSolomonEncoder - PUBLIC

/// Reed-Solomon encoder.
///
/// Call [`add_original_shard`] once per information symbol (in the order
/// that will later be used as their index), then [`encode`] to produce
/// the repair symbols.
///
/// [`add_original_shard`]: ReedSolomonEncoder::add_original_shard
/// [`encode`]: ReedSolomonEncoder::encode
pub struct ReedSolomonEncoder(EncoderWork);

impl ReedSolomonEncoder {
    /// Creates a new encoder for `original_count` information shards and
    /// `recovery_count` repair shards, each `shard_bytes` long.
    pub fn new(
        original_count: usize,
        recovery_count: usize,
        shard_bytes: usize,
    ) -> Result<Self, Error> {
        check_shard_count(original_count, recovery_count)?;
        if shard_bytes == 0 || shard_bytes % 2 != 0 {
            return Err(Error::InvalidShardSize { shard_bytes });
        }
        let mut work = EncoderWork::new();
        work.reset(original_count, recovery_count, shard_bytes)?;
        Ok(Self(work))
    }

    /// Adds one original (information) shard, in order.
    pub fn add_original_shard<T: AsRef<[u8]>>(&mut self, original_shard: T) -> Result<(), Error> {
        self.0.add_information_symbol(original_shard)
    }

    /// Encodes the added original shards, returning the generated
    /// recovery shards.
    ///
    /// When the returned [`EncoderResult`] is dropped, the encoder is
    /// automatically reset and ready for a new round.
    pub fn encode(&mut self) -> Result<EncoderResult, Error> {
        self.0.encode()?;
        Ok(EncoderResult::new(&mut self.0))
    }

    /// Resets the encoder to a new configuration, forgetting any added
    /// shards.
    pub fn reset(
        &mut self,
        original_count: usize,
        recovery_count: usize,
        shard_bytes: usize,
    ) -> Result<(), Error> {
        check_shard_count(original_count, recovery_count)?;
        if shard_bytes == 0 || shard_bytes % 2 != 0 {
            return Err(Error::InvalidShardSize { shard_bytes });
        }
        self.0.reset(original_count, recovery_count, shard_bytes)
    }

    /// Returns `true` if this `original_count`/`recovery_count`
    /// combination is supported, i.e. both are non-zero and their sum
    /// does not exceed [`MAX_SYMBOL_COUNT`].
    pub fn supports(original_count: usize, recovery_count: usize) -> bool {
        check_shard_count(original_count, recovery_count).is_ok()
    }
}

// ======================================================================
// ReedSolomonDecoder - PUBLIC

/// Reed-Solomon decoder.
///
/// Add whichever original/recovery shards were received (in any order,
/// any mix), then call [`decode`] once at least `original_count` shards
/// total have been added.
///
/// [`decode`]: ReedSolomonDecoder::decode
pub struct ReedSolomonDecoder(DecoderWork);

impl ReedSolomonDecoder {
    /// Creates a new decoder for `original_count` information shards and
    /// `recovery_count` repair shards, each `shard_bytes` long.
    pub fn new(
        original_count: usize,
        recovery_count: usize,
        shard_bytes: usize,
    ) -> Result<Self, Error> {
        check_shard_count(original_count, recovery_count)?;
        if shard_bytes == 0 || shard_bytes % 2 != 0 {
            return Err(Error::InvalidShardSize { shard_bytes });
        }
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

    /// Adds one recovery shard, identified by the index it was given at
    /// encode time.
    pub fn add_recovery_shard<T: AsRef<[u8]>>(
        &mut self,
        index: usize,
        recovery_shard: T,
    ) -> Result<(), Error> {
        self.0.add_repair_symbol(index, recovery_shard)
    }

    /// Decodes the added shards, returning the restored original shards.
    ///
    /// When the returned [`DecoderResult`] is dropped, the decoder is
    /// automatically reset and ready for a new round.
    pub fn decode(&mut self) -> Result<DecoderResult, Error> {
        self.0.decode()?;
        Ok(DecoderResult::new(&mut self.0))
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
        if shard_bytes == 0 || shard_bytes % 2 != 0 {
            return Err(Error::InvalidShardSize { shard_bytes });
        }
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
