use crate::rlc::work::DecoderWork;

// ======================================================================
// RlcDecoderResult - PUBLIC

/// Result of decoding. Contains the restored original shards.
///
/// This struct is created by [`RlcDecoder::decode`].
///
/// [`RlcDecoder::decode`]: crate::rlc::RlcDecoder::decode
pub struct RlcDecoderResult<'a> {
    work: &'a mut DecoderWork,
}

impl<'a> RlcDecoderResult<'a> {
    /// Returns restored original shard with given `index`
    /// or `None` if given `index` doesn't correspond to
    /// a missing original shard.
    pub fn restored_original(&self, index: usize) -> Option<&[u8]> {
        self.work.restored_original(index)
    }

    /// Returns iterator over all restored original shards
    /// and their indexes, ordered by indexes.
    pub fn restored_original_iter(&self) -> RlcRestoredOriginal {
        RlcRestoredOriginal::new(self.work)
    }
}

// ======================================================================
// RlcDecoderResult - CRATE

impl<'a> RlcDecoderResult<'a> {
    pub(crate) fn new(work: &'a mut DecoderWork) -> Self {
        Self { work }
    }
}

// ======================================================================
// RlcDecoderResult - IMPL DROP

impl<'a> Drop for RlcDecoderResult<'a> {
    fn drop(&mut self) {
        self.work.reset_received();
    }
}

// ======================================================================
// RlcRestoredOriginal - PUBLIC

/// Iterator over restored original shards and their indexes.
///
/// This struct is created by [`RlcDecoderResult::restored_original_iter`].
pub struct RlcRestoredOriginal<'a> {
    ended: bool,
    next_index: usize,
    work: &'a DecoderWork,
}

// ======================================================================
// RlcRestoredOriginal - IMPL Iterator

impl<'a> Iterator for RlcRestoredOriginal<'a> {
    type Item = (usize, &'a [u8]);
    fn next(&mut self) -> Option<(usize, &'a [u8])> {
        if self.ended {
            None
        } else {
            let mut index = self.next_index;
            while index < self.work.original_count() {
                if let Some(original) = self.work.restored_original(index) {
                    self.next_index = index + 1;
                    return Some((index, original));
                }
                index += 1
            }
            self.ended = true;
            None
        }
    }
}

// ======================================================================
// RlcRestoredOriginal - CRATE

impl<'a> RlcRestoredOriginal<'a> {
    pub(crate) fn new(work: &'a DecoderWork) -> Self {
        Self {
            ended: false,
            next_index: 0,
            work,
        }
    }
}

// ======================================================================
// TESTS

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rlc::{RlcDecoder, RlcEncoder};
    use crate::test_util;

    #[test]
    // RlcDecoderResult::restored_original
    // RlcDecoderResult::restored_original_iter
    // RlcRestoredOriginal
    fn decoder_result() {
        let original = test_util::generate_original(20, 32, 0);

        let mut encoder = RlcEncoder::new(20, 10, 32).unwrap();
        let mut decoder = RlcDecoder::new(20, 10, 32).unwrap();

        for original in &original {
            encoder.add_original_shard(original).unwrap();
        }

        let result = encoder.encode().unwrap();
        let recovery: Vec<(u32, Vec<u8>)> = result
            .recovery_iter()
            .map(|(seed, bytes)| (seed, bytes.to_vec()))
            .collect();

        for i in 1..20 {
            decoder.add_original_shard(i, &original[i]).unwrap();
        }
        for (j, (seed, bytes)) in recovery.iter().enumerate().take(3) {
            decoder.add_recovery_shard(j, *seed, bytes).unwrap();
        }

        let result: RlcDecoderResult = decoder.decode().unwrap();

        assert_eq!(result.restored_original(0).unwrap(), original[0]);
        assert!(result.restored_original(1).is_none());

        let mut iter: RlcRestoredOriginal = result.restored_original_iter();
        assert_eq!(iter.next(), Some((0, original[0].as_slice())));
        assert_eq!(iter.next(), None);
    }
}
