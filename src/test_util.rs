use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ======================================================================
// FUNCTIONS - CRATE

pub(crate) fn generate_original(
    original_count: usize,
    shard_bytes: usize,
    seed: u8,
) -> Vec<Vec<u8>> {
    let mut rng = ChaCha8Rng::from_seed([seed; 32]);
    let mut original = vec![vec![0u8; shard_bytes]; original_count];
    for original in &mut original {
        rng.fill::<[u8]>(original);
    }
    original
}
