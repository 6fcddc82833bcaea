//! RLC encode/decode built from [`crate::rlc::prng`] and
//! [`crate::rlc::linear_system`].
//!
//! Operates on [`Symbols`]/[`SymbolsRefMut`] flat symbol buffers.

use crate::engine::gf256;
use crate::engine::symbols::{Symbols, SymbolsRefMut};
use crate::rlc::linear_system::{Equation, LinearSystem};
use crate::rlc::prng;

/// Computes `r` repair symbols from `k` information symbols, assigning
/// each a fresh seed starting at `*next_seed` (post-incremented).
///
/// Returns `None` on allocation failure.
pub(crate) fn generate_repair_symbols(
    inf: &Symbols,
    rep: &mut SymbolsRefMut,
    seeds: &mut [u32],
    next_seed: &mut u32,
) -> Option<()> {
    let t = gf256::tables();
    let k = inf.len();

    for j in 0..rep.len() {
        let seed = *next_seed;
        *next_seed += 1;
        seeds[j] = seed;

        let coefs = prng::coefficients(seed, k)?;

        rep[j].fill(0);
        for i in 0..k {
            gf256::symbol_add_scaled(t, &mut rep[j], coefs[i], &inf[i]);
        }
    }
    Some(())
}

/// Restores erased symbols in place via on-line Gaussian elimination.
///
/// `rcv` holds `k + r` symbols (information then repair), with erased
/// slots pre-zeroed; `is_erased[i]` marks which of them are unknown.
/// `seeds[j]` is the seed used to generate repair symbol `j` at encode
/// time, needed only for repair symbols that were actually received.
///
/// Returns `Some(false)` if the received repair symbols do not pin down
/// every erased information symbol (rank deficient system), or `None` on
/// allocation failure.
pub(crate) fn restore_symbols(
    k: usize,
    r: usize,
    rcv: &mut SymbolsRefMut,
    seeds: &[u32],
    is_erased: &[bool],
) -> Option<bool> {
    let t = gf256::tables();
    let mut system = LinearSystem::new(k)?;

    for j in 0..r {
        if is_erased[k + j] {
            continue;
        }

        let mut coefs = prng::coefficients(seeds[j], k)?;

        let mut constant_term = Vec::new();
        constant_term.try_reserve_exact(rcv.symbol_size()).ok()?;
        constant_term.extend_from_slice(&rcv[k + j]);

        for i in 0..k {
            if is_erased[i] {
                continue;
            }
            gf256::symbol_add_scaled(t, &mut constant_term, coefs[i], &rcv[i]);
            coefs[i] = 0;
        }

        let eq = Equation::new(coefs, constant_term);
        if eq.is_zero() {
            continue;
        }
        system.add_with_elimination(t, eq);
    }

    for i in 0..k {
        if !is_erased[i] {
            continue;
        }
        match system.get(i) {
            Some(eq) if eq.has_one_id() && eq.coef(i) == 1 => {
                rcv[i].copy_from_slice(eq.constant_term());
            }
            _ => return Some(false),
        }
    }

    Some(true)
}

// ======================================================================
// TESTS

#[cfg(test)]
mod tests {
    use super::*;

    fn random_symbols(len: usize, symbol_size: usize, seed: u32) -> Symbols {
        let mut s = Symbols::try_new(len, symbol_size).unwrap();
        let mut state = seed.wrapping_mul(2654435761).wrapping_add(1);
        for i in 0..len {
            for b in s[i].iter_mut() {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                *b = (state >> 24) as u8;
            }
        }
        s
    }

    #[test]
    fn roundtrip_exact_erasures() {
        // 6 erasures against 10 repair symbols: comfortable margin over
        // GF(2^8) so the random system is overwhelmingly likely full rank.
        let (k, r) = (20usize, 10usize);
        let inf = random_symbols(k, 8, 5);

        let mut rep = Symbols::try_new(r, 8).unwrap();
        let mut seeds = vec![0u32; r];
        let mut next_seed = 0u32;
        generate_repair_symbols(&inf, &mut rep.as_ref_mut(), &mut seeds, &mut next_seed).unwrap();

        let mut rcv = Symbols::try_new(k + r, 8).unwrap();
        for i in 0..k {
            rcv[i].copy_from_slice(&inf[i]);
        }
        for j in 0..r {
            rcv[k + j].copy_from_slice(&rep[j]);
        }

        let mut is_erased = vec![false; k + r];
        for &erase in &[0usize, 3, 7, 8, 12, 19] {
            is_erased[erase] = true;
            rcv[erase].fill(0);
        }

        let ok = restore_symbols(k, r, &mut rcv.as_ref_mut(), &seeds, &is_erased).unwrap();
        assert!(ok);

        for i in 0..k {
            assert_eq!(&rcv[i], &inf[i], "mismatch at information symbol {i}");
        }
    }

    #[test]
    fn rank_deficient_system_is_reported() {
        let (k, r) = (4usize, 2usize);
        let inf = random_symbols(k, 4, 1);

        let mut rep = Symbols::try_new(r, 4).unwrap();
        let mut seeds = vec![0u32; r];
        let mut next_seed = 0u32;
        generate_repair_symbols(&inf, &mut rep.as_ref_mut(), &mut seeds, &mut next_seed).unwrap();

        let mut rcv = Symbols::try_new(k + r, 4).unwrap();
        for i in 0..k {
            rcv[i].copy_from_slice(&inf[i]);
        }
        for j in 0..r {
            rcv[k + j].copy_from_slice(&rep[j]);
        }

        // 3 erasures against only 2 repair symbols: system cannot be full rank.
        let mut is_erased = vec![false; k + r];
        for &erase in &[0usize, 1, 2] {
            is_erased[erase] = true;
            rcv[erase].fill(0);
        }

        let ok = restore_symbols(k, r, &mut rcv.as_ref_mut(), &seeds, &is_erased).unwrap();
        assert!(!ok);
    }
}
