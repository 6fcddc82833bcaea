//! Evaluation of GF(2^16) polynomials at powers of `alpha`, the `N`-th
//! root of unity (`N = 65535`).
//!
//! Two evaluation directions are needed by [`crate::rs`]:
//!
//! - "positive indices": a sparse polynomial, given as coefficients at a
//!   set of input positions, evaluated at `alpha^j` for consecutive `j`
//!   (the syndrome).
//! - "negated indices": a dense polynomial evaluated at `alpha^(-p)` for a
//!   set of output positions `p` (repair-symbol synthesis and erasure
//!   recovery).
//!
//! The negated direction has a fast path when the output positions form
//! whole cyclotomic cosets: [`evaluate_negated_cyclotomic`].

use crate::engine::coset::Coset;
use crate::engine::gf16::{self, Gf16Tables, N};
use crate::engine::symbols::{Symbols, SymbolSource, SymbolsRefMut};

/// `out[j] = Σ_i inputs[i] · alpha^(positions[i] * j mod N)` for `j` in
/// `[0, out.len())`.
///
/// Direct O(len(positions) · out.len()) evaluator. Used for syndrome
/// computation in both encode and decode, where the input support rarely
/// aligns with a handful of output cosets.
pub(crate) fn transform_positive(
    t: &Gf16Tables,
    positions: &[u32],
    inputs: &impl SymbolSource,
    out: &mut SymbolsRefMut,
) {
    debug_assert_eq!(positions.len(), inputs.len());
    out.zero_all();
    for j in 0..out.len() {
        for i in 0..inputs.len() {
            let e = (positions[i] as u64 * j as u64 % N as u64) as usize;
            gf16::symbol_madd(t, &mut out[j], t.pow(e), inputs.get(i));
        }
    }
}

/// `out[k] = Σ_i dense[i] · alpha^(i * (N - positions[k]) mod N)`, written
/// in the order of `positions`.
///
/// Direct O(dense.len() * positions.len()) evaluator for "evaluate at
/// negated indices" when the output positions are not coset-aligned (the
/// decoder's erasure set, which is an arbitrary subset of `[0, k+r)`).
pub(crate) fn evaluate_negated_direct(
    t: &Gf16Tables,
    dense: &impl SymbolSource,
    positions: &[u32],
    out: &mut SymbolsRefMut,
) {
    debug_assert_eq!(positions.len(), out.len());
    out.zero_all();
    for (k, &p) in positions.iter().enumerate() {
        let neg_p = (N as u32 - p % N as u32) % N as u32;
        for i in 0..dense.len() {
            let e = (i as u64 * neg_p as u64 % N as u64) as usize;
            gf16::symbol_madd(t, &mut out[k], t.pow(e), dense.get(i));
        }
    }
}

/// Cyclotomic-coset specialisation of [`evaluate_negated_direct`]: computes
/// the same sum for every position covered by `out_cosets`, replacing the
/// O(dense.len()) field multiplies per output position with O(dense.len())
/// XOR-only additions per coset, plus one `size * size` matrix-vector
/// product per coset.
///
/// Writes outputs in the same order as
/// [`crate::engine::coset::cosets_to_positions`] would expand `out_cosets`
/// (one coset's orbit at a time, leader first).
///
/// For a coset of leader `s` and size `m`, every input exponent `i` gives
/// `alpha^(s * i) ∈ GF(2^m)` (because `s` is always a multiple of
/// `N / (2^m - 1)`, the defining property of a size-`m` coset leader), so
/// its normal-basis coordinates are well-defined. We run the grouping on
/// the *negated* leader `N - s` rather than `s` itself, since the identity
/// this routine needs is `alpha^(-(2^j s) i) = alpha^(2^j ((N-s) i))`,
/// i.e. repeated squaring (a cyclic shift in the normal basis) of
/// `alpha^((N-s) i)`, not of `alpha^(s i)`.
pub(crate) fn evaluate_negated_cyclotomic(
    t: &Gf16Tables,
    dense: &impl SymbolSource,
    out_cosets: &[Coset],
    out: &mut SymbolsRefMut,
) -> Option<()> {
    let symbol_size = dense.symbol_size();
    out.zero_all();

    let mut write_at = 0usize;
    for coset in out_cosets {
        let m = coset.size as usize;
        let basis = gf16::basis(m);
        let neg_leader = (N as u32 - coset.leader % N as u32) % N as u32;

        let mut u = Symbols::try_new(m, symbol_size)?;
        for i in 0..dense.len() {
            let e = (neg_leader as u64 * i as u64 % N as u64) as usize;
            let repr = t.normal_repr(m, e);
            for tt in 0..m {
                if repr & (1 << tt) != 0 {
                    gf16::symbol_add(&mut u[tt], dense.get(i));
                }
            }
        }

        for j in 0..m {
            for tt in 0..m {
                let b = basis[(j + tt) % m];
                gf16::symbol_madd(t, &mut out[write_at + j], b, &u[tt]);
            }
        }
        write_at += m;
    }
    debug_assert_eq!(write_at, out.len());
    Some(())
}

// ======================================================================
// TESTS
