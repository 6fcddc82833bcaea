//! The cyclotomic-coset Reed-Solomon algorithm: locator/syndrome/evaluator
//! polynomial construction, Forney coefficients, and the two public
//! operations (`generate_repair_symbols`, `restore_symbols`) built from
//! them.
//!
//! Operates on [`Symbols`]/[`SymbolsRefMut`] flat symbol buffers rather
//! than per-symbol allocations.

use crate::engine::coset::{self, Coset};
use crate::engine::fft;
use crate::engine::gf16::{self, Gf16Tables, N};
use crate::engine::symbols::{Symbols, SymbolsRefMut};

/// Largest locator polynomial a single coset (size <= 16) can produce;
/// `coset.size + 1` coefficients.
pub(crate) const COSET_LOCATOR_MAX_LEN: usize = 17;

/// Builds the locator polynomial `Π (x - alpha^p)` for an arbitrary list of
/// positions, as dense GF(2^16) coefficients `poly[0..=positions.len()]`.
///
/// Used for the erasure locator in decode, where erased positions are an
/// arbitrary subset of `[0, k+r)` and the resulting coefficients are
/// generally not binary.
fn locator_poly(t: &Gf16Tables, positions: &[u32]) -> Option<Vec<u16>> {
    let mut poly = Vec::new();
    poly.try_reserve_exact(positions.len() + 1).ok()?;
    poly.resize(positions.len() + 1, 0);
    poly[0] = 1;
    for (d, &pos) in positions.iter().enumerate() {
        let coef = t.pow(pos as usize);
        poly[d + 1] = 0;
        let mut i = d + 1;
        loop {
            poly[i] ^= gf16::mul(t, poly[i - 1], coef);
            if i == 0 {
                break;
            }
            i -= 1;
        }
    }
    Some(poly)
}

/// Builds the repair-symbols locator polynomial as the product of each
/// repair coset's minimal polynomial; all coefficients are binary (0/1)
/// since the minimal polynomial of a cyclotomic coset over GF(2) has
/// coefficients in the GF(2) subfield.
fn binary_locator_poly(t: &Gf16Tables, rep_cosets: &[Coset], r: usize) -> Option<Vec<u16>> {
    let mut poly = Vec::new();
    poly.try_reserve_exact(r + 1).ok()?;
    poly.resize(r + 1, 0);
    poly[0] = 1;
    let mut d = 0usize;

    for coset in rep_cosets {
        let elements: Vec<u32> = {
            let mut v = Vec::new();
            v.try_reserve_exact(coset.size as usize).ok()?;
            let mut p = coset.leader;
            for _ in 0..coset.size {
                v.push(p);
                p = (p * 2) % N as u32;
            }
            v
        };
        let coset_poly = locator_poly(t, &elements)?;
        debug_assert!(coset_poly.iter().all(|&c| c == 0 || c == 1));

        let size = coset.size as usize;
        for i in (0..=d).rev() {
            if poly[i] == 1 {
                for j in 1..=size {
                    poly[i + j] ^= coset_poly[j];
                }
            }
        }
        d += size;
        debug_assert_eq!(poly[d], 1);
    }

    debug_assert_eq!(d, r);
    Some(poly)
}

/// Forney coefficient at `pos`, given the (possibly non-binary) locator
/// polynomial of degree `degree`.
///
/// `locator'(x) = Σ_{j odd} locator[j] x^{j-1}` in characteristic 2 (the
/// derivative kills every even-power term), so this needs only the
/// odd-indexed coefficients evaluated at `alpha^{-pos}`.
fn forney_coefficient(t: &Gf16Tables, locator: &[u16], degree: usize, pos: u32) -> u16 {
    let p = t.pow(pos as usize);
    let neg_pos = (N as u32 - pos % N as u32) % N as u32;

    let mut q = 0u16;
    let mut j = 0usize;
    while j < degree {
        let coef = locator[j + 1];
        if coef != 0 {
            let e = (j as u64 * neg_pos as u64 % N as u64) as usize;
            q ^= if coef == 1 {
                t.pow(e)
            } else {
                gf16::mul(t, t.pow(e), coef)
            };
        }
        j += 2;
    }

    gf16::div(t, p, q)
}

/// `evaluator = (syndrome * locator) mod x^len`, `len = syndrome.len()`.
fn evaluator_poly(
    t: &Gf16Tables,
    syndrome: &Symbols,
    locator: &[u16],
    out: &mut SymbolsRefMut,
) {
    let r = syndrome.len();
    out.zero_all();
    for i in 0..r {
        let coef = locator[i];
        if coef == 0 {
            continue;
        }
        for j in 0..(r - i) {
            gf16::symbol_madd(t, &mut out[i + j], coef, &syndrome[j]);
        }
    }
}

/// Chosen coset partition and the flat position lists derived from it.
pub(crate) struct Layout {
    pub(crate) inf_cosets: Vec<Coset>,
    pub(crate) rep_cosets: Vec<Coset>,
    pub(crate) positions: Vec<u32>,
}

impl Layout {
    pub(crate) fn build(k: usize, r: usize) -> Option<Self> {
        let (inf_cosets, rep_cosets) = coset::select_cosets(k, r)?;
        let mut positions = coset::cosets_to_positions(&inf_cosets);
        positions.extend(coset::cosets_to_positions(&rep_cosets));
        Some(Self {
            inf_cosets,
            rep_cosets,
            positions,
        })
    }

    pub(crate) fn inf_positions(&self, k: usize) -> &[u32] {
        &self.positions[..k]
    }

    pub(crate) fn rep_positions(&self, k: usize) -> &[u32] {
        &self.positions[k..]
    }
}

/// Computes `r` repair symbols from `k` information symbols.
///
/// Requires `k + r <= N`. Returns `None` on allocation failure.
pub(crate) fn generate_repair_symbols(
    inf: &Symbols,
    rep: &mut SymbolsRefMut,
) -> Option<()> {
    let t = gf16::tables();
    let k = inf.len();
    let r = rep.len();
    debug_assert!(k + r <= N);

    let layout = Layout::build(k, r)?;

    let mut syndrome = Symbols::try_new(r, inf.symbol_size())?;
    fft::transform_positive(t, layout.inf_positions(k), inf, &mut syndrome.as_ref_mut());

    let locator = binary_locator_poly(t, &layout.rep_cosets, r)?;

    let mut evaluator = Symbols::try_new(r, inf.symbol_size())?;
    evaluator_poly(t, &syndrome, &locator, &mut evaluator.as_ref_mut());

    fft::evaluate_negated_cyclotomic(t, &evaluator, &layout.rep_cosets, rep)?;

    for (i, &pos) in layout.rep_positions(k).iter().enumerate() {
        let coef = forney_coefficient(t, &locator, r, pos);
        gf16::symbol_mul(t, &mut rep[i], coef);
    }

    Some(())
}

/// Restores erased symbols in place.
///
/// `rcv` holds `k + r` symbols (information then repair), with erased
/// slots pre-zeroed; `is_erased[i]` marks which of them are unknown.
/// `t_erasures` must not exceed `r`. Returns `None` on allocation failure;
/// the caller is expected to have already checked `t_erasures <= r`.
pub(crate) fn restore_symbols(
    k: usize,
    r: usize,
    rcv: &mut SymbolsRefMut,
    is_erased: &[bool],
    t_erasures: usize,
) -> Option<()> {
    let t = gf16::tables();
    debug_assert_eq!(rcv.len(), k + r);
    debug_assert_eq!(is_erased.len(), k + r);

    let layout = Layout::build(k, r)?;
    let symbol_size = rcv.symbol_size();

    let mut syndrome = Symbols::try_new(t_erasures, symbol_size)?;
    fft::transform_positive(t, &layout.positions, rcv, &mut syndrome.as_ref_mut());

    let mut erased_positions = Vec::new();
    erased_positions.try_reserve_exact(t_erasures).ok()?;
    for i in 0..k + r {
        if is_erased[i] {
            erased_positions.push(layout.positions[i]);
        }
    }
    debug_assert_eq!(erased_positions.len(), t_erasures);

    let locator = locator_poly(t, &erased_positions)?;

    let mut evaluator = Symbols::try_new(t_erasures, symbol_size)?;
    evaluator_poly(t, &syndrome, &locator, &mut evaluator.as_ref_mut());

    for id in 0..k {
        if !is_erased[id] {
            continue;
        }
        let pos = layout.positions[id];
        let forney = forney_coefficient(t, &locator, t_erasures, pos);
        let neg_pos = (N as u32 - pos % N as u32) % N as u32;

        rcv[id].fill(0);
        for i in 0..t_erasures {
            let e = (i as u64 * neg_pos as u64 % N as u64) as usize;
            let coef = gf16::mul(t, forney, t.pow(e));
            gf16::symbol_madd(t, &mut rcv[id], coef, &evaluator[i]);
        }
    }

    Some(())
}

// ======================================================================
// TESTS
