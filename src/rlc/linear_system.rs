//! Pivot-indexed linear system over GF(2^8), as used by the RLC decoder.
//!
//! An [`Equation`] is a dense row `[c_0, ..., c_{k-1} | constant_term]`
//! plus cached pivot/last-nonzero bounds; a [`LinearSystem`] is an array
//! of `k` slots indexed directly by pivot id.

use crate::engine::gf256::{self, Gf256Tables};

// ======================================================================
// Equation - CRATE

pub(crate) struct Equation {
    coefs: Vec<u8>,
    pivot: Option<usize>,
    last_non_zero: Option<usize>,
    constant_term: Vec<u8>,
}

impl Equation {
    pub(crate) fn new(coefs: Vec<u8>, constant_term: Vec<u8>) -> Self {
        let mut eq = Self {
            coefs,
            pivot: None,
            last_non_zero: None,
            constant_term,
        };
        eq.adjust_non_zero_bounds();
        eq
    }

    pub(crate) fn pivot(&self) -> Option<usize> {
        self.pivot
    }

    pub(crate) fn last_non_zero(&self) -> Option<usize> {
        self.last_non_zero
    }

    pub(crate) fn coef(&self, id: usize) -> u8 {
        self.coefs.get(id).copied().unwrap_or(0)
    }

    pub(crate) fn constant_term(&self) -> &[u8] {
        &self.constant_term
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.pivot.is_none()
    }

    pub(crate) fn has_one_id(&self) -> bool {
        self.pivot.is_some() && self.pivot == self.last_non_zero
    }

    /// Recomputes `pivot`/`last_non_zero`: smallest/largest nonzero index.
    fn adjust_non_zero_bounds(&mut self) -> bool {
        self.pivot = self.coefs.iter().position(|&c| c != 0);
        self.last_non_zero = self.coefs.iter().rposition(|&c| c != 0);
        self.pivot.is_some()
    }

    /// Multiplies `coefs` and `constant_term` by `c`.
    pub(crate) fn multiply(&mut self, t: &Gf256Tables, c: u8) {
        gf256::symbol_scale(t, &mut self.coefs, c);
        gf256::symbol_scale(t, &mut self.constant_term, c);
    }

    /// XORs `other` into `self` over `other`'s nonzero range, then
    /// recomputes bounds.
    pub(crate) fn add_assign(&mut self, other: &Equation) {
        if let (Some(p), Some(l)) = (other.pivot, other.last_non_zero) {
            for i in p..=l {
                self.coefs[i] ^= other.coefs[i];
            }
        }
        self.adjust_non_zero_bounds();
        gf256::symbol_add(&mut self.constant_term, &other.constant_term);
    }
}

// ======================================================================
// LinearSystem - CRATE

/// Row-echelon system over source indices `0..k`: slot `i`, when
/// occupied, holds an equation with `pivot == i`.
pub(crate) struct LinearSystem {
    slots: Vec<Option<Equation>>,
}

impl LinearSystem {
    /// Returns `None` on allocation failure.
    pub(crate) fn new(k: usize) -> Option<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(k).ok()?;
        slots.resize_with(k, || None);
        Some(Self { slots })
    }

    pub(crate) fn get(&self, id: usize) -> Option<&Equation> {
        self.slots.get(id).and_then(|s| s.as_ref())
    }

    pub(crate) fn take(&mut self, id: usize) -> Option<Equation> {
        self.slots.get_mut(id).and_then(|s| s.take())
    }

    /// Reduces `eq` against the current echelon: for every nonzero
    /// coefficient that has a pivot equation in the system, cancel it by
    /// scaling `eq` and XORing the pivot equation in.
    fn reduce(&self, t: &Gf256Tables, eq: &mut Equation) {
        eq.adjust_non_zero_bounds();
        let Some(mut id) = eq.pivot() else { return };

        while !eq.is_zero() && id <= eq.last_non_zero().unwrap() {
            let coef = eq.coef(id);
            if coef != 0 {
                if let Some(pivot_eq) = self.get(id) {
                    let scale = t.mul(pivot_eq.coef(pivot_eq.pivot().unwrap()), t.inv(coef));
                    eq.multiply(t, scale);
                    eq.add_assign(pivot_eq);
                }
            }
            id += 1;
        }
    }

    /// Installs `eq` as the pivot equation for `eq.pivot()`, normalising
    /// it to leading coefficient 1 and back-substituting it into every
    /// existing equation with a nonzero entry at that pivot.
    fn add_as_pivot(&mut self, t: &Gf256Tables, mut eq: Equation) {
        eq.adjust_non_zero_bounds();
        let Some(pivot) = eq.pivot else { return };

        for slot in self.slots.iter_mut() {
            if let Some(existing) = slot {
                let coef = existing.coef(pivot);
                if coef != 0 {
                    let pivot_coef = eq.coef(pivot);
                    let scale = t.mul(t.inv(pivot_coef), coef);
                    eq.multiply(t, scale);
                    existing.add_assign(&eq);
                    if existing.has_one_id() {
                        let id = existing.pivot().unwrap();
                        let c = existing.coef(id);
                        if c != 1 {
                            existing.multiply(t, t.inv(c));
                        }
                    }
                }
            }
        }

        let leading = eq.coef(pivot);
        if leading != 1 {
            eq.multiply(t, t.inv(leading));
        }
        self.slots[pivot] = Some(eq);
    }

    /// Reduces `eq` against the echelon and, if anything survives,
    /// installs it as a new pivot equation.
    pub(crate) fn add_with_elimination(&mut self, t: &Gf256Tables, mut eq: Equation) {
        self.reduce(t, &mut eq);
        if !eq.is_zero() {
            self.add_as_pivot(t, eq);
        }
    }
}

// ======================================================================
// TESTS
