//! Shard-bookkeeping working space for [`crate::ReedSolomonEncoder`] and
//! [`crate::ReedSolomonDecoder`]: tracks which information/repair symbols
//! have been added, validates shapes, and hands off to
//! [`crate::rs::algorithm`] once a full round is ready.
//!
//! A single code path for every `k`/`r`: there is no ratio-selected
//! engine, just one cyclotomic algorithm.

use fixedbitset::FixedBitSet;

use crate::engine::symbols::Symbols;
use crate::rs::algorithm;
use crate::Error;

// ======================================================================
// EncoderWork - CRATE

pub(crate) struct EncoderWork {
    information_count: usize,
    repair_count: usize,
    symbol_bytes: usize,

    information_received_count: usize,
    information: Symbols,
    repair: Symbols,
}

impl EncoderWork {
    pub(crate) fn new() -> Self {
        Self {
            information_count: 0,
            repair_count: 0,
            symbol_bytes: 0,
            information_received_count: 0,
            information: Symbols::try_new(0, 0).unwrap(),
            repair: Symbols::try_new(0, 0).unwrap(),
        }
    }

    pub(crate) fn reset(
        &mut self,
        information_count: usize,
        repair_count: usize,
        symbol_bytes: usize,
    ) -> Result<(), Error> {
        self.information_count = information_count;
        self.repair_count = repair_count;
        self.symbol_bytes = symbol_bytes;
        self.information_received_count = 0;

        self.information = Symbols::try_new(information_count, symbol_bytes)
            .ok_or(Error::OutOfMemory)?;
        self.repair =
            Symbols::try_new(repair_count, symbol_bytes).ok_or(Error::OutOfMemory)?;
        Ok(())
    }

    pub(crate) fn reset_received(&mut self) {
        self.information_received_count = 0;
    }

    pub(crate) fn add_information_symbol<T: AsRef<[u8]>>(&mut self, symbol: T) -> Result<(), Error> {
        let symbol = symbol.as_ref();

        if self.information_received_count == self.information_count {
            return Err(Error::TooManyOriginalShards {
                original_count: self.information_count,
            });
        }
        if symbol.len() != self.symbol_bytes {
            return Err(Error::DifferentShardSize {
                shard_bytes: self.symbol_bytes,
                got: symbol.len(),
            });
        }

        self.information[self.information_received_count].copy_from_slice(symbol);
        self.information_received_count += 1;
        Ok(())
    }

    pub(crate) fn encode(&mut self) -> Result<(), Error> {
        if self.information_received_count != self.information_count {
            return Err(Error::TooFewOriginalShards {
                original_count: self.information_count,
                original_received_count: self.information_received_count,
            });
        }

        algorithm::generate_repair_symbols(&self.information, &mut self.repair.as_ref_mut())
            .ok_or(Error::OutOfMemory)
    }

    pub(crate) fn repair(&self, index: usize) -> Option<&[u8]> {
        if index < self.repair_count {
            Some(&self.repair[index])
        } else {
            None
        }
    }
}

// ======================================================================
// DecoderWork - CRATE

pub(crate) struct DecoderWork {
    information_count: usize,
    repair_count: usize,
    symbol_bytes: usize,

    information_received_count: usize,
    repair_received_count: usize,
    received: FixedBitSet,
    symbols: Symbols,
}

impl DecoderWork {
    pub(crate) fn new() -> Self {
        Self {
            information_count: 0,
            repair_count: 0,
            symbol_bytes: 0,
            information_received_count: 0,
            repair_received_count: 0,
            received: FixedBitSet::new(),
            symbols: Symbols::try_new(0, 0).unwrap(),
        }
    }

    pub(crate) fn reset(
        &mut self,
        information_count: usize,
        repair_count: usize,
        symbol_bytes: usize,
    ) -> Result<(), Error> {
        self.information_count = information_count;
        self.repair_count = repair_count;
        self.symbol_bytes = symbol_bytes;
        self.information_received_count = 0;
        self.repair_received_count = 0;

        self.received = FixedBitSet::with_capacity(information_count + repair_count);
        self.symbols = Symbols::try_new(information_count + repair_count, symbol_bytes)
            .ok_or(Error::OutOfMemory)?;
        Ok(())
    }

    pub(crate) fn reset_received(&mut self) {
        self.information_received_count = 0;
        self.repair_received_count = 0;
        self.received.clear();
    }

    pub(crate) fn add_information_symbol<T: AsRef<[u8]>>(
        &mut self,
        index: usize,
        symbol: T,
    ) -> Result<(), Error> {
        let symbol = symbol.as_ref();

        if index >= self.information_count {
            return Err(Error::InvalidOriginalShardIndex {
                original_count: self.information_count,
                index,
            });
        }
        if self.received[index] {
            return Err(Error::DuplicateOriginalShardIndex { index });
        }
        if symbol.len() != self.symbol_bytes {
            return Err(Error::DifferentShardSize {
                shard_bytes: self.symbol_bytes,
                got: symbol.len(),
            });
        }

        self.symbols[index].copy_from_slice(symbol);
        self.received.set(index, true);
        self.information_received_count += 1;
        Ok(())
    }

    pub(crate) fn add_repair_symbol<T: AsRef<[u8]>>(
        &mut self,
        index: usize,
        symbol: T,
    ) -> Result<(), Error> {
        let symbol = symbol.as_ref();

        if index >= self.repair_count {
            return Err(Error::InvalidRecoveryShardIndex {
                recovery_count: self.repair_count,
                index,
            });
        }
        let pos = self.information_count + index;
        if self.received[pos] {
            return Err(Error::DuplicateRecoveryShardIndex { index });
        }
        if symbol.len() != self.symbol_bytes {
            return Err(Error::DifferentShardSize {
                shard_bytes: self.symbol_bytes,
                got: symbol.len(),
            });
        }

        self.symbols[pos].copy_from_slice(symbol);
        self.received.set(pos, true);
        self.repair_received_count += 1;
        Ok(())
    }

    pub(crate) fn decode(&mut self) -> Result<(), Error> {
        let k = self.information_count;
        let r = self.repair_count;
        let received = self.information_received_count + self.repair_received_count;
        let erased = k + r - received;

        if erased > r {
            return Err(Error::CannotRestore {
                erased,
                capacity: r,
            });
        }
        if self.information_received_count == k {
            // Already complete; nothing to restore.
            return Ok(());
        }

        let is_erased: Vec<bool> = (0..k + r).map(|i| !self.received[i]).collect();

        for i in 0..k + r {
            if is_erased[i] {
                self.symbols[i].fill(0);
            }
        }

        algorithm::restore_symbols(k, r, &mut self.symbols.as_ref_mut(), &is_erased, erased)
            .ok_or(Error::OutOfMemory)
    }

    pub(crate) fn original_count(&self) -> usize {
        self.information_count
    }

    pub(crate) fn restored_original(&self, index: usize) -> Option<&[u8]> {
        if index < self.information_count && !self.received[index] {
            Some(&self.symbols[index])
        } else {
            None
        }
    }
}
