//! Banked data memory subsystem.
//!
//! This module models word-addressable storage split over 2-8 banks:
//! 1. **Mapping:** A fixed modulo or stride address-to-bank function set at
//!    configuration time.
//! 2. **Timing:** Per-access latency and per-bank port accounting; an access
//!    to a bank whose ports are all busy is a bank conflict, resolved by the
//!    Memory stage stalling.
//! 3. **Prefetch:** An optional stride prefetcher per bank; hits bypass the
//!    access latency.

pub mod bank;

use crate::common::error::AccessFault;
use crate::common::{WORD_BYTES, Word};
use crate::config::{BankMapping, MemoryConfig};

use bank::MemoryBank;

/// Outcome of starting a memory access on a bank port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Access accepted; data (for loads) is valid at the given cycle.
    Ready {
        /// Cycle at which the access completes.
        at: u64,
        /// Whether the prefetcher serviced this access.
        prefetch_hit: bool,
    },
    /// All ports of the target bank are busy this tick; retry next tick.
    BankConflict,
}

/// Word-addressable banked memory.
///
/// Storage is a flat word array; banks own timing state (ports, in-flight
/// accesses, prefetch buffer) while `bank_of` maps word addresses to banks.
#[derive(Debug, Clone)]
pub struct MemorySubsystem {
    words: Vec<Word>,
    banks: Vec<MemoryBank>,
    mapping: BankMapping,
    bank_stride: usize,
    /// Prefetch stride in words; 0 disables the prefetcher.
    prefetch_stride: usize,
    /// Addresses staged ahead per triggering load.
    prefetch_window: usize,
}

impl MemorySubsystem {
    /// Builds the subsystem from a validated memory configuration.
    pub fn new(config: &MemoryConfig) -> Self {
        let banks = (0..config.banks)
            .map(|_| {
                MemoryBank::new(
                    config.port_mode.ports(),
                    config.latency,
                    config.prefetch_window,
                )
            })
            .collect();
        Self {
            words: vec![0; config.size_words],
            banks,
            mapping: config.mapping,
            bank_stride: config.bank_stride,
            prefetch_stride: config.prefetch_stride,
            prefetch_window: config.prefetch_window,
        }
    }

    /// Size in words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the memory has no words (never the case after validation).
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of banks.
    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }

    /// Maps a word address to its bank index.
    #[inline]
    pub fn bank_of(&self, word_addr: usize) -> usize {
        match self.mapping {
            BankMapping::Modulo => word_addr % self.banks.len(),
            BankMapping::Stride => (word_addr / self.bank_stride) % self.banks.len(),
        }
    }

    /// Translates a byte address to a word index, checking alignment and range.
    pub fn word_index(&self, byte_addr: u32) -> Result<usize, AccessFault> {
        if byte_addr % WORD_BYTES != 0 {
            return Err(AccessFault::Misaligned(byte_addr));
        }
        let idx = (byte_addr / WORD_BYTES) as usize;
        if idx >= self.words.len() {
            return Err(AccessFault::OutOfRange(byte_addr));
        }
        Ok(idx)
    }

    /// Starts a load on the owning bank's port. The returned completion cycle
    /// models the configured access latency; prefetch hits complete next cycle.
    pub fn begin_load(&mut self, word_addr: usize, now: u64) -> Access {
        let bank = self.bank_of(word_addr);
        let access = self.banks[bank].begin(word_addr, now, true);
        if matches!(access, Access::Ready { .. }) {
            self.stage_prefetch(word_addr);
        }
        access
    }

    /// Stages the next `prefetch_window` addresses at `prefetch_stride`, each
    /// into the bank that owns it under the configured mapping.
    fn stage_prefetch(&mut self, word_addr: usize) {
        if self.prefetch_stride == 0 {
            return;
        }
        for i in 1..=self.prefetch_window {
            let addr = word_addr + i * self.prefetch_stride;
            if addr < self.words.len() {
                let owner = self.bank_of(addr);
                self.banks[owner].stage(addr);
            }
        }
    }

    /// Starts a store on the owning bank's port. The data is written
    /// immediately; the completion cycle models occupancy only.
    pub fn begin_store(&mut self, word_addr: usize, value: Word, now: u64) -> Access {
        let bank = self.bank_of(word_addr);
        let access = self.banks[bank].begin(word_addr, now, false);
        if matches!(access, Access::Ready { .. }) {
            self.words[word_addr] = value;
        }
        access
    }

    /// Functional read with no port accounting (accelerator window reads,
    /// oracle snapshots, state dumps).
    #[inline]
    pub fn peek(&self, word_addr: usize) -> Word {
        self.words[word_addr]
    }

    /// Functional word write with no port accounting (test and image setup).
    pub fn poke(&mut self, word_addr: usize, value: Word) {
        self.words[word_addr] = value;
    }

    /// Copies `values` into memory starting at `base` (word address).
    pub fn load_words(&mut self, base: usize, values: &[Word]) {
        self.words[base..base + values.len()].copy_from_slice(values);
    }

    /// Snapshot of the full word array.
    pub fn snapshot(&self) -> Vec<Word> {
        self.words.clone()
    }
}
