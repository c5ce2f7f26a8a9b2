//! Per-bank timing state: port occupancy and the stride prefetcher.

use super::Access;

/// One physical memory bank.
///
/// Holds no data (the subsystem owns the flat word array); a bank models the
/// access timing visible to the Memory stage: how many accesses its ports can
/// carry per tick and which addresses the prefetcher has staged.
#[derive(Debug, Clone)]
pub struct MemoryBank {
    ports: usize,
    latency: u64,
    /// Completion cycles of in-flight accesses, at most `ports` entries.
    in_flight: Vec<u64>,
    /// Buffer depth for staged addresses; 0 disables the prefetcher.
    prefetch_window: usize,
    /// Word addresses currently staged by the prefetcher. Only addresses
    /// this bank owns are staged here; the subsystem routes them by mapping.
    prefetched: Vec<usize>,
}

impl MemoryBank {
    /// Creates a bank with the given port count, latency, and prefetch depth.
    pub fn new(ports: usize, latency: u64, prefetch_window: usize) -> Self {
        Self {
            ports,
            latency,
            in_flight: Vec::with_capacity(ports),
            prefetch_window,
            prefetched: Vec::new(),
        }
    }

    /// Attempts to start an access this tick.
    ///
    /// Completed in-flight accesses are retired first; if every port is still
    /// busy the caller sees a bank conflict and must retry next tick. The
    /// returned completion cycle is the first cycle the data is valid: an
    /// access begun at `now` with latency 1 completes at `now` (single-cycle
    /// memory finishes within the Memory stage's own tick).
    pub fn begin(&mut self, word_addr: usize, now: u64, is_load: bool) -> Access {
        self.in_flight.retain(|&done| done > now);
        if self.in_flight.len() >= self.ports {
            return Access::BankConflict;
        }

        let prefetch_hit = is_load && self.take_prefetched(word_addr);
        let latency = if prefetch_hit { 1 } else { self.latency.max(1) };
        let at = now + latency - 1;
        self.in_flight.push(at);
        Access::Ready { at, prefetch_hit }
    }

    /// Removes and reports a staged prefetch entry for this address.
    fn take_prefetched(&mut self, word_addr: usize) -> bool {
        if let Some(pos) = self.prefetched.iter().position(|&a| a == word_addr) {
            let _ = self.prefetched.swap_remove(pos);
            true
        } else {
            false
        }
    }

    /// Stages one address this bank owns, bounding the buffer to the
    /// configured depth by dropping the oldest entries.
    pub fn stage(&mut self, word_addr: usize) {
        if self.prefetch_window == 0 || self.prefetched.contains(&word_addr) {
            return;
        }
        self.prefetched.push(word_addr);
        while self.prefetched.len() > self.prefetch_window {
            let _ = self.prefetched.remove(0);
        }
    }
}
