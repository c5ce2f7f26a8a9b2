//! Execution coverage tracking.
//!
//! Counts which operation kinds retired, which hazard paths were taken, and
//! how often saturation fired. A run's coverage is complete when every
//! executable operation kind and every hazard path has been observed at
//! least once.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::core::pipeline::hazards::HazardPath;
use crate::isa::instruction::OpKind;

/// Counter store fed by the Writeback stage and the hazard unit.
#[derive(Debug, Clone, Default)]
pub struct CoverageTracker {
    ops: HashMap<OpKind, u64>,
    hazards: HashMap<HazardPath, u64>,
    saturations: u64,
}

/// Serializable snapshot of the coverage counters.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    /// Retired-instruction counts per operation kind.
    pub ops: BTreeMap<String, u64>,
    /// Event counts per hazard path.
    pub hazards: BTreeMap<String, u64>,
    /// Number of saturation events observed.
    pub saturation_events: u64,
    /// Whether every tracked kind and path was observed.
    pub complete: bool,
}

impl CoverageTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one retired instruction of the given kind.
    pub fn record_op(&mut self, kind: OpKind) {
        *self.ops.entry(kind).or_insert(0) += 1;
    }

    /// Records one hazard path event.
    pub fn record_hazard(&mut self, path: HazardPath) {
        *self.hazards.entry(path).or_insert(0) += 1;
    }

    /// Records one saturation event.
    pub fn record_saturation(&mut self) {
        self.saturations += 1;
    }

    /// Times the given operation kind was observed at commit.
    pub fn op_count(&self, kind: OpKind) -> u64 {
        self.ops.get(&kind).copied().unwrap_or(0)
    }

    /// Times the given hazard path was taken.
    pub fn hazard_count(&self, path: HazardPath) -> u64 {
        self.hazards.get(&path).copied().unwrap_or(0)
    }

    /// Saturation events observed so far.
    pub fn saturation_count(&self) -> u64 {
        self.saturations
    }

    /// True when every executable operation kind and every hazard path has
    /// been observed at least once.
    pub fn is_complete(&self) -> bool {
        OpKind::EXECUTABLE.iter().all(|k| self.op_count(*k) > 0)
            && HazardPath::ALL.iter().all(|p| self.hazard_count(*p) > 0)
    }

    /// Names of the kinds and paths not yet observed, for run reports.
    pub fn missing(&self) -> Vec<String> {
        let mut holes = Vec::new();
        for kind in OpKind::EXECUTABLE {
            if self.op_count(kind) == 0 {
                holes.push(format!("op:{kind:?}"));
            }
        }
        for path in HazardPath::ALL {
            if self.hazard_count(path) == 0 {
                holes.push(format!("hazard:{path:?}"));
            }
        }
        holes
    }

    /// Snapshots the counters into a serializable report.
    pub fn report(&self) -> CoverageReport {
        CoverageReport {
            ops: self
                .ops
                .iter()
                .map(|(k, v)| (format!("{k:?}"), *v))
                .collect(),
            hazards: self
                .hazards
                .iter()
                .map(|(p, v)| (format!("{p:?}"), *v))
                .collect(),
            saturation_events: self.saturations,
            complete: self.is_complete(),
        }
    }
}
