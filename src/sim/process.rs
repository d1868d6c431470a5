use serde::{Deserialize, Serialize};

use crate::core::{ExecutionInterval, Ticks};

pub type ProcId = u64;

/// A process as supplied by the caller. Fields are signed so that bad input
/// survives long enough to be rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Zero means "not yet numbered"; see [`ProcessSpec::renumber`].
    #[serde(default)]
    pub id: ProcId,
    pub arrival: i64,
    pub burst: i64,
    #[serde(default)]
    pub priority: i64,
}

impl ProcessSpec {
    pub fn new(id: ProcId, arrival: i64, burst: i64, priority: i64) -> Self {
        Self {
            id,
            arrival,
            burst,
            priority,
        }
    }

    /// Builds specs from `(arrival, burst, priority)` rows, numbered P1..Pn in row order.
    pub fn numbered(rows: impl IntoIterator<Item = (i64, i64, i64)>) -> Vec<Self> {
        rows.into_iter()
            .enumerate()
            .map(|(i, (arrival, burst, priority))| {
                Self::new(i as ProcId + 1, arrival, burst, priority)
            })
            .collect()
    }

    /// Gives every unnumbered spec its 1-based position as id.
    pub fn renumber(specs: &mut [Self]) {
        for (i, spec) in specs.iter_mut().enumerate() {
            if spec.id == 0 {
                spec.id = i as ProcId + 1;
            }
        }
    }
}

/// Final per-process outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: ProcId,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: u64,
    pub completion: Ticks,
    pub waiting: Ticks,
    pub turnaround: Ticks,
    /// First dispatch minus arrival.
    pub response: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub algorithm: String,
    pub intervals: Vec<ExecutionInterval>,
    /// In input order, whatever order the algorithm ran them in.
    pub processes: Vec<ProcessRecord>,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub makespan: Ticks,
    pub cpu_utilization: f64,
}

impl RunResult {
    pub fn process(&self, id: ProcId) -> Option<&ProcessRecord> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// Intervals belonging to `id`, in timeline order.
    pub fn intervals_of(&self, id: ProcId) -> impl Iterator<Item = &ExecutionInterval> + '_ {
        self.intervals.iter().filter(move |iv| iv.pid == id)
    }
}
