use rustc_hash::FxHashMap;
use std::fmt;
use tracing::error;

use super::state::Ticks;
use crate::sim::{ProcId, RunResult};

/// A broken timeline or bookkeeping invariant found after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    ZeroLengthInterval { pid: ProcId, at: Ticks },
    Overlap { first: ProcId, second: ProcId, at: Ticks },
    UnknownProcess { pid: ProcId },
    ServiceMismatch { pid: ProcId, served: Ticks, burst: Ticks },
    Turnaround { pid: ProcId },
    Waiting { pid: ProcId },
    EarlyCompletion { pid: ProcId },
    DuplicateRecord { pid: ProcId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLengthInterval { pid, at } => {
                write!(f, "P{pid} has a zero-length interval at t={at}")
            }
            Self::Overlap { first, second, at } => {
                write!(f, "P{second} overlaps P{first} at t={at}")
            }
            Self::UnknownProcess { pid } => write!(f, "interval for unknown P{pid}"),
            Self::ServiceMismatch { pid, served, burst } => {
                write!(f, "P{pid} was served {served} ticks but needs {burst}")
            }
            Self::Turnaround { pid } => write!(f, "P{pid} turnaround != completion - arrival"),
            Self::Waiting { pid } => write!(f, "P{pid} waiting != turnaround - burst"),
            Self::EarlyCompletion { pid } => write!(f, "P{pid} completed before it arrived"),
            Self::DuplicateRecord { pid } => write!(f, "P{pid} reported more than once"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Observer {
    runs: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Checks a finished run. Violations are logged, and fatal in debug builds.
    pub fn observe(&mut self, result: &RunResult) -> Vec<Violation> {
        self.runs += 1;

        let violations = Self::check(result);
        for violation in &violations {
            error!(algorithm = %result.algorithm, "{violation}");
        }
        debug_assert!(
            violations.is_empty(),
            "{} run violated invariants: {violations:?}",
            result.algorithm
        );
        violations
    }

    pub fn check(result: &RunResult) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut served: FxHashMap<ProcId, Ticks> = FxHashMap::default();
        for record in &result.processes {
            if served.insert(record.id, 0).is_some() {
                violations.push(Violation::DuplicateRecord { pid: record.id });
            }
        }

        let mut prev: Option<(ProcId, Ticks)> = None;
        for iv in &result.intervals {
            if iv.end <= iv.start {
                violations.push(Violation::ZeroLengthInterval {
                    pid: iv.pid,
                    at: iv.start,
                });
            }
            if let Some((first, end)) = prev {
                if iv.start < end {
                    violations.push(Violation::Overlap {
                        first,
                        second: iv.pid,
                        at: iv.start,
                    });
                }
            }
            prev = Some((iv.pid, iv.end));

            match served.get_mut(&iv.pid) {
                Some(total) => *total += iv.end.saturating_sub(iv.start),
                None => violations.push(Violation::UnknownProcess { pid: iv.pid }),
            }
        }

        for p in &result.processes {
            let total = served.get(&p.id).copied().unwrap_or_default();
            if total != p.burst {
                violations.push(Violation::ServiceMismatch {
                    pid: p.id,
                    served: total,
                    burst: p.burst,
                });
            }
            if p.completion < p.arrival {
                violations.push(Violation::EarlyCompletion { pid: p.id });
                continue;
            }
            if p.turnaround != p.completion - p.arrival {
                violations.push(Violation::Turnaround { pid: p.id });
            }
            if p.turnaround < p.burst || p.waiting != p.turnaround - p.burst {
                violations.push(Violation::Waiting { pid: p.id });
            }
        }

        violations
    }
}
