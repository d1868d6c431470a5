use std::{fmt, io};

use thiserror::Error;

use crate::sim::ProcId;

/// Why a single process spec was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    NegativeArrival(i64),
    NonPositiveBurst(i64),
    NegativePriority(i64),
    DuplicateId,
    /// Last arrival plus total burst no longer fits the clock.
    HorizonOverflow,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeArrival(v) => write!(f, "arrival time {v} is negative"),
            Self::NonPositiveBurst(v) => write!(f, "burst time {v} must be positive"),
            Self::NegativePriority(v) => write!(f, "priority {v} is negative"),
            Self::DuplicateId => write!(f, "id is used by another process"),
            Self::HorizonOverflow => {
                write!(f, "burst time runs the schedule past the largest representable tick")
            }
        }
    }
}

/// Rejection of a whole batch before any scheduling work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedError {
    #[error("invalid input: no processes to schedule")]
    EmptyWorkload,
    #[error("invalid input: process P{id}: {reason}")]
    InvalidProcess { id: ProcId, reason: InvalidReason },
    #[error("invalid input: time quantum {0} must be positive for Round Robin")]
    InvalidQuantum(i64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("environment variable {name}={value:?} is not valid")]
    Env { name: &'static str, value: String },
}
