pub mod fcfs;
pub mod nonpreempt;
pub mod preempt;
pub mod priority;
pub mod round_robin;
pub mod sjf;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    core::{SchedCtx, Ticks},
    error::SchedError,
};
pub use fcfs::FcfsScheduler;
pub use priority::{PreemptivePriorityScheduler, PriorityScheduler};
pub use round_robin::RoundRobinScheduler;
pub use sjf::{SjfScheduler, SrtfScheduler};

/// A scheduling policy. `run` drives `ctx` until every task has completed and
/// must leave no interval open.
pub trait Scheduler {
    const NAME: &'static str;

    fn run(&mut self, ctx: &mut SchedCtx);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    NonPreemptive,
    Preemptive,
}

/// Which policy a run uses. The quantum stays raw until validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Fcfs,
    Sjf(Mode),
    RoundRobin { quantum: i64 },
    Priority(Mode),
}

impl Algorithm {
    /// Every variant, Round Robin using `quantum`.
    pub fn all(quantum: i64) -> [Self; 6] {
        [
            Self::Fcfs,
            Self::Sjf(Mode::NonPreemptive),
            Self::Sjf(Mode::Preemptive),
            Self::RoundRobin { quantum },
            Self::Priority(Mode::NonPreemptive),
            Self::Priority(Mode::Preemptive),
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fcfs => FcfsScheduler::NAME,
            Self::Sjf(Mode::NonPreemptive) => SjfScheduler::NAME,
            Self::Sjf(Mode::Preemptive) => SrtfScheduler::NAME,
            Self::RoundRobin { .. } => RoundRobinScheduler::NAME,
            Self::Priority(Mode::NonPreemptive) => PriorityScheduler::NAME,
            Self::Priority(Mode::Preemptive) => PreemptivePriorityScheduler::NAME,
        }
    }

    /// Whether priorities influence this policy.
    pub fn uses_priority(&self) -> bool {
        matches!(self, Self::Priority(_))
    }

    /// Validated Round Robin quantum; `None` for every other policy.
    pub fn quantum(&self) -> Result<Option<Ticks>, SchedError> {
        match *self {
            Self::RoundRobin { quantum } => match Ticks::try_from(quantum) {
                Ok(q) if q > 0 => Ok(Some(q)),
                _ => Err(SchedError::InvalidQuantum(quantum)),
            },
            _ => Ok(None),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin { quantum } => write!(f, "{} (q={quantum})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::core::{ExecutionInterval, SchedCtx, Task, build_tasks};
    use crate::sim::ProcessSpec;

    use super::Scheduler;

    pub fn run<S: Scheduler>(
        mut scheduler: S,
        rows: &[(i64, i64, i64)],
    ) -> (Vec<Task>, Vec<ExecutionInterval>) {
        let specs = ProcessSpec::numbered(rows.iter().copied());
        let mut ctx = SchedCtx::new(build_tasks(&specs).unwrap());
        scheduler.run(&mut ctx);
        assert!(ctx.all_completed());
        ctx.into_parts()
    }

    pub fn iv(pid: u64, start: u64, end: u64) -> ExecutionInterval {
        ExecutionInterval { pid, start, end }
    }

    pub fn completions(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.completion.unwrap()).collect()
    }

    pub fn waitings(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.waiting).collect()
    }
}
