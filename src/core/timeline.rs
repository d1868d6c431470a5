use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::{TaskId, Ticks};
use crate::sim::ProcId;

/// One contiguous stretch of CPU time given to a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionInterval {
    pub pid: ProcId,
    pub start: Ticks,
    pub end: Ticks,
}

impl ExecutionInterval {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }
}

// An interval whose end is not known yet. Consumed exactly once by close().
#[derive(Debug)]
struct OpenInterval {
    task: TaskId,
    pid: ProcId,
    start: Ticks,
}

/// Gantt chart recorder. Intervals are appended in the order they close and are
/// never merged, even when the same process runs twice back to back.
#[derive(Debug, Default)]
pub struct Timeline {
    closed: Vec<ExecutionInterval>,
    open: Option<OpenInterval>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Task owning the open interval, i.e. the incumbent.
    pub fn running(&self) -> Option<TaskId> {
        self.open.as_ref().map(|o| o.task)
    }

    pub fn open(&mut self, task: TaskId, pid: ProcId, now: Ticks) {
        debug_assert!(
            self.open.is_none(),
            "Opening interval for P{pid} while another is still open"
        );
        self.open = Some(OpenInterval {
            task,
            pid,
            start: now,
        });
    }

    /// Closes the open interval at `now`, if any.
    pub fn close(&mut self, now: Ticks) -> Option<ExecutionInterval> {
        let open = self.open.take()?;
        debug_assert!(
            now > open.start,
            "Interval for P{} would close with zero length at t={now}",
            open.pid
        );
        if now <= open.start {
            return None;
        }

        let interval = ExecutionInterval {
            pid: open.pid,
            start: open.start,
            end: now,
        };
        debug!(pid = interval.pid, start = interval.start, end = interval.end, "interval closed");
        self.closed.push(interval);
        Some(interval)
    }

    /// Closes whatever is open and starts `task` at `now`.
    pub fn switch(&mut self, task: TaskId, pid: ProcId, now: Ticks) {
        self.close(now);
        self.open(task, pid, now);
    }

    /// Records a complete interval in one go (non-preemptive dispatch).
    pub fn record(&mut self, task: TaskId, pid: ProcId, start: Ticks, end: Ticks) {
        self.open(task, pid, start);
        self.close(end);
    }

    pub fn intervals(&self) -> &[ExecutionInterval] {
        &self.closed
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn finish(self) -> Vec<ExecutionInterval> {
        debug_assert!(self.open.is_none(), "Timeline finished with an open interval");
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_records_interval() {
        let mut timeline = Timeline::new();
        timeline.open(0, 1, 2);
        assert_eq!(timeline.running(), Some(0));

        let closed = timeline.close(5);
        assert_eq!(closed, Some(ExecutionInterval { pid: 1, start: 2, end: 5 }));
        assert_eq!(timeline.running(), None);
        assert_eq!(timeline.intervals().len(), 1);
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.close(3), None);
        assert!(timeline.finish().is_empty());
    }

    #[test]
    fn test_switch_keeps_adjacent_same_process_separate() {
        let mut timeline = Timeline::new();
        timeline.open(0, 1, 0);
        timeline.switch(0, 1, 2);
        timeline.close(4);

        let intervals = timeline.finish();
        assert_eq!(
            intervals,
            vec![
                ExecutionInterval { pid: 1, start: 0, end: 2 },
                ExecutionInterval { pid: 1, start: 2, end: 4 },
            ]
        );
        assert_eq!(intervals.iter().map(ExecutionInterval::duration).sum::<Ticks>(), 4);
    }

    #[test]
    fn test_record_is_closed_immediately() {
        let mut timeline = Timeline::new();
        timeline.record(3, 4, 7, 8);
        assert!(!timeline.is_open());
        assert_eq!(timeline.intervals()[0].duration(), 1);
    }
}
