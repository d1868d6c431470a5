use tracing::info;

use super::{
    process::{ProcessRecord, ProcessSpec, RunResult},
    stats::summarize,
};
use crate::{
    core::{ExecutionInterval, Observer, SchedCtx, Task, Ticks, build_tasks},
    error::SchedError,
    scheduler::{
        Algorithm, FcfsScheduler, Mode, PreemptivePriorityScheduler, PriorityScheduler,
        RoundRobinScheduler, Scheduler, SjfScheduler, SrtfScheduler,
    },
};

/// Owns one immutable process list and runs algorithms over fresh copies of it.
pub struct Sim {
    specs: Vec<ProcessSpec>,
    observer: Observer,
}

impl Sim {
    pub fn new(specs: Vec<ProcessSpec>) -> Self {
        Self {
            specs,
            observer: Observer::new(),
        }
    }

    pub fn specs(&self) -> &[ProcessSpec] {
        &self.specs
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Checks the process list and the algorithm's quantum without running anything.
    pub fn validate(&self, algorithm: Algorithm) -> Result<(), SchedError> {
        build_tasks(&self.specs)?;
        algorithm.quantum()?;
        Ok(())
    }

    pub fn run(&mut self, algorithm: Algorithm) -> Result<RunResult, SchedError> {
        let tasks = build_tasks(&self.specs)?;
        let quantum = algorithm.quantum()?;
        info!(%algorithm, processes = tasks.len(), "run started");

        let (tasks, intervals) = match (algorithm, quantum) {
            (Algorithm::Fcfs, _) => execute(FcfsScheduler, tasks),
            (Algorithm::Sjf(Mode::NonPreemptive), _) => execute(SjfScheduler, tasks),
            (Algorithm::Sjf(Mode::Preemptive), _) => execute(SrtfScheduler, tasks),
            (Algorithm::RoundRobin { .. }, Some(q)) => execute(RoundRobinScheduler::new(q), tasks),
            (Algorithm::RoundRobin { quantum }, None) => {
                return Err(SchedError::InvalidQuantum(quantum));
            }
            (Algorithm::Priority(Mode::NonPreemptive), _) => execute(PriorityScheduler, tasks),
            (Algorithm::Priority(Mode::Preemptive), _) => {
                execute(PreemptivePriorityScheduler, tasks)
            }
        };

        let result = build_result(algorithm, &tasks, intervals);
        self.observer.observe(&result);
        info!(
            %algorithm,
            avg_waiting = result.avg_waiting,
            avg_turnaround = result.avg_turnaround,
            "run finished"
        );
        Ok(result)
    }

    /// Runs each algorithm on its own copy. Every algorithm is validated before
    /// the first one runs, so a bad quantum yields no results at all.
    pub fn compare(&mut self, algorithms: &[Algorithm]) -> Result<Vec<RunResult>, SchedError> {
        for &algorithm in algorithms {
            self.validate(algorithm)?;
        }
        algorithms.iter().map(|&algorithm| self.run(algorithm)).collect()
    }
}

fn execute<S: Scheduler>(
    mut scheduler: S,
    tasks: Vec<Task>,
) -> (Vec<Task>, Vec<ExecutionInterval>) {
    let mut ctx = SchedCtx::new(tasks);
    scheduler.run(&mut ctx);
    debug_assert!(ctx.all_completed(), "{} left tasks unfinished", S::NAME);
    ctx.into_parts()
}

fn build_result(
    algorithm: Algorithm,
    tasks: &[Task],
    intervals: Vec<ExecutionInterval>,
) -> RunResult {
    let processes: Vec<ProcessRecord> = tasks.iter().map(record).collect();
    let summary = summarize(&processes);

    RunResult {
        algorithm: algorithm.to_string(),
        intervals,
        processes,
        avg_waiting: summary.avg_waiting,
        avg_turnaround: summary.avg_turnaround,
        avg_response: summary.avg_response,
        makespan: summary.makespan,
        cpu_utilization: summary.cpu_utilization,
    }
}

fn record(task: &Task) -> ProcessRecord {
    let completion: Ticks = task.completion.unwrap_or_default();
    let first_run = task.first_run.unwrap_or(task.arrival);
    ProcessRecord {
        id: task.pid,
        arrival: task.arrival,
        burst: task.burst,
        priority: task.priority,
        completion,
        waiting: task.waiting,
        turnaround: task.turnaround,
        response: first_run - task.arrival,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidReason;

    fn sim(rows: &[(i64, i64, i64)]) -> Sim {
        Sim::new(ProcessSpec::numbered(rows.iter().copied()))
    }

    #[test]
    fn test_run_reports_in_input_order() {
        let mut sim = sim(&[(4, 1, 0), (0, 2, 0)]);
        let result = sim.run(Algorithm::Fcfs).unwrap();
        let ids: Vec<_> = result.processes.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(result.intervals[0].pid, 2);
        assert_eq!(result.algorithm, "FCFS");
        assert_eq!(sim.observer().runs(), 1);
    }

    #[test]
    fn test_invalid_quantum_rejected_before_running() {
        let mut sim = sim(&[(0, 2, 0)]);
        assert_eq!(
            sim.run(Algorithm::RoundRobin { quantum: 0 }),
            Err(SchedError::InvalidQuantum(0))
        );
        assert_eq!(sim.observer().runs(), 0);
    }

    #[test]
    fn test_process_errors_take_precedence_over_quantum() {
        let mut sim = sim(&[(0, -1, 0)]);
        assert_eq!(
            sim.run(Algorithm::RoundRobin { quantum: 0 }),
            Err(SchedError::InvalidProcess {
                id: 1,
                reason: InvalidReason::NonPositiveBurst(-1)
            })
        );
    }

    #[test]
    fn test_compare_is_all_or_nothing() {
        let mut sim = sim(&[(0, 2, 1), (1, 1, 0)]);
        let algorithms = [Algorithm::Fcfs, Algorithm::RoundRobin { quantum: -1 }];
        assert_eq!(sim.compare(&algorithms), Err(SchedError::InvalidQuantum(-1)));
        assert_eq!(sim.observer().runs(), 0);

        let results = sim.compare(&Algorithm::all(2)).unwrap();
        assert_eq!(results.len(), 6);
        assert_eq!(sim.observer().runs(), 6);
    }

    #[test]
    fn test_response_time_uses_first_dispatch() {
        let mut sim = sim(&[(0, 4, 2), (1, 2, 1)]);
        let result = sim.run(Algorithm::Priority(Mode::Preemptive)).unwrap();
        assert_eq!(result.process(1).unwrap().response, 0);
        assert_eq!(result.process(2).unwrap().response, 0);

        let result = sim.run(Algorithm::Fcfs).unwrap();
        assert_eq!(result.process(2).unwrap().response, 3);
    }
}
