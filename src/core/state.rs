use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashSet;
use std::{cmp::Ordering, collections::VecDeque};
use tracing::{debug, trace};

use super::timeline::{ExecutionInterval, Timeline};
use crate::{
    error::{InvalidReason, SchedError},
    sim::{ProcId, ProcessSpec},
};

// Index into Task Vec, which is also the input position
pub type TaskId = usize;
pub type Ticks = u64;

/// Working copy of one process for a single run.
#[derive(Debug, Clone)]
pub struct Task {
    pub pid: ProcId,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: u64,
    pub remaining: Ticks,
    pub first_run: Option<Ticks>,
    pub completion: Option<Ticks>,
    pub waiting: Ticks,
    pub turnaround: Ticks,
}

impl Task {
    pub fn from_spec(spec: &ProcessSpec) -> Result<Self, SchedError> {
        let invalid = |reason| SchedError::InvalidProcess {
            id: spec.id,
            reason,
        };
        let arrival = Ticks::try_from(spec.arrival)
            .map_err(|_| invalid(InvalidReason::NegativeArrival(spec.arrival)))?;
        let burst = match Ticks::try_from(spec.burst) {
            Ok(burst) if burst > 0 => burst,
            _ => return Err(invalid(InvalidReason::NonPositiveBurst(spec.burst))),
        };
        let priority = u64::try_from(spec.priority)
            .map_err(|_| invalid(InvalidReason::NegativePriority(spec.priority)))?;

        Ok(Self {
            pid: spec.id,
            arrival,
            burst,
            priority,
            remaining: burst,
            first_run: None,
            completion: None,
            waiting: 0,
            turnaround: 0,
        })
    }
}

/// Validates the whole batch; a single bad spec rejects all of them.
pub fn build_tasks(specs: &[ProcessSpec]) -> Result<Vec<Task>, SchedError> {
    if specs.is_empty() {
        return Err(SchedError::EmptyWorkload);
    }

    let mut seen = FxHashSet::default();
    let tasks = specs
        .iter()
        .map(|spec| {
            let task = Task::from_spec(spec)?;
            if !seen.insert(spec.id) {
                return Err(SchedError::InvalidProcess {
                    id: spec.id,
                    reason: InvalidReason::DuplicateId,
                });
            }
            Ok(task)
        })
        .collect::<Result<Vec<_>, _>>()?;

    horizon(&tasks)?;
    Ok(tasks)
}

/// Latest tick any run can reach: no policy idles while work is pending, so
/// everything is done by the last arrival plus the total burst. Rejects the
/// batch at the process whose burst pushes that past `Ticks::MAX`.
fn horizon(tasks: &[Task]) -> Result<Ticks, SchedError> {
    let latest_arrival = tasks.iter().map(|t| t.arrival).max().unwrap_or(0);
    tasks.iter().try_fold(latest_arrival, |end, task| {
        end.checked_add(task.burst).ok_or(SchedError::InvalidProcess {
            id: task.pid,
            reason: InvalidReason::HorizonOverflow,
        })
    })
}

/// Selection key for the keyed ready queue: smaller key first, then smaller pid.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Urgency {
    pub key: u64,
    pub pid: ProcId,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Urgency's Ord
impl PartialOrd for Urgency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Urgency {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.pid.cmp(&self.pid))
    }
}

/// FIFO ready queue of task indices.
#[derive(Debug, Default)]
pub struct FifoDsq {
    tasks: VecDeque<TaskId>,
}

impl FifoDsq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, task: TaskId) {
        debug_assert!(!self.contains(task), "Task {task} already queued");
        self.tasks.push_back(task);
    }

    pub fn pop_front(&mut self) -> Option<TaskId> {
        self.tasks.pop_front()
    }

    pub fn contains(&self, task: TaskId) -> bool {
        self.tasks.contains(&task)
    }
}

/// Ready set ordered by [`Urgency`].
#[derive(Debug)]
pub struct PriqDsq {
    tasks: KeyedPriorityQueue<TaskId, Urgency>,
}

impl Default for PriqDsq {
    fn default() -> Self {
        Self::new()
    }
}

impl PriqDsq {
    pub fn new() -> Self {
        Self {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    /// Inserts `task`, or re-keys it if already present.
    pub fn push(&mut self, task: TaskId, urgency: Urgency) {
        self.tasks.push(task, urgency);
    }

    pub fn pop(&mut self) -> Option<TaskId> {
        self.tasks.pop().map(|t| t.0)
    }

    pub fn remove(&mut self, task: TaskId) -> Option<Urgency> {
        self.tasks.remove(&task)
    }

    pub fn urgency(&self, task: TaskId) -> Option<Urgency> {
        self.tasks.get_priority(&task).copied()
    }

    /// Most urgent task, except that an incumbent tied on key keeps the CPU.
    /// Without an incumbent in the tie, the smallest pid wins.
    pub fn select(&self, incumbent: Option<TaskId>) -> Option<TaskId> {
        let (&best, best_urgency) = self.tasks.peek()?;
        match incumbent.and_then(|cur| self.urgency(cur).map(|u| (cur, u))) {
            Some((cur, urgency)) if urgency.key == best_urgency.key => Some(cur),
            _ => Some(best),
        }
    }

}

/// Per-run scheduling context: logical clock, working copies, timeline.
#[derive(Debug)]
pub struct SchedCtx {
    pub now: Ticks,
    pub tasks: Vec<Task>,
    pub timeline: Timeline,
    // Task indices stably sorted by arrival; ties keep input order
    arrival_order: Vec<TaskId>,
    arrival_cursor: usize,
    completed: usize,
}

impl SchedCtx {
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut arrival_order: Vec<TaskId> = (0..tasks.len()).collect();
        arrival_order.sort_by_key(|&id| tasks[id].arrival);

        Self {
            now: 0,
            tasks,
            timeline: Timeline::new(),
            arrival_order,
            arrival_cursor: 0,
            completed: 0,
        }
    }

    /// Moves the clock forward. `build_tasks` bounds every run below `Ticks::MAX`.
    pub fn advance_time(&mut self, delta: Ticks) {
        match self.now.checked_add(delta) {
            Some(now) => self.now = now,
            None => debug_assert!(false, "Clock overflow at {} + {delta}", self.now),
        }
    }

    pub fn jump_to(&mut self, at: Ticks) {
        debug_assert!(at >= self.now, "Clock cannot move back from {} to {at}", self.now);
        self.now = self.now.max(at);
    }

    pub fn arrival_order(&self) -> &[TaskId] {
        &self.arrival_order
    }

    pub fn first_arrival(&self) -> Ticks {
        self.arrival_order
            .first()
            .map_or(0, |&id| self.tasks[id].arrival)
    }

    /// Arrival time of the earliest task not yet admitted.
    pub fn next_arrival(&self) -> Option<Ticks> {
        self.arrival_order
            .get(self.arrival_cursor)
            .map(|&id| self.tasks[id].arrival)
    }

    /// Jumps an idle CPU straight to the next arrival. Idle ticks change nothing
    /// observable, so this matches stepping one tick at a time. Returns false
    /// when nothing is left to arrive.
    pub fn skip_idle(&mut self) -> bool {
        let from = self.now;
        match self.next_arrival() {
            Some(at) => {
                self.jump_to(at);
                debug!(from, to = self.now, "idle");
                true
            }
            None => {
                debug_assert!(self.all_completed(), "Incomplete tasks but nothing left to arrive");
                false
            }
        }
    }

    /// Admits every task that has arrived by `now`, in (arrival, input) order.
    pub fn admit_arrivals(&mut self) -> Vec<TaskId> {
        let now = self.now;
        let admitted: Vec<TaskId> = self.arrival_order[self.arrival_cursor..]
            .iter()
            .copied()
            // Contiguous, since arrival_order is sorted
            .take_while(|&id| self.tasks[id].arrival <= now)
            .collect();
        self.arrival_cursor += admitted.len();
        admitted
    }

    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id]
    }

    /// Runs `id` for one tick. Returns true when that tick finished it.
    pub fn run_tick(&mut self, id: TaskId) -> bool {
        let now = self.now;
        let task = &mut self.tasks[id];
        debug_assert!(task.remaining > 0, "Task {id} has no remaining time");
        task.first_run.get_or_insert(now);
        task.remaining -= 1;
        trace!(t = now, pid = task.pid, remaining = task.remaining, "tick");

        let finished = task.remaining == 0;
        self.advance_time(1);
        if finished {
            self.mark_completed(id);
        }
        finished
    }

    /// Runs `id` uninterrupted from `now` until it finishes, recording one interval.
    pub fn run_to_completion(&mut self, id: TaskId) {
        let start = self.now;
        let (pid, remaining) = {
            let task = &mut self.tasks[id];
            task.first_run.get_or_insert(start);
            (task.pid, std::mem::take(&mut task.remaining))
        };

        self.advance_time(remaining);
        self.timeline.record(id, pid, start, self.now);
        self.mark_completed(id);
    }

    pub fn mark_completed(&mut self, id: TaskId) {
        let now = self.now;
        let task = &mut self.tasks[id];
        debug_assert!(task.completion.is_none(), "Task {id} completed twice");
        debug_assert!(now >= task.arrival + task.burst, "Task {id} finished too early");

        task.remaining = 0;
        task.completion = Some(now);
        task.turnaround = now - task.arrival;
        task.waiting = task.turnaround - task.burst;
        self.completed += 1;
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.tasks.len()
    }

    pub fn into_parts(self) -> (Vec<Task>, Vec<ExecutionInterval>) {
        (self.tasks, self.timeline.finish())
    }
}
