use tracing::debug;

use super::{SchedCtx, Scheduler};
use crate::core::{FifoDsq, Ticks};

/// Fixed-quantum round robin over a FIFO ready queue.
///
/// Tasks arriving during a slice are queued before the preempted task goes
/// back to the tail.
pub struct RoundRobinScheduler {
    quantum: Ticks,
}

impl RoundRobinScheduler {
    pub fn new(quantum: Ticks) -> Self {
        debug_assert!(quantum > 0, "Round Robin needs a positive quantum");
        Self {
            quantum: quantum.max(1),
        }
    }

    fn enqueue_arrivals(ctx: &mut SchedCtx, queue: &mut FifoDsq) {
        for id in ctx.admit_arrivals() {
            queue.push_back(id);
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "Round Robin";

    fn run(&mut self, ctx: &mut SchedCtx) {
        let mut queue = FifoDsq::new();
        ctx.jump_to(ctx.first_arrival());
        Self::enqueue_arrivals(ctx, &mut queue);

        while !ctx.all_completed() {
            let Some(id) = queue.pop_front() else {
                ctx.timeline.close(ctx.now);
                if !ctx.skip_idle() {
                    break;
                }
                Self::enqueue_arrivals(ctx, &mut queue);
                continue;
            };

            let pid = ctx.task(id).pid;
            if ctx.timeline.running() != Some(id) {
                ctx.timeline.switch(id, pid, ctx.now);
            }
            debug!(t = ctx.now, pid, "dispatch");

            let slice = self.quantum.min(ctx.task(id).remaining);
            for _ in 0..slice {
                let finished = ctx.run_tick(id);
                Self::enqueue_arrivals(ctx, &mut queue);
                if finished {
                    ctx.timeline.close(ctx.now);
                    debug!(t = ctx.now, pid, "complete");
                    break;
                }
            }

            if ctx.task(id).remaining > 0 {
                queue.push_back(id);
                ctx.timeline.close(ctx.now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::testing::{completions, iv, run, waitings};

    #[test]
    fn test_short_job_stops_early_and_arrivals_precede_requeue() {
        let (tasks, intervals) =
            run(RoundRobinScheduler::new(2), &[(0, 5, 0), (1, 3, 0), (2, 1, 0)]);
        assert_eq!(
            intervals,
            vec![
                iv(1, 0, 2),
                iv(2, 2, 4),
                iv(3, 4, 5),
                iv(1, 5, 7),
                iv(2, 7, 8),
                iv(1, 8, 9),
            ]
        );
        assert_eq!(completions(&tasks), vec![9, 8, 5]);
        assert_eq!(waitings(&tasks), vec![4, 4, 2]);
    }

    #[test]
    fn test_requeued_alone_still_gets_new_interval() {
        let (_, intervals) = run(RoundRobinScheduler::new(1), &[(0, 3, 0), (1, 1, 0)]);
        assert_eq!(
            intervals,
            vec![iv(1, 0, 1), iv(2, 1, 2), iv(1, 2, 3), iv(1, 3, 4)]
        );
    }

    #[test]
    fn test_idle_until_next_arrival() {
        let (tasks, intervals) = run(RoundRobinScheduler::new(2), &[(0, 1, 0), (3, 2, 0)]);
        assert_eq!(intervals, vec![iv(1, 0, 1), iv(2, 3, 5)]);
        assert_eq!(tasks[1].waiting, 0);
    }

    #[test]
    fn test_distant_arrival_is_reached_directly() {
        let far = 1_000_000_000_000;
        let (_, intervals) = run(RoundRobinScheduler::new(2), &[(0, 3, 0), (far as i64, 1, 0)]);
        assert_eq!(intervals, vec![iv(1, 0, 2), iv(1, 2, 3), iv(2, far, far + 1)]);
    }

    #[test]
    fn test_seeds_with_earliest_arrivals_in_input_order() {
        let (_, intervals) = run(RoundRobinScheduler::new(4), &[(2, 1, 0), (2, 1, 0), (5, 1, 0)]);
        assert_eq!(intervals, vec![iv(1, 2, 3), iv(2, 3, 4), iv(3, 5, 6)]);
    }
}
