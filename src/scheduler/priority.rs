use super::{
    SchedCtx, Scheduler,
    nonpreempt::run_to_completion_by,
    preempt::run_unit_steps,
};

/// Lowest priority value runs first, to completion.
pub struct PriorityScheduler;

impl Scheduler for PriorityScheduler {
    const NAME: &'static str = "Priority (Non-Preemptive)";

    fn run(&mut self, ctx: &mut SchedCtx) {
        run_to_completion_by(ctx, |task| task.priority);
    }
}

/// Lowest priority value runs every tick; equal priority never evicts the incumbent.
pub struct PreemptivePriorityScheduler;

impl Scheduler for PreemptivePriorityScheduler {
    const NAME: &'static str = "Priority Preemptive";

    fn run(&mut self, ctx: &mut SchedCtx) {
        run_unit_steps(ctx, |task| task.priority);
    }
}
