use super::{
    SchedCtx, Scheduler,
    nonpreempt::run_to_completion_by,
    preempt::run_unit_steps,
};

/// Shortest job first, non-preemptive. Keyed on total burst.
pub struct SjfScheduler;

impl Scheduler for SjfScheduler {
    const NAME: &'static str = "SJF (Non-Preemptive)";

    fn run(&mut self, ctx: &mut SchedCtx) {
        run_to_completion_by(ctx, |task| task.burst);
    }
}

/// Shortest remaining time first: SJF with preemption on every tick.
pub struct SrtfScheduler;

impl Scheduler for SrtfScheduler {
    const NAME: &'static str = "SJF Preemptive (SRTF)";

    fn run(&mut self, ctx: &mut SchedCtx) {
        run_unit_steps(ctx, |task| task.remaining);
    }
}
