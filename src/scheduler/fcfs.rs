use tracing::debug;

use super::{SchedCtx, Scheduler};

/// First-come-first-served: arrival order, ties in input order, no preemption.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    const NAME: &'static str = "FCFS";

    fn run(&mut self, ctx: &mut SchedCtx) {
        for i in 0..ctx.arrival_order().len() {
            let id = ctx.arrival_order()[i];
            let arrival = ctx.task(id).arrival;
            if ctx.now < arrival {
                debug!(from = ctx.now, to = arrival, "idle");
                ctx.jump_to(arrival);
            }
            debug!(t = ctx.now, pid = ctx.task(id).pid, "dispatch");
            ctx.run_to_completion(id);
        }
    }
}
