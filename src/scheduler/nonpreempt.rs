use tracing::debug;

use crate::core::{PriqDsq, SchedCtx, Task, Urgency};

/// Shared loop for the non-preemptive selectors: at each decision point the
/// arrived task with the smallest `key` (then smallest pid) runs to completion.
/// With nothing arrived, the clock jumps to the next arrival and selects again.
pub fn run_to_completion_by(ctx: &mut SchedCtx, key: impl Fn(&Task) -> u64) {
    let mut ready = PriqDsq::new();

    while !ctx.all_completed() {
        for id in ctx.admit_arrivals() {
            let task = ctx.task(id);
            ready.push(
                id,
                Urgency {
                    key: key(task),
                    pid: task.pid,
                },
            );
        }

        let Some(id) = ready.pop() else {
            if !ctx.skip_idle() {
                break;
            }
            continue;
        };

        debug!(t = ctx.now, pid = ctx.task(id).pid, "dispatch");
        ctx.run_to_completion(id);
    }
}
