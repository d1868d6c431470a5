use tracing::debug;

use crate::core::{PriqDsq, SchedCtx, Task, Urgency};

fn urgency(task: &Task, key: &impl Fn(&Task) -> u64) -> Urgency {
    Urgency {
        key: key(task),
        pid: task.pid,
    }
}

/// Unit-step preemptive loop shared by SRTF and preemptive priority.
///
/// Every tick the most urgent arrived task by `key` runs. A tie on `key` keeps
/// the incumbent; with no incumbent in the tie the smallest pid wins. The open
/// interval is split whenever the selection changes or something arrives on
/// the current tick, even if the incumbent keeps running.
pub fn run_unit_steps(ctx: &mut SchedCtx, key: impl Fn(&Task) -> u64) {
    let mut ready = PriqDsq::new();
    ctx.jump_to(ctx.first_arrival());

    while !ctx.all_completed() {
        let arrived = ctx.admit_arrivals();
        let new_arrival = !arrived.is_empty();
        for id in arrived {
            ready.push(id, urgency(ctx.task(id), &key));
        }

        let incumbent = ctx.timeline.running();
        let Some(id) = ready.select(incumbent) else {
            ctx.timeline.close(ctx.now);
            if !ctx.skip_idle() {
                break;
            }
            continue;
        };

        if incumbent != Some(id) || new_arrival {
            if let Some(prev) = incumbent.filter(|&prev| prev != id) {
                debug!(t = ctx.now, from = ctx.task(prev).pid, to = ctx.task(id).pid, "preempt");
            }
            let pid = ctx.task(id).pid;
            ctx.timeline.switch(id, pid, ctx.now);
        }

        if ctx.run_tick(id) {
            ready.remove(id);
            ctx.timeline.close(ctx.now);
            debug!(t = ctx.now, pid = ctx.task(id).pid, "complete");
        } else {
            ready.push(id, urgency(ctx.task(id), &key));
        }
    }
}
