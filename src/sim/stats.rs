use average::{Estimate, Mean};

use super::process::ProcessRecord;
use crate::core::Ticks;

/// Aggregate figures for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub makespan: Ticks,
    pub cpu_utilization: f64,
}

pub fn summarize(records: &[ProcessRecord]) -> Summary {
    let first_arrival = records.iter().map(|p| p.arrival).min().unwrap_or(0);
    let last_completion = records.iter().map(|p| p.completion).max().unwrap_or(0);
    let makespan = last_completion.saturating_sub(first_arrival);
    // Fits whenever the batch passed build_tasks
    let busy = records
        .iter()
        .try_fold(0, |busy: Ticks, p| busy.checked_add(p.burst));
    debug_assert!(busy.is_some(), "Total burst overflows Ticks");

    Summary {
        avg_waiting: avg(records.iter().map(|p| p.waiting as f64)),
        avg_turnaround: avg(records.iter().map(|p| p.turnaround as f64)),
        avg_response: avg(records.iter().map(|p| p.response as f64)),
        makespan,
        cpu_utilization: match busy {
            Some(busy) if makespan > 0 => busy as f64 / makespan as f64,
            _ => 0.0,
        },
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}
