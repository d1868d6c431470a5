use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use sched_model::{RunResult, core::ExecutionInterval};
use std::{
    io::{self, Write},
    thread,
    time::Duration,
};

const PALETTE: [Color; 6] = [
    Color::Green,
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::Red,
];

pub fn write_gantt(out: &mut impl Write, intervals: &[ExecutionInterval]) -> io::Result<()> {
    writeln!(out, "\nGantt Chart:")?;
    for iv in intervals {
        write!(out, "| P{} ({}-{}) ", iv.pid, iv.start, iv.end)?;
    }
    writeln!(out, "|")
}

pub fn write_table(out: &mut impl Write, result: &RunResult) -> io::Result<()> {
    writeln!(out, "\nID\tArrival\tBurst\tPriority\tCT\tWaiting\tTAT\tResponse")?;
    for p in &result.processes {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t\t{}\t{}\t{}\t{}",
            p.id, p.arrival, p.burst, p.priority, p.completion, p.waiting, p.turnaround, p.response
        )?;
    }
    writeln!(out, "\nAverage Waiting Time: {:.2}", result.avg_waiting)?;
    writeln!(out, "Average Turnaround Time: {:.2}", result.avg_turnaround)?;
    writeln!(out, "Average Response Time: {:.2}", result.avg_response)?;
    writeln!(
        out,
        "CPU Utilization: {:.1}% over {} ticks",
        result.cpu_utilization * 100.0,
        result.makespan
    )
}

/// One summary row per algorithm.
pub fn write_comparison(out: &mut impl Write, results: &[RunResult]) -> io::Result<()> {
    writeln!(
        out,
        "\n{:<28}{:>10}{:>12}{:>11}{:>8}",
        "Algorithm", "Avg WT", "Avg TAT", "Avg RT", "CPU"
    )?;
    for r in results {
        writeln!(
            out,
            "{:<28}{:>10.2}{:>12.2}{:>11.2}{:>7.1}%",
            r.algorithm,
            r.avg_waiting,
            r.avg_turnaround,
            r.avg_response,
            r.cpu_utilization * 100.0
        )?;
    }

    if let Some(best) = results
        .iter()
        .min_by(|a, b| a.avg_waiting.total_cmp(&b.avg_waiting))
    {
        queue!(
            out,
            Print("\nLowest average waiting time: "),
            SetAttribute(Attribute::Bold),
            Print(&best.algorithm),
            SetAttribute(Attribute::Reset),
            Print("\n")
        )?;
    }
    out.flush()
}

/// Replays the finished timeline as progress bars, one `#` per tick. Purely
/// cosmetic: the results were computed before this is called.
pub fn animate(
    out: &mut impl Write,
    intervals: &[ExecutionInterval],
    tick: Duration,
) -> io::Result<()> {
    for iv in intervals {
        let color = PALETTE[(iv.pid as usize) % PALETTE.len()];
        queue!(
            out,
            Print(format!("\nProcessing P{} [", iv.pid)),
            SetForegroundColor(color)
        )?;
        for _ in iv.start..iv.end {
            queue!(out, Print('#'))?;
            out.flush()?;
            if !tick.is_zero() {
                thread::sleep(tick);
            }
        }
        queue!(out, ResetColor, Print(format!("] {}-{} ", iv.start, iv.end)))?;
    }
    queue!(out, Print("\n"))?;
    out.flush()
}
