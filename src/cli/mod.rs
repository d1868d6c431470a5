mod prompt;
mod render;

use sched_model::{
    Algorithm, Mode, ProcessSpec, RunResult, Sim, SimConfig,
    config::WorkloadConfig,
    sim::{ProcId, workload},
};
use std::{
    io::{self, BufRead, Write},
    path::Path,
};
use tracing::info;

use prompt::Prompter;

enum Flow {
    Again,
    Exit,
}

enum Request {
    Single(Algorithm),
    Compare,
}

impl Request {
    fn needs_priority(&self) -> bool {
        match self {
            Self::Single(algorithm) => algorithm.uses_priority(),
            Self::Compare => true,
        }
    }

    fn needs_quantum(&self) -> bool {
        matches!(
            self,
            Self::Single(Algorithm::RoundRobin { .. }) | Self::Compare
        )
    }
}

/// The interactive simulator loop.
pub struct Menu<R, W> {
    prompt: Prompter<R, W>,
    config: SimConfig,
    // Bumped per random workload so consecutive draws differ
    random_draws: u64,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, out: W, config: SimConfig) -> Self {
        Self {
            prompt: Prompter::new(input, out),
            config,
            random_draws: 0,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            match self.session() {
                Ok(Flow::Again) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
        }
        writeln!(
            self.prompt.out(),
            "\nThank you for using the CPU Scheduler Simulator!"
        )
    }

    fn session(&mut self) -> io::Result<Flow> {
        writeln!(self.prompt.out(), "\n--- CPU Scheduler Simulator ---")?;
        writeln!(self.prompt.out(), "Scheduling Algorithms:")?;
        writeln!(
            self.prompt.out(),
            "1. FCFS\n2. SJF\n3. Round Robin\n4. Priority\n5. Compare all\n6. Exit"
        )?;

        let request = match self.prompt.ask_int("Enter choice (1-6): ")? {
            None => return self.reject("Invalid input! Please enter a number between 1 and 6."),
            Some(6) => return Ok(Flow::Exit),
            Some(1) => Request::Single(Algorithm::Fcfs),
            Some(2) => match self.ask_mode()? {
                Some(mode) => Request::Single(Algorithm::Sjf(mode)),
                None => return Ok(Flow::Again),
            },
            Some(3) => Request::Single(Algorithm::RoundRobin { quantum: 0 }),
            Some(4) => match self.ask_mode()? {
                Some(mode) => Request::Single(Algorithm::Priority(mode)),
                None => return Ok(Flow::Again),
            },
            Some(5) => Request::Compare,
            Some(_) => {
                return self.reject("Invalid choice! Please select a number between 1 and 6.");
            }
        };

        let Some(specs) = self.ask_specs(request.needs_priority())? else {
            return Ok(Flow::Again);
        };

        let mut quantum = 0;
        if request.needs_quantum() {
            match self.prompt.ask_int("Enter time quantum for Round Robin: ")? {
                Some(q) => quantum = q,
                None => return self.reject("Invalid input! Please enter a valid time quantum."),
            }
        }

        let mut sim = Sim::new(specs);
        match request {
            Request::Single(algorithm) => {
                let algorithm = match algorithm {
                    Algorithm::RoundRobin { .. } => Algorithm::RoundRobin { quantum },
                    other => other,
                };
                match sim.run(algorithm) {
                    Ok(result) => self.show(&result)?,
                    Err(e) => return self.reject(&e.to_string()),
                }
            }
            Request::Compare => match sim.compare(&Algorithm::all(quantum)) {
                Ok(results) => render::write_comparison(self.prompt.out(), &results)?,
                Err(e) => return self.reject(&e.to_string()),
            },
        }

        if self.prompt.ask_yes("\nDo you want to run another simulation? (y/n): ")? {
            Ok(Flow::Again)
        } else {
            Ok(Flow::Exit)
        }
    }

    fn reject(&mut self, message: &str) -> io::Result<Flow> {
        info!(rejected = message, "input rejected");
        writeln!(self.prompt.out(), "{message}")?;
        Ok(Flow::Again)
    }

    fn ask_mode(&mut self) -> io::Result<Option<Mode>> {
        writeln!(self.prompt.out(), "\nSelect mode:\n1. Non-Preemptive\n2. Preemptive")?;
        match self.prompt.ask_int("Enter choice (1-2): ")? {
            Some(1) => Ok(Some(Mode::NonPreemptive)),
            Some(2) => Ok(Some(Mode::Preemptive)),
            Some(_) => {
                self.reject("Invalid choice! Please select a number between 1 and 2.")?;
                Ok(None)
            }
            None => {
                self.reject("Invalid input! Please enter a number between 1 and 2.")?;
                Ok(None)
            }
        }
    }

    fn ask_specs(&mut self, with_priority: bool) -> io::Result<Option<Vec<ProcessSpec>>> {
        writeln!(
            self.prompt.out(),
            "\nProcess source:\n1. Enter manually\n2. Random workload\n3. Load JSON file"
        )?;
        match self.prompt.ask_int("Enter choice (1-3): ")? {
            Some(1) => self.ask_manual(with_priority),
            Some(2) => Ok(Some(self.random_specs()?)),
            Some(3) => {
                let path = self.prompt.ask_line("Path to workload file: ")?;
                match workload::from_json_file(Path::new(&path)) {
                    Ok(specs) => Ok(Some(specs)),
                    Err(e) => {
                        self.reject(&e.to_string())?;
                        Ok(None)
                    }
                }
            }
            _ => {
                self.reject("Invalid choice! Please select a number between 1 and 3.")?;
                Ok(None)
            }
        }
    }

    fn ask_manual(&mut self, with_priority: bool) -> io::Result<Option<Vec<ProcessSpec>>> {
        let n = match self.prompt.ask_int("Enter number of processes: ")? {
            Some(n) if n >= 0 => n,
            _ => {
                self.reject("Invalid input! Please enter a valid number of processes.")?;
                return Ok(None);
            }
        };

        let mut specs = Vec::new();
        for id in 1..=n as ProcId {
            writeln!(self.prompt.out(), "Process {id}")?;
            let arrival = self.prompt.ask_int("Arrival Time: ")?;
            let burst = self.prompt.ask_int("Burst Time: ")?;
            let priority = if with_priority {
                self.prompt
                    .ask_int("Priority (lower number = higher priority): ")?
            } else {
                Some(0)
            };

            match (arrival, burst, priority) {
                (Some(arrival), Some(burst), Some(priority)) => {
                    specs.push(ProcessSpec::new(id, arrival, burst, priority));
                }
                _ => {
                    self.reject("Invalid input! Please enter whole numbers.")?;
                    return Ok(None);
                }
            }
        }
        Ok(Some(specs))
    }

    fn random_specs(&mut self) -> io::Result<Vec<ProcessSpec>> {
        let config = WorkloadConfig {
            seed: self.config.workload.seed.wrapping_add(self.random_draws),
            ..self.config.workload.clone()
        };
        self.random_draws += 1;

        let specs = workload::bernoulli(&config);
        info!(seed = config.seed, processes = specs.len(), "random workload");
        writeln!(
            self.prompt.out(),
            "Generated {} processes (seed {})",
            specs.len(),
            config.seed
        )?;
        Ok(specs)
    }

    fn show(&mut self, result: &RunResult) -> io::Result<()> {
        let out = self.prompt.out();
        writeln!(out, "\n--- {} Scheduling ---", result.algorithm)?;
        render::write_gantt(out, &result.intervals)?;
        render::write_table(out, result)?;
        if let Some(tick) = self.config.tick_delay() {
            render::animate(out, &result.intervals, tick)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(input: &str) -> String {
        let config = SimConfig {
            animate: false,
            ..SimConfig::default()
        };
        let mut out = Vec::new();
        Menu::new(Cursor::new(input.as_bytes().to_vec()), &mut out, config)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_fcfs_manual_session() {
        let text = session("1\n1\n3\n0\n5\n1\n3\n2\n8\nn\n");
        assert!(text.contains("--- FCFS Scheduling ---"));
        assert!(text.contains("| P1 (0-5) | P2 (5-8) | P3 (8-16) |"));
        assert!(text.contains("Average Waiting Time: 3.33"));
        assert!(text.ends_with("Thank you for using the CPU Scheduler Simulator!\n"));
    }

    #[test]
    fn test_round_robin_asks_quantum_and_rejects_zero() {
        let text = session("3\n1\n1\n0\n2\n0\n6\n");
        assert!(text.contains("Enter time quantum for Round Robin: "));
        assert!(text.contains("time quantum 0 must be positive"));
        assert!(!text.contains("Gantt Chart"));
    }

    #[test]
    fn test_priority_mode_prompts_for_priority() {
        let text = session("4\n2\n1\n2\n0\n4\n2\n1\n2\n1\nn\n");
        assert!(text.contains("Priority (lower number = higher priority): "));
        assert!(text.contains("--- Priority Preemptive Scheduling ---"));
        assert!(text.contains("| P1 (0-1) | P2 (1-3) | P1 (3-6) |"));
    }

    #[test]
    fn test_invalid_menu_input_returns_to_menu() {
        let text = session("x\n9\n2\n7\n6\n");
        assert!(text.contains("Invalid input! Please enter a number between 1 and 6."));
        assert!(text.contains("Invalid choice! Please select a number between 1 and 6."));
        assert!(text.contains("Invalid choice! Please select a number between 1 and 2."));
    }

    #[test]
    fn test_invalid_process_rejects_batch() {
        let text = session("1\n1\n2\n0\n3\n1\n0\n6\n");
        assert!(text.contains("process P2: burst time 0 must be positive"));
        assert!(!text.contains("Gantt Chart"));
    }

    #[test]
    fn test_compare_random_workload() {
        let text = session("5\n2\n2\nn\n");
        assert!(text.contains("Generated "));
        assert!(text.contains("Round Robin (q=2)"));
        assert!(text.contains("Priority Preemptive"));
        assert!(text.contains("Lowest average waiting time: "));
    }

    #[test]
    fn test_eof_exits_cleanly() {
        let text = session("1\n");
        assert!(text.ends_with("Thank you for using the CPU Scheduler Simulator!\n"));
    }
}
