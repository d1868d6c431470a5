pub mod driver;
pub mod process;
pub mod stats;
pub mod workload;

pub use driver::Sim;
pub use process::{ProcId, ProcessRecord, ProcessSpec, RunResult};
pub use stats::Summary;
