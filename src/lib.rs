pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use config::SimConfig;
pub use error::{ConfigError, SchedError};
pub use scheduler::{Algorithm, Mode, Scheduler};
pub use sim::{ProcessSpec, RunResult, Sim};
