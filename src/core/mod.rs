pub mod observer;
pub mod state;
pub mod timeline;

pub use observer::{Observer, Violation};
pub use state::{FifoDsq, PriqDsq, SchedCtx, Task, TaskId, Ticks, Urgency, build_tasks};
pub use timeline::{ExecutionInterval, Timeline};
