mod clock;
mod engine;
mod mode;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub(crate) use clock::to_delta;
pub use engine::{ClockEngine, ClockSignal, POLL_INTERVAL};
pub use mode::{DurationBounds, Mode, ADJUST_STEP_SECS};
pub use scheduler::{Deferred, ScheduledTask, TaskId};
