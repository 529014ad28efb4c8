pub mod clock;
pub mod scheduler;

pub use clock::{Clock, MockClock, MonotonicClock};
pub use scheduler::{MockScheduler, ScheduledTask, TickCallback, TickScheduler, TokioScheduler};
