// Frozen path assignment: live crowd estimates, best-path choice and the
// shared counter that biases later estimates.
pub mod assignment;
pub mod counter;
pub mod jitter;

pub use assignment::{assign, crowd_percentage, live_time, shortest_index, Assignment, LiveRoute, Trip};
pub use counter::{AssignmentCounter, CounterEntry, PathKey};
pub use jitter::{CrowdSeries, LoadSeries, CROWD_SLOTS, LOAD_HOURS};
