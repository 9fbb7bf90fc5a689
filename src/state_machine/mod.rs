mod item;
mod transition;

pub use item::{RetryPolicy, WorkItem};
pub use transition::{CheckVerdict, Transition};
