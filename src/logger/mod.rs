pub mod log;
pub mod severity;
pub mod time;

pub use log::{enabled, init, log};
pub use severity::LogSeverity;
