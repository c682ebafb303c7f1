use once_cell::sync::OnceCell;

use crate::logger::severity::LogSeverity;
use crate::logger::time::now;

static MIN_SEVERITY: OnceCell<LogSeverity> = OnceCell::new();

/// Sets the lowest severity that gets printed. Only the first call has an effect.
pub fn init(min_severity: LogSeverity) {
    let _ = MIN_SEVERITY.set(min_severity);
}

/// Returns true if a message of this severity would be printed.
pub fn enabled(log_severity: LogSeverity) -> bool {
    log_severity >= *MIN_SEVERITY.get().unwrap_or(&LogSeverity::Info)
}

pub fn log(msg: String, log_severity: LogSeverity) {
    if !enabled(log_severity) {
        return;
    }
    if log_severity.is_diagnostic() {
        eprintln!("[{}] {} {}", log_severity, now(), msg);
    } else {
        println!("[{}] {} {}", log_severity, now(), msg);
    }
}
