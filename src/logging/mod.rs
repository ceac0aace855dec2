//! Logging and observability
//!
//! Two channels exist side by side:
//!
//! - ambient diagnostics through `tracing` macros, installed once by
//!   [`init_logging`] (console plus optional rolling JSON file)
//! - the job trace, an injected [`TraceSink`] that receives one line per
//!   engine or orchestrator decision
//!
//! # Example
//!
//! ```no_run
//! use dwgbatch::config::LoggingConfig;
//! use dwgbatch::logging::{init_logging, TraceSink, TracingSink};
//!
//! let _guard = init_logging("info", &LoggingConfig::console_only())
//!     .expect("Failed to initialize logging");
//!
//! TracingSink.trace("Collecting views...");
//! ```

pub mod sink;
pub mod structured;

// Re-export commonly used items
pub use sink::{MemorySink, TraceSink, TracingSink};
pub use structured::{init_logging, LoggingGuard};

/// Write a formatted line to a trace sink
///
/// # Example
///
/// ```
/// use dwgbatch::trace_line;
/// use dwgbatch::logging::MemorySink;
///
/// let sink = MemorySink::new();
/// trace_line!(sink, "Exporting `{}`...", "model-Floor Plan - Level 1.dwg");
/// assert_eq!(sink.lines().len(), 1);
/// ```
#[macro_export]
macro_rules! trace_line {
    ($sink:expr, $($arg:tt)+) => {
        $crate::logging::TraceSink::trace(&$sink, &format!($($arg)+))
    };
}
