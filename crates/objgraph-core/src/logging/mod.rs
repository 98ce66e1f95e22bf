//! Logging for resolution passes
//!
//! Two layers, as the rest of the crate uses them:
//! - `Logger` implementations receive pass-level events (a pass starting,
//!   finishing or failing) from a `GraphBuilder`.
//! - `file_logger` is a global debug trace of per-pointer activity, off
//!   unless `OBJGRAPH_DEBUG` is set.

mod traits;
mod console;
mod memory;
pub mod file_logger;

pub use traits::{Logger, LoggerExt, NoOpLogger, SharedLogger};
pub use console::ConsoleLogger;
pub use memory::MemoryLogger;

pub use file_logger::{
    log, trace, debug, info, warn, error,
    log_file_path, clear_log, set_enabled, set_min_level, LogLevel,
};
