//! In-memory logger

use parking_lot::Mutex;

use super::traits::Logger;

/// A logger that keeps every line in memory
///
/// Lines are stored as `"<LEVEL> <message>"`. Handy for asserting on what
/// a resolution pass reported.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the logged lines
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Check whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    fn push(&self, level: &str, message: &str) {
        self.lines.lock().push(format!("{} {}", level, message));
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.push("DEBUG", message);
    }

    fn info(&self, message: &str) {
        self.push("INFO", message);
    }

    fn warn(&self, message: &str) {
        self.push("WARN", message);
    }

    fn error(&self, message: &str) {
        self.push("ERROR", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_records_lines() {
        let logger = MemoryLogger::new();
        logger.info("pass started");
        logger.warn("slow factory");

        assert_eq!(logger.lines(), vec!["INFO pass started", "WARN slow factory"]);
        assert!(logger.contains("slow"));

        logger.clear();
        assert!(logger.lines().is_empty());
    }
}
