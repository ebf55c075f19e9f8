//! Per-run counters and failure records.

use std::fmt;

/// Outcome summary for one driver run.
///
/// The driver fills these counters while collecting worker results;
/// failed items are recorded with their error text instead of aborting
/// the batch.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Items that completed end-to-end.
    pub items_processed: u64,
    /// Feature tensors written to disk.
    pub tensors_written: u64,
    /// Cells dropped for insufficient observed traffic.
    pub cells_masked: u64,
    /// Failed items: `(item name, error text)`.
    pub failures: Vec<(String, String)>,
}

impl RunReport {
    /// True when no item failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items, {} tensors written, {} cells masked, {} failed",
            self.items_processed,
            self.tensors_written,
            self.cells_masked,
            self.failures.len()
        )?;
        for (item, error) in &self.failures {
            write!(f, "\n  {item}: {error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_report_summarizes_counts() {
        let report = RunReport {
            items_processed: 3,
            tensors_written: 7,
            cells_masked: 2,
            failures: vec![],
        };
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "3 items, 7 tensors written, 2 cells masked, 0 failed");
    }

    #[test]
    fn failures_are_listed() {
        let report = RunReport {
            items_processed: 1,
            tensors_written: 1,
            cells_masked: 0,
            failures: vec![("run_02".to_string(), "read: boom".to_string())],
        };
        assert!(!report.is_clean());
        let text = report.to_string();
        assert!(text.contains("1 failed"));
        assert!(text.contains("run_02: read: boom"));
    }
}
