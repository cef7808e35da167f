//! Progress feedback for long-running exports

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner showing rows written and throughput
///
/// The total row count is unknown up front (pagination deliberately avoids
/// a full collection count), so this is a spinner rather than a bar.
pub struct ProgressTracker {
    start_time: Instant,
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    /// Create a new tracker
    ///
    /// # Arguments
    /// * `enable_bar` - Whether to display the spinner (off in quiet mode)
    pub fn new(enable_bar: bool) -> Self {
        let bar = enable_bar.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {pos} rows {msg}")
                    .unwrap(),
            );
            pb
        });

        Self {
            start_time: Instant::now(),
            bar,
        }
    }

    /// Update with the total number of rows written so far
    pub fn update(&self, rows: u64) {
        if let Some(ref bar) = self.bar {
            bar.set_position(rows);
            let elapsed = self.start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                bar.set_message(format!("({:.0} rows/sec)", rows as f64 / elapsed));
            }
        }
    }

    /// Finish and clear the spinner
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_disabled() {
        let tracker = ProgressTracker::new(false);
        tracker.update(500);
        tracker.finish();
    }
}
