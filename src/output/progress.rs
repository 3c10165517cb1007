use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for translation-unit scanning.
///
/// Outputs to stderr so diagnostics on stdout stay clean; hidden when stderr
/// is not a TTY.
#[derive(Clone)]
pub struct ScanProgress {
    progress_bar: ProgressBar,
    counter: Arc<AtomicU64>,
}

impl ScanProgress {
    #[must_use]
    pub fn new(total: u64) -> Self {
        let progress_bar = if std::io::stderr().is_terminal() {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} Preprocessing [{bar:40.cyan/blue}] {pos}/{len} translation units")
                    .expect("valid template")
                    .progress_chars("█▓░"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        Self {
            progress_bar,
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Thread-safe; called from scanner workers.
    pub fn inc(&self) {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        self.progress_bar.set_position(count);
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_tracks_increments_across_clones() {
        let progress = ScanProgress::new(3);
        let clone = progress.clone();
        progress.inc();
        clone.inc();
        assert_eq!(progress.counter.load(Ordering::Relaxed), 2);
        progress.finish();
    }
}
