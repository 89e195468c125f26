// file: src/pipeline/progress.rs
// description: per-track progress bars and counters
// reference: uses indicatif for progress bars and tracks processing metrics

use crate::models::Track;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Bars for both tracks, drawn together since the tracks run concurrently.
pub struct ProgressBoard {
    multi: MultiProgress,
    colored: bool,
}

impl ProgressBoard {
    pub fn new(colored: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            colored,
        }
    }

    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            colored: false,
        }
    }

    pub fn track(&self, track: Track, total: usize) -> TrackProgress {
        let bar = self.multi.add(ProgressBar::new(total as u64));
        bar.set_style(track_style(self.colored));
        bar.set_prefix(track.as_str().to_uppercase());
        TrackProgress::from_bar(bar)
    }
}

pub struct TrackProgress {
    bar: ProgressBar,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    indicators: AtomicUsize,
}

impl TrackProgress {
    fn from_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            indicators: AtomicUsize::new(0),
        }
    }

    pub fn hidden() -> Self {
        Self::from_bar(ProgressBar::hidden())
    }

    pub fn inc_succeeded(&self, indicators_so_far: usize) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
        self.indicators.store(indicators_so_far, Ordering::SeqCst);
        self.bar.inc(1);
        self.update_message();
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
        self.update_message();
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn finish(&self) {
        self.bar.finish_with_message(format!(
            "done | IPs: {} | Failed: {}",
            self.indicators.load(Ordering::SeqCst),
            self.failed()
        ));
    }

    fn update_message(&self) {
        let message = format!(
            "IPs: {} | Failed: {}",
            self.indicators.load(Ordering::SeqCst),
            self.failed()
        );
        self.bar.set_message(message);
    }
}

fn track_style(colored: bool) -> ProgressStyle {
    let (template, chars) = if colored {
        (
            "{prefix:>4.bold} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            "█▓▒░",
        )
    } else {
        (
            "{prefix:>4} {spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}",
            "=>-",
        )
    };

    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_progress_counts() {
        let progress = TrackProgress::hidden();

        progress.inc_succeeded(2);
        progress.inc_failed();
        progress.inc_succeeded(5);
        progress.finish();

        assert_eq!(progress.succeeded(), 2);
        assert_eq!(progress.failed(), 1);
    }

    #[test]
    fn test_board_creates_bars() {
        let board = ProgressBoard::hidden();
        let html = board.track(Track::Html, 4);
        html.inc_failed();
        assert_eq!(html.failed(), 1);
    }
}
