//! Pipeline progress reporting.
//!
//! The pipeline itself is a pure transformation; everything a UI shows while it
//! runs goes through the [`PipelineObserver`] trait. [`NullObserver`] is for
//! headless callers, [`LogObserver`] feeds the `log` facade, and with the
//! `progress` feature a terminal progress bar is available.

use crate::pipeline::Stage;

/// Receiver of per-stage and per-segment pipeline notifications.
///
/// All methods default to no-ops so implementers only write what they render.
pub trait PipelineObserver {
    fn stage_started(&self, _stage: Stage) {}
    fn stage_finished(&self, _stage: Stage) {}
    fn segment_downloaded(&self, _index: usize, _total: usize) {}
    fn segment_skipped(&self, _index: usize, _total: usize) {}
}

/// Observer that swallows every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}

/// Observer that forwards notifications to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn stage_started(&self, stage: Stage) {
        log::info!("{}", stage.describe());
    }

    fn segment_downloaded(&self, index: usize, total: usize) {
        log::info!("downloaded data product {} of {}", index + 1, total);
    }

    fn segment_skipped(&self, index: usize, total: usize) {
        log::info!(
            "skipping empty or invalid data for product {} of {}",
            index + 1,
            total
        );
    }
}

#[cfg(feature = "progress")]
pub use bar::ProgressBarObserver;

#[cfg(feature = "progress")]
mod bar {
    use indicatif::{ProgressBar, ProgressStyle};

    use crate::pipeline::Stage;

    use super::PipelineObserver;

    /// Terminal progress bar over the download stage, with the current stage
    /// name as the message.
    pub struct ProgressBarObserver {
        bar: ProgressBar,
    }

    impl ProgressBarObserver {
        pub fn new(total_segments: u64) -> Self {
            let bar = ProgressBar::new(total_segments.max(1));
            bar.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {msg}",
                )
                .expect("indicatif template"),
            );
            ProgressBarObserver { bar }
        }

        pub fn finish(&self) {
            self.bar.finish_and_clear();
        }
    }

    impl PipelineObserver for ProgressBarObserver {
        fn stage_started(&self, stage: Stage) {
            self.bar.set_message(stage.describe());
        }

        fn segment_downloaded(&self, _index: usize, _total: usize) {
            self.bar.inc(1);
        }

        fn segment_skipped(&self, _index: usize, _total: usize) {
            self.bar.inc(1);
        }
    }
}
