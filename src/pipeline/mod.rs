//! # Light-curve processing pipeline
//!
//! Five ordered stages over the data products the user selected:
//!
//! 1. **Download & filter** — fetch each selected product, discard null or
//!    empty segments (with a skip notice each); abort if nothing survives.
//! 2. **Normalize & stitch** — scale each retained segment to a common
//!    baseline, concatenate, drop null samples, sort by time.
//! 3. **Bin & flatten** — fixed-width time bins (default 10 minutes), moving
//!    polynomial detrend, sigma-clip outliers.
//! 4. **Periodic search** — box least squares periodogram; the maximum-power
//!    period and epoch become the transit hypothesis. By default no
//!    significance threshold is applied — the strongest peak is always
//!    reported, even if spurious; set
//!    [`PipelineConfig::power_threshold`] to opt into rejecting weak peaks.
//! 5. **Fold** — phase-fold the cleaned series at the detected period/epoch.
//!
//! The run is a pure function from selected entries to a [`PipelineResult`]
//! carrying the three plot artifacts (cleaned series, periodogram, folded
//! series) and the scalar best period; rendering is the caller's concern.
//! Progress reaches the caller through a [`PipelineObserver`]. There are no
//! retries and no partial results: the first failing stage aborts the run and
//! a rerun restarts from stage 1.

pub mod progress;

pub use progress::{LogObserver, NullObserver, PipelineObserver};

use crate::archive::{LightCurveArchive, SearchEntry};
use crate::constants::{Days, DEFAULT_BIN_WIDTH, DEFAULT_OUTLIER_SIGMA};
use crate::exohunt_errors::ExohuntError;
use crate::lightcurve::bls::{bls_periodogram, BlsConfig, BlsPeriodogram};
use crate::lightcurve::flatten::{flatten, FlattenConfig};
use crate::lightcurve::fold::{fold, FoldedLightCurve};
use crate::lightcurve::LightCurve;

/// The five ordered pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    Stitch,
    Clean,
    PeriodSearch,
    Fold,
}

impl Stage {
    /// Operator-facing description, used as the progress message.
    pub fn describe(&self) -> &'static str {
        match self {
            Stage::Download => "downloading and preparing the selected data products",
            Stage::Stitch => "stitching data segments together",
            Stage::Clean => "binning and flattening the light curve",
            Stage::PeriodSearch => "searching for periodic transit signals",
            Stage::Fold => "folding the light curve at the detected period",
        }
    }
}

/// Tuning knobs of the pipeline; the defaults reproduce the standard search.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Time-bin width in days (default 10 minutes).
    pub bin_width: Days,
    pub flatten: FlattenConfig,
    /// Sigma-clipping threshold for outlier removal.
    pub outlier_sigma: f64,
    pub bls: BlsConfig,
    /// Minimum periodogram peak power to accept. `None` (the default) reports
    /// the maximum-power period unconditionally and leaves judgement to the
    /// user.
    pub power_threshold: Option<f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            bin_width: DEFAULT_BIN_WIDTH,
            flatten: FlattenConfig::default(),
            outlier_sigma: DEFAULT_OUTLIER_SIGMA,
            bls: BlsConfig::default(),
            power_threshold: None,
        }
    }
}

/// Everything one pipeline run produces: the three plot artifacts plus the
/// transit hypothesis.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The cleaned, flattened series (stage 3 output).
    pub cleaned: LightCurve,
    /// The BLS periodogram (stage 4 output).
    pub periodogram: BlsPeriodogram,
    /// Period of maximum detection power, in days.
    pub best_period: Days,
    /// Mid-transit epoch at maximum power, in days.
    pub transit_epoch: Days,
    /// The phase-folded view (stage 5 output).
    pub folded: FoldedLightCurve,
    pub segments_used: usize,
    pub segments_skipped: usize,
}

/// Run the five-stage pipeline over the user's selection.
///
/// Any stage failure aborts the remainder; the returned error message is the
/// single user-facing report. No partial output is retained.
///
/// Arguments
/// ---------
/// * `archive`: the segment download service
/// * `selection`: the data products the user chose to process
/// * `config`: pipeline tuning (defaults reproduce the standard search)
/// * `observer`: receiver of stage/segment progress notifications
///
/// Return
/// ------
/// * The [`PipelineResult`], or the first stage error.
pub fn run(
    archive: &dyn LightCurveArchive,
    selection: &[SearchEntry],
    config: &PipelineConfig,
    observer: &dyn PipelineObserver,
) -> Result<PipelineResult, ExohuntError> {
    // Stage 1: download and filter.
    observer.stage_started(Stage::Download);
    let total = selection.len();
    let mut retained: Vec<LightCurve> = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for (index, entry) in selection.iter().enumerate() {
        let downloaded = archive.download(entry)?;
        let valid = downloaded
            .map(|segment| segment.curve.remove_nans())
            .filter(|curve| !curve.is_empty());

        match valid {
            Some(curve) => {
                retained.push(curve);
                observer.segment_downloaded(index, total);
            }
            None => {
                skipped += 1;
                log::info!(
                    "skipping empty or invalid data for product {}",
                    entry.product_id
                );
                observer.segment_skipped(index, total);
            }
        }
    }

    if retained.is_empty() {
        return Err(ExohuntError::NoUsableSegments);
    }
    observer.stage_finished(Stage::Download);

    // Stage 2: normalize each segment, then stitch.
    observer.stage_started(Stage::Stitch);
    let normalized = retained
        .iter()
        .map(LightCurve::normalize)
        .collect::<Result<Vec<_>, _>>()?;
    let stitched = LightCurve::stitch(&normalized);
    observer.stage_finished(Stage::Stitch);

    // Stage 3: bin, flatten, clip outliers.
    observer.stage_started(Stage::Clean);
    let binned = stitched.bin(config.bin_width)?;
    let flattened = flatten(&binned, &config.flatten)?;
    let cleaned = flattened.remove_outliers(config.outlier_sigma);
    observer.stage_finished(Stage::Clean);

    // Stage 4: box least squares search.
    observer.stage_started(Stage::PeriodSearch);
    let periodogram = bls_periodogram(&cleaned, &config.bls)?;
    if let Some(threshold) = config.power_threshold {
        let power = periodogram.max_power();
        if power < threshold {
            return Err(ExohuntError::BelowPowerThreshold { power, threshold });
        }
    }
    let best_period = periodogram.period_at_max_power();
    let transit_epoch = periodogram.transit_time_at_max_power();
    log::info!("strongest signal found at a period of {best_period:.4} days");
    observer.stage_finished(Stage::PeriodSearch);

    // Stage 5: fold at the detected period and epoch.
    observer.stage_started(Stage::Fold);
    let folded = fold(&cleaned, best_period, transit_epoch)?;
    observer.stage_finished(Stage::Fold);

    Ok(PipelineResult {
        cleaned,
        periodogram,
        best_period,
        transit_epoch,
        folded,
        segments_used: retained.len(),
        segments_skipped: skipped,
    })
}
