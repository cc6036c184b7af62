//! Box least squares (BLS) periodogram.
//!
//! Scores candidate periods by how well a box-shaped flux dip fits the phase-folded
//! series at that period, following the signal-residue statistic of Kovács, Zucker
//! & Mazeh (2002). For each trial period the samples are folded and accumulated
//! into phase bins; a box of contiguous bins is slid over the phases and scored by
//!
//! ```text
//! SR² = s² / (r (1 - r))
//! ```
//!
//! where `r` is the total weight inside the box and `s` the weighted sum of
//! mean-subtracted flux inside it. Only boxes *below* the mean are scored, since a
//! transit is a dip. The reported power is `SR` at the best box of each period.
//!
//! No significance thresholding happens here: the maximum-power period is always
//! derivable from the result, even when the peak is spurious. Whether to act on a
//! weak peak is the caller's policy (see
//! [`PipelineConfig::power_threshold`](crate::pipeline::PipelineConfig)).

use crate::constants::Days;
use crate::exohunt_errors::ExohuntError;
use crate::lightcurve::LightCurve;

/// Parameters of the box least squares search.
#[derive(Debug, Clone)]
pub struct BlsConfig {
    /// Shortest trial period, in days.
    pub min_period: Days,
    /// Longest trial period, in days. Defaults to half the time span, the longest
    /// period that still shows two transits.
    pub max_period: Option<Days>,
    /// Number of trial periods. Defaults to an oversampled frequency grid derived
    /// from the time span.
    pub n_periods: Option<usize>,
    /// Number of phase bins per trial period.
    pub n_phase_bins: usize,
    /// Shortest box duration, as a fraction of the period.
    pub min_duration_frac: f64,
    /// Longest box duration, as a fraction of the period.
    pub max_duration_frac: f64,
}

impl Default for BlsConfig {
    fn default() -> Self {
        BlsConfig {
            min_period: 0.5,
            max_period: None,
            n_periods: None,
            n_phase_bins: 200,
            min_duration_frac: 0.01,
            max_duration_frac: 0.1,
        }
    }
}

/// A computed periodogram: detection power over the period grid, plus the transit
/// hypothesis (period, epoch, duration, depth) at maximum power.
#[derive(Debug, Clone)]
pub struct BlsPeriodogram {
    /// Trial periods in days, in frequency order (longest period first).
    pub period: Vec<Days>,
    /// Detection power at each trial period.
    pub power: Vec<f64>,
    best_index: usize,
    best_epoch: Days,
    best_duration: Days,
    best_depth: f64,
}

impl BlsPeriodogram {
    pub fn len(&self) -> usize {
        self.period.len()
    }

    pub fn is_empty(&self) -> bool {
        self.period.is_empty()
    }

    /// The trial period with the highest detection power, in days.
    pub fn period_at_max_power(&self) -> Days {
        self.period[self.best_index]
    }

    /// Mid-transit time of the best box, inside the first period after the start
    /// of the series, in days.
    pub fn transit_time_at_max_power(&self) -> Days {
        self.best_epoch
    }

    /// Detection power of the strongest peak.
    pub fn max_power(&self) -> f64 {
        self.power[self.best_index]
    }

    /// Transit duration of the best box, in days.
    pub fn duration_at_max_power(&self) -> Days {
        self.best_duration
    }

    /// Transit depth of the best box, in relative flux (positive for a dip).
    pub fn depth_at_max_power(&self) -> f64 {
        self.best_depth
    }
}

/// Best box found while scanning one trial period.
#[derive(Debug, Clone, Copy, Default)]
struct BoxFit {
    sr_sq: f64,
    start_bin: usize,
    width_bins: usize,
    depth: f64,
}

/// Compute the BLS periodogram of a cleaned light curve.
///
/// Arguments
/// ---------
/// * `lc`: the cleaned series, sorted by time, free of null samples
/// * `config`: grid and box-search parameters
///
/// Return
/// ------
/// * The periodogram, or an error when the series is too short or the period
///   range does not fit in the observed time span.
pub fn bls_periodogram(lc: &LightCurve, config: &BlsConfig) -> Result<BlsPeriodogram, ExohuntError> {
    if lc.len() < 2 {
        return Err(ExohuntError::EmptySeries("period search"));
    }

    let span = lc.time_span();
    let min_period = config.min_period;
    let max_period = config.max_period.unwrap_or(span / 2.0);
    if !(min_period > 0.0) || !(max_period > min_period) {
        return Err(ExohuntError::DegeneratePeriodGrid);
    }

    let periods = period_grid(min_period, max_period, span, config.n_periods);

    let weights = sample_weights(lc);
    let weighted_mean: f64 = weights
        .iter()
        .zip(&lc.flux)
        .map(|(w, f)| w * f)
        .sum();
    let residual: Vec<f64> = lc.flux.iter().map(|f| f - weighted_mean).collect();

    let n_bins = config.n_phase_bins.max(8);
    let min_width = ((config.min_duration_frac * n_bins as f64).floor() as usize).max(1);
    let max_width = ((config.max_duration_frac * n_bins as f64).ceil() as usize)
        .max(min_width)
        .min(n_bins - 1);

    let t0 = lc.time[0];
    let mut power = Vec::with_capacity(periods.len());
    let mut best = BoxFit::default();
    let mut best_index = 0usize;
    let mut best_period = periods[0];

    // Reused per-period accumulators.
    let mut bin_weight = vec![0.0f64; n_bins];
    let mut bin_signal = vec![0.0f64; n_bins];

    for (p_idx, &period) in periods.iter().enumerate() {
        bin_weight.iter_mut().for_each(|v| *v = 0.0);
        bin_signal.iter_mut().for_each(|v| *v = 0.0);

        for ((&t, &x), &w) in lc.time.iter().zip(&residual).zip(&weights) {
            let phase = ((t - t0) / period).fract();
            let bin = ((phase * n_bins as f64) as usize).min(n_bins - 1);
            bin_weight[bin] += w;
            bin_signal[bin] += w * x;
        }

        let fit = best_box(&bin_weight, &bin_signal, min_width, max_width);
        let p = fit.sr_sq.max(0.0).sqrt();
        power.push(p);

        if fit.sr_sq > best.sr_sq {
            best = fit;
            best_index = p_idx;
            best_period = period;
        }
    }

    let mid_phase = (best.start_bin as f64 + best.width_bins as f64 / 2.0) / n_bins as f64;
    Ok(BlsPeriodogram {
        period: periods,
        power,
        best_index,
        best_epoch: t0 + mid_phase * best_period,
        best_duration: best.width_bins as f64 / n_bins as f64 * best_period,
        best_depth: best.depth,
    })
}

/// Trial periods, linear in frequency from `1/max_period` to `1/min_period`.
fn period_grid(min_period: f64, max_period: f64, span: f64, n_periods: Option<usize>) -> Vec<f64> {
    let f_min = 1.0 / max_period;
    let f_max = 1.0 / min_period;

    // Oversample so a transit drifts by less than a phase bin across the span
    // between neighbouring grid frequencies.
    const OVERSAMPLE: f64 = 10.0;
    let n = n_periods
        .unwrap_or_else(|| (((f_max - f_min) * span * OVERSAMPLE).ceil() as usize).clamp(100, 50_000))
        .max(2);

    (0..n)
        .map(|k| {
            let f = f_min + (f_max - f_min) * k as f64 / (n - 1) as f64;
            1.0 / f
        })
        .collect()
}

/// Per-sample weights, normalized to sum to one.
///
/// Inverse-variance weights when every sample carries a finite positive
/// uncertainty, uniform weights otherwise.
fn sample_weights(lc: &LightCurve) -> Vec<f64> {
    let use_errors = !lc.flux_err.is_empty()
        && lc.flux_err.iter().all(|e| e.is_finite() && *e > 0.0);

    let raw: Vec<f64> = if use_errors {
        lc.flux_err.iter().map(|e| 1.0 / (e * e)).collect()
    } else {
        vec![1.0; lc.len()]
    };
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Slide boxes of `min_width..=max_width` bins over the phase-binned signal
/// (wrapping past phase 1.0) and keep the strongest dip.
fn best_box(bin_weight: &[f64], bin_signal: &[f64], min_width: usize, max_width: usize) -> BoxFit {
    let n_bins = bin_weight.len();

    // Prefix sums over a doubled range so wrapping boxes are plain differences.
    let mut weight_prefix = vec![0.0f64; 2 * n_bins + 1];
    let mut signal_prefix = vec![0.0f64; 2 * n_bins + 1];
    for i in 0..2 * n_bins {
        weight_prefix[i + 1] = weight_prefix[i] + bin_weight[i % n_bins];
        signal_prefix[i + 1] = signal_prefix[i] + bin_signal[i % n_bins];
    }

    const MIN_BOX_WEIGHT: f64 = 1e-9;
    let mut best = BoxFit::default();

    for start in 0..n_bins {
        for width in min_width..=max_width {
            let r = weight_prefix[start + width] - weight_prefix[start];
            let s = signal_prefix[start + width] - signal_prefix[start];

            // Only score dips with some weight on both sides of the box edge.
            if s >= 0.0 || r <= MIN_BOX_WEIGHT || r >= 1.0 - MIN_BOX_WEIGHT {
                continue;
            }

            let sr_sq = s * s / (r * (1.0 - r));
            if sr_sq > best.sr_sq {
                best = BoxFit {
                    sr_sq,
                    start_bin: start,
                    width_bins: width,
                    depth: -s / (r * (1.0 - r)),
                };
            }
        }
    }

    best
}
