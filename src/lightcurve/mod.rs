//! # Light-curve containers and stage transforms
//!
//! This module defines [`LightCurve`], the in-memory representation of a photometric
//! time series, together with the transformations the pipeline chains over it:
//! null removal, normalization, stitching, time-binning, and outlier clipping.
//!
//! Every transform is a pure function from an input series to a freshly owned output
//! series, which is what makes a pipeline rerun idempotent.
//!
//! ## Conventions
//!
//! - Timestamps are floating-point days ([`Days`](crate::constants::Days)); the
//!   zero point is whatever the archive delivered (BTJD, BKJD). Only differences
//!   and phases are ever used.
//! - A sample whose flux (or timestamp) is not finite is a **null sample**; the
//!   null-removal passes drop it.
//! - Flux uncertainties are optional: a missing uncertainty is carried as NaN and
//!   is not treated as a null sample.

pub mod bls;
pub mod flatten;
pub mod fold;
pub(crate) mod stats;

use itertools::izip;

use crate::constants::{Days, RelativeFlux};
use crate::exohunt_errors::ExohuntError;
use crate::missions::Mission;

/// A photometric time series: per-sample timestamp, flux, and flux uncertainty.
///
/// The three arrays always have the same length. Uncertainties are NaN when the
/// source did not provide them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightCurve {
    pub time: Vec<Days>,
    pub flux: Vec<RelativeFlux>,
    pub flux_err: Vec<RelativeFlux>,
}

/// One downloaded observation run, immutable once built.
///
/// Discarded after being folded into a stitched series; only its provenance
/// outlives the stitch (through logging).
#[derive(Debug, Clone)]
pub struct Segment {
    pub curve: LightCurve,
    pub mission: Option<Mission>,
    pub author: String,
}

impl LightCurve {
    /// Build a light curve from parallel sample arrays.
    ///
    /// Arguments
    /// ---------
    /// * `time`: timestamps in days
    /// * `flux`: flux values
    /// * `flux_err`: flux uncertainties (NaN where unknown)
    ///
    /// Return
    /// ------
    /// * The light curve, or [`ExohuntError::SampleLengthMismatch`] if the arrays
    ///   disagree in length.
    pub fn new(
        time: Vec<Days>,
        flux: Vec<RelativeFlux>,
        flux_err: Vec<RelativeFlux>,
    ) -> Result<Self, ExohuntError> {
        if time.len() != flux.len() || time.len() != flux_err.len() {
            return Err(ExohuntError::SampleLengthMismatch {
                time: time.len(),
                flux: flux.len(),
                flux_err: flux_err.len(),
            });
        }
        Ok(LightCurve {
            time,
            flux,
            flux_err,
        })
    }

    /// Build a light curve without uncertainties (all NaN).
    pub fn without_errors(time: Vec<Days>, flux: Vec<RelativeFlux>) -> Result<Self, ExohuntError> {
        let flux_err = vec![f64::NAN; time.len()];
        LightCurve::new(time, flux, flux_err)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time span covered by the series, in days. Zero for fewer than two samples.
    pub fn time_span(&self) -> Days {
        match (
            self.time.iter().copied().reduce(f64::min),
            self.time.iter().copied().reduce(f64::max),
        ) {
            (Some(lo), Some(hi)) if hi > lo => hi - lo,
            _ => 0.0,
        }
    }

    /// Whether timestamps are monotonically non-decreasing.
    pub fn is_sorted_by_time(&self) -> bool {
        self.time.windows(2).all(|w| w[0] <= w[1])
    }

    /// Drop every null sample (non-finite flux or timestamp).
    pub fn remove_nans(&self) -> LightCurve {
        let mut out = LightCurve::default();
        for (&t, &f, &e) in izip!(&self.time, &self.flux, &self.flux_err) {
            if t.is_finite() && f.is_finite() {
                out.time.push(t);
                out.flux.push(f);
                out.flux_err.push(e);
            }
        }
        out
    }

    /// Scale the series to a common baseline by dividing by the median flux,
    /// centering valid fluxes near 1.0. Uncertainties are scaled alongside.
    ///
    /// Return
    /// ------
    /// * The normalized series, or [`ExohuntError::EmptySeries`] when no finite,
    ///   non-zero baseline can be derived.
    pub fn normalize(&self) -> Result<LightCurve, ExohuntError> {
        let finite: Vec<f64> = self.flux.iter().copied().filter(|f| f.is_finite()).collect();
        let baseline = stats::median(&finite);
        if !baseline.is_finite() || baseline == 0.0 {
            return Err(ExohuntError::EmptySeries("normalization"));
        }

        Ok(LightCurve {
            time: self.time.clone(),
            flux: self.flux.iter().map(|f| f / baseline).collect(),
            flux_err: self.flux_err.iter().map(|e| e / baseline).collect(),
        })
    }

    /// Concatenate several series into one, dropping null samples and sorting by
    /// timestamp. The result satisfies the stitched-series invariant: timestamps
    /// are monotonically non-decreasing and every flux is finite.
    pub fn stitch(segments: &[LightCurve]) -> LightCurve {
        let mut samples: Vec<(Days, RelativeFlux, RelativeFlux)> = segments
            .iter()
            .flat_map(|lc| {
                izip!(&lc.time, &lc.flux, &lc.flux_err).map(|(&t, &f, &e)| (t, f, e))
            })
            .filter(|(t, f, _)| t.is_finite() && f.is_finite())
            .collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut out = LightCurve::default();
        for (t, f, e) in samples {
            out.time.push(t);
            out.flux.push(f);
            out.flux_err.push(e);
        }
        out
    }

    /// Aggregate samples into fixed-width time bins by averaging within each bin.
    ///
    /// The series must already be sorted by timestamp (the stitched-series
    /// invariant). Bins are anchored at the first timestamp; empty bins produce no
    /// output sample. The binned uncertainty is the propagated error of the mean
    /// when every member has one, NaN otherwise.
    ///
    /// Arguments
    /// ---------
    /// * `width`: bin width in days, strictly positive
    ///
    /// Return
    /// ------
    /// * The binned series, or [`ExohuntError::InvalidBinWidth`] for a
    ///   non-positive width.
    pub fn bin(&self, width: Days) -> Result<LightCurve, ExohuntError> {
        if !(width > 0.0) {
            return Err(ExohuntError::InvalidBinWidth(width));
        }
        if self.is_empty() {
            return Ok(LightCurve::default());
        }

        let t0 = self.time[0];
        let mut out = LightCurve::default();

        let mut current_bin = 0i64;
        let mut acc = BinAccumulator::default();
        for (&t, &f, &e) in izip!(&self.time, &self.flux, &self.flux_err) {
            let bin = ((t - t0) / width).floor() as i64;
            if bin != current_bin && !acc.is_empty() {
                acc.flush_into(&mut out);
                acc = BinAccumulator::default();
            }
            current_bin = bin;
            acc.push(t, f, e);
        }
        acc.flush_into(&mut out);

        Ok(out)
    }

    /// Discard statistical outliers by sigma-clipping around the median.
    ///
    /// Samples farther than `sigma` standard deviations from the median flux are
    /// dropped. When the scatter is zero or undefined the series is returned
    /// unchanged.
    pub fn remove_outliers(&self, sigma: f64) -> LightCurve {
        let center = stats::median(&self.flux);
        let scatter = stats::std_dev(&self.flux);
        if !center.is_finite() || !scatter.is_finite() || scatter == 0.0 {
            return self.clone();
        }

        let mut out = LightCurve::default();
        for (&t, &f, &e) in izip!(&self.time, &self.flux, &self.flux_err) {
            if (f - center).abs() <= sigma * scatter {
                out.time.push(t);
                out.flux.push(f);
                out.flux_err.push(e);
            }
        }
        out
    }
}

/// Running sums for one time bin.
#[derive(Default)]
struct BinAccumulator {
    n: usize,
    time_sum: f64,
    flux_sum: f64,
    err_sq_sum: f64,
    all_errs_finite: bool,
}

impl BinAccumulator {
    fn is_empty(&self) -> bool {
        self.n == 0
    }

    fn push(&mut self, t: f64, f: f64, e: f64) {
        if self.n == 0 {
            self.all_errs_finite = true;
        }
        self.n += 1;
        self.time_sum += t;
        self.flux_sum += f;
        if e.is_finite() {
            self.err_sq_sum += e * e;
        } else {
            self.all_errs_finite = false;
        }
    }

    fn flush_into(&self, out: &mut LightCurve) {
        if self.n == 0 {
            return;
        }
        let n = self.n as f64;
        out.time.push(self.time_sum / n);
        out.flux.push(self.flux_sum / n);
        out.flux_err.push(if self.all_errs_finite {
            self.err_sq_sum.sqrt() / n
        } else {
            f64::NAN
        });
    }
}
