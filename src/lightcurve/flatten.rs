//! Long-term trend removal (flattening).
//!
//! Stellar variability and instrumental drift put slow trends on top of the
//! transit signal. Flattening estimates that trend with a Savitzky–Golay-style
//! moving polynomial fit and divides it out, leaving the short transient dips
//! intact on a flat baseline near 1.0.
//!
//! The local fits assume roughly uniform sampling, which holds after the
//! fixed-width binning stage. The fitted-value weights for a whole window are
//! precomputed once as the projection matrix `A (AᵀA)⁻¹ Aᵀ` of the window's
//! Vandermonde design matrix, so the per-sample work is a dot product.

use nalgebra::DMatrix;

use crate::exohunt_errors::ExohuntError;
use crate::lightcurve::LightCurve;

/// Parameters of the moving polynomial detrending.
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Window length in samples. Clamped to the series length and forced odd.
    pub window_length: usize,
    /// Degree of the local polynomial.
    pub polyorder: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            window_length: 101,
            polyorder: 2,
        }
    }
}

/// Remove the long-term trend from `lc` by dividing out a moving polynomial fit.
///
/// Samples whose fitted trend is non-finite or zero are dropped. A series too
/// short for any local fit falls back to dividing by its median.
///
/// Arguments
/// ---------
/// * `lc`: the input series, sorted by time
/// * `config`: window length and polynomial degree
///
/// Return
/// ------
/// * The flattened series, or an error when the input is empty or the window
///   degenerates.
pub fn flatten(lc: &LightCurve, config: &FlattenConfig) -> Result<LightCurve, ExohuntError> {
    if lc.is_empty() {
        return Err(ExohuntError::EmptySeries("flattening"));
    }

    let n = lc.len();
    let mut window = config.window_length.min(n).max(1);
    if window % 2 == 0 {
        window -= 1;
    }
    if window <= config.polyorder + 1 {
        // Too few samples for a local fit: the median is the whole trend.
        return lc.normalize();
    }

    let smoothing = smoothing_matrix(window, config.polyorder)?;
    let half = window / 2;

    let mut out = LightCurve::default();
    for i in 0..n {
        // Interior windows are centered; edge windows slide inward and the fit
        // is evaluated off-center.
        let start = i.saturating_sub(half).min(n - window);
        let row = i - start;

        let mut trend = 0.0;
        for k in 0..window {
            trend += smoothing[(row, k)] * lc.flux[start + k];
        }

        if trend.is_finite() && trend != 0.0 {
            out.time.push(lc.time[i]);
            out.flux.push(lc.flux[i] / trend);
            out.flux_err.push(lc.flux_err[i] / trend.abs());
        }
    }

    Ok(out)
}

/// Projection matrix of a `window`-sample least-squares polynomial fit.
///
/// Row `r` holds the weights that evaluate the fitted polynomial at window
/// position `r`, so `H · y` smooths a whole window at once.
fn smoothing_matrix(window: usize, order: usize) -> Result<DMatrix<f64>, ExohuntError> {
    let half = (window / 2) as i64;
    let mut design = DMatrix::<f64>::zeros(window, order + 1);
    for i in 0..window {
        let x = (i as i64 - half) as f64;
        for j in 0..=order {
            design[(i, j)] = x.powi(j as i32);
        }
    }

    let normal = design.transpose() * &design;
    let inverse = normal
        .try_inverse()
        .ok_or(ExohuntError::DegenerateFlattenWindow { window, order })?;

    Ok(&design * inverse * design.transpose())
}
