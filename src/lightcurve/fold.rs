//! Phase folding.
//!
//! Folding re-expresses timestamps modulo a candidate period, anchored at a
//! transit epoch, so that every transit occurrence lands on the same phase. The
//! folded view is the visual confirmation (or refutation) of a periodic dip.

use itertools::izip;

use crate::constants::Days;
use crate::exohunt_errors::ExohuntError;
use crate::lightcurve::LightCurve;

/// A phase-aligned view of a cleaned series, sorted by phase.
///
/// Phases are in days, in `[-period/2, period/2)`, with the transit epoch mapping
/// to phase zero.
#[derive(Debug, Clone)]
pub struct FoldedLightCurve {
    pub phase: Vec<Days>,
    pub flux: Vec<f64>,
    pub flux_err: Vec<f64>,
    pub period: Days,
    pub epoch: Days,
}

impl FoldedLightCurve {
    pub fn len(&self) -> usize {
        self.phase.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phase.is_empty()
    }
}

/// Fold a series at `period`, anchored so that `epoch` maps to phase zero.
///
/// Arguments
/// ---------
/// * `lc`: the series to fold
/// * `period`: folding period in days, strictly positive
/// * `epoch`: reference mid-transit time in days
///
/// Return
/// ------
/// * The folded series, or [`ExohuntError::InvalidFoldPeriod`] for a
///   non-positive period.
pub fn fold(lc: &LightCurve, period: Days, epoch: Days) -> Result<FoldedLightCurve, ExohuntError> {
    if !(period > 0.0) {
        return Err(ExohuntError::InvalidFoldPeriod(period));
    }

    let mut samples: Vec<(Days, f64, f64)> = izip!(&lc.time, &lc.flux, &lc.flux_err)
        .map(|(&t, &f, &e)| (phase_of(t, period, epoch), f, e))
        .collect();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut folded = FoldedLightCurve {
        phase: Vec::with_capacity(samples.len()),
        flux: Vec::with_capacity(samples.len()),
        flux_err: Vec::with_capacity(samples.len()),
        period,
        epoch,
    };
    for (p, f, e) in samples {
        folded.phase.push(p);
        folded.flux.push(f);
        folded.flux_err.push(e);
    }
    Ok(folded)
}

/// Phase of one timestamp, in days, in `[-period/2, period/2)`.
fn phase_of(t: Days, period: Days, epoch: Days) -> Days {
    (t - epoch + period / 2.0).rem_euclid(period) - period / 2.0
}

#[cfg(test)]
mod fold_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_epoch_maps_to_phase_zero() {
        assert_relative_eq!(phase_of(7.25, 2.5, 7.25), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_folding_is_periodic() {
        // Timestamps an exact multiple of the period apart share a phase.
        let period = 3.7;
        let epoch = 1.2;
        for k in 1..5 {
            let t = 2.9;
            let shifted = t + k as f64 * period;
            assert_relative_eq!(
                phase_of(t, period, epoch),
                phase_of(shifted, period, epoch),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_phase_range_is_half_open_around_zero() {
        let period = 2.0;
        for t in [0.0, 0.49, 0.99, 1.0, 1.5, 7.3] {
            let p = phase_of(t, period, 0.0);
            assert!((-period / 2.0..period / 2.0).contains(&p), "phase {p}");
        }
    }

    #[test]
    fn test_fold_sorts_by_phase() {
        let lc = LightCurve::without_errors(
            vec![0.0, 0.6, 1.2, 1.8, 2.4],
            vec![1.0, 0.99, 1.01, 1.0, 0.98],
        )
        .unwrap();
        let folded = fold(&lc, 1.0, 0.0).unwrap();

        assert_eq!(folded.len(), 5);
        assert!(folded.phase.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_non_positive_period_is_rejected() {
        let lc = LightCurve::without_errors(vec![0.0], vec![1.0]).unwrap();
        assert!(matches!(
            fold(&lc, 0.0, 0.0),
            Err(ExohuntError::InvalidFoldPeriod(_))
        ));
    }
}
