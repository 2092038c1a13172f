//! Elapsed-time prediction at an arbitrary lap distance

use super::samples::{Distance, LapSamples};

/// Predict the elapsed time a lap had reached at `target_distance`.
///
/// Linear interpolation between the nearest sample at or before the target
/// and the next sample after it. Past the last sample the last value is held
/// (flat extrapolation). Returns `None` when no sample lies at or before the
/// target, i.e. nothing can be compared yet.
pub fn predict(samples: &LapSamples, target_distance: f32) -> Option<u32> {
    let target = Distance::new(target_distance)?;
    let lower = samples.at_or_before(target)?;

    let Some(upper) = samples.after(target) else {
        return Some(lower.elapsed_ms);
    };

    let span = f64::from(upper.distance) - f64::from(lower.distance);
    if span <= 0.0 {
        return Some(lower.elapsed_ms);
    }

    let slope = (f64::from(upper.elapsed_ms) - f64::from(lower.elapsed_ms)) / span;
    let predicted =
        f64::from(lower.elapsed_ms) + slope * (f64::from(target_distance) - f64::from(lower.distance));

    Some(predicted.round().clamp(0.0, f64::from(u32::MAX)) as u32)
}
