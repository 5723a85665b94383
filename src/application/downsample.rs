// Sample filtering and stride decimation
use crate::domain::telemetry::{ChartPoint, Sample};

/// Drop invalid readings and decimate to at most `max_points` samples.
///
/// Decimation keeps every `ceil(len / max_points)`-th sample starting at the
/// first one, so order is preserved and the first valid sample always
/// survives. No averaging takes place.
pub fn filter_and_downsample(series: &[Sample], max_points: usize) -> Vec<ChartPoint> {
    let valid: Vec<ChartPoint> = series
        .iter()
        .filter(|s| s.is_valid_reading())
        .filter_map(|s| match s.epoch_ms() {
            Some(t) => Some(ChartPoint::new(t, s.clone())),
            None => {
                tracing::warn!("Dropping sample with unparseable timestamp: {}", s.time);
                None
            }
        })
        .collect();

    let dropped = series.len() - valid.len();
    if dropped > 0 {
        tracing::debug!("Filtered out {} of {} samples", dropped, series.len());
    }

    decimate(valid, max_points)
}

fn decimate<T>(points: Vec<T>, max_points: usize) -> Vec<T> {
    let max_points = max_points.max(1);
    if points.len() <= max_points {
        return points;
    }

    let stride = points.len().div_ceil(max_points);
    points.into_iter().step_by(stride).collect()
}
