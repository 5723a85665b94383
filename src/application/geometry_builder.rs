// Geometry builder - turns a series into paths, ticks and scales
use crate::application::downsample::filter_and_downsample;
use crate::application::extent::{extent, value_extent};
use crate::application::label_format::{format_time_label, format_y_value, zone};
use crate::domain::display::DisplayConfig;
use crate::domain::geometry::{Canvas, Extent, PreparedGeometry, Scale, TimeTick, YTick};
use crate::domain::telemetry::{ChartPoint, Sample};
use chrono::FixedOffset;

const Y_TICK_COUNT: usize = 6;
const MIN_TIME_INTERVALS: usize = 3;
const MAX_TIME_INTERVALS: usize = 8;
/// Horizontal pixels reserved per time-axis interval.
const TIME_TICK_SPACING: f64 = 100.0;

/// Build the complete geometry for one render cycle.
pub fn prepare(series: &[Sample], config: &DisplayConfig) -> PreparedGeometry {
    let canvas = Canvas::for_height(config.height);
    let points = filter_and_downsample(series, config.max_data_points);

    if points.is_empty() {
        return empty_geometry(canvas, config);
    }

    let x_extent = extent(points.iter().map(|p| p.epoch_ms as f64));
    let y_extent = value_extent(points.iter().map(|p| p.value));
    let scale = Scale::new(canvas, x_extent, y_extent);

    let screen_points = project(&points, &scale);
    let path = smooth_path(&screen_points);
    let area = if config.show_area {
        area_path(&screen_points, canvas.baseline())
    } else {
        String::new()
    };

    tracing::debug!(
        "Prepared geometry: {} of {} samples, x=[{}, {}], y=[{}, {}]",
        points.len(),
        series.len(),
        x_extent.min,
        x_extent.max,
        y_extent.min,
        y_extent.max
    );

    PreparedGeometry {
        path,
        area,
        y_ticks: y_ticks(&scale),
        time_ticks: time_ticks(&scale, zone(config.utc_offset_minutes)),
        scale,
        points,
        color: config.color.clone(),
        show_grid: config.show_grid,
    }
}

/// Geometry with no points. The canvas keeps the width derived from the
/// configured height (`max(1000, 2 * height)`), not a fixed 1000, so an empty
/// chart has the same view box as a populated one at that height.
fn empty_geometry(canvas: Canvas, config: &DisplayConfig) -> PreparedGeometry {
    PreparedGeometry {
        path: String::new(),
        area: String::new(),
        y_ticks: Vec::new(),
        time_ticks: Vec::new(),
        scale: Scale::new(canvas, Extent::UNIT, Extent::UNIT),
        points: Vec::new(),
        color: config.color.clone(),
        show_grid: config.show_grid,
    }
}

fn project(points: &[ChartPoint], scale: &Scale) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| (scale.screen_x(p.epoch_ms as f64), scale.screen_y(p.value)))
        .collect()
}

/// Path through `points`: a straight first segment, then quadratic curves
/// whose control point sits halfway along x at the previous point's height.
pub fn smooth_path(points: &[(f64, f64)]) -> String {
    if points.len() < 2 {
        return String::new();
    }

    let (x0, y0) = points[0];
    let (x1, y1) = points[1];
    let mut path = format!("M {} {} L {} {}", x0, y0, x1, y1);

    for pair in points[1..].windows(2) {
        let (px, py) = pair[0];
        let (cx, cy) = pair[1];
        let control_x = px + (cx - px) * 0.5;
        path.push_str(&format!(" Q {} {} {} {}", control_x, py, cx, cy));
    }

    path
}

/// The smoothed path closed down to `baseline` and back to the first x.
pub fn area_path(points: &[(f64, f64)], baseline: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    if points.len() < 2 {
        return String::new();
    }

    format!(
        "{} L {} {} L {} {} Z",
        smooth_path(points),
        last.0,
        baseline,
        first.0,
        baseline
    )
}

/// Six evenly spaced ticks from `y.min` to `y.max` inclusive.
pub fn y_ticks(scale: &Scale) -> Vec<YTick> {
    let intervals = (Y_TICK_COUNT - 1) as f64;
    (0..Y_TICK_COUNT)
        .map(|i| {
            let value = scale.y.lerp(i as f64 / intervals);
            YTick {
                screen_y: scale.screen_y(value),
                value,
                label: format_y_value(value),
            }
        })
        .collect()
}

/// Number of time-axis intervals that fit the plot width.
pub fn time_interval_count(inner_width: f64) -> usize {
    let fitting = (inner_width / TIME_TICK_SPACING).floor().max(0.0) as usize;
    fitting.clamp(MIN_TIME_INTERVALS, MAX_TIME_INTERVALS)
}

/// Evenly spaced time ticks, one more than the interval count. The label
/// layout depends on the total span of the time extent.
pub fn time_ticks(scale: &Scale, zone: FixedOffset) -> Vec<TimeTick> {
    let inner_width = scale.canvas.inner_width();
    let intervals = time_interval_count(inner_width);
    let span = scale.x.span();

    (0..=intervals)
        .map(|i| {
            let ratio = i as f64 / intervals as f64;
            let epoch_ms = scale.x.lerp(ratio);
            TimeTick {
                screen_x: scale.canvas.padding.left + inner_width * ratio,
                epoch_ms,
                label: format_time_label(epoch_ms, span, zone),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly(values: &[f64]) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(format!("2026-10-19T{:02}:00:00Z", i), *v))
            .collect()
    }

    #[test]
    fn test_empty_series() {
        let geometry = prepare(&[], &DisplayConfig::default());
        assert_eq!(geometry.path, "");
        assert_eq!(geometry.area, "");
        assert!(geometry.y_ticks.is_empty());
        assert!(geometry.time_ticks.is_empty());
        assert_eq!(geometry.x_extent(), Extent::UNIT);
        assert_eq!(geometry.y_extent(), Extent::UNIT);
        assert_eq!(geometry.canvas().width, 1000.0);
        assert_eq!(geometry.canvas().height, 400.0);
    }

    #[test]
    fn test_empty_series_keeps_derived_width() {
        let config = DisplayConfig::default().with_height(800.0);
        let geometry = prepare(&[], &config);
        assert_eq!(geometry.canvas().width, 1600.0);
        assert_eq!(geometry.canvas().height, 800.0);

        let filtered = prepare(&hourly(&[-1.0, -2.0]), &config);
        assert_eq!(filtered.canvas(), geometry.canvas());
    }

    #[test]
    fn test_all_negative_series_is_empty() {
        let geometry = prepare(&hourly(&[-1.0, -1.0, -3.0]), &DisplayConfig::default());
        assert!(geometry.is_empty());
        assert_eq!(geometry.path, "");
        assert_eq!(geometry.y_extent(), Extent::UNIT);
    }

    #[test]
    fn test_single_point() {
        let geometry = prepare(&hourly(&[20.0]), &DisplayConfig::default());
        assert_eq!(geometry.path, "");
        assert_eq!(geometry.area, "");
        assert_eq!(geometry.points.len(), 1);
        assert!(geometry.y_extent().span() > 0.0);
        assert!(geometry.x_extent().span() > 0.0);
        assert_eq!(geometry.y_ticks.len(), 6);
    }

    #[test]
    fn test_two_points_straight_line() {
        let path = smooth_path(&[(60.0, 100.0), (950.0, 20.0)]);
        assert_eq!(path, "M 60 100 L 950 20");
    }

    #[test]
    fn test_quadratic_control_points() {
        let path = smooth_path(&[(0.0, 10.0), (10.0, 20.0), (30.0, 5.0), (34.0, 7.5)]);
        assert_eq!(
            path,
            "M 0 10 L 10 20 Q 20 20 30 5 Q 32 5 34 7.5"
        );
    }

    #[test]
    fn test_area_closes_to_baseline() {
        let area = area_path(&[(60.0, 100.0), (950.0, 20.0)], 370.0);
        assert_eq!(area, "M 60 100 L 950 20 L 950 370 L 60 370 Z");
        assert_eq!(area_path(&[(60.0, 100.0)], 370.0), "");
        assert_eq!(area_path(&[], 370.0), "");
    }

    #[test]
    fn test_path_empty_iff_fewer_than_two_points() {
        let config = DisplayConfig::default();
        assert!(prepare(&hourly(&[1.0]), &config).path.is_empty());
        assert!(prepare(&hourly(&[1.0, -1.0, -1.0]), &config).path.is_empty());
        assert!(!prepare(&hourly(&[1.0, -1.0, 2.0]), &config).path.is_empty());
    }

    #[test]
    fn test_area_follows_show_area() {
        let series = hourly(&[1.0, 2.0, 3.0]);
        let with_area = prepare(&series, &DisplayConfig::default());
        assert!(with_area.area.starts_with(&with_area.path));
        assert!(with_area.area.ends_with(" Z"));

        let without = prepare(&series, &DisplayConfig::default().with_area(false));
        assert_eq!(without.area, "");
        assert_eq!(without.path, with_area.path);
    }

    #[test]
    fn test_path_spans_plot_horizontally() {
        let geometry = prepare(&hourly(&[4.0, 8.0, 6.0]), &DisplayConfig::default());
        let first = geometry.scale.screen_x(geometry.points[0].epoch_ms as f64);
        let last = geometry.scale.screen_x(geometry.points[2].epoch_ms as f64);
        // 5% padding on a 2h extent keeps points inside the plot
        assert!(first > 60.0 && first < 110.0);
        assert!(last < 950.0 && last > 900.0);
        assert!(geometry.path.starts_with(&format!("M {} ", first)));
    }

    #[test]
    fn test_y_ticks_always_six() {
        let config = DisplayConfig::default();
        for len in [1usize, 2, 10, 500, 3000] {
            let values: Vec<f64> = (0..len).map(|i| (i % 17) as f64).collect();
            let series: Vec<Sample> = values
                .iter()
                .enumerate()
                .map(|(i, v)| Sample::new(format!("2026-10-19T00:00:{:02}Z", i % 60), *v))
                .collect();
            assert_eq!(prepare(&series, &config).y_ticks.len(), 6);
        }
    }

    #[test]
    fn test_y_ticks_span_extent() {
        let geometry = prepare(&hourly(&[0.0, 100.0]), &DisplayConfig::default());
        let ticks = &geometry.y_ticks;
        assert_eq!(ticks[0].value, 0.0);
        assert_eq!(ticks[0].screen_y, geometry.canvas().baseline());
        assert!((ticks[5].value - 105.0).abs() < 1e-9);
        assert!((ticks[5].screen_y - 10.0).abs() < 1e-9);
        assert_eq!(ticks[1].label, "21");
        assert_eq!(ticks[0].label, "0");
    }

    #[test]
    fn test_constant_series_scenario() {
        let geometry = prepare(&hourly(&[5.0, 5.0, 5.0]), &DisplayConfig::default());
        assert!(!geometry.area.is_empty());
        assert!((geometry.y_extent().min - 4.5).abs() < 1e-9);
        assert!((geometry.y_extent().max - 5.5).abs() < 1e-9);

        // the clamped extent stays non-degenerate, so ticks never collapse
        let ys: Vec<f64> = geometry.y_ticks.iter().map(|t| t.screen_y).collect();
        assert!(ys.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_constant_zero_series_clamps_then_stays_distinct() {
        let geometry = prepare(&hourly(&[0.0, 0.0]), &DisplayConfig::default());
        assert_eq!(geometry.y_extent().min, 0.0);
        assert!((geometry.y_extent().max - 0.1).abs() < 1e-12);
        assert_ne!(geometry.y_extent().min, geometry.y_extent().max);

        let ys: Vec<f64> = geometry.y_ticks.iter().map(|t| t.screen_y).collect();
        assert!(ys.windows(2).all(|w| w[0] > w[1]));
        // points sit on the baseline
        assert_eq!(geometry.scale.screen_y(0.0), geometry.canvas().baseline());
    }

    #[test]
    fn test_degenerate_scale_collapses_ticks_to_centre() {
        let scale = Scale::new(
            Canvas::for_height(400.0),
            Extent::new(0.0, 1.0),
            Extent::new(3.0, 3.0),
        );
        let ticks = y_ticks(&scale);
        assert!(ticks.iter().all(|t| t.screen_y == 190.0));
    }

    #[test]
    fn test_time_interval_count() {
        assert_eq!(time_interval_count(890.0), 8);
        assert_eq!(time_interval_count(250.0), 3);
        assert_eq!(time_interval_count(550.0), 5);
        assert_eq!(time_interval_count(5000.0), 8);
        assert_eq!(time_interval_count(-10.0), 3);
    }

    #[test]
    fn test_time_ticks() {
        let geometry = prepare(&hourly(&[1.0, 2.0, 3.0, 4.0]), &DisplayConfig::default());
        let ticks = &geometry.time_ticks;
        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks[0].screen_x, 60.0);
        assert_eq!(ticks[8].screen_x, 950.0);
        assert_eq!(ticks[0].epoch_ms, geometry.x_extent().min);
        assert!((ticks[8].epoch_ms - geometry.x_extent().max).abs() < 1e-3);
        // 3h of data padded to 3.3h -> clock labels
        assert!(ticks.iter().all(|t| t.label.len() == 5 && t.label.contains(':')));
        assert_eq!(ticks[4].label, "01:30");
    }

    #[test]
    fn test_time_tick_labels_follow_offset() {
        let config = DisplayConfig {
            utc_offset_minutes: 180,
            ..DisplayConfig::default()
        };
        let geometry = prepare(&hourly(&[1.0, 2.0, 3.0, 4.0]), &config);
        assert_eq!(geometry.time_ticks[4].label, "04:30");
    }

    #[test]
    fn test_downsampled_points_are_consistent_with_scale() {
        let series: Vec<Sample> = (0..5000)
            .map(|i| {
                let t = chrono::DateTime::from_timestamp(1_792_368_000 + i * 10, 0).unwrap();
                Sample::new(t.to_rfc3339(), (i % 100) as f64)
            })
            .collect();
        let config = DisplayConfig::default().with_max_data_points(500);
        let geometry = prepare(&series, &config);
        assert_eq!(geometry.points.len(), 500);
        for p in &geometry.points {
            let x = geometry.scale.screen_x(p.epoch_ms as f64);
            assert!(geometry.canvas().contains_x(x));
        }
    }

    #[test]
    fn test_unordered_input_does_not_panic() {
        let series = vec![
            Sample::new("2026-10-19T05:00:00Z", 3.0),
            Sample::new("2026-10-19T01:00:00Z", 7.0),
            Sample::new("2026-10-19T03:00:00Z", 1.0),
        ];
        let geometry = prepare(&series, &DisplayConfig::default());
        assert_eq!(geometry.points.len(), 3);
        assert!(!geometry.path.is_empty());
    }
}
