// Axis and hover label formatting
use chrono::{DateTime, FixedOffset, Offset, Utc};

const MS_PER_HOUR: f64 = 1000.0 * 60.0 * 60.0;

/// Label layout for time ticks, picked from the total span of the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLabelFormat {
    /// `HH:MM`, spans up to one day
    Clock,
    /// `DD.MM HH:MM`, spans up to one week
    DayClock,
    /// `DD.MM`
    Day,
}

impl TimeLabelFormat {
    pub fn for_span(span_ms: f64) -> Self {
        let hours = span_ms / MS_PER_HOUR;
        if hours <= 24.0 {
            TimeLabelFormat::Clock
        } else if hours <= 168.0 {
            TimeLabelFormat::DayClock
        } else {
            TimeLabelFormat::Day
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            TimeLabelFormat::Clock => "%H:%M",
            TimeLabelFormat::DayClock => "%d.%m %H:%M",
            TimeLabelFormat::Day => "%d.%m",
        }
    }
}

/// Fixed offset for `minutes` east of UTC, falling back to UTC when out of range.
pub fn zone(offset_minutes: i32) -> FixedOffset {
    offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

fn local_time(epoch_ms: f64, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if !epoch_ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(epoch_ms.trunc() as i64).map(|t| t.with_timezone(&zone))
}

pub fn format_time_label(epoch_ms: f64, span_ms: f64, zone: FixedOffset) -> String {
    local_time(epoch_ms, zone)
        .map(|t| t.format(TimeLabelFormat::for_span(span_ms).pattern()).to_string())
        .unwrap_or_default()
}

/// Full timestamp used in hover labels, e.g. `19.10.2026, 14:05:09`.
pub fn format_timestamp(epoch_ms: i64, zone: FixedOffset) -> String {
    local_time(epoch_ms as f64, zone)
        .map(|t| t.format("%d.%m.%Y, %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Y-axis tick label.
///
/// Zero prints as `0`, very small or very large magnitudes switch to
/// exponential notation with two fraction digits, integers print without
/// decimals and everything else is rounded to two decimals with trailing
/// zeros removed.
pub fn format_y_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude < 0.01 || magnitude > 1_000_000.0 {
        return format_exponential(value);
    }

    if value.fract() == 0.0 {
        return format!("{}", value);
    }

    let fixed = format_two_decimals(value);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Two fraction digits, rounding exact halfway cases away from zero.
///
/// The only binary values that sit exactly halfway between two hundredths
/// are odd multiples of 1/8 (`0.125`, `12.375`, ...); `{:.2}` would round
/// those to even.
pub fn format_two_decimals(value: f64) -> String {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return format!("{:.2}", (value * 100.0).round() / 100.0);
    }
    format!("{:.2}", value)
}

/// `d.dde±N`
fn format_exponential(value: f64) -> String {
    let formatted = format!("{:.2e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}
