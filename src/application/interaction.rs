// Interaction engine - pointer hit-testing against prepared geometry
use crate::application::label_format::{format_timestamp, format_two_decimals, zone};
use crate::domain::display::DisplayConfig;
use crate::domain::geometry::{HoverState, PreparedGeometry};
use chrono::FixedOffset;

/// Builds hover labels: `<timestamp> • <value>[ <unit>]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverLabeler {
    unit: Option<String>,
    zone: FixedOffset,
}

impl HoverLabeler {
    pub fn new(unit: Option<String>, utc_offset_minutes: i32) -> Self {
        Self {
            unit: unit.filter(|u| !u.is_empty()),
            zone: zone(utc_offset_minutes),
        }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.unit.clone(), config.utc_offset_minutes)
    }

    pub fn label(&self, epoch_ms: i64, value: f64) -> String {
        let timestamp = format_timestamp(epoch_ms, self.zone);
        let value = format_two_decimals(value);
        match &self.unit {
            Some(unit) => format!("{} • {} {}", timestamp, value, unit),
            None => format!("{} • {}", timestamp, value),
        }
    }
}

/// Convert a pointer position on the rendered surface to canvas units.
pub fn to_canvas_x(pointer_x: f64, surface_width: f64, canvas_width: f64) -> f64 {
    if surface_width <= 0.0 {
        return pointer_x;
    }
    pointer_x / surface_width * canvas_width
}

/// Index of the x closest to `target`; ties keep the earliest.
pub fn nearest_index<I>(xs: I, target: f64) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, x) in xs.into_iter().enumerate() {
        let distance = (x - target).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Hover for a pointer at canvas x, or `None` when the pointer is outside the
/// plot's horizontal bounds or there is nothing to hit.
pub fn hit_test(
    geometry: &PreparedGeometry,
    pointer_x: f64,
    labeler: &HoverLabeler,
) -> Option<HoverState> {
    if geometry.is_empty() || !geometry.canvas().contains_x(pointer_x) {
        return None;
    }

    let scale = &geometry.scale;
    let index = nearest_index(
        geometry.points.iter().map(|p| scale.screen_x(p.epoch_ms as f64)),
        pointer_x,
    )?;
    let point = &geometry.points[index];

    Some(HoverState {
        screen_x: scale.screen_x(point.epoch_ms as f64),
        screen_y: scale.screen_y(point.value),
        epoch_ms: point.epoch_ms,
        value: point.value,
        label: labeler.label(point.epoch_ms, point.value),
    })
}
