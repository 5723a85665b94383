// Display configuration for one chart
use serde::{Deserialize, Serialize};

pub const DEFAULT_HEIGHT: f64 = 400.0;
pub const DEFAULT_MAX_DATA_POINTS: usize = 1000;
pub const DEFAULT_COLOR: &str = "#4c8cff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Canvas height in pixels
    pub height: f64,
    pub max_data_points: usize,
    pub show_area: bool,
    pub show_grid: bool,
    pub color: String,
    /// Suffix appended to hover labels
    pub unit: Option<String>,
    /// Fixed offset used for time-tick labels and hover timestamps
    pub utc_offset_minutes: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            max_data_points: DEFAULT_MAX_DATA_POINTS,
            show_area: true,
            show_grid: true,
            color: DEFAULT_COLOR.to_string(),
            unit: None,
            utc_offset_minutes: 0,
        }
    }
}

impl DisplayConfig {
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_max_data_points(mut self, max_data_points: usize) -> Self {
        self.max_data_points = max_data_points;
        self
    }

    pub fn with_area(mut self, show_area: bool) -> Self {
        self.show_area = show_area;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Partial display configuration as sent by clients; unset fields fall back
/// to the configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayOverrides {
    pub height: Option<f64>,
    pub max_data_points: Option<usize>,
    pub show_area: Option<bool>,
    pub show_grid: Option<bool>,
    pub color: Option<String>,
    pub unit: Option<String>,
    pub utc_offset_minutes: Option<i32>,
}

impl DisplayOverrides {
    pub fn apply(self, base: DisplayConfig) -> DisplayConfig {
        DisplayConfig {
            height: self.height.unwrap_or(base.height),
            max_data_points: self.max_data_points.unwrap_or(base.max_data_points),
            show_area: self.show_area.unwrap_or(base.show_area),
            show_grid: self.show_grid.unwrap_or(base.show_grid),
            color: self.color.unwrap_or(base.color),
            unit: self.unit.or(base.unit),
            utc_offset_minutes: self.utc_offset_minutes.unwrap_or(base.utc_offset_minutes),
        }
    }
}
