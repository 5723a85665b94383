// Telemetry field presets
use super::display::DisplayConfig;
use serde::{Deserialize, Serialize};

/// Presentation defaults for a known telemetry field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPreset {
    pub key: String,
    pub label: String,
    pub color: String,
    pub unit: String,
}

impl FieldPreset {
    pub fn new(key: &str, label: &str, color: &str, unit: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            unit: unit.to_string(),
        }
    }

    /// Copy the preset's color and unit onto a display config.
    pub fn decorate(&self, mut config: DisplayConfig) -> DisplayConfig {
        config.color = self.color.clone();
        if !self.unit.is_empty() {
            config.unit = Some(self.unit.clone());
        }
        config
    }
}

pub fn default_presets() -> Vec<FieldPreset> {
    vec![
        FieldPreset::new("speed", "Скорость", "#4c8cff", "км/ч"),
        FieldPreset::new("fls485_level_1", "Уровень топлива 1", "#ff6b6b", "ед."),
        FieldPreset::new("fls485_level_2", "Уровень топлива 2", "#b56cff", "ед."),
        FieldPreset::new("main_power_voltage", "Бортсеть", "#1ca67a", "В"),
    ]
}

pub fn find_preset<'a>(presets: &'a [FieldPreset], key: &str) -> Option<&'a FieldPreset> {
    presets.iter().find(|p| p.key == key)
}
