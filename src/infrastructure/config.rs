use crate::domain::display::{DEFAULT_COLOR, DEFAULT_HEIGHT, DEFAULT_MAX_DATA_POINTS, DisplayConfig};
use crate::domain::field::{FieldPreset, default_presets};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub chart: ChartSettings,
    #[serde(default = "default_presets")]
    pub fields: Vec<FieldPreset>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    pub height: f64,
    pub max_data_points: usize,
    pub show_area: bool,
    pub show_grid: bool,
    pub color: String,
    pub debounce_ms: u64,
    pub utc_offset_minutes: i32,
    pub compress_responses: bool,
}

impl ChartSettings {
    pub fn display_defaults(&self) -> DisplayConfig {
        DisplayConfig {
            height: self.height,
            max_data_points: self.max_data_points,
            show_area: self.show_area,
            show_grid: self.show_grid,
            color: self.color.clone(),
            unit: None,
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn builder_with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("chart.height", DEFAULT_HEIGHT)?
        .set_default("chart.max_data_points", DEFAULT_MAX_DATA_POINTS as u64)?
        .set_default("chart.show_area", true)?
        .set_default("chart.show_grid", true)?
        .set_default("chart.color", DEFAULT_COLOR)?
        .set_default("chart.debounce_ms", 50_i64)?
        .set_default("chart.utc_offset_minutes", 0_i64)?
        .set_default("chart.compress_responses", true)?)
}

/// Load `config/chart.toml` (optional) overlaid with `TELEMETRY_CHART_*`
/// environment variables, e.g. `TELEMETRY_CHART_SERVER__PORT=9000`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder_with_defaults()?
        .add_source(File::with_name("config/chart").required(false))
        .add_source(
            Environment::with_prefix("TELEMETRY_CHART")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
