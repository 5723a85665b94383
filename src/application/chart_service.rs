// Chart service - Use case for preparing chart geometry
use crate::application::geometry_builder::prepare;
use crate::domain::display::{DisplayConfig, DisplayOverrides};
use crate::domain::field::{FieldPreset, find_preset};
use crate::domain::geometry::PreparedGeometry;
use crate::domain::telemetry::Sample;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

struct CachedGeometry {
    key: u64,
    series: Vec<Sample>,
    config: DisplayConfig,
    geometry: Arc<PreparedGeometry>,
}

#[derive(Clone)]
pub struct ChartService {
    defaults: DisplayConfig,
    presets: Arc<Vec<FieldPreset>>,
    last: Arc<Mutex<Option<CachedGeometry>>>,
}

impl ChartService {
    pub fn new(defaults: DisplayConfig, presets: Vec<FieldPreset>) -> Self {
        Self {
            defaults,
            presets: Arc::new(presets),
            last: Arc::new(Mutex::new(None)),
        }
    }

    pub fn presets(&self) -> &[FieldPreset] {
        &self.presets
    }

    /// Configured defaults, decorated by the field preset (if any), then
    /// overridden by whatever the caller set explicitly.
    pub fn resolve_config(&self, field: Option<&str>, overrides: DisplayOverrides) -> DisplayConfig {
        let mut base = self.defaults.clone();
        if let Some(key) = field {
            match find_preset(&self.presets, key) {
                Some(preset) => base = preset.decorate(base),
                None => tracing::debug!("No preset for field {}", key),
            }
        }
        overrides.apply(base)
    }

    /// Build geometry for `series`, reusing the previous result when the
    /// input is identical to the last call.
    pub fn prepare(&self, series: &[Sample], config: &DisplayConfig) -> Arc<PreparedGeometry> {
        let key = cache_key(series, config);

        {
            let last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = last.as_ref() {
                if cached.key == key && cached.config == *config && cached.series == series {
                    tracing::debug!("Reusing prepared geometry for {} samples", series.len());
                    return Arc::clone(&cached.geometry);
                }
            }
        }

        let geometry = Arc::new(prepare(series, config));

        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        *last = Some(CachedGeometry {
            key,
            series: series.to_vec(),
            config: config.clone(),
            geometry: Arc::clone(&geometry),
        });

        geometry
    }
}

fn cache_key(series: &[Sample], config: &DisplayConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    series.len().hash(&mut hasher);
    for sample in series {
        sample.time.hash(&mut hasher);
        sample.value.to_bits().hash(&mut hasher);
    }
    config.height.to_bits().hash(&mut hasher);
    config.max_data_points.hash(&mut hasher);
    config.show_area.hash(&mut hasher);
    config.show_grid.hash(&mut hasher);
    config.color.hash(&mut hasher);
    config.unit.hash(&mut hasher);
    config.utc_offset_minutes.hash(&mut hasher);
    hasher.finish()
}
