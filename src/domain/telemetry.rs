// Telemetry sample domain models
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// One raw reading as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// RFC 3339 timestamp, e.g. `2026-10-19T08:00:00Z`
    pub time: String,
    pub value: f64,
}

impl Sample {
    pub fn new(time: impl Into<String>, value: f64) -> Self {
        Self {
            time: time.into(),
            value,
        }
    }

    /// Epoch milliseconds of the timestamp, `None` when it does not parse.
    pub fn epoch_ms(&self) -> Option<i64> {
        DateTime::parse_from_rfc3339(&self.time)
            .ok()
            .map(|t| t.timestamp_millis())
    }

    /// Negative values are the "no data" sentinel.
    pub fn is_valid_reading(&self) -> bool {
        self.value.is_finite() && self.value >= 0.0
    }
}

pub type Series = Vec<Sample>;

/// A retained sample with its timestamp already parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub epoch_ms: i64,
    pub value: f64,
    pub raw: Sample,
}

impl ChartPoint {
    pub fn new(epoch_ms: i64, raw: Sample) -> Self {
        Self {
            epoch_ms,
            value: raw.value,
            raw,
        }
    }
}
