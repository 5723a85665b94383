// Time-series geometry engine for vehicle telemetry charts
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
