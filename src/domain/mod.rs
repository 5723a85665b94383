// Domain layer - Samples, display configuration and derived geometry
pub mod display;
pub mod field;
pub mod geometry;
pub mod telemetry;
