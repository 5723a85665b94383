// Application layer - Geometry engine and interaction use cases
pub mod chart_service;
pub mod debounce;
pub mod downsample;
pub mod extent;
pub mod geometry_builder;
pub mod hover_service;
pub mod interaction;
pub mod label_format;
