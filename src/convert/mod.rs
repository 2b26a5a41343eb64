//! Conversion of records into tables

pub mod projector;

pub use projector::{ItemProjector, ProjectionOptions};
