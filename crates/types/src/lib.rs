//! scale-stream-types: Shared data types for the scale-stream weight display.
//!
//! This crate contains pure data types (readings, status records, colors)
//! shared by the source, core, render and server layers. Nothing here touches
//! the filesystem, the network or a drawing surface, making it suitable as a
//! foundation layer.

pub mod color;
pub mod reading;

// Re-export commonly used types at the crate root for convenience
pub use color::Color;
pub use reading::{
    status_color, Reading, ReadingStatus, StatusRecord, DEFAULT_SCALE_ID, DEFAULT_UNIT,
    PLACEHOLDER_VALUE,
};
