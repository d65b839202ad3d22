//! scale-stream-render: Cairo rendering and JPEG encoding of the weight display.
//!
//! The [`FrameRenderer`] trait is the only thing the server depends on. Two
//! implementations exist: [`CairoRenderer`] draws the full 1280×720 screen
//! with Cairo/Pango, and [`PlaceholderRenderer`] returns a fixed 1×1 image.
//! [`select_renderer`] picks one at startup.

pub mod error;
pub mod frame;
pub mod jpeg;
pub mod pango_text;
pub mod weight_display;

pub use error::RenderError;
pub use frame::{
    select_renderer, Frame, FrameRenderer, PlaceholderRenderer, RendererKind, SharedRenderer,
    FRAME_CONTENT_TYPE, PLACEHOLDER_JPEG,
};
pub use weight_display::{
    CairoRenderer, WeightLayout, FOOTER_CAPTION, FRAME_HEIGHT, FRAME_WIDTH,
};
