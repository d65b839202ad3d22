//! Frames and the renderer capability

use bytes::Bytes;
use log::{info, warn};
use scale_stream_types::StatusRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::RenderError;
use crate::weight_display::CairoRenderer;

/// MIME type of every frame produced by this crate
pub const FRAME_CONTENT_TYPE: &str = "image/jpeg";

/// Fixed 1×1 gray JPEG returned whenever full rendering is unavailable
pub static PLACEHOLDER_JPEG: &[u8] = include_bytes!("../assets/placeholder.jpg");

/// One encoded image, owned by whoever asked for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Bytes,
}

impl Frame {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn placeholder() -> Self {
        Self::new(Bytes::from_static(PLACEHOLDER_JPEG))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// Turns a status record into an encoded frame.
///
/// Rendering never fails from the caller's point of view: implementations
/// fall back to [`Frame::placeholder`] internally, so callers need no special
/// case for "renderer unavailable".
pub trait FrameRenderer: Send + Sync + 'static {
    /// Identifier used in logs and configuration (e.g. "cairo", "placeholder")
    fn renderer_id(&self) -> &'static str;

    /// Render one frame for `record`
    fn render(&self, record: &StatusRecord) -> Frame;
}

/// Shared renderer handle used by every connection
pub type SharedRenderer = Arc<dyn FrameRenderer>;

/// Renderer that always returns the fixed placeholder image
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderRenderer;

impl FrameRenderer for PlaceholderRenderer {
    fn renderer_id(&self) -> &'static str {
        "placeholder"
    }

    fn render(&self, _record: &StatusRecord) -> Frame {
        Frame::placeholder()
    }
}

/// Which renderer to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Full renderer if Cairo/Pango work here, placeholder otherwise
    #[default]
    Auto,
    /// Always the full Cairo renderer
    Full,
    /// Always the placeholder
    Placeholder,
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RendererKind::Auto => "auto",
            RendererKind::Full => "full",
            RendererKind::Placeholder => "placeholder",
        })
    }
}

impl FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(RendererKind::Auto),
            "full" | "cairo" => Ok(RendererKind::Full),
            "placeholder" | "none" => Ok(RendererKind::Placeholder),
            other => Err(format!(
                "unknown renderer '{}' (expected auto, full or placeholder)",
                other
            )),
        }
    }
}

/// Pick the renderer once at startup
pub fn select_renderer(kind: RendererKind) -> SharedRenderer {
    select_with_probe(kind, CairoRenderer::probe)
}

fn select_with_probe(
    kind: RendererKind,
    probe: impl FnOnce() -> Result<(), RenderError>,
) -> SharedRenderer {
    let renderer: SharedRenderer = match kind {
        RendererKind::Placeholder => Arc::new(PlaceholderRenderer),
        RendererKind::Full => Arc::new(CairoRenderer::new()),
        RendererKind::Auto => match probe() {
            Ok(()) => Arc::new(CairoRenderer::new()),
            Err(e) => {
                warn!("Cairo rendering unavailable ({}), serving placeholder frames", e);
                Arc::new(PlaceholderRenderer)
            }
        },
    };

    info!("Using {} renderer", renderer.renderer_id());
    renderer
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn test_placeholder_is_valid_jpeg() {
        let frame = PlaceholderRenderer.render(&StatusRecord::initial("scale-001"));
        assert!(!frame.is_empty());
        assert_eq!(&frame.as_bytes()[..2], &[0xFF, 0xD8]);

        let image = image::load_from_memory_with_format(frame.as_bytes(), image::ImageFormat::Jpeg)
            .expect("placeholder decodes");
        assert_eq!(image.dimensions(), (1, 1));
    }

    #[test]
    fn test_select_placeholder() {
        let renderer = select_renderer(RendererKind::Placeholder);
        assert_eq!(renderer.renderer_id(), "placeholder");
        let frame = renderer.render(&StatusRecord::initial("scale-001"));
        assert_eq!(frame.as_bytes(), PLACEHOLDER_JPEG);
    }

    #[test]
    fn test_auto_falls_back_when_probe_fails() {
        let renderer = select_with_probe(RendererKind::Auto, || {
            Err(RenderError::InvalidSize {
                width: 0,
                height: 0,
            })
        });
        assert_eq!(renderer.renderer_id(), "placeholder");
        assert_eq!(
            renderer.render(&StatusRecord::initial("scale-001")).as_bytes(),
            PLACEHOLDER_JPEG
        );
    }

    #[test]
    fn test_auto_uses_cairo_when_probe_succeeds() {
        let renderer = select_with_probe(RendererKind::Auto, || Ok(()));
        assert_eq!(renderer.renderer_id(), "cairo");
    }

    #[test]
    fn test_forced_kinds_skip_probe() {
        let probe = || -> Result<(), RenderError> { panic!("probe must not run") };
        assert_eq!(select_with_probe(RendererKind::Full, probe).renderer_id(), "cairo");
        assert_eq!(
            select_with_probe(RendererKind::Placeholder, probe).renderer_id(),
            "placeholder"
        );
    }

    #[test]
    fn test_renderer_kind_parsing() {
        assert_eq!("auto".parse::<RendererKind>(), Ok(RendererKind::Auto));
        assert_eq!("FULL".parse::<RendererKind>(), Ok(RendererKind::Full));
        assert_eq!("placeholder".parse::<RendererKind>(), Ok(RendererKind::Placeholder));
        assert!("vulkan".parse::<RendererKind>().is_err());
        assert_eq!(RendererKind::default().to_string(), "auto");
    }
}
