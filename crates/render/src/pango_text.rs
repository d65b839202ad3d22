//! Pango-based text measurement and drawing
//!
//! Cairo's toy font API (select_font_face, show_text, text_extents) creates
//! internal font caches that grow unboundedly. Pango manages font resources
//! properly and integrates with fontconfig, so every piece of text on a frame
//! goes through this module.
//!
//! Positions here are ink-box based: [`show_text_at`] places the top-left of
//! the text's visible ink at the given point, and [`text_extents`] measures
//! that same box. This keeps centering exact regardless of font bearings.

use cairo::Context;
use pango::{FontDescription, Layout, Weight};
use pangocairo::functions::{create_layout, show_layout};
use std::cell::RefCell;
use std::collections::HashMap;

/// A font used on the weight display, sized in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub family: &'static str,
    pub bold: bool,
    pub size_px: f64,
}

impl FontSpec {
    pub const fn new(family: &'static str, bold: bool, size_px: f64) -> Self {
        Self {
            family,
            bold,
            size_px,
        }
    }
}

/// Ink extents of a piece of text, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtents {
    /// Offset from the layout origin to the left edge of the ink
    pub x_bearing: f64,
    /// Offset from the layout origin to the top edge of the ink
    pub y_bearing: f64,
    pub width: f64,
    pub height: f64,
}

/// Cache for FontDescription objects to avoid repeated allocations
struct FontDescriptionCache {
    cache: HashMap<FontKey, FontDescription>,
    max_entries: usize,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
struct FontKey {
    family: String,
    bold: bool,
    size_pango: i32, // Absolute size in Pango units (pixels * PANGO_SCALE)
}

impl FontKey {
    fn from_spec(spec: &FontSpec) -> Self {
        Self {
            family: spec.family.to_string(),
            bold: spec.bold,
            size_pango: (spec.size_px * pango::SCALE as f64) as i32,
        }
    }
}

impl FontDescriptionCache {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            max_entries: 16,
        }
    }

    fn get_or_create(&mut self, spec: &FontSpec) -> FontDescription {
        let key = FontKey::from_spec(spec);
        if let Some(desc) = self.cache.get(&key) {
            return desc.clone();
        }

        if self.cache.len() >= self.max_entries {
            self.cache.clear();
        }

        let mut desc = FontDescription::new();
        desc.set_family(spec.family);
        desc.set_weight(if spec.bold { Weight::Bold } else { Weight::Normal });
        desc.set_absolute_size(key.size_pango as f64);

        self.cache.insert(key, desc.clone());
        desc
    }
}

// Rendering happens on blocking-pool threads; each keeps its own cache
thread_local! {
    static FONT_DESC_CACHE: RefCell<FontDescriptionCache> = RefCell::new(FontDescriptionCache::new());
}

/// Get a cached FontDescription for `spec`
pub fn font_description(spec: &FontSpec) -> FontDescription {
    FONT_DESC_CACHE.with(|cache| cache.borrow_mut().get_or_create(spec))
}

fn layout_for(cr: &Context, text: &str, spec: &FontSpec) -> Layout {
    let layout = create_layout(cr);
    layout.set_font_description(Some(&font_description(spec)));
    layout.set_text(text);
    layout
}

fn ink_extents(layout: &Layout) -> TextExtents {
    let (ink_rect, _logical_rect) = layout.extents();
    let scale = pango::SCALE as f64;

    TextExtents {
        x_bearing: ink_rect.x() as f64 / scale,
        y_bearing: ink_rect.y() as f64 / scale,
        width: ink_rect.width() as f64 / scale,
        height: ink_rect.height() as f64 / scale,
    }
}

/// Measure the ink box of `text`
pub fn text_extents(cr: &Context, text: &str, spec: &FontSpec) -> TextExtents {
    ink_extents(&layout_for(cr, text, spec))
}

/// Draw `text` so that its ink box starts at (`x`, `y`).
///
/// Uses the context's current source color. Returns the extents drawn.
pub fn show_text_at(cr: &Context, x: f64, y: f64, text: &str, spec: &FontSpec) -> TextExtents {
    let layout = layout_for(cr, text, spec);
    let extents = ink_extents(&layout);

    cr.move_to(x - extents.x_bearing, y - extents.y_bearing);
    show_layout(cr, &layout);
    extents
}
