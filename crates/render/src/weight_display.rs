//! Weight display rendering
//!
//! Draws the full 1280×720 weight screen:
//! - large centered value with a drop shadow, unit to its right
//! - status badge colored by status
//! - scale label top-left, wall clock top-right
//! - footer bar with caption and a red LIVE indicator

use cairo::{Context, Format, ImageSurface};
use chrono::Local;
use log::error;
use scale_stream_types::color::palette;
use scale_stream_types::{status_color, StatusRecord};
use std::f64::consts::PI;

use crate::error::RenderError;
use crate::frame::{Frame, FrameRenderer};
use crate::jpeg::{encode_surface, JPEG_QUALITY};
use crate::pango_text::{show_text_at, text_extents, FontSpec, TextExtents};

pub const FRAME_WIDTH: i32 = 1280;
pub const FRAME_HEIGHT: i32 = 720;

/// Caption drawn in the footer bar
pub const FOOTER_CAPTION: &str = "Cloud-Scale Weight Stream";

pub const VALUE_FONT: FontSpec = FontSpec::new("Monospace", true, 96.0);
pub const UNIT_FONT: FontSpec = FontSpec::new("Sans", false, 48.0);
pub const STATUS_FONT: FontSpec = FontSpec::new("Sans", true, 32.0);
pub const LABEL_FONT: FontSpec = FontSpec::new("Sans", false, 24.0);

/// Value sits this far above true vertical center
const VALUE_RAISE: f64 = 50.0;
const SHADOW_OFFSET: f64 = 3.0;
const UNIT_GAP: f64 = 20.0;
const BADGE_GAP: f64 = 40.0;
const BADGE_PAD_X: f64 = 15.0;
const BADGE_PAD_TOP: f64 = 5.0;
const BADGE_HEIGHT: f64 = 40.0;
const EDGE_MARGIN: f64 = 15.0;
const FOOTER_HEIGHT: f64 = 45.0;
const FOOTER_TEXT_INSET: f64 = 38.0;
const LIVE_DOT_DIAMETER: f64 = 12.0;

/// Rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Positions of the record-dependent elements, computed from measured text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightLayout {
    /// Ink box of the value text
    pub value: Rect,
    /// Top-left of the unit ink box
    pub unit_origin: (f64, f64),
    /// Badge background panel
    pub badge: Rect,
    /// Top-left of the status ink box
    pub status_origin: (f64, f64),
}

impl WeightLayout {
    /// Layout of `record` on a full-size frame, measured on a scratch surface
    pub fn for_frame(record: &StatusRecord) -> Result<Self, RenderError> {
        let surface = ImageSurface::create(Format::Rgb24, 8, 8)?;
        let cr = Context::new(&surface)?;
        Ok(Self::compute(&cr, record, FRAME_WIDTH as f64, FRAME_HEIGHT as f64))
    }

    pub fn compute(cr: &Context, record: &StatusRecord, width: f64, height: f64) -> Self {
        let reading = record.reading();
        let value = text_extents(cr, reading.value(), &VALUE_FONT);
        let status = text_extents(cr, reading.status().label(), &STATUS_FONT);

        let value_x = ((width - value.width) / 2.0).floor();
        let value_y = ((height - value.height) / 2.0).floor() - VALUE_RAISE;

        let status_x = ((width - status.width) / 2.0).floor();
        let status_y = value_y + value.height + BADGE_GAP;

        Self {
            value: Rect {
                x: value_x,
                y: value_y,
                width: value.width,
                height: value.height,
            },
            unit_origin: (
                value_x + value.width + UNIT_GAP,
                value_y + (value.height / 2.0).floor(),
            ),
            badge: Rect {
                x: status_x - BADGE_PAD_X,
                y: status_y - BADGE_PAD_TOP,
                width: status.width + 2.0 * BADGE_PAD_X,
                height: BADGE_HEIGHT,
            },
            status_origin: (status_x, status_y),
        }
    }
}

fn fill_rect(cr: &Context, rect: Rect) -> Result<(), RenderError> {
    cr.rectangle(rect.x, rect.y, rect.width, rect.height);
    cr.fill()?;
    Ok(())
}

/// Draw the complete weight display onto `cr`.
///
/// `clock` is the wall-clock label drawn top-right.
pub fn render_weight_display(
    cr: &Context,
    record: &StatusRecord,
    clock: &str,
    width: f64,
    height: f64,
) -> Result<WeightLayout, RenderError> {
    let reading = record.reading();
    let layout = WeightLayout::compute(cr, record, width, height);

    // Background
    palette::BACKGROUND.apply_to_cairo(cr);
    cr.paint()?;

    // Value with shadow
    let (vx, vy) = (layout.value.x, layout.value.y);
    palette::SHADOW.apply_to_cairo(cr);
    show_text_at(
        cr,
        vx + SHADOW_OFFSET,
        vy + SHADOW_OFFSET,
        reading.value(),
        &VALUE_FONT,
    );
    palette::VALUE.apply_to_cairo(cr);
    show_text_at(cr, vx, vy, reading.value(), &VALUE_FONT);

    // Unit
    palette::UNIT.apply_to_cairo(cr);
    let (ux, uy) = layout.unit_origin;
    show_text_at(cr, ux, uy, reading.unit(), &UNIT_FONT);

    // Status badge
    let label = reading.status().label();
    palette::BADGE.apply_to_cairo(cr);
    fill_rect(cr, layout.badge)?;
    status_color(label).apply_to_cairo(cr);
    let (sx, sy) = layout.status_origin;
    show_text_at(cr, sx, sy, label, &STATUS_FONT);

    // Scale id and clock
    palette::LABEL.apply_to_cairo(cr);
    show_text_at(
        cr,
        EDGE_MARGIN,
        EDGE_MARGIN,
        &format!("Scale: {}", record.scale_id()),
        &LABEL_FONT,
    );
    let clock_extents: TextExtents = text_extents(cr, clock, &LABEL_FONT);
    show_text_at(
        cr,
        width - clock_extents.width - EDGE_MARGIN,
        EDGE_MARGIN,
        clock,
        &LABEL_FONT,
    );

    // Footer bar
    palette::FOOTER_BAR.apply_to_cairo(cr);
    fill_rect(
        cr,
        Rect {
            x: 0.0,
            y: height - FOOTER_HEIGHT,
            width,
            height: FOOTER_HEIGHT,
        },
    )?;
    palette::FOOTER_TEXT.apply_to_cairo(cr);
    show_text_at(
        cr,
        EDGE_MARGIN,
        height - FOOTER_TEXT_INSET,
        FOOTER_CAPTION,
        &LABEL_FONT,
    );

    // Live indicator
    let radius = LIVE_DOT_DIAMETER / 2.0;
    palette::LIVE_DOT.apply_to_cairo(cr);
    cr.arc(width - 85.0 + radius, height - 33.0 + radius, radius, 0.0, 2.0 * PI);
    cr.fill()?;
    palette::LIVE_TEXT.apply_to_cairo(cr);
    show_text_at(cr, width - 65.0, height - FOOTER_TEXT_INSET, "LIVE", &LABEL_FONT);

    Ok(layout)
}

/// Full renderer: Cairo/Pango drawing encoded as JPEG
#[derive(Debug, Clone, Copy)]
pub struct CairoRenderer {
    width: i32,
    height: i32,
    quality: u8,
}

impl CairoRenderer {
    pub fn new() -> Self {
        Self::with_size(FRAME_WIDTH, FRAME_HEIGHT)
    }

    pub(crate) fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            quality: JPEG_QUALITY,
        }
    }

    /// Check that Cairo surfaces and Pango layouts work in this process
    pub fn probe() -> Result<(), RenderError> {
        let surface = ImageSurface::create(Format::Rgb24, 8, 8)?;
        let cr = Context::new(&surface)?;
        text_extents(&cr, "0", &LABEL_FONT);
        cr.paint()?;
        Ok(())
    }

    /// Render with an explicit clock label
    pub fn render_with_clock(
        &self,
        record: &StatusRecord,
        clock: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let surface = ImageSurface::create(Format::Rgb24, self.width, self.height)?;
        {
            let cr = Context::new(&surface)?;
            render_weight_display(
                &cr,
                record,
                clock,
                self.width as f64,
                self.height as f64,
            )?;
        }
        encode_surface(&surface, self.quality)
    }
}

impl Default for CairoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRenderer for CairoRenderer {
    fn renderer_id(&self) -> &'static str {
        "cairo"
    }

    fn render(&self, record: &StatusRecord) -> Frame {
        let clock = Local::now().format("%H:%M:%S").to_string();
        match self.render_with_clock(record, &clock) {
            Ok(jpeg) => Frame::new(jpeg),
            Err(e) => {
                error!("Frame rendering failed, sending placeholder: {}", e);
                Frame::placeholder()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use image::GenericImageView;
    use crate::frame::PLACEHOLDER_JPEG;
    use scale_stream_types::{Reading, ReadingStatus};

    fn record(value: &str, unit: &str, status: ReadingStatus) -> StatusRecord {
        StatusRecord::new(Reading::new(value, unit, status, Local::now()), "scale-001")
    }

    fn context() -> (ImageSurface, Context) {
        let surface = ImageSurface::create(Format::Rgb24, FRAME_WIDTH, FRAME_HEIGHT).unwrap();
        let cr = Context::new(&surface).unwrap();
        (surface, cr)
    }

    fn close(actual: [u8; 3], expected: (u8, u8, u8, u8), tolerance: i32) -> bool {
        let expected = [expected.0, expected.1, expected.2];
        actual
            .iter()
            .zip(expected.iter())
            .all(|(a, e)| (*a as i32 - *e as i32).abs() <= tolerance)
    }

    #[test]
    fn test_value_is_horizontally_centered() {
        let (_surface, cr) = context();
        for value in ["1", "840", "----.--", "123456.789"] {
            let layout = WeightLayout::compute(
                &cr,
                &record(value, "lb", ReadingStatus::Stable),
                FRAME_WIDTH as f64,
                FRAME_HEIGHT as f64,
            );
            let left = layout.value.x;
            let right = FRAME_WIDTH as f64 - (layout.value.x + layout.value.width);
            assert!((left - right).abs() <= 1.0, "{}: {} vs {}", value, left, right);
            assert!(layout.value.y + layout.value.height / 2.0 < FRAME_HEIGHT as f64 / 2.0);
        }
    }

    #[test]
    fn test_unit_and_badge_follow_value() {
        let (_surface, cr) = context();
        let layout = WeightLayout::compute(
            &cr,
            &record("1205", "kg", ReadingStatus::Stable),
            FRAME_WIDTH as f64,
            FRAME_HEIGHT as f64,
        );
        assert_eq!(layout.unit_origin.0, layout.value.x + layout.value.width + UNIT_GAP);
        assert!(layout.badge.y > layout.value.y + layout.value.height);
        assert_eq!(layout.badge.height, BADGE_HEIGHT);
        let badge_center = layout.badge.x + layout.badge.width / 2.0;
        assert!((badge_center - FRAME_WIDTH as f64 / 2.0).abs() <= 1.0);
    }

    #[test]
    fn test_render_produces_full_size_jpeg() {
        let renderer = CairoRenderer::new();
        let frame = renderer.render(&record("1205", "kg", ReadingStatus::Stable));
        assert!(frame.len() > 1000);

        let image = image::load_from_memory_with_format(frame.as_bytes(), image::ImageFormat::Jpeg)
            .expect("frame decodes");
        assert_eq!(image.dimensions(), (FRAME_WIDTH as u32, FRAME_HEIGHT as u32));
    }

    #[test]
    fn test_render_draws_fixed_layout() {
        let renderer = CairoRenderer::new();
        let record = record("840", "lb", ReadingStatus::Motion);
        let jpeg = renderer.render_with_clock(&record, "12:34:56").unwrap();
        let image = image::load_from_memory(&jpeg).unwrap().to_rgb8();

        // Empty background between header labels
        let bg = image.get_pixel(640, 30).0;
        assert!(close(bg, palette::BACKGROUND.to_rgba8(), 12), "background {:?}", bg);

        // Footer bar, away from the caption
        let footer = image.get_pixel(640, FRAME_HEIGHT as u32 - 5).0;
        assert!(close(footer, palette::FOOTER_BAR.to_rgba8(), 12), "footer {:?}", footer);

        // Centre of the live dot
        let dot = image
            .get_pixel(FRAME_WIDTH as u32 - 79, FRAME_HEIGHT as u32 - 27)
            .0;
        assert!(dot[0] > 180 && dot[1] < 90 && dot[2] < 90, "live dot {:?}", dot);

        // Badge padding next to the status text
        let (_surface, cr) = context();
        let layout =
            WeightLayout::compute(&cr, &record, FRAME_WIDTH as f64, FRAME_HEIGHT as f64);
        let badge = image
            .get_pixel(
                (layout.badge.x + 5.0) as u32,
                (layout.badge.y + layout.badge.height / 2.0) as u32,
            )
            .0;
        assert!(close(badge, palette::BADGE.to_rgba8(), 12), "badge {:?}", badge);
    }

    #[test]
    fn test_every_status_renders() {
        let renderer = CairoRenderer::new();
        for status in [
            ReadingStatus::Stable,
            ReadingStatus::Motion,
            ReadingStatus::Error,
            ReadingStatus::NoData,
        ] {
            let frame = renderer.render(&record("0.00", "lb", status));
            assert_eq!(&frame.as_bytes()[..2], &[0xFF, 0xD8]);
        }
    }

    #[test]
    fn test_render_error_falls_back_to_placeholder() {
        let record = record("1205", "kg", ReadingStatus::Stable);
        for (width, height) in [(0, 0), (-1, 720)] {
            let renderer = CairoRenderer::with_size(width, height);
            assert!(renderer.render_with_clock(&record, "12:34:56").is_err());
            assert_eq!(renderer.render(&record).as_bytes(), PLACEHOLDER_JPEG);
        }
    }

    #[test]
    fn test_layout_for_frame_matches_full_canvas() {
        let record = record("1205", "kg", ReadingStatus::Stable);
        let (_surface, cr) = context();
        let expected = WeightLayout::compute(&cr, &record, FRAME_WIDTH as f64, FRAME_HEIGHT as f64);
        assert_eq!(WeightLayout::for_frame(&record).unwrap(), expected);
    }

    #[test]
    fn test_probe() {
        assert!(CairoRenderer::probe().is_ok());
    }
}
