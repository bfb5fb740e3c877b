//! Trend arrows rasterized into small framebuffers
//!
//! Stands in for bundled bitmap resources: each acquisition draws the arrow
//! into a fresh [`FrameBuffer`] which the face then blits next to the reading.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Triangle};
use log::debug;

use super::IconStore;
use crate::framebuffer::FrameBuffer;
use crate::metrics::TrendArrow;

/// Edge length of the square trend icon in pixels
pub const TREND_ICON_SIZE_PX: u32 = 25;

/// Stroke width of the arrow shaft in pixels
const SHAFT_WIDTH_PX: u32 = 3;

/// Perpendicular distance between the two arrows of a double arrow, in tenths
/// of the direction vector
const DOUBLE_OFFSET_TENTHS: i32 = 5;

/// [`IconStore`] producing arrow bitmaps on demand.
pub struct RasterIconStore {
    foreground: Rgb565,
    background: Rgb565,
    live: usize,
}

impl RasterIconStore {
    pub const fn new(foreground: Rgb565, background: Rgb565) -> Self {
        Self {
            foreground,
            background,
            live: 0,
        }
    }

    /// Number of icons acquired and not yet released.
    pub fn live(&self) -> usize {
        self.live
    }
}

impl IconStore for RasterIconStore {
    type Icon = FrameBuffer;

    fn acquire(&mut self, arrow: TrendArrow) -> Option<FrameBuffer> {
        let size = Size::new(TREND_ICON_SIZE_PX, TREND_ICON_SIZE_PX);
        let mut bitmap = FrameBuffer::new(size, self.background);
        let center = Point::new(
            TREND_ICON_SIZE_PX as i32 / 2,
            TREND_ICON_SIZE_PX as i32 / 2,
        );

        // FrameBuffer drawing is infallible
        let Ok(()) = draw_arrow(arrow, center, self.foreground, &mut bitmap);

        self.live += 1;
        debug!("Rasterized {} arrow ({} live)", arrow.label(), self.live);
        Some(bitmap)
    }

    fn release(&mut self, icon: FrameBuffer) {
        self.live = self.live.saturating_sub(1);
        drop(icon);
    }
}

/// Draw `arrow` centered on `center`.
pub fn draw_arrow<D>(
    arrow: TrendArrow,
    center: Point,
    color: Rgb565,
    display: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let (dx, dy) = arrow.direction();
    let direction = Point::new(dx, dy);
    // Perpendicular to the direction, same length
    let perpendicular = Point::new(-dy, dx);

    if arrow.is_double() {
        let offset = perpendicular * DOUBLE_OFFSET_TENTHS / 10;
        draw_single_arrow(center + offset, direction, perpendicular, 4, color, display)?;
        draw_single_arrow(center - offset, direction, perpendicular, 4, color, display)
    } else {
        draw_single_arrow(center, direction, perpendicular, 6, color, display)
    }
}

/// One arrow: a shaft from behind `center` to the head, and a filled head.
///
/// `head_half_width_tenths` scales the perpendicular vector for the head.
fn draw_single_arrow<D>(
    center: Point,
    direction: Point,
    perpendicular: Point,
    head_half_width_tenths: i32,
    color: Rgb565,
    display: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let tip = center + direction;
    let tail = center - direction;
    let head_base = center + direction * 3 / 10;
    let half_width = perpendicular * head_half_width_tenths / 10;

    Line::new(tail, head_base)
        .into_styled(PrimitiveStyle::with_stroke(color, SHAFT_WIDTH_PX))
        .draw(display)?;

    Triangle::new(tip, head_base + half_width, head_base - half_width)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
}
