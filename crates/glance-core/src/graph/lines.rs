//! Dashed horizontal lines

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};

/// Dash pattern for reference lines and gridlines.
///
/// Dashes of `dash_length` pixels separated by `gap_length` pixels, starting
/// with a dash at the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub dash_length: u32,
    pub gap_length: u32,
}

/// Draw a 1 px dashed horizontal line at `y` covering `x_start..x_end`.
///
/// A dash that starts inside the range is drawn in full even if it pokes out
/// past `x_end`.
pub fn draw_horizontal_line<D: DrawTarget<Color = Rgb565>>(
    y: i32,
    x_start: i32,
    x_end: i32,
    style: LineStyle,
    color: Rgb565,
    display: &mut D,
) -> Result<(), D::Error> {
    if style.dash_length == 0 {
        return Ok(());
    }

    let stroke = PrimitiveStyle::with_stroke(color, 1);
    let period = (style.dash_length + style.gap_length) as usize;
    for x in (x_start..x_end).step_by(period) {
        Line::new(Point::new(x, y), Point::new(x + style.dash_length as i32 - 1, y))
            .into_styled(stroke)
            .draw(display)?;
    }

    Ok(())
}
