//! RAM framebuffer with per-pixel change detection.
//!
//! The watchface is drawn into this buffer instead of straight to the panel.
//! After drawing, only the rectangle that actually changed is pushed to the
//! real display. Trend icon bitmaps use the same type at icon size.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

/// Inclusive corners of the changed pixels since the last flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRegion {
    min: (usize, usize),
    max: (usize, usize),
}

impl DirtyRegion {
    fn at(x: usize, y: usize) -> Self {
        Self {
            min: (x, y),
            max: (x, y),
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.min = (self.min.0.min(x), self.min.1.min(y));
        self.max = (self.max.0.max(x), self.max.1.max(y));
    }

    fn width(&self) -> usize {
        self.max.0 - self.min.0 + 1
    }

    fn area(&self) -> Rectangle {
        Rectangle::with_corners(
            Point::new(self.min.0 as i32, self.min.1 as i32),
            Point::new(self.max.0 as i32, self.max.1 as i32),
        )
    }
}

/// Heap-allocated `DrawTarget<Color = Rgb565>` of arbitrary size.
///
/// Draws outside the buffer are clipped, never an error.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRegion>,
}

impl FrameBuffer {
    /// Allocate a buffer of `size` filled with `background`.
    pub fn new(size: Size, background: Rgb565) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            width,
            height,
            pixels: vec![background; width * height],
            dirty: None,
        }
    }

    /// Color of the pixel at `point`, or `None` outside the buffer.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        let (x, y) = self.index_of(point)?;
        Some(self.pixels[y * self.width + x])
    }

    /// Whether any pixel changed since the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    fn index_of(&self, point: Point) -> Option<(usize, usize)> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// Store `color` at `(x, y)`; only an actual change marks the pixel dirty.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let pixel = &mut self.pixels[y * self.width + x];
        if *pixel == color {
            return;
        }
        *pixel = color;
        match self.dirty.as_mut() {
            Some(region) => region.include(x, y),
            None => self.dirty = Some(DirtyRegion::at(x, y)),
        }
    }

    /// Send the changed region to `display` and start tracking afresh.
    ///
    /// Does nothing when no pixel changed.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(region) = self.dirty.take() else {
            return Ok(());
        };

        let area = region.area();
        debug!(
            "Flushing {}x{} region at ({}, {})",
            area.size.width, area.size.height, area.top_left.x, area.top_left.y
        );

        let (left, width) = (region.min.0, region.width());
        let rows = self.pixels.chunks_exact(self.width);
        let colors = rows
            .skip(region.min.1)
            .take(region.max.1 - region.min.1 + 1)
            .flat_map(move |row| row[left..left + width].iter().copied());

        display.fill_contiguous(&area, colors)
    }

    /// Copy the whole buffer onto `display` with its top-left corner at `top_left`.
    pub fn blit<D>(&self, top_left: Point, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let area = Rectangle::new(top_left, self.size());
        display.fill_contiguous(&area, self.pixels.iter().copied())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some((x, y)) = self.index_of(coord) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        for y in area.top_left.y..=bottom_right.y {
            for x in area.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}
