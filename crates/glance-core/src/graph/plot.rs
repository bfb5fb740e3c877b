//! The glucose graph component

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use log::debug;

use super::constants::{
    GRIDLINE_STYLE, GRIDLINES_MG_DL, MG_DL_PER_PX, PLOT_BASELINE_Y, PLOT_WIDTH_PX, POINT_SIZE_PX,
    REFERENCE_BAND_STYLE, REFERENCE_BANDS_MG_DL, SLOT_WIDTH_PX,
};
use super::lines::draw_horizontal_line;
use crate::readings::{Glucose, ReadingBuffer};

/// Plot-relative y for a glucose value.
///
/// Integer division is intentional: 99 and 100 mg/dL land on the same row.
/// Values above ~300 mg/dL yield negative y and are clipped when drawn.
pub const fn y_from_value(mg_dl: i32) -> i32 {
    PLOT_BASELINE_Y - mg_dl / MG_DL_PER_PX
}

/// Plot-relative x for a window slot.
pub const fn x_from_index(index: usize) -> i32 {
    SLOT_WIDTH_PX * index as i32
}

/// Colors used by the graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStyle {
    pub background: Rgb565,
    pub point: Rgb565,
    pub reference_band: Rgb565,
    pub gridline: Rgb565,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            background: Rgb565::WHITE,
            point: Rgb565::BLACK,
            reference_band: Rgb565::BLACK,
            gridline: Rgb565::BLACK,
        }
    }
}

/// Scatter plot of the reading window with reference lines.
///
/// Keeps only a dirty flag: the readings are passed in on every draw, so the
/// graph can never show data older than the buffer.
pub struct GlucoseGraph {
    bounds: Rectangle,
    dirty: bool,
}

impl GlucoseGraph {
    /// Create a graph occupying `bounds` on the target display.
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            dirty: true,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Redraw the whole plot from `readings`.
    pub fn draw<D>(
        &self,
        readings: &ReadingBuffer,
        style: &GraphStyle,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.draw_points_from(readings.present(), style, display)
    }

    /// Redraw the plot from `(slot index, reading)` pairs.
    pub fn draw_points_from<D, I>(
        &self,
        points: I,
        style: &GraphStyle,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        I: IntoIterator<Item = (usize, Glucose)>,
    {
        let mut clipped = display.clipped(&self.bounds);
        let mut plot = clipped.translated(self.bounds.top_left);

        Rectangle::new(Point::zero(), self.bounds.size)
            .into_styled(PrimitiveStyle::with_fill(style.background))
            .draw(&mut plot)?;

        let point_style = PrimitiveStyle::with_fill(style.point);
        let mut plotted = 0usize;
        for (index, value) in points {
            let top_left = Point::new(x_from_index(index), y_from_value(value.into()));
            Rectangle::new(top_left, Size::new_equal(POINT_SIZE_PX))
                .into_styled(point_style)
                .draw(&mut plot)?;
            plotted += 1;
        }

        let width = PLOT_WIDTH_PX as i32;
        for limit in REFERENCE_BANDS_MG_DL {
            draw_horizontal_line(
                y_from_value(limit),
                0,
                width,
                REFERENCE_BAND_STYLE,
                style.reference_band,
                &mut plot,
            )?;
        }

        for gridline in GRIDLINES_MG_DL {
            draw_horizontal_line(
                y_from_value(gridline),
                0,
                width,
                GRIDLINE_STYLE,
                style.gridline,
                &mut plot,
            )?;
        }

        debug!("Graph redrawn with {} points", plotted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::graph::constants::PLOT_SIZE;
    use crate::readings::WINDOW_SLOTS;

    const BLACK: Option<Rgb565> = Some(Rgb565::BLACK);
    const WHITE: Option<Rgb565> = Some(Rgb565::WHITE);

    fn render(window: &[u8; WINDOW_SLOTS]) -> FrameBuffer {
        let mut readings = ReadingBuffer::new();
        readings.load(window);

        let mut fb = FrameBuffer::new(PLOT_SIZE, Rgb565::WHITE);
        let graph = GlucoseGraph::new(Rectangle::new(Point::zero(), PLOT_SIZE));
        graph.draw(&readings, &GraphStyle::default(), &mut fb).unwrap();
        fb
    }

    #[test]
    fn test_plot_mapping_truncates() {
        assert_eq!(y_from_value(100), 67);
        // 99 / 3 = 33 as well; the transform is not rounded
        assert_eq!(y_from_value(99), 67);
        assert_eq!(y_from_value(101), 67);
        assert_eq!(y_from_value(102), 66);
        assert_eq!(y_from_value(0), 100);
    }

    #[test]
    fn test_reference_and_grid_rows() {
        assert_eq!(y_from_value(75), 75);
        assert_eq!(y_from_value(200), 34);
        let rows: [i32; 5] = GRIDLINES_MG_DL.map(y_from_value);
        assert_eq!(rows, [84, 67, 50, 34, 17]);
    }

    #[test]
    fn test_values_above_ceiling_go_negative() {
        assert_eq!(y_from_value(300), 0);
        assert_eq!(y_from_value(330), -10);
    }

    #[test]
    fn test_x_from_index() {
        assert_eq!(x_from_index(0), 0);
        assert_eq!(x_from_index(35), 105);
    }

    #[test]
    fn test_points_drawn_as_three_pixel_squares() {
        let mut window = [0u8; WINDOW_SLOTS];
        window[10] = 120; // x = 30, y = 60
        let fb = render(&window);

        for dy in 0..3 {
            for dx in 0..3 {
                assert_eq!(fb.pixel(Point::new(30 + dx, 60 + dy)), BLACK);
            }
        }
        assert_eq!(fb.pixel(Point::new(33, 60)), WHITE);
        assert_eq!(fb.pixel(Point::new(30, 63)), WHITE);
    }

    #[test]
    fn test_99_and_100_share_a_row() {
        let mut window = [0u8; WINDOW_SLOTS];
        window[20] = 99;
        window[21] = 100;
        let fb = render(&window);

        assert_eq!(fb.pixel(Point::new(60, 68)), BLACK);
        assert_eq!(fb.pixel(Point::new(63, 68)), BLACK);
        assert_eq!(fb.pixel(Point::new(60, 71)), WHITE);
    }

    #[test]
    fn test_missing_slots_are_skipped() {
        let fb = render(&[0u8; WINDOW_SLOTS]);

        // Baseline row for a 1..=2 mg/dL reading stays empty
        for x in 0..PLOT_WIDTH_PX as i32 {
            assert_eq!(fb.pixel(Point::new(x, 100)), WHITE, "x = {}", x);
        }
    }

    #[test]
    fn test_low_limit_uses_coarse_dashes() {
        let fb = render(&[0u8; WINDOW_SLOTS]);

        assert_eq!(fb.pixel(Point::new(0, 75)), BLACK);
        assert_eq!(fb.pixel(Point::new(1, 75)), BLACK);
        assert_eq!(fb.pixel(Point::new(2, 75)), WHITE);
        assert_eq!(fb.pixel(Point::new(3, 75)), WHITE);
        assert_eq!(fb.pixel(Point::new(104, 75)), BLACK);
        assert_eq!(fb.pixel(Point::new(105, 75)), BLACK);
    }

    #[test]
    fn test_gridlines_use_fine_dots() {
        let fb = render(&[0u8; WINDOW_SLOTS]);

        // 150 mg/dL gridline
        assert_eq!(fb.pixel(Point::new(0, 50)), BLACK);
        assert_eq!(fb.pixel(Point::new(1, 50)), WHITE);
        assert_eq!(fb.pixel(Point::new(5, 50)), WHITE);
        assert_eq!(fb.pixel(Point::new(6, 50)), BLACK);
        assert_eq!(fb.pixel(Point::new(102, 50)), BLACK);
    }

    #[test]
    fn test_gridline_overlapping_high_limit_still_drawn() {
        let fb = render(&[0u8; WINDOW_SLOTS]);

        // x = 6 falls in a gap of the high-limit dashes but on a grid dot
        assert_eq!(fb.pixel(Point::new(6, 34)), BLACK);
        assert_eq!(fb.pixel(Point::new(7, 34)), WHITE);
    }

    #[test]
    fn test_out_of_range_points_are_clipped_to_bounds() {
        let mut fb = FrameBuffer::new(Size::new(PLOT_WIDTH_PX, 130), Rgb565::WHITE);
        let graph = GlucoseGraph::new(Rectangle::new(Point::new(0, 20), PLOT_SIZE));

        let high = Glucose::new(330).unwrap();
        graph
            .draw_points_from([(0, high)], &GraphStyle::default(), &mut fb)
            .unwrap();

        // y = -10 relative to the plot, i.e. above it: nothing leaks outside
        for y in 0..20 {
            for x in 0..3 {
                assert_eq!(fb.pixel(Point::new(x, y)), WHITE);
            }
        }
    }

    #[test]
    fn test_graph_drawn_at_offset() {
        let mut readings = ReadingBuffer::new();
        let mut window = [0u8; WINDOW_SLOTS];
        window[0] = 150;
        readings.load(&window);

        let mut fb = FrameBuffer::new(Size::new(144, 168), Rgb565::WHITE);
        let graph = GlucoseGraph::new(Rectangle::new(Point::new(0, 46), PLOT_SIZE));
        graph.draw(&readings, &GraphStyle::default(), &mut fb).unwrap();

        // 150 mg/dL -> plot y 50 -> screen y 96
        assert_eq!(fb.pixel(Point::new(1, 97)), BLACK);
        assert_eq!(fb.pixel(Point::new(1, 50)), WHITE);
    }

    #[test]
    fn test_dirty_flag() {
        let mut graph = GlucoseGraph::new(Rectangle::new(Point::zero(), PLOT_SIZE));
        assert!(graph.is_dirty());
        graph.mark_clean();
        assert!(!graph.is_dirty());
        graph.mark_dirty();
        assert!(graph.is_dirty());
    }
}
