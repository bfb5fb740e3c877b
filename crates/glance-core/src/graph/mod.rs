//! Glucose history graph for small monochrome-style displays
//!
//! Readings are plotted with a fixed, unrounded integer transform so the
//! picture is identical on every device:
//!
//! - one 3 px column per slot, `x = 3 * index`
//! - `y = 100 - value / 3`, so ~300 mg/dL reaches the top edge and anything
//!   higher is clipped by the plot bounds
//!
//! On top of the points go two coarse dashed reference lines (the low and
//! high limits) and five fine dashed gridlines every 50 mg/dL.
//!
//! # Examples
//!
//! ```ignore
//! let mut graph = GlucoseGraph::new(Rectangle::new(Point::new(0, 42), PLOT_SIZE));
//! graph.mark_dirty();
//! if graph.is_dirty() {
//!     graph.draw(&readings, &GraphStyle::default(), &mut display)?;
//!     graph.mark_clean();
//! }
//! ```

pub mod constants;
mod lines;
mod plot;

pub use constants::{
    GRIDLINE_STYLE, GRIDLINES_MG_DL, PLOT_BASELINE_Y, PLOT_HEIGHT_PX, PLOT_SIZE, PLOT_WIDTH_PX,
    POINT_SIZE_PX, REFERENCE_BAND_STYLE, REFERENCE_BANDS_MG_DL, SLOT_WIDTH_PX,
};
pub use lines::{LineStyle, draw_horizontal_line};
pub use plot::{GlucoseGraph, GraphStyle, x_from_index, y_from_value};
