//! Geometry and fixed reference values of the glucose graph

use embedded_graphics::geometry::Size;

use super::lines::LineStyle;
use crate::readings::WINDOW_SLOTS;

/// Horizontal pixels per window slot
pub const SLOT_WIDTH_PX: i32 = 3;

/// Edge length of the square drawn for each reading
pub const POINT_SIZE_PX: u32 = 3;

/// Plot-relative y of a 0 mg/dL reading
pub const PLOT_BASELINE_Y: i32 = 100;

/// mg/dL represented by one vertical pixel (integer division, not rounded)
pub const MG_DL_PER_PX: i32 = 3;

/// Width of the plot: one slot column per reading
pub const PLOT_WIDTH_PX: u32 = SLOT_WIDTH_PX as u32 * WINDOW_SLOTS as u32;

/// Height of the plot, including the full point square at the baseline
pub const PLOT_HEIGHT_PX: u32 = PLOT_BASELINE_Y as u32 + POINT_SIZE_PX;

pub const PLOT_SIZE: Size = Size::new(PLOT_WIDTH_PX, PLOT_HEIGHT_PX);

/// Clinical low and high limits drawn as reference lines (mg/dL)
pub const REFERENCE_BANDS_MG_DL: [i32; 2] = [75, 200];

/// Gridline values (mg/dL). 200 coincides with the high limit and is still drawn.
pub const GRIDLINES_MG_DL: [i32; 5] = [50, 100, 150, 200, 250];

/// Coarse dashes for the reference lines
pub const REFERENCE_BAND_STYLE: LineStyle = LineStyle {
    dash_length: 2,
    gap_length: 2,
};

/// Fine dots for the gridlines
pub const GRIDLINE_STYLE: LineStyle = LineStyle {
    dash_length: 1,
    gap_length: 5,
};
