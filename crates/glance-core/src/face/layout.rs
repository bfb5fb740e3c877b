//! Fixed screen regions of the watchface

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::graph::{PLOT_HEIGHT_PX, PLOT_SIZE, PLOT_WIDTH_PX};
use crate::icons::TREND_ICON_SIZE_PX;

pub const SCREEN_WIDTH_PX: u32 = 144;
pub const SCREEN_HEIGHT_PX: u32 = 168;
pub const SCREEN_SIZE: Size = Size::new(SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX);

/// Height of the clock band above the graph
pub const TIME_AREA_HEIGHT_PX: u32 = 42;

/// Height of the IOB / recency row below the graph
pub const ROW_HEIGHT_PX: u32 = SCREEN_HEIGHT_PX - TIME_AREA_HEIGHT_PX - PLOT_HEIGHT_PX;

pub const SIDEBAR_WIDTH_PX: u32 = SCREEN_WIDTH_PX - PLOT_WIDTH_PX;

/// Horizontal inset of text from the screen edges
pub const TEXT_MARGIN_PX: i32 = 2;

pub const TIME_AREA: Rectangle = Rectangle::new(
    Point::zero(),
    Size::new(SCREEN_WIDTH_PX, TIME_AREA_HEIGHT_PX),
);

pub const GRAPH_AREA: Rectangle =
    Rectangle::new(Point::new(0, TIME_AREA_HEIGHT_PX as i32), PLOT_SIZE);

pub const SIDEBAR: Rectangle = Rectangle::new(
    Point::new(PLOT_WIDTH_PX as i32, TIME_AREA_HEIGHT_PX as i32),
    Size::new(SIDEBAR_WIDTH_PX, PLOT_HEIGHT_PX),
);

pub const ROW: Rectangle = Rectangle::new(
    Point::new(0, (TIME_AREA_HEIGHT_PX + PLOT_HEIGHT_PX) as i32),
    Size::new(SCREEN_WIDTH_PX, ROW_HEIGHT_PX),
);

/// Left half of the row; longer IOB text is clipped here
pub const IOB_SLOT: Rectangle = Rectangle::new(
    Point::new(ROW.top_left.x + TEXT_MARGIN_PX, ROW.top_left.y),
    Size::new(SCREEN_WIDTH_PX / 2 - TEXT_MARGIN_PX as u32, ROW_HEIGHT_PX),
);

/// Sidebar slot for the last reading
pub const LAST_READING_SLOT: Rectangle = Rectangle::new(
    Point::new(SIDEBAR.top_left.x, SIDEBAR.top_left.y + 3),
    Size::new(SIDEBAR_WIDTH_PX, 24),
);

/// Top-left corner of the trend icon, centered in the sidebar
pub const TREND_ICON_ORIGIN: Point = Point::new(
    SIDEBAR.top_left.x + (SIDEBAR_WIDTH_PX - TREND_ICON_SIZE_PX) as i32 / 2,
    SIDEBAR.top_left.y + 3 + 28,
);

/// Sidebar slot for the delta
pub const DELTA_SLOT: Rectangle = Rectangle::new(
    Point::new(SIDEBAR.top_left.x, SIDEBAR.top_left.y + 3 + 22 + 28),
    Size::new(SIDEBAR_WIDTH_PX, 24),
);
