//! Watchface composition
//!
//! ```text
//! +----------------------------+------+
//! |                       9:41 |      |  time area
//! +----------------------------+------+
//! |  .  .. ...                 | 130  |
//! | - - - - - - - - - - - - -  |  ->  |  graph + sidebar
//! |      ...  .  .             | +30  |
//! +----------------------------+------+
//! | 1.2u                         (0/4) |  row
//! +-----------------------------------+
//! ```
//!
//! The face is repainted in full whenever the state reports a change; the
//! framebuffer underneath works out which pixels actually moved.

mod layout;

pub use layout::{
    DELTA_SLOT, GRAPH_AREA, IOB_SLOT, LAST_READING_SLOT, ROW, ROW_HEIGHT_PX, SCREEN_HEIGHT_PX,
    SCREEN_SIZE, SCREEN_WIDTH_PX, SIDEBAR, SIDEBAR_WIDTH_PX, TEXT_MARGIN_PX, TIME_AREA,
    TIME_AREA_HEIGHT_PX, TREND_ICON_ORIGIN,
};

use embedded_graphics::mono_font::ascii::{
    FONT_6X13, FONT_6X13_BOLD, FONT_7X13_BOLD, FONT_9X15_BOLD, FONT_10X20,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_layout::align::{Align, horizontal, vertical};
use log::debug;

use crate::framebuffer::FrameBuffer;
use crate::graph::GraphStyle;
use crate::icons::IconStore;
use crate::state::GlanceState;

/// Colors of the face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceStyle {
    pub background: Rgb565,
    pub foreground: Rgb565,
}

impl FaceStyle {
    /// Graph colors matching the face: everything in the foreground color.
    pub fn graph_style(&self) -> GraphStyle {
        GraphStyle {
            background: self.background,
            point: self.foreground,
            reference_band: self.foreground,
            gridline: self.foreground,
        }
    }
}

impl Default for FaceStyle {
    fn default() -> Self {
        Self {
            background: Rgb565::WHITE,
            foreground: Rgb565::BLACK,
        }
    }
}

/// Renders a [`GlanceState`] onto a 144x168 display.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchFace {
    style: FaceStyle,
}

impl WatchFace {
    pub fn new(style: FaceStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> FaceStyle {
        self.style
    }

    /// Repaint if anything changed, then mark the state clean.
    ///
    /// Returns whether a paint pass happened.
    pub fn paint<S, D>(
        &self,
        state: &mut GlanceState<S>,
        display: &mut D,
    ) -> Result<bool, D::Error>
    where
        S: IconStore<Icon = FrameBuffer>,
        D: DrawTarget<Color = Rgb565>,
    {
        if !state.needs_redraw() {
            return Ok(false);
        }
        self.draw(state, display)?;
        state.mark_clean();
        Ok(true)
    }

    /// Draw every region of the face from `state`.
    pub fn draw<S, D>(&self, state: &GlanceState<S>, display: &mut D) -> Result<(), D::Error>
    where
        S: IconStore<Icon = FrameBuffer>,
        D: DrawTarget<Color = Rgb565>,
    {
        Rectangle::new(Point::zero(), SCREEN_SIZE)
            .into_styled(PrimitiveStyle::with_fill(self.style.background))
            .draw(display)?;

        self.draw_time(state, display)?;
        state
            .graph()
            .draw(state.readings(), &self.style.graph_style(), display)?;
        self.draw_sidebar(state, display)?;
        self.draw_row(state, display)?;

        debug!(
            "Face painted: {} {} {}",
            state.display().clock,
            state.display().last_reading,
            state.display().recency_label
        );
        Ok(())
    }

    fn draw_time<S, D>(&self, state: &GlanceState<S>, display: &mut D) -> Result<(), D::Error>
    where
        S: IconStore,
        D: DrawTarget<Color = Rgb565>,
    {
        let position = Point::new(
            TIME_AREA.top_left.x + TIME_AREA.size.width as i32 - TEXT_MARGIN_PX,
            TIME_AREA.top_left.y + TIME_AREA.size.height as i32 / 2,
        );
        self.text(
            &state.display().clock,
            &FONT_10X20,
            position,
            Alignment::Right,
            Baseline::Middle,
        )
        .draw(display)?;
        Ok(())
    }

    fn draw_sidebar<S, D>(&self, state: &GlanceState<S>, display: &mut D) -> Result<(), D::Error>
    where
        S: IconStore<Icon = FrameBuffer>,
        D: DrawTarget<Color = Rgb565>,
    {
        let derived = state.display();

        self.top_left_text(&derived.last_reading, &FONT_9X15_BOLD)
            .align_to(&LAST_READING_SLOT, horizontal::Center, vertical::Top)
            .draw(display)?;

        if let Some(icon) = state.trend().icon() {
            icon.blit(TREND_ICON_ORIGIN, display)?;
        }

        self.top_left_text(&derived.delta, &FONT_7X13_BOLD)
            .align_to(&DELTA_SLOT, horizontal::Center, vertical::Top)
            .draw(display)?;
        Ok(())
    }

    fn draw_row<S, D>(&self, state: &GlanceState<S>, display: &mut D) -> Result<(), D::Error>
    where
        S: IconStore,
        D: DrawTarget<Color = Rgb565>,
    {
        let derived = state.display();
        let middle = ROW.top_left.y + ROW.size.height as i32 / 2;

        let iob_at = Point::new(IOB_SLOT.top_left.x, middle);
        self.text(&derived.iob, &FONT_6X13_BOLD, iob_at, Alignment::Left, Baseline::Middle)
            .draw(&mut display.clipped(&IOB_SLOT))?;

        // Bold while the data can be trusted
        let recency_font = if derived.freshness.is_fresh() {
            &FONT_6X13_BOLD
        } else {
            &FONT_6X13
        };
        let recency_at = Point::new(
            ROW.top_left.x + ROW.size.width as i32 - TEXT_MARGIN_PX,
            middle,
        );
        self.text(
            &derived.recency_label,
            recency_font,
            recency_at,
            Alignment::Right,
            Baseline::Middle,
        )
        .draw(display)?;
        Ok(())
    }

    /// Text anchored at the origin, to be placed with `align_to`.
    fn top_left_text<'a>(
        &self,
        text: &'a str,
        font: &'a MonoFont<'a>,
    ) -> Text<'a, MonoTextStyle<'a, Rgb565>> {
        self.text(text, font, Point::zero(), Alignment::Left, Baseline::Top)
    }

    fn text<'a>(
        &self,
        text: &'a str,
        font: &'a MonoFont<'a>,
        position: Point,
        alignment: Alignment,
        baseline: Baseline,
    ) -> Text<'a, MonoTextStyle<'a, Rgb565>> {
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(baseline)
            .build();
        Text::with_text_style(
            text,
            position,
            MonoTextStyle::new(font, self.style.foreground),
            text_style,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlanceConfig;
    use crate::graph::y_from_value;
    use crate::icons::{RasterIconStore, TREND_ICON_SIZE_PX};
    use crate::message::InboundMessage;
    use crate::readings::WINDOW_SLOTS;

    const T0: i64 = 1_700_000_000;

    fn state() -> GlanceState<RasterIconStore> {
        let store = RasterIconStore::new(Rgb565::BLACK, Rgb565::WHITE);
        GlanceState::new(store, GlanceConfig::default(), T0)
    }

    fn feed(state: &mut GlanceState<RasterIconStore>, trend: i32, now: i64) {
        feed_iob(state, trend, now, "1.2u");
    }

    fn feed_iob(state: &mut GlanceState<RasterIconStore>, trend: i32, now: i64, iob: &str) {
        let mut window = [0u8; WINDOW_SLOTS];
        window[WINDOW_SLOTS - 2] = 100;
        window[WINDOW_SLOTS - 1] = 130;
        let message = InboundMessage::glucose_update(&window, trend, 0, iob).unwrap();
        state.handle_message(&message, now).unwrap();
    }

    fn black_pixels(fb: &FrameBuffer, area: Rectangle) -> usize {
        area.points()
            .filter(|&p| fb.pixel(p) == Some(Rgb565::BLACK))
            .count()
    }

    fn render(state: &mut GlanceState<RasterIconStore>) -> FrameBuffer {
        let mut fb = FrameBuffer::new(SCREEN_SIZE, Rgb565::WHITE);
        assert!(WatchFace::default().paint(state, &mut fb).unwrap());
        fb
    }

    #[test]
    fn test_every_region_gets_ink() {
        let mut state = state();
        feed(&mut state, 4, T0);
        let fb = render(&mut state);

        assert!(black_pixels(&fb, TIME_AREA) > 0);
        assert!(black_pixels(&fb, LAST_READING_SLOT) > 0);
        assert!(black_pixels(&fb, DELTA_SLOT) > 0);
        assert!(black_pixels(&fb, ROW) > 0);
    }

    #[test]
    fn test_latest_point_lands_in_graph() {
        let mut state = state();
        feed(&mut state, 4, T0);
        let fb = render(&mut state);

        // Slot 35 at x = 105, 130 mg/dL
        let y = GRAPH_AREA.top_left.y + y_from_value(130);
        assert_eq!(fb.pixel(Point::new(106, y + 1)), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_trend_icon_blitted_in_sidebar() {
        let mut state = state();
        feed(&mut state, 4, T0);
        let fb = render(&mut state);

        // Flat arrow tip, same pixel as in the icon's own bitmap
        assert_eq!(
            fb.pixel(TREND_ICON_ORIGIN + Point::new(18, 12)),
            Some(Rgb565::BLACK)
        );
    }

    #[test]
    fn test_hidden_icon_leaves_slot_blank() {
        let mut state = state();
        feed(&mut state, 0, T0);
        let fb = render(&mut state);

        // The bottom rows of the slot are shared with the delta label
        let slot = Rectangle::new(
            TREND_ICON_ORIGIN,
            Size::new(TREND_ICON_SIZE_PX, TREND_ICON_SIZE_PX - 5),
        );
        assert_eq!(black_pixels(&fb, slot), 0);
    }

    #[test]
    fn test_stale_recency_uses_lighter_font() {
        let mut fresh = state();
        feed(&mut fresh, 4, T0);
        let fresh_fb = render(&mut fresh);

        // Same label width, but rendered once the data has gone stale
        let mut stale = GlanceState::new(
            RasterIconStore::new(Rgb565::BLACK, Rgb565::WHITE),
            GlanceConfig {
                stale_after_minutes: 0,
                ..GlanceConfig::default()
            },
            T0,
        );
        feed(&mut stale, 4, T0);
        let stale_fb = render(&mut stale);

        assert_eq!(fresh.display().recency_label, stale.display().recency_label);
        let label = Rectangle::new(
            Point::new(SCREEN_WIDTH_PX as i32 / 2, ROW.top_left.y),
            Size::new(SCREEN_WIDTH_PX / 2, ROW_HEIGHT_PX),
        );
        assert!(black_pixels(&stale_fb, label) < black_pixels(&fresh_fb, label));
    }

    #[test]
    fn test_paint_only_when_dirty() {
        let mut state = state();
        let face = WatchFace::default();
        let mut fb = FrameBuffer::new(SCREEN_SIZE, Rgb565::WHITE);

        assert!(face.paint(&mut state, &mut fb).unwrap());
        assert!(!face.paint(&mut state, &mut fb).unwrap());

        state.on_minute_tick(T0 + 60);
        assert!(face.paint(&mut state, &mut fb).unwrap());
    }

    #[test]
    fn test_inverted_style_reaches_graph() {
        let mut state = state();
        feed(&mut state, 4, T0);
        let face = WatchFace::new(FaceStyle {
            background: Rgb565::BLACK,
            foreground: Rgb565::WHITE,
        });
        let mut fb = FrameBuffer::new(SCREEN_SIZE, Rgb565::WHITE);
        assert!(face.paint(&mut state, &mut fb).unwrap());

        let y = GRAPH_AREA.top_left.y + y_from_value(130);
        assert_eq!(fb.pixel(Point::new(106, y + 1)), Some(Rgb565::WHITE));
        assert_eq!(fb.pixel(GRAPH_AREA.top_left), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_long_iob_is_clipped_to_its_slot() {
        let mut state = state();
        feed_iob(&mut state, 4, T0, "IOB 12.75u COB 30g basal 0.8u/h");
        let fb = render(&mut state);

        assert!(black_pixels(&fb, IOB_SLOT) > 0);
        // Between the IOB slot and the "(0/0)" label on the right
        let gap = Rectangle::new(
            Point::new(IOB_SLOT.top_left.x + IOB_SLOT.size.width as i32, ROW.top_left.y),
            Size::new(36, ROW_HEIGHT_PX),
        );
        assert_eq!(black_pixels(&fb, gap), 0);
    }
}
