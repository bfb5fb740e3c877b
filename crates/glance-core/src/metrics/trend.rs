//! Trend code to arrow mapping

use log::warn;

/// Raw trend code as sent by the phone
pub type TrendCode = i32;

/// Number of codes in the defined range `0..TREND_CODE_COUNT`
pub const TREND_CODE_COUNT: usize = 10;

/// Direction arrow shown next to the last reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendArrow {
    DoubleUp,
    SingleUp,
    FortyFiveUp,
    Flat,
    FortyFiveDown,
    SingleDown,
    DoubleDown,
}

/// Arrow for each defined code. Codes 0, 8 and 9 mean the CGM has no usable
/// trend (none / not computable / out of range) and show no arrow.
const TREND_ARROWS: [Option<TrendArrow>; TREND_CODE_COUNT] = [
    None,
    Some(TrendArrow::DoubleUp),
    Some(TrendArrow::SingleUp),
    Some(TrendArrow::FortyFiveUp),
    Some(TrendArrow::Flat),
    Some(TrendArrow::FortyFiveDown),
    Some(TrendArrow::SingleDown),
    Some(TrendArrow::DoubleDown),
    None,
    None,
];

impl TrendArrow {
    /// Look up the arrow for a trend code.
    ///
    /// Codes outside the defined range are clamped to "no arrow".
    pub fn from_code(code: TrendCode) -> Option<Self> {
        match usize::try_from(code).ok().and_then(|i| TREND_ARROWS.get(i)) {
            Some(arrow) => *arrow,
            None => {
                warn!("Trend code {} outside 0..{}, showing no arrow", code, TREND_CODE_COUNT);
                None
            }
        }
    }

    /// Short label for logs and the simulator
    pub const fn label(self) -> &'static str {
        match self {
            Self::DoubleUp => "double-up",
            Self::SingleUp => "single-up",
            Self::FortyFiveUp => "forty-five-up",
            Self::Flat => "flat",
            Self::FortyFiveDown => "forty-five-down",
            Self::SingleDown => "single-down",
            Self::DoubleDown => "double-down",
        }
    }

    /// Direction of the arrow as a screen-space vector scaled to length ~10.
    ///
    /// Screen y grows downward, so rising trends point to negative y.
    pub const fn direction(self) -> (i32, i32) {
        match self {
            Self::DoubleUp | Self::SingleUp => (0, -10),
            Self::FortyFiveUp => (7, -7),
            Self::Flat => (10, 0),
            Self::FortyFiveDown => (7, 7),
            Self::SingleDown | Self::DoubleDown => (0, 10),
        }
    }

    /// Whether the arrow is drawn doubled.
    pub const fn is_double(self) -> bool {
        matches!(self, Self::DoubleUp | Self::DoubleDown)
    }
}
