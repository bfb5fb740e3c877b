//! Display-ready values derived from the reading window and message metadata
//!
//! Everything here is pure: the [`GlanceState`](crate::state::GlanceState)
//! decides when to recompute, these functions only decide what the sidebar
//! and status row show.

mod format;
mod recency;
mod trend;

pub use format::{
    DELTA_CHARS, LAST_READING_CHARS, MISSING_DELTA, compute_delta, format_last,
    truncated,
};
pub use recency::{
    Freshness, RECENCY_LABEL_CHARS, Recency, STALE_AFTER_MINUTES, SECS_PER_MINUTE,
    classify_recency, recency_label,
};
pub use trend::{TREND_CODE_COUNT, TrendArrow, TrendCode};
