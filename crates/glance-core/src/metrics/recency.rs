//! Staleness of the phone link and of the underlying CGM reading

use heapless::String;

use super::format::truncated;

/// Seconds per minute, used for the truncating minute conversion
pub const SECS_PER_MINUTE: i64 = 60;

/// Minutes after which either staleness metric makes the display stale
pub const STALE_AFTER_MINUTES: i64 = 10;

/// Characters available for the `(phone/data)` label
pub const RECENCY_LABEL_CHARS: usize = 15;

/// Elapsed minutes since the phone last reached us and since the reading was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Recency {
    /// Minutes since the last message arrived from the phone
    pub phone_minutes: i64,
    /// Minutes since the CGM produced the newest reading
    pub data_minutes: i64,
}

impl Recency {
    /// Compute both minute counts at `now`.
    ///
    /// `reported_lag_secs` is how old the reading already was when the phone
    /// sent it. Both conversions use truncating integer division, so 599
    /// seconds still reads as 9 minutes.
    pub fn compute(now: i64, last_message_at: i64, reported_lag_secs: i32) -> Self {
        let since_message = now - last_message_at;
        Self {
            phone_minutes: since_message / SECS_PER_MINUTE,
            data_minutes: (reported_lag_secs as i64 + since_message) / SECS_PER_MINUTE,
        }
    }

    /// Classify against the default [`STALE_AFTER_MINUTES`] threshold.
    pub fn freshness(&self) -> Freshness {
        classify_recency(self.phone_minutes, self.data_minutes)
    }
}

/// Whether the shown data can be trusted at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

impl Freshness {
    /// Fresh only when both metrics are strictly below `stale_after` minutes.
    pub fn classify(phone_minutes: i64, data_minutes: i64, stale_after: i64) -> Self {
        if phone_minutes < stale_after && data_minutes < stale_after {
            Self::Fresh
        } else {
            Self::Stale
        }
    }

    pub const fn is_fresh(self) -> bool {
        matches!(self, Self::Fresh)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Stale => "stale",
        }
    }
}

/// Classify with the default ten minute threshold.
pub fn classify_recency(phone_minutes: i64, data_minutes: i64) -> Freshness {
    Freshness::classify(phone_minutes, data_minutes, STALE_AFTER_MINUTES)
}

/// Status-row label, e.g. `(0/4)`.
pub fn recency_label(recency: &Recency) -> String<RECENCY_LABEL_CHARS> {
    truncated(format_args!("({}/{})", recency.phone_minutes, recency.data_minutes))
}
