//! Fixed-capacity text formatting for the sidebar labels.
//!
//! Labels live in `heapless::String`s sized for what the layout can show.
//! Anything that does not fit is cut off at capacity instead of failing.

use core::fmt::{self, Write};

use heapless::String;

use crate::readings::Slot;

/// Characters available for the last-reading label
pub const LAST_READING_CHARS: usize = 3;

/// Characters available for the delta label (sign plus up to four digits)
pub const DELTA_CHARS: usize = 5;

/// Delta label shown when either of the last two slots is missing
pub const MISSING_DELTA: &str = "-";

/// `fmt::Write` adapter that silently drops whatever exceeds capacity.
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format `args` into a string of capacity `N`, truncating on overflow.
pub fn truncated<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut out = String::new();
    // Truncating never reports an error
    let _ = Truncating(&mut out).write_fmt(args);
    out
}

/// Render the last reading as a bare decimal number.
///
/// Values wider than [`LAST_READING_CHARS`] keep their leading digits only.
pub fn format_last(value: u16) -> String<LAST_READING_CHARS> {
    truncated(format_args!("{}", value))
}

/// Signed difference between the last two slots.
///
/// Zero and positive deltas get an explicit `+`; negative ones keep the minus
/// sign of the number. If either slot is missing the result is
/// [`MISSING_DELTA`].
pub fn compute_delta(prev: Slot, curr: Slot) -> String<DELTA_CHARS> {
    match (prev, curr) {
        (Some(prev), Some(curr)) => {
            let delta = i32::from(curr) - i32::from(prev);
            if delta >= 0 {
                truncated(format_args!("+{}", delta))
            } else {
                truncated(format_args!("{}", delta))
            }
        }
        _ => truncated(format_args!("{}", MISSING_DELTA)),
    }
}
