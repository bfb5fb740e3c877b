//! Time-of-day label shown above the graph

use heapless::String;

use crate::metrics::truncated;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Characters available for the clock label (`12:59`)
pub const CLOCK_LABEL_CHARS: usize = 8;

/// Local `(hour, minute)` for a UNIX timestamp in seconds.
pub fn time_of_day(now: i64, utc_offset_minutes: i32) -> (u8, u8) {
    let local = now + utc_offset_minutes as i64 * 60;
    let secs = local.rem_euclid(SECS_PER_DAY);
    ((secs / 3600) as u8, (secs % 3600 / 60) as u8)
}

/// 12-hour clock without a leading space or zero, e.g. `9:05`.
pub fn format_time_of_day(hour: u8, minute: u8) -> String<CLOCK_LABEL_CHARS> {
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    truncated(format_args!("{}:{:02}", hour, minute))
}

/// Clock label for `now`.
pub fn clock_label(now: i64, utc_offset_minutes: i32) -> String<CLOCK_LABEL_CHARS> {
    let (hour, minute) = time_of_day(now, utc_offset_minutes);
    format_time_of_day(hour, minute)
}
