//! Fixed-length window of recent glucose readings.
//!
//! The phone always sends the complete window, so the buffer never grows,
//! shifts, or accepts single readings: every message overwrites all
//! [`WINDOW_SLOTS`] slots at once, oldest on the left and newest on the right.

use core::fmt;

/// Number of slots in the reading window, one per 5-minute CGM sample
pub const WINDOW_SLOTS: usize = 36;

/// Wire value marking a slot that has never been filled.
///
/// A real reading of 0 mg/dL is indistinguishable from this and is treated as
/// missing as well.
pub const MISSING_SENTINEL: u8 = 0;

/// A single glucose reading in mg/dL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Glucose(u16);

impl Glucose {
    /// Wrap a raw wire value, mapping the missing sentinel to `None`.
    pub const fn from_wire(raw: u8) -> Option<Self> {
        if raw == MISSING_SENTINEL {
            None
        } else {
            Some(Self(raw as u16))
        }
    }

    /// Reading from a mg/dL value; 0 is treated as missing like on the wire.
    pub const fn new(mg_dl: u16) -> Option<Self> {
        if mg_dl == 0 { None } else { Some(Self(mg_dl)) }
    }

    /// Value in mg/dL
    pub const fn mg_dl(self) -> u16 {
        self.0
    }
}

impl From<Glucose> for i32 {
    fn from(value: Glucose) -> Self {
        value.0 as i32
    }
}

impl fmt::Display for Glucose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One slot of the window: a reading, or `None` when no data exists for it.
pub type Slot = Option<Glucose>;

/// The most recent [`WINDOW_SLOTS`] readings, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingBuffer {
    slots: [Slot; WINDOW_SLOTS],
}

impl Default for ReadingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingBuffer {
    /// Create a buffer with every slot missing.
    pub const fn new() -> Self {
        Self {
            slots: [None; WINDOW_SLOTS],
        }
    }

    /// Replace the whole window with freshly received wire values.
    ///
    /// Returns the rightmost present reading, or `None` when every slot is
    /// missing.
    pub fn load(&mut self, values: &[u8; WINDOW_SLOTS]) -> Option<Glucose> {
        let mut last = None;
        for (slot, &raw) in self.slots.iter_mut().zip(values.iter()) {
            *slot = Glucose::from_wire(raw);
            if slot.is_some() {
                last = *slot;
            }
        }
        last
    }

    /// The final two slots as `(previous, current)`.
    pub fn last_two(&self) -> (Slot, Slot) {
        (self.slots[WINDOW_SLOTS - 2], self.slots[WINDOW_SLOTS - 1])
    }

    /// All slots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots.iter().copied()
    }

    /// Present readings with their slot index, oldest first.
    pub fn present(&self) -> impl Iterator<Item = (usize, Glucose)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|value| (index, value)))
    }

    /// Number of slots currently holding a reading
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether no slot holds a reading.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
