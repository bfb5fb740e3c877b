//! Inbound key/value messages from the phone
//!
//! The transport hands over a small dictionary of tuples. A glucose update
//! carries exactly four of them:
//!
//! | key | field              | value                                 |
//! |-----|--------------------|---------------------------------------|
//! | 0   | reading window     | 36 bytes, one mg/dL value per slot    |
//! | 1   | trend code         | int32, expected `0..=9`               |
//! | 2   | phone lag          | int32 seconds                         |
//! | 3   | insulin-on-board   | short text, shown verbatim            |
//!
//! [`GlucoseUpdate::try_from`] validates every field before anything is
//! applied, so a malformed message never half-updates the display.

use heapless::{LinearMap, String, Vec};
use thiserror_no_std::Error;

use crate::metrics::TrendCode;
use crate::readings::WINDOW_SLOTS;

/// Maximum bytes in a blob tuple
pub const MAX_BLOB_BYTES: usize = 64;

/// Maximum bytes in a text tuple
pub const MAX_TEXT_BYTES: usize = 48;

/// Maximum tuples in one message
pub const MAX_TUPLES: usize = 8;

/// Dictionary keys used by the phone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AppKey {
    ReadingWindow = 0,
    Trend = 1,
    LagSeconds = 2,
    InsulinOnBoard = 3,
}

impl AppKey {
    pub const fn key(self) -> u32 {
        self as u32
    }
}

/// Value of one dictionary tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TupleValue {
    Bytes(Vec<u8, MAX_BLOB_BYTES>),
    Text(String<MAX_TEXT_BYTES>),
    Int32(i32),
}

impl TupleValue {
    /// Blob tuple, failing if `data` exceeds [`MAX_BLOB_BYTES`].
    pub fn bytes(data: &[u8]) -> Result<Self, MessageError> {
        Vec::from_slice(data)
            .map(Self::Bytes)
            .map_err(|_| MessageError::ValueTooLarge {
                max: MAX_BLOB_BYTES,
            })
    }

    /// Text tuple, failing if `text` exceeds [`MAX_TEXT_BYTES`].
    pub fn text(text: &str) -> Result<Self, MessageError> {
        String::try_from(text)
            .map(Self::Text)
            .map_err(|_| MessageError::ValueTooLarge {
                max: MAX_TEXT_BYTES,
            })
    }

    const fn type_name(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Int32(_) => "int32",
        }
    }
}

/// Errors raised while building or validating an inbound message
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    /// A required key is absent
    #[error("Missing field {key}")]
    MissingField { key: u32 },

    /// A key holds a value of the wrong type
    #[error("Field {key} is {found}, expected {expected}")]
    WrongType {
        key: u32,
        expected: &'static str,
        found: &'static str,
    },

    /// The reading window blob is not exactly one byte per slot
    #[error("Reading window has {actual} bytes (expected {expected})")]
    WindowLength { expected: usize, actual: usize },

    /// More tuples than a message can hold
    #[error("Message holds more than {max} fields")]
    TooManyFields { max: usize },

    /// A tuple value exceeds its capacity
    #[error("Field value exceeds {max} bytes")]
    ValueTooLarge { max: usize },
}

/// A key/value bundle as delivered by the transport.
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    tuples: LinearMap<u32, TupleValue, MAX_TUPLES>,
}

impl InboundMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a complete glucose update message.
    pub fn glucose_update(
        window: &[u8],
        trend: TrendCode,
        lag_secs: i32,
        iob: &str,
    ) -> Result<Self, MessageError> {
        let mut message = Self::new();
        message.insert(AppKey::ReadingWindow.key(), TupleValue::bytes(window)?)?;
        message.insert(AppKey::Trend.key(), TupleValue::Int32(trend))?;
        message.insert(AppKey::LagSeconds.key(), TupleValue::Int32(lag_secs))?;
        message.insert(AppKey::InsulinOnBoard.key(), TupleValue::text(iob)?)?;
        Ok(message)
    }

    /// Insert or replace the tuple for `key`.
    pub fn insert(&mut self, key: u32, value: TupleValue) -> Result<(), MessageError> {
        self.tuples
            .insert(key, value)
            .map(|_| ())
            .map_err(|_| MessageError::TooManyFields { max: MAX_TUPLES })
    }

    /// Remove the tuple for `key`, returning it if present.
    pub fn remove(&mut self, key: u32) -> Option<TupleValue> {
        self.tuples.remove(&key)
    }

    pub fn find(&self, key: u32) -> Option<&TupleValue> {
        self.tuples.get(&key)
    }

    fn require(&self, key: AppKey) -> Result<&TupleValue, MessageError> {
        self.find(key.key())
            .ok_or(MessageError::MissingField { key: key.key() })
    }

    fn require_int(&self, key: AppKey) -> Result<i32, MessageError> {
        match self.require(key)? {
            TupleValue::Int32(value) => Ok(*value),
            other => Err(MessageError::WrongType {
                key: key.key(),
                expected: "int32",
                found: other.type_name(),
            }),
        }
    }
}

/// A validated glucose update, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlucoseUpdate {
    /// Raw wire window, 0 marks a missing slot
    pub window: [u8; WINDOW_SLOTS],
    pub trend: TrendCode,
    /// How old the newest reading already was when the phone sent it
    pub lag_secs: i32,
    /// Insulin-on-board text, exactly as sent
    pub iob: String<MAX_TEXT_BYTES>,
}

impl TryFrom<&InboundMessage> for GlucoseUpdate {
    type Error = MessageError;

    fn try_from(message: &InboundMessage) -> Result<Self, Self::Error> {
        let key = AppKey::ReadingWindow;
        let blob = match message.require(key)? {
            TupleValue::Bytes(bytes) => bytes.as_slice(),
            TupleValue::Text(text) => text.as_bytes(),
            other => {
                return Err(MessageError::WrongType {
                    key: key.key(),
                    expected: "bytes",
                    found: other.type_name(),
                });
            }
        };
        let window: [u8; WINDOW_SLOTS] =
            blob.try_into().map_err(|_| MessageError::WindowLength {
                expected: WINDOW_SLOTS,
                actual: blob.len(),
            })?;

        let trend = message.require_int(AppKey::Trend)?;
        let lag_secs = message.require_int(AppKey::LagSeconds)?;

        let key = AppKey::InsulinOnBoard;
        let iob = match message.require(key)? {
            TupleValue::Text(text) => text.clone(),
            other => {
                return Err(MessageError::WrongType {
                    key: key.key(),
                    expected: "text",
                    found: other.type_name(),
                });
            }
        };

        Ok(Self {
            window,
            trend,
            lag_secs,
            iob,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> [u8; WINDOW_SLOTS] {
        let mut window = [0u8; WINDOW_SLOTS];
        window[34] = 100;
        window[35] = 130;
        window
    }

    #[test]
    fn test_complete_message_parses() {
        let message = InboundMessage::glucose_update(&window(), 2, 0, "1.2").unwrap();
        let update = GlucoseUpdate::try_from(&message).unwrap();

        assert_eq!(update.window, window());
        assert_eq!(update.trend, 2);
        assert_eq!(update.lag_secs, 0);
        assert_eq!(update.iob.as_str(), "1.2");
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for key in [
            AppKey::ReadingWindow,
            AppKey::Trend,
            AppKey::LagSeconds,
            AppKey::InsulinOnBoard,
        ] {
            let mut message = InboundMessage::glucose_update(&window(), 2, 0, "1.2").unwrap();
            message.remove(key.key());

            assert_eq!(
                GlucoseUpdate::try_from(&message),
                Err(MessageError::MissingField { key: key.key() })
            );
        }
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let mut message = InboundMessage::glucose_update(&window(), 2, 0, "1.2").unwrap();
        message
            .insert(AppKey::Trend.key(), TupleValue::text("up").unwrap())
            .unwrap();

        assert_eq!(
            GlucoseUpdate::try_from(&message),
            Err(MessageError::WrongType {
                key: 1,
                expected: "int32",
                found: "text",
            })
        );
    }

    #[test]
    fn test_short_window_is_rejected() {
        let message = InboundMessage::glucose_update(&[120; 20], 4, 0, "0.0").unwrap();
        assert_eq!(
            GlucoseUpdate::try_from(&message),
            Err(MessageError::WindowLength {
                expected: WINDOW_SLOTS,
                actual: 20,
            })
        );
    }

    #[test]
    fn test_window_may_arrive_as_text() {
        let mut message = InboundMessage::glucose_update(&window(), 4, 30, "0.5").unwrap();
        // 'd' is 100 mg/dL
        let text = "dddddddddddddddddddddddddddddddddddd";
        message
            .insert(AppKey::ReadingWindow.key(), TupleValue::text(text).unwrap())
            .unwrap();

        let update = GlucoseUpdate::try_from(&message).unwrap();
        assert_eq!(update.window, [100u8; WINDOW_SLOTS]);

        message
            .insert(AppKey::ReadingWindow.key(), TupleValue::text("ddd").unwrap())
            .unwrap();
        assert_eq!(
            GlucoseUpdate::try_from(&message),
            Err(MessageError::WindowLength {
                expected: WINDOW_SLOTS,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_oversized_values_are_rejected() {
        assert_eq!(
            TupleValue::bytes(&[1; MAX_BLOB_BYTES + 1]),
            Err(MessageError::ValueTooLarge {
                max: MAX_BLOB_BYTES
            })
        );
        let long = [b'a'; MAX_TEXT_BYTES + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert!(TupleValue::text(long).is_err());
    }

    #[test]
    fn test_long_iob_passes_through_unchanged() {
        let iob = "IOB 12.75u COB 30g";
        let message = InboundMessage::glucose_update(&window(), 4, 0, iob).unwrap();
        let update = GlucoseUpdate::try_from(&message).unwrap();
        assert_eq!(update.iob.as_str(), iob);
    }

    #[test]
    fn test_too_many_fields() {
        let mut message = InboundMessage::new();
        for key in 0..MAX_TUPLES as u32 {
            message.insert(key, TupleValue::Int32(0)).unwrap();
        }
        assert_eq!(
            message.insert(99, TupleValue::Int32(0)),
            Err(MessageError::TooManyFields { max: MAX_TUPLES })
        );
        // Replacing an existing key still works when full
        assert!(message.insert(0, TupleValue::Int32(1)).is_ok());
    }
}
