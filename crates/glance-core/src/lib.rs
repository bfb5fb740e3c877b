//! Hardware-independent core of the glucose-glance watchface
//!
//! This crate holds everything the CGM watchface does apart from talking to
//! real hardware: validating the key/value messages relayed by the phone,
//! keeping the three-hour reading window, deriving the labels (last reading,
//! delta, trend arrow, staleness) and drawing the face through any
//! `DrawTarget<Color = Rgb565>`.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on watch-class
//! targets and desktop hosts alike (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod clock;
pub mod config;
pub mod events;
pub mod face;
pub mod framebuffer;
pub mod graph;
pub mod icons;
pub mod message;
pub mod metrics;
pub mod readings;
pub mod state;
