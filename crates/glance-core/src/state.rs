//! Owned watchface state and its event handlers
//!
//! [`GlanceState`] holds everything the face shows: the reading window, the
//! recency bookkeeping, the derived labels, the trend icon slot and the graph's
//! dirty flag. It lives for the whole app and the host loop passes it by
//! reference to each handler.

use heapless::String;
use log::{debug, info, warn};

use crate::clock::{CLOCK_LABEL_CHARS, clock_label};
use crate::config::GlanceConfig;
use crate::events::{Event, EventQueue};
use crate::face::GRAPH_AREA;
use crate::graph::GlucoseGraph;
use crate::icons::{IconStore, TrendIndicator};
use crate::message::{GlucoseUpdate, InboundMessage, MAX_TEXT_BYTES, MessageError};
use crate::metrics::{
    DELTA_CHARS, Freshness, LAST_READING_CHARS, RECENCY_LABEL_CHARS, Recency, compute_delta,
    format_last, recency_label,
};
use crate::readings::ReadingBuffer;

/// Label values recomputed from the buffer and recency state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedDisplay {
    pub last_reading: String<LAST_READING_CHARS>,
    pub delta: String<DELTA_CHARS>,
    /// Insulin-on-board text as sent; the face clips it on screen
    pub iob: String<MAX_TEXT_BYTES>,
    pub recency: Recency,
    pub freshness: Freshness,
    pub recency_label: String<RECENCY_LABEL_CHARS>,
    pub clock: String<CLOCK_LABEL_CHARS>,
}

impl Default for DerivedDisplay {
    fn default() -> Self {
        Self {
            last_reading: String::new(),
            delta: String::new(),
            iob: String::new(),
            recency: Recency::default(),
            freshness: Freshness::Fresh,
            recency_label: String::new(),
            clock: String::new(),
        }
    }
}

/// Application context for the watchface.
pub struct GlanceState<S: IconStore> {
    config: GlanceConfig,
    readings: ReadingBuffer,
    last_message_at: i64,
    reported_lag_secs: i32,
    display: DerivedDisplay,
    trend: TrendIndicator<S>,
    graph: GlucoseGraph,
    labels_dirty: bool,
}

impl<S: IconStore> GlanceState<S> {
    /// Create the state at start-up time `now`.
    ///
    /// The phone link counts as just heard from, so the display starts out
    /// fresh with `(0/0)`.
    pub fn new(store: S, config: GlanceConfig, now: i64) -> Self {
        let mut state = Self {
            config,
            readings: ReadingBuffer::new(),
            last_message_at: now,
            reported_lag_secs: 0,
            display: DerivedDisplay::default(),
            trend: TrendIndicator::new(store),
            graph: GlucoseGraph::new(GRAPH_AREA),
            labels_dirty: true,
        };
        state.display.clock = clock_label(now, config.utc_offset());
        state.update_recency(now);
        info!(
            "Watchface started (stale after {} min, UTC offset {} min)",
            config.stale_after_minutes, config.utc_offset_minutes
        );
        state
    }

    /// Apply an inbound message received at `now`.
    ///
    /// The message is validated first; on error nothing changes and the
    /// previous display values remain.
    pub fn handle_message(
        &mut self,
        message: &InboundMessage,
        now: i64,
    ) -> Result<(), MessageError> {
        let update = GlucoseUpdate::try_from(message)?;
        self.apply(update, now);
        Ok(())
    }

    fn apply(&mut self, update: GlucoseUpdate, now: i64) {
        self.last_message_at = now;

        let last = self.readings.load(&update.window);
        self.display.last_reading = format_last(last.map_or(0, |value| value.mg_dl()));
        let (prev, curr) = self.readings.last_two();
        self.display.delta = compute_delta(prev, curr);

        self.trend.set_code(update.trend);
        self.reported_lag_secs = update.lag_secs;
        self.display.iob = update.iob;

        self.graph.mark_dirty();
        self.update_recency(now);
        self.labels_dirty = true;

        debug!(
            "Applied update: last {} delta {} trend {} lag {}s ({} readings)",
            self.display.last_reading,
            self.display.delta,
            update.trend,
            update.lag_secs,
            self.readings.present_count()
        );
    }

    /// Once-per-minute refresh of the clock and recency labels.
    pub fn on_minute_tick(&mut self, now: i64) {
        self.display.clock = clock_label(now, self.config.utc_offset());
        self.update_recency(now);
        self.labels_dirty = true;
    }

    fn update_recency(&mut self, now: i64) {
        let recency = Recency::compute(now, self.last_message_at, self.reported_lag_secs);
        let freshness = Freshness::classify(
            recency.phone_minutes,
            recency.data_minutes,
            self.config.stale_after(),
        );

        if freshness != self.display.freshness {
            info!(
                "Display now {} ({} min since phone, {} min since reading)",
                freshness.label(),
                recency.phone_minutes,
                recency.data_minutes
            );
        }

        self.display.recency = recency;
        self.display.freshness = freshness;
        self.display.recency_label = recency_label(&recency);
    }

    /// Handle one host event.
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Message {
                message,
                received_at,
            } => {
                if let Err(err) = self.handle_message(&message, received_at) {
                    warn!("Rejected message: {}", err);
                }
            }
            Event::MinuteTick { now } => self.on_minute_tick(now),
            Event::Redraw => self.request_redraw(),
        }
    }

    /// Dispatch every pending event in order. Returns how many were handled.
    pub fn drain(&mut self, queue: &EventQueue) -> usize {
        let mut handled = 0;
        while let Some(event) = queue.pop() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Mark every part of the face for repainting.
    pub fn request_redraw(&mut self) {
        self.graph.mark_dirty();
        self.labels_dirty = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.labels_dirty || self.graph.is_dirty() || self.trend.is_dirty()
    }

    /// Called by the face after a full paint pass.
    pub fn mark_clean(&mut self) {
        self.labels_dirty = false;
        self.graph.mark_clean();
        self.trend.mark_clean();
    }

    /// Release the held trend icon on teardown.
    pub fn shutdown(&mut self) {
        self.trend.clear();
        info!("Watchface shut down");
    }

    pub fn readings(&self) -> &ReadingBuffer {
        &self.readings
    }

    pub fn display(&self) -> &DerivedDisplay {
        &self.display
    }

    pub fn trend(&self) -> &TrendIndicator<S> {
        &self.trend
    }

    pub fn graph(&self) -> &GlucoseGraph {
        &self.graph
    }

    pub fn last_message_at(&self) -> i64 {
        self.last_message_at
    }
}
