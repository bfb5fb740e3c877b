//! Desktop simulator for the glucose-glance watchface.
//!
//! Renders the glance-core face in an SDL2 window via
//! `embedded-graphics-simulator`. A synthetic CGM feed stands in for the
//! phone, so the face can be exercised without a watch.
//!
//! # Key bindings
//!
//! | Key   | Action                                   |
//! |-------|------------------------------------------|
//! | N     | New reading                              |
//! | G     | Drop a reading (gap in the window)       |
//! | T     | Cycle the trend code                     |
//! | M     | Advance the clock by one minute          |
//! | Q/Esc | Quit                                     |
//!
//! Pass `--config <path>` to load a postcard-encoded `GlanceConfig`.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info, warn};

use glance_core::config::GlanceConfig;
use glance_core::events::{Event, EventQueue};
use glance_core::face::{SCREEN_HEIGHT_PX, SCREEN_SIZE, SCREEN_WIDTH_PX, WatchFace};
use glance_core::framebuffer::FrameBuffer;
use glance_core::icons::RasterIconStore;
use glance_core::message::InboundMessage;
use glance_core::metrics::{TREND_CODE_COUNT, TrendCode};
use glance_core::readings::{MISSING_SENTINEL, WINDOW_SLOTS};
use glance_core::state::GlanceState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 3;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Interval between automatic synthetic readings.
const MOCK_READING_INTERVAL: Duration = Duration::from_secs(10);

/// Real time between minute ticks.
const MINUTE: Duration = Duration::from_secs(60);

/// Events from the SDL loop and the mock feed, drained once per frame.
static EVENTS: EventQueue = EventQueue::new();

// ---------------------------------------------------------------------------
// Mock CGM
// ---------------------------------------------------------------------------

/// Synthetic CGM: a slow sinusoid sampled into a sliding window.
struct MockCgm {
    window: [u8; WINDOW_SLOTS],
    samples: u64,
    /// Trend code forced with `T`, `None` to derive it from the delta
    forced_trend: Option<TrendCode>,
}

impl MockCgm {
    fn new() -> Self {
        let mut cgm = Self {
            window: [MISSING_SENTINEL; WINDOW_SLOTS],
            samples: 0,
            forced_trend: None,
        };
        // Warm up with two thirds of a window so the graph is not empty
        for _ in 0..WINDOW_SLOTS * 2 / 3 {
            cgm.push(Some(cgm.sample()));
        }
        cgm
    }

    fn sample(&self) -> u8 {
        let t = self.samples as f64;
        let mg_dl = 140.0 + 70.0 * (t / 9.0).sin() + 12.0 * (t / 2.5).cos();
        mg_dl.clamp(40.0, 255.0) as u8
    }

    /// Shift the window left and append `reading` (or a gap).
    fn push(&mut self, reading: Option<u8>) {
        self.window.rotate_left(1);
        self.window[WINDOW_SLOTS - 1] = reading.unwrap_or(MISSING_SENTINEL);
        self.samples += 1;
    }

    fn next_reading(&mut self) {
        let reading = self.sample();
        self.push(Some(reading));
    }

    fn gap(&mut self) {
        self.push(None);
    }

    fn cycle_trend(&mut self) {
        let next = match self.forced_trend {
            None => 0,
            Some(code) if code as usize + 1 >= TREND_CODE_COUNT => {
                self.forced_trend = None;
                info!("Trend derived from delta");
                return;
            }
            Some(code) => code + 1,
        };
        info!("Trend forced to code {}", next);
        self.forced_trend = Some(next);
    }

    /// Trend code for the current window, derived from the last delta.
    fn trend(&self) -> TrendCode {
        if let Some(code) = self.forced_trend {
            return code;
        }
        let prev = self.window[WINDOW_SLOTS - 2];
        let curr = self.window[WINDOW_SLOTS - 1];
        if prev == MISSING_SENTINEL || curr == MISSING_SENTINEL {
            return 9;
        }
        match curr as i32 - prev as i32 {
            d if d >= 15 => 1,
            d if d >= 8 => 2,
            d if d >= 4 => 3,
            d if d > -4 => 4,
            d if d > -8 => 5,
            d if d > -15 => 6,
            _ => 7,
        }
    }

    /// Insulin on board decaying over the session.
    fn iob(&self) -> String {
        let tenths = 30u64.saturating_sub(self.samples % 31);
        format!("{}.{}u", tenths / 10, tenths % 10)
    }

    fn message(&self) -> Option<InboundMessage> {
        let lag_secs = (self.samples % 4) as i32 * 45;
        match InboundMessage::glucose_update(&self.window, self.trend(), lag_secs, &self.iob()) {
            Ok(message) => Some(message),
            Err(e) => {
                error!("Failed to build message: {}", e);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Simulated wall clock: real time plus whatever `M` added.
struct SimClock {
    offset_secs: i64,
}

impl SimClock {
    fn now(&self) -> i64 {
        let real = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        real + self.offset_secs
    }
}

/// Load the configuration named by `--config <path>`, falling back to defaults.
fn load_config() -> GlanceConfig {
    let mut args = std::env::args().skip(1);
    let path = match (args.next().as_deref(), args.next()) {
        (Some("--config"), Some(path)) => path,
        (None, _) => return GlanceConfig::default(),
        _ => {
            warn!("Usage: glance-simulator [--config <path>]");
            return GlanceConfig::default();
        }
    };

    match std::fs::read(&path) {
        Ok(bytes) => match GlanceConfig::from_bytes(&bytes) {
            Ok(config) => {
                info!("Loaded configuration from {}", path);
                config
            }
            Err(e) => {
                warn!("Invalid configuration in {}: {}", path, e);
                GlanceConfig::default()
            }
        },
        Err(e) => {
            warn!("Cannot read {}: {}", path, e);
            GlanceConfig::default()
        }
    }
}

fn send(cgm: &MockCgm, clock: &SimClock) {
    if let Some(message) = cgm.message() {
        let _ = EVENTS.push(Event::Message {
            message,
            received_at: clock.now(),
        });
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting glucose-glance simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: N=Reading  G=Gap  T=Trend  M=+1min  Q=Quit");

    let config = load_config();
    let mut clock = SimClock { offset_secs: 0 };

    // SDL2 display and window
    let mut display = SimulatorDisplay::<Rgb565>::new(SCREEN_SIZE);
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Glucose Glance", &output_settings);

    // The face draws into RAM; only changed regions reach the SDL display
    let face = WatchFace::default();
    let style = face.style();
    let mut frame = FrameBuffer::new(SCREEN_SIZE, style.background);
    let store = RasterIconStore::new(style.foreground, style.background);
    let mut state = GlanceState::new(store, config, clock.now());

    let mut cgm = MockCgm::new();
    send(&cgm, &clock);

    let mut last_reading = Instant::now();
    let mut last_minute = Instant::now();

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = display.clear(style.background);
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::N => {
                        cgm.next_reading();
                        send(&cgm, &clock);
                        last_reading = Instant::now();
                    }
                    Keycode::G => {
                        info!("Dropping a reading");
                        cgm.gap();
                        send(&cgm, &clock);
                        last_reading = Instant::now();
                    }
                    Keycode::T => {
                        cgm.cycle_trend();
                        send(&cgm, &clock);
                    }
                    Keycode::M => {
                        clock.offset_secs += 60;
                        info!("Clock advanced to +{} min", clock.offset_secs / 60);
                        let _ = EVENTS.push(Event::MinuteTick { now: clock.now() });
                    }
                    _ => {}
                },

                _ => {}
            }
        }

        // --- Mock CGM feed and timer -------------------------------------
        if last_reading.elapsed() >= MOCK_READING_INTERVAL {
            cgm.next_reading();
            send(&cgm, &clock);
            last_reading = Instant::now();
        }

        if last_minute.elapsed() >= MINUTE {
            let _ = EVENTS.push(Event::MinuteTick { now: clock.now() });
            last_minute = Instant::now();
        }

        state.drain(&EVENTS);

        // --- Render -------------------------------------------------------
        match face.paint(&mut state, &mut frame) {
            Ok(true) => {
                if let Err(e) = frame.flush(&mut display) {
                    error!("Flush error: {:?}", e);
                }
            }
            Ok(false) => {}
            Err(e) => error!("Draw error: {:?}", e),
        }

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    state.shutdown();
    info!("Simulator exiting");
}
