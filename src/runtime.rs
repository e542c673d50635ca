use std::cell::Cell;
use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::pitch::pitch_to_note_number;
use crate::session::{NoteInput, SessionCommand};

/// Velocity attached to notes typed on a keyboard rather than played
pub const TYPED_VELOCITY: u8 = 100;

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Source of uniform draws
pub trait Randomness {
    /// Uniform real in `[0, 1)`
    fn next_unit(&mut self) -> f64;
    /// Uniform integer in `min..=max`; returns `min` when the range is empty
    fn int_inclusive(&mut self, min: i32, max: i32) -> i32;
}

/// Adapts any `rand::Rng` to `Randomness`
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng>(pub R);

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Randomness for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn int_inclusive(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.0.gen_range(min..=max)
    }
}

/// Replays queued draws; exhausted queues yield `0.0` and `min`
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    units: VecDeque<f64>,
    ints: VecDeque<i32>,
}

impl ScriptedRandom {
    pub fn new(
        units: impl IntoIterator<Item = f64>,
        ints: impl IntoIterator<Item = i32>,
    ) -> Self {
        Self {
            units: units.into_iter().collect(),
            ints: ints.into_iter().collect(),
        }
    }
}

impl Randomness for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.0)
    }

    fn int_inclusive(&mut self, min: i32, max: i32) -> i32 {
        self.ints
            .pop_front()
            .map_or(min, |v| v.clamp(min, max.max(min)))
    }
}

/// Unified event type consumed by the drill runner
#[derive(Clone, Debug, PartialEq)]
pub enum DrillEvent {
    Command(SessionCommand),
    Quit,
    Unrecognized(String),
    Tick,
    Closed,
}

/// Map one line of typed input to an event; blank lines are ignored
pub fn parse_line(line: &str) -> Option<DrillEvent> {
    let text = line.trim();
    let event = match text {
        "" => return None,
        "q" | "quit" => DrillEvent::Quit,
        "p" | "pause" => DrillEvent::Command(SessionCommand::Pause),
        "r" | "resume" => DrillEvent::Command(SessionCommand::Resume),
        "n" | "new" => DrillEvent::Command(SessionCommand::Reset),
        _ => match parse_note(text) {
            Some(note) => DrillEvent::Command(SessionCommand::Input(NoteInput {
                note,
                velocity: TYPED_VELOCITY,
            })),
            None => DrillEvent::Unrecognized(text.to_string()),
        },
    };
    Some(event)
}

fn parse_note(text: &str) -> Option<u8> {
    if let Ok(n) = text.parse::<u8>() {
        return (n <= 127).then_some(n);
    }
    let n = pitch_to_note_number(text).ok()?;
    u8::try_from(n).ok().filter(|&n| n <= 127)
}

/// Source of drill events (typed lines, a device bridge, a test channel)
pub trait InputSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError>;
}

/// Reads lines from stdin on a background thread
pub struct LineInputSource {
    rx: Receiver<DrillEvent>,
}

impl LineInputSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if let Some(event) = parse_line(&line) {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx }
    }
}

impl Default for LineInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for LineInputSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit and headless tests
pub struct TestInputSource {
    rx: Receiver<DrillEvent>,
}

impl TestInputSource {
    pub fn new(rx: Receiver<DrillEvent>) -> Self {
        Self { rx }
    }
}

impl InputSource for TestInputSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the caller one event/tick at a time
pub struct Runner<E: InputSource, T: Ticker> {
    input_source: E,
    ticker: T,
}

impl<E: InputSource, T: Ticker> Runner<E, T> {
    pub fn new(input_source: E, ticker: T) -> Self {
        Self {
            input_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, Tick on timeout,
    /// or Closed once the source has hung up
    pub fn step(&self) -> DrillEvent {
        match self.input_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => DrillEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => DrillEvent::Closed,
        }
    }
}
