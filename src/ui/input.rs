/// Input state tracker and joystick-axis emulation.
///
/// Tracks which keys are currently held down, enabling:
///   - A level-style analog axis from the keyboard (hold = deflected)
///   - Edge-triggered start/reset (only fires on the initial press)
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't
/// support it.
///
/// The axis mimics the original 10-bit ADC: 0 = stick fully up,
/// 1023 = fully down, ~512 at rest. Session thresholds are applied by the
/// caller, not here.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind};

/// After this duration without a Press/Repeat event, consider the key
/// released. Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub const AXIS_UP: u16 = 0;
pub const AXIS_REST: u16 = 512;
pub const AXIS_DOWN: u16 = 1023;

const UP_KEYS: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('k')];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('j')];
const START_KEYS: [KeyCode; 2] = [KeyCode::Char(' '), KeyCode::Enter];
const RESET_KEYS: [KeyCode; 1] = [KeyCode::Char('r')];
const QUIT_KEYS: [KeyCode; 1] = [KeyCode::Char('q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned "not held" → "held" during the most recent
    /// drain_events() call. Used for edge-triggered actions.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before reading the axis.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);

                match key.kind {
                    KeyEventKind::Release if self.honor_release => {
                        self.last_active.remove(&key.code);
                    }
                    KeyEventKind::Release => {
                        // Rely on timeout-based expiry instead.
                    }
                    _ => {
                        let was_held = self.is_held_inner(key.code);
                        self.last_active.insert(key.code, Instant::now());
                        if !was_held {
                            self.fresh_presses.push(key.code);
                        }
                    }
                }
            }
        }

        // Expire keys that have timed out (terminals without Release).
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Joystick axis sample. Up keys win over down keys when both are held,
    /// matching a stick that can only point one way at a time.
    pub fn read_axis(&self) -> u16 {
        if self.any_held(&UP_KEYS) {
            AXIS_UP
        } else if self.any_held(&DOWN_KEYS) {
            AXIS_DOWN
        } else {
            AXIS_REST
        }
    }

    /// Center-press edge: starts a session.
    pub fn start_pressed(&self) -> bool {
        self.any_pressed(&START_KEYS)
    }

    /// Reset-sensor edge: leaves the end screen.
    pub fn reset_pressed(&self) -> bool {
        self.any_pressed(&RESET_KEYS)
    }

    pub fn quit_requested(&self) -> bool {
        self.any_pressed(&QUIT_KEYS) || self.ctrl_c_pressed()
    }

    fn ctrl_c_pressed(&self) -> bool {
        use crossterm::event::KeyModifiers;
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held_inner(*c))
    }

    fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    fn is_held_inner(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}
