/// Analog stick input via gilrs.
///
/// The left stick's vertical axis maps onto the same 0..=1023 range the
/// keyboard emulation produces (0 = fully up, 1023 = fully down), so the
/// session controller applies one set of thresholds regardless of source.
/// Start = begin session, Select = reset sensor. Without the "gamepad"
/// feature this compiles to an inert stub.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use super::input::{AXIS_DOWN, AXIS_UP};

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    stick_y: f32,
    start: BtnState,
    select: BtnState,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            stick_y: 0.0,
            start: BtnState::default(),
            select: BtnState::default(),
            connected,
        }
    }

    pub fn update(&mut self) {
        self.start.just_pressed = false;
        self.select.just_pressed = false;

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(Axis::LeftStickY, value, _) => {
                    self.connected = true;
                    self.stick_y = value;
                }
                EventType::Connected => self.connected = true,
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_y = 0.0;
                    self.start = BtnState::default();
                    self.select = BtnState::default();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, btn: Button, held: bool) {
        let slot = match btn {
            Button::Start => &mut self.start,
            Button::Select => &mut self.select,
            _ => return,
        };
        if held && !slot.held {
            slot.just_pressed = true;
        }
        slot.held = held;
    }

    // ── Queries ──

    /// Stick sample on the shared 0..=1023 range, `None` while the stick is
    /// inside the deadzone (keyboard then decides).
    pub fn read_axis(&self) -> Option<u16> {
        if !self.connected || self.stick_y.abs() <= STICK_DEADZONE {
            return None;
        }
        // gilrs: +1.0 = stick up. Map onto the ADC sense: up → low values.
        let norm = (1.0 - self.stick_y.clamp(-1.0, 1.0)) / 2.0;
        let span = (AXIS_DOWN - AXIS_UP) as f32;
        Some(AXIS_UP + (norm * span) as u16)
    }

    pub fn start_pressed(&self) -> bool {
        self.start.just_pressed
    }

    pub fn reset_pressed(&self) -> bool {
        self.select.just_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_pad_reports_no_axis() {
        let gp = GamepadState::new();
        // No pad in CI: the axis defers to the keyboard.
        if !gp.connected {
            assert_eq!(gp.read_axis(), None);
        }
    }
}
