use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Keys the demo reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Up,
    Down,
    Left,
    Right,
    Z,
    A,
}

impl Key {
    /// Maps a terminal key event to a demo key, if it is one
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        match event.code {
            KeyCode::Esc => Some(Key::Escape),
            // Raw mode swallows SIGINT, so Ctrl+C has to leave the demo too
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Key::Escape)
            }
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Char('z') | KeyCode::Char('Z') => Some(Key::Z),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::A),
            _ => None,
        }
    }
}

/// Key-down flags for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub escape: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub z: bool,
    pub a: bool,
}

impl KeyboardState {
    pub fn set(&mut self, key: Key, down: bool) {
        let flag = match key {
            Key::Escape => &mut self.escape,
            Key::Up => &mut self.up,
            Key::Down => &mut self.down,
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Z => &mut self.z,
            Key::A => &mut self.a,
        };
        *flag = down;
    }

    /// Keys down in either state
    fn union(&self, other: &KeyboardState) -> KeyboardState {
        KeyboardState {
            escape: self.escape || other.escape,
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
            z: self.z || other.z,
            a: self.a || other.a,
        }
    }
}

/// Mouse button state for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseState {
    pub left_button: bool,
}

/// Gamepad state for one frame.
///
/// Stick axes are in `-1.0..=1.0` with up positive, triggers in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GamePadState {
    pub back: bool,
    pub left_stick_y: f32,
    pub right_stick_y: f32,
    pub left_trigger: f32,
    pub right_trigger: f32,
}

/// Everything the update step reads from the input devices
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
    pub gamepad: GamePadState,
}

impl InputSnapshot {
    /// Escape key or gamepad Back button
    pub fn back_requested(&self) -> bool {
        self.keyboard.escape || self.gamepad.back
    }
}

/// How key presses map to held keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyHoldMode {
    /// The terminal reports releases: a key is down from press to release
    Latched,
    /// No release events: a key is down for the frame its press or repeat arrived in
    Pulse,
}

/// Accumulates terminal events between frames and hands out snapshots
pub struct InputTracker {
    mode: KeyHoldMode,
    held: KeyboardState,
    pulsed: KeyboardState,
    mouse_down: bool,
    mouse_clicked: bool,
}

impl InputTracker {
    pub fn new(mode: KeyHoldMode) -> Self {
        InputTracker {
            mode,
            held: KeyboardState::default(),
            pulsed: KeyboardState::default(),
            mouse_down: false,
            mouse_clicked: false,
        }
    }

    /// Feeds one terminal event into the tracker
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key_event) => self.handle_key(key_event),
            Event::Mouse(mouse_event) => self.handle_mouse(mouse_event),
            Event::FocusLost => {
                // Releases may never arrive once focus is gone
                self.held = KeyboardState::default();
                self.mouse_down = false;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let Some(key) = Key::from_event(event) else {
            return;
        };
        match (self.mode, event.kind) {
            (KeyHoldMode::Latched, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.held.set(key, true)
            }
            (KeyHoldMode::Latched, KeyEventKind::Release) => self.held.set(key, false),
            (KeyHoldMode::Pulse, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.pulsed.set(key, true)
            }
            (KeyHoldMode::Pulse, KeyEventKind::Release) => {}
        }
    }

    fn handle_mouse(&mut self, event: &MouseEvent) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.mouse_down = true;
                self.mouse_clicked = true;
            }
            MouseEventKind::Up(MouseButton::Left) => self.mouse_down = false,
            _ => {}
        }
    }

    /// Builds the snapshot for the coming frame and clears per-frame pulses
    pub fn snapshot(&mut self, gamepad: GamePadState) -> InputSnapshot {
        let keyboard = self.held.union(&self.pulsed);
        let mouse = MouseState {
            left_button: self.mouse_down || self.mouse_clicked,
        };
        self.pulsed = KeyboardState::default();
        self.mouse_clicked = false;
        InputSnapshot {
            keyboard,
            mouse,
            gamepad,
        }
    }
}

/// Dead zones applied to raw gamepad axes
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
pub struct GamepadSettings {
    pub stick_deadzone: f32,
    pub trigger_deadzone: f32,
}

impl Default for GamepadSettings {
    fn default() -> Self {
        GamepadSettings {
            stick_deadzone: 0.24,
            trigger_deadzone: 0.12,
        }
    }
}

/// Zeroes a stick axis inside the dead zone and rescales the rest to the full range
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
pub fn apply_stick_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone || deadzone >= 1.0 {
        0.0
    } else {
        let magnitude = (value.abs() - deadzone) / (1.0 - deadzone);
        value.signum() * magnitude.clamp(0.0, 1.0)
    }
}

/// Same as [`apply_stick_deadzone`] for a trigger in `0.0..=1.0`
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
pub fn apply_trigger_deadzone(value: f32, deadzone: f32) -> f32 {
    if value < deadzone || deadzone >= 1.0 {
        0.0
    } else {
        ((value - deadzone) / (1.0 - deadzone)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn latched_key_stays_down_until_release() {
        let mut tracker = InputTracker::new(KeyHoldMode::Latched);
        tracker.handle_event(&key(KeyCode::Up, KeyEventKind::Press));
        assert!(tracker.snapshot(GamePadState::default()).keyboard.up);
        assert!(tracker.snapshot(GamePadState::default()).keyboard.up);

        tracker.handle_event(&key(KeyCode::Up, KeyEventKind::Release));
        assert!(!tracker.snapshot(GamePadState::default()).keyboard.up);
    }

    #[test]
    fn pulsed_key_lasts_one_frame() {
        let mut tracker = InputTracker::new(KeyHoldMode::Pulse);
        tracker.handle_event(&key(KeyCode::Char('Z'), KeyEventKind::Press));
        let first = tracker.snapshot(GamePadState::default());
        assert!(first.keyboard.z);
        let second = tracker.snapshot(GamePadState::default());
        assert!(!second.keyboard.z);
    }

    #[test]
    fn focus_loss_releases_latched_keys() {
        let mut tracker = InputTracker::new(KeyHoldMode::Latched);
        tracker.handle_event(&key(KeyCode::Left, KeyEventKind::Press));
        tracker.handle_event(&Event::FocusLost);
        assert_eq!(
            tracker.snapshot(GamePadState::default()).keyboard,
            KeyboardState::default()
        );
    }

    #[test]
    fn ctrl_c_requests_exit() {
        let mut tracker = InputTracker::new(KeyHoldMode::Pulse);
        tracker.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(tracker.snapshot(GamePadState::default()).back_requested());
    }

    #[test]
    fn quick_click_inside_one_frame_is_not_lost() {
        let mut tracker = InputTracker::new(KeyHoldMode::Pulse);
        tracker.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left)));
        tracker.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left)));
        assert!(tracker.snapshot(GamePadState::default()).mouse.left_button);
        assert!(!tracker.snapshot(GamePadState::default()).mouse.left_button);
    }

    #[test]
    fn held_mouse_button_reports_every_frame() {
        let mut tracker = InputTracker::new(KeyHoldMode::Pulse);
        tracker.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left)));
        for _ in 0..3 {
            assert!(tracker.snapshot(GamePadState::default()).mouse.left_button);
        }
        tracker.handle_event(&mouse(MouseEventKind::Down(MouseButton::Right)));
        tracker.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left)));
        assert!(!tracker.snapshot(GamePadState::default()).mouse.left_button);
    }

    #[test]
    fn gamepad_back_requests_exit() {
        let snapshot = InputSnapshot {
            gamepad: GamePadState {
                back: true,
                ..GamePadState::default()
            },
            ..InputSnapshot::default()
        };
        assert!(snapshot.back_requested());
        assert!(!InputSnapshot::default().back_requested());
    }

    #[test]
    fn stick_deadzone_rescales_outside_values() {
        assert_eq!(apply_stick_deadzone(0.2, 0.24), 0.0);
        assert_eq!(apply_stick_deadzone(-0.2, 0.24), 0.0);
        assert_eq!(apply_stick_deadzone(1.0, 0.24), 1.0);
        assert_eq!(apply_stick_deadzone(-1.0, 0.24), -1.0);
        assert!((apply_stick_deadzone(0.62, 0.24) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn trigger_deadzone_rescales_outside_values() {
        assert_eq!(apply_trigger_deadzone(0.1, 0.12), 0.0);
        assert_eq!(apply_trigger_deadzone(1.0, 0.12), 1.0);
        assert!((apply_trigger_deadzone(0.56, 0.12) - 0.5).abs() < 1e-6);
    }
}
