//! Gamepad polling

use crate::input::{GamePadState, GamepadSettings};
use log::info;

/// Something that can report player one's gamepad each frame
pub trait GamepadSource {
    fn poll(&mut self) -> GamePadState;
}

/// Reports a neutral gamepad forever
pub struct NoGamepad;

impl GamepadSource for NoGamepad {
    fn poll(&mut self) -> GamePadState {
        GamePadState::default()
    }
}

/// Opens the gamepad backend, falling back to [`NoGamepad`] when disabled or unavailable
pub fn open(settings: GamepadSettings, enabled: bool) -> Box<dyn GamepadSource> {
    if !enabled {
        info!("gamepad input disabled");
        return Box::new(NoGamepad);
    }
    open_backend(settings)
}

#[cfg(feature = "gamepad")]
fn open_backend(settings: GamepadSettings) -> Box<dyn GamepadSource> {
    match gilrs_backend::GilrsGamepad::new(settings) {
        Ok(gamepad) => Box::new(gamepad),
        Err(err) => {
            log::warn!("{err}; continuing without gamepad");
            Box::new(NoGamepad)
        }
    }
}

#[cfg(not(feature = "gamepad"))]
fn open_backend(settings: GamepadSettings) -> Box<dyn GamepadSource> {
    log::debug!("built without gamepad support, ignoring {settings:?}");
    Box::new(NoGamepad)
}

#[cfg(feature = "gamepad")]
mod gilrs_backend {
    use super::GamepadSource;
    use crate::error::AppError;
    use crate::input::{apply_stick_deadzone, apply_trigger_deadzone, GamePadState, GamepadSettings};
    use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
    use log::{debug, info};

    /// First connected gamepad acts as player one
    pub struct GilrsGamepad {
        gilrs: Gilrs,
        active: Option<GamepadId>,
        settings: GamepadSettings,
    }

    impl GilrsGamepad {
        pub fn new(settings: GamepadSettings) -> Result<Self, AppError> {
            let gilrs = Gilrs::new().map_err(|err| AppError::Gamepad(err.to_string()))?;
            let active = gilrs.gamepads().next().map(|(id, gamepad)| {
                info!("using gamepad {}", gamepad.name());
                id
            });
            Ok(GilrsGamepad {
                gilrs,
                active,
                settings,
            })
        }

        fn read(&self, id: GamepadId) -> GamePadState {
            let gamepad = self.gilrs.gamepad(id);
            let stick =
                |axis: Axis| apply_stick_deadzone(gamepad.value(axis), self.settings.stick_deadzone);
            let trigger = |button: Button| {
                let value = gamepad
                    .button_data(button)
                    .map(|data| data.value())
                    .unwrap_or(0.0);
                apply_trigger_deadzone(value, self.settings.trigger_deadzone)
            };

            GamePadState {
                back: gamepad.is_pressed(Button::Select),
                left_stick_y: stick(Axis::LeftStickY),
                right_stick_y: stick(Axis::RightStickY),
                left_trigger: trigger(Button::LeftTrigger2),
                right_trigger: trigger(Button::RightTrigger2),
            }
        }
    }

    impl GamepadSource for GilrsGamepad {
        fn poll(&mut self) -> GamePadState {
            // Drain events so gilrs updates its cached state
            while let Some(gilrs::Event { id, event, .. }) = self.gilrs.next_event() {
                match event {
                    EventType::Connected => {
                        info!("gamepad connected: {}", self.gilrs.gamepad(id).name());
                        self.active.get_or_insert(id);
                    }
                    EventType::Disconnected if self.active == Some(id) => {
                        info!("gamepad disconnected");
                        self.active = None;
                    }
                    _ => {}
                }
            }

            if self.active.is_none() {
                self.active = self.gilrs.gamepads().next().map(|(id, _)| id);
                if let Some(id) = self.active {
                    debug!("switched to gamepad {id:?}");
                }
            }

            match self.active {
                Some(id) => self.read(id),
                None => GamePadState::default(),
            }
        }
    }
}
