use crate::error::AppError;
use crate::gamepad::GamepadSource;
use crate::input::{InputTracker, KeyHoldMode};
use crate::state::AppState;
use crate::terminal::{CellGrid, TerminalSession, Viewport};
use crate::update::{update, Control};
use crate::widget::ProjectionWidget;
use crossterm::event::{self, Event};
use log::{debug, info};
use std::time::{Duration, Instant};

/// The demo: state, renderer, and input sources driven by a fixed-rate frame loop
pub struct App {
    state: AppState,
    widget: ProjectionWidget,
    input: InputTracker,
    gamepad: Box<dyn GamepadSource>,
    frame_duration: Duration,
}

impl App {
    pub fn new(
        viewport: Viewport,
        key_mode: KeyHoldMode,
        gamepad: Box<dyn GamepadSource>,
        fps: u32,
    ) -> Self {
        let state = AppState::new(viewport.pixel_width(), viewport.pixel_height());
        info!(
            "viewport {}x{} cells, aspect {}, keys {:?}",
            viewport.cols, viewport.rows, state.aspect, key_mode
        );
        App {
            state,
            widget: ProjectionWidget::new(viewport),
            input: InputTracker::new(key_mode),
            gamepad,
            frame_duration: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn canvas(&self) -> &CellGrid {
        self.widget.canvas()
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Resize(cols, rows) = *event {
            self.widget.resize(Viewport::new(cols, rows));
        }
        self.input.handle_event(event);
    }

    /// Updates and draws one frame at `total_seconds` of game time.
    ///
    /// Nothing is drawn once exit has been requested.
    pub fn frame(&mut self, total_seconds: f64) -> Control {
        let snapshot = self.input.snapshot(self.gamepad.poll());
        let control = update(&mut self.state, &snapshot, total_seconds);
        if control == Control::Exit {
            info!("exit requested");
            return control;
        }
        self.widget.draw(&self.state);
        control
    }

    /// Runs frames until exit is requested
    pub fn run(&mut self, session: &mut TerminalSession) -> Result<(), AppError> {
        let start = Instant::now();
        let mut deadline = start;
        loop {
            // Collect input until this frame is due
            loop {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                if event::poll(deadline - now)? {
                    let event = event::read()?;
                    self.handle_event(&event);
                }
            }
            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(&event);
            }

            if self.frame(start.elapsed().as_secs_f64()) == Control::Exit {
                debug!("final state: {:?}", self.state());
                return Ok(());
            }
            session.present(self.canvas())?;

            deadline += self.frame_duration;
            // Skip frames lost to a stall instead of rushing through them
            let now = Instant::now();
            if deadline < now {
                deadline = now;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::NoGamepad;
    use crate::input::GamePadState;
    use crate::state::AutoMode;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    };

    struct BackPressed;

    impl GamepadSource for BackPressed {
        fn poll(&mut self) -> GamePadState {
            GamePadState {
                back: true,
                ..GamePadState::default()
            }
        }
    }

    fn app() -> App {
        App::new(
            Viewport::new(40, 20),
            KeyHoldMode::Pulse,
            Box::new(NoGamepad),
            60,
        )
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn left_mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn aspect_starts_from_viewport() {
        let app = app();
        assert_eq!(app.state().aspect, 1.0);
    }

    #[test]
    fn key_press_moves_one_frame() {
        let mut app = app();
        app.handle_event(&press(KeyCode::Down));
        assert_eq!(app.frame(0.0), Control::Continue);
        assert!((app.state().angle - 42.75).abs() < 1e-4);

        // Pulse mode: no further change without new events
        app.frame(0.1);
        assert!((app.state().angle - 42.75).abs() < 1e-4);
    }

    #[test]
    fn clicks_cycle_modes_through_event_stream() {
        let mut app = app();
        for expected in [AutoMode::Angle, AutoMode::Aspect, AutoMode::FarLimit] {
            app.handle_event(&left_mouse(MouseEventKind::Down(MouseButton::Left)));
            app.handle_event(&left_mouse(MouseEventKind::Up(MouseButton::Left)));
            app.frame(0.0);
            app.frame(0.0);
            assert_eq!(app.state().auto_mode, expected);
        }
    }

    #[test]
    fn escape_stops_before_drawing() {
        let mut app = app();
        app.handle_event(&press(KeyCode::Esc));
        assert_eq!(app.frame(0.0), Control::Exit);
        // Nothing has been drawn yet
        assert_eq!(app.canvas().cell(2, 1).map(|cell| cell.ch), Some(' '));
    }

    #[test]
    fn gamepad_back_exits() {
        let mut app = App::new(
            Viewport::new(10, 5),
            KeyHoldMode::Latched,
            Box::new(BackPressed),
            30,
        );
        assert_eq!(app.frame(0.0), Control::Exit);
    }

    #[test]
    fn resize_event_reaches_renderer() {
        let mut app = app();
        app.handle_event(&Event::Resize(50, 25));
        app.frame(0.0);
        assert!(app.canvas().cell(49, 24).is_some());
        // The aspect stays under user control
        assert_eq!(app.state().aspect, 1.0);
    }

    #[test]
    fn overlay_tracks_state() {
        let mut app = app();
        app.handle_event(&press(KeyCode::Char('z')));
        app.frame(0.0);
        let text: String = (2..15)
            .filter_map(|col| app.canvas().cell(col, 4))
            .map(|cell| cell.ch)
            .collect();
        assert_eq!(text, "FarLimit : 95");
    }
}
