use crate::graphics::{Color, Framebuffer};
use crate::math::{default_view, projection_matrix};
use crate::model::Model;
use crate::state::AppState;
use crate::terminal::{CellGrid, Viewport};
use log::debug;
use std::time::Instant;

/// Cell where the parameter overlay starts
pub const OVERLAY_ORIGIN: (u16, u16) = (2, 1);

/// Renders the model with the current projection plus the parameter overlay
pub struct ProjectionWidget {
    model: Model,
    framebuffer: Framebuffer,
    canvas: CellGrid,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl ProjectionWidget {
    pub fn new(viewport: Viewport) -> Self {
        let mut model = Model::demo();
        model.enable_default_lighting();
        model.set_view(default_view());
        debug!("model ready with {} effect slots", model.effects().count());

        ProjectionWidget {
            model,
            framebuffer: Framebuffer::new(
                viewport.pixel_width() as usize,
                viewport.pixel_height() as usize,
            ),
            canvas: CellGrid::new(viewport),
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        debug!("viewport resized to {}x{} cells", viewport.cols, viewport.rows);
        self.framebuffer.resize(
            viewport.pixel_width() as usize,
            viewport.pixel_height() as usize,
        );
        self.canvas.resize(viewport);
    }

    pub fn canvas(&self) -> &CellGrid {
        &self.canvas
    }

    /// Draws one frame into the canvas
    pub fn draw(&mut self, state: &AppState) {
        self.count_frame();

        self.framebuffer.clear(Color::CORNFLOWER_BLUE);

        let projection = projection_matrix(state);
        self.model.apply_projection(projection);
        self.model.draw(&mut self.framebuffer);

        self.canvas.compose(&self.framebuffer);
        let (col, row) = OVERLAY_ORIGIN;
        self.canvas
            .draw_text(col, row, &overlay_text(state), Color::WHITE);
    }

    fn count_frame(&mut self) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
            debug!("fps: {:.2}", self.fps);
        }
    }
}

/// The five parameter lines shown over the scene
pub fn overlay_text(state: &AppState) -> String {
    format!(
        "Angle : {}\nAspect : {}\nNearLimit : {}\nFarLimit : {}\nMousePressAutoMode : {}",
        state.angle, state.aspect, state.near_limit, state.far_limit, state.auto_mode
    )
}
