//! Console output: viewport measurement, half-block cell grid, and the raw
//! mode session guard.

use crate::error::AppError;
use crate::graphics::{Color, Framebuffer};
use crate::input::KeyHoldMode;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use log::{debug, info};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '\u{2580}';

static KEYBOARD_ENHANCED: AtomicBool = AtomicBool::new(false);

impl From<Color> for style::Color {
    fn from(color: Color) -> Self {
        let (r, g, b) = color.as_rgb8();
        style::Color::Rgb { r, g, b }
    }
}

/// Terminal size in character cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Viewport { cols, rows }
    }

    /// Measures the controlling terminal
    pub fn detect() -> Result<Self, AppError> {
        let (cols, rows) = match termsize::get() {
            Some(size) => (size.cols, size.rows),
            None => terminal::size()?,
        };
        if cols == 0 || rows == 0 {
            return Err(AppError::ViewportUnavailable);
        }
        Ok(Viewport::new(cols, rows))
    }

    /// Pixel columns, one per cell
    pub fn pixel_width(&self) -> u32 {
        u32::from(self.cols)
    }

    /// Pixel rows, two per cell
    pub fn pixel_height(&self) -> u32 {
        u32::from(self.rows) * 2
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

/// What gets written to the terminal each frame
pub struct CellGrid {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(viewport: Viewport) -> Self {
        CellGrid {
            cols: viewport.cols,
            rows: viewport.rows,
            cells: vec![Cell::default(); usize::from(viewport.cols) * usize::from(viewport.rows)],
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        *self = CellGrid::new(viewport);
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells
                .get(usize::from(row) * usize::from(self.cols) + usize::from(col))
        } else {
            None
        }
    }

    fn cell_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        if col < self.cols && row < self.rows {
            self.cells
                .get_mut(usize::from(row) * usize::from(self.cols) + usize::from(col))
        } else {
            None
        }
    }

    /// Packs two pixel rows into each cell row
    pub fn compose(&mut self, framebuffer: &Framebuffer) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let x = usize::from(col);
                let y = usize::from(row) * 2;
                let top = framebuffer.pixel(x, y).unwrap_or(Color::BLACK);
                let bottom = framebuffer.pixel(x, y + 1).unwrap_or(Color::BLACK);
                if let Some(cell) = self.cell_mut(col, row) {
                    *cell = Cell {
                        ch: HALF_BLOCK,
                        fg: top,
                        bg: bottom,
                    };
                }
            }
        }
    }

    /// Writes text starting at a cell, one line per row, clipped to the grid.
    ///
    /// The scene colour under each character stays as its background.
    pub fn draw_text(&mut self, col: u16, row: u16, text: &str, color: Color) {
        for (line_index, line) in text.lines().enumerate() {
            let Ok(offset) = u16::try_from(line_index) else {
                break;
            };
            let Some(y) = row.checked_add(offset) else {
                break;
            };
            for (char_index, ch) in line.chars().enumerate() {
                let Some(x) = u16::try_from(char_index)
                    .ok()
                    .and_then(|offset| col.checked_add(offset))
                else {
                    break;
                };
                match self.cell_mut(x, y) {
                    Some(cell) => {
                        cell.ch = ch;
                        cell.fg = color;
                    }
                    None => break,
                }
            }
        }
    }

    /// Queues the whole grid on `out`, only switching colours when they change
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut current_fg = None;
        let mut current_bg = None;
        if self.cols == 0 {
            return Ok(());
        }
        for (row, line) in (0..self.rows).zip(self.cells.chunks(usize::from(self.cols))) {
            queue!(out, MoveTo(0, row))?;
            for cell in line {
                if current_fg != Some(cell.fg) {
                    queue!(out, SetForegroundColor(cell.fg.into()))?;
                    current_fg = Some(cell.fg);
                }
                if current_bg != Some(cell.bg) {
                    queue!(out, SetBackgroundColor(cell.bg.into()))?;
                    current_bg = Some(cell.bg);
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

/// Raw mode, alternate screen, mouse capture; undone on drop
pub struct TerminalSession {
    out: io::Stdout,
    keyboard_enhanced: bool,
}

impl TerminalSession {
    pub fn enter() -> Result<Self, AppError> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            Hide,
            EnableMouseCapture,
            EnableFocusChange
        )?;

        // Release events are only reported with the enhanced keyboard protocol
        let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if keyboard_enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
            KEYBOARD_ENHANCED.store(true, Ordering::SeqCst);
        }
        info!("terminal session started (keyboard enhancement: {keyboard_enhanced})");

        Ok(TerminalSession {
            out,
            keyboard_enhanced,
        })
    }

    pub fn key_hold_mode(&self) -> KeyHoldMode {
        if self.keyboard_enhanced {
            KeyHoldMode::Latched
        } else {
            KeyHoldMode::Pulse
        }
    }

    pub fn present(&mut self, grid: &CellGrid) -> Result<(), AppError> {
        let mut lock = self.out.lock();
        grid.present(&mut lock)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore();
    }
}

/// Puts the terminal back into its normal state; safe to call more than once
pub fn restore() {
    let mut out = io::stdout();
    if KEYBOARD_ENHANCED.swap(false, Ordering::SeqCst) {
        let _ = execute!(out, PopKeyboardEnhancementFlags);
    }
    let _ = execute!(
        out,
        ResetColor,
        DisableFocusChange,
        DisableMouseCapture,
        Show,
        LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
    debug!("terminal restored");
}
