use std::fmt;

/// Default vertical field of view in degrees
pub const DEFAULT_ANGLE: f32 = 45.0;
/// Near clipping distance, never changed at runtime
pub const NEAR_LIMIT: f32 = 1.0;
/// Default far clipping distance
pub const DEFAULT_FAR_LIMIT: f32 = 100.0;

/// Which parameter is driven by the sine sweep
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AutoMode {
    /// Every parameter follows manual input
    #[default]
    None,
    /// Field of view sweeps between 0 and 180 degrees
    Angle,
    /// Aspect ratio sweeps between 0 and 4
    Aspect,
    /// Far clipping distance sweeps between 0 and 16
    FarLimit,
}

impl AutoMode {
    const ALL: [AutoMode; 4] = [
        AutoMode::None,
        AutoMode::Angle,
        AutoMode::Aspect,
        AutoMode::FarLimit,
    ];

    /// Numeric index shown in the overlay (0..=3)
    pub fn index(self) -> usize {
        match self {
            AutoMode::None => 0,
            AutoMode::Angle => 1,
            AutoMode::Aspect => 2,
            AutoMode::FarLimit => 3,
        }
    }

    /// Mode for an arbitrary counter value, wrapping modulo 4
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// The mode selected by one more click
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for AutoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Application state
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    /// Vertical field of view in degrees
    pub angle: f32,
    /// Viewport width / height
    pub aspect: f32,
    /// Near clipping distance
    pub near_limit: f32,
    /// Far clipping distance
    pub far_limit: f32,
    /// Parameter currently driven by the sine sweep
    pub auto_mode: AutoMode,
    /// Left mouse button state seen by the previous frame
    pub mouse_pressed: bool,
}

impl AppState {
    /// Creates the startup state for a viewport of the given pixel size
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        AppState {
            angle: DEFAULT_ANGLE,
            aspect: viewport_width as f32 / viewport_height.max(1) as f32,
            near_limit: NEAR_LIMIT,
            far_limit: DEFAULT_FAR_LIMIT,
            auto_mode: AutoMode::None,
            mouse_pressed: false,
        }
    }
}
