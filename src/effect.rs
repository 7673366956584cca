use crate::graphics::Color;
use glam::{Mat4, Vec3};

/// A directional light shining along `direction`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in world space (normalized)
    pub direction: Vec3,
    /// Light colour, each channel in `0.0..=1.0`
    pub diffuse_color: Vec3,
    pub enabled: bool,
}

/// Ambient term plus three directional lights
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient_light_color: Vec3,
    pub lights: [DirectionalLight; 3],
}

impl Lighting {
    /// Standard key/fill/back rig
    pub fn default_rig() -> Self {
        Lighting {
            ambient_light_color: Vec3::new(0.053_333_32, 0.098_823_54, 0.181_960_8),
            lights: [
                // Key light
                DirectionalLight {
                    direction: Vec3::new(-0.526_540_8, -0.573_576_5, -0.627_506_9),
                    diffuse_color: Vec3::new(1.0, 0.960_784_4, 0.807_843_2),
                    enabled: true,
                },
                // Fill light
                DirectionalLight {
                    direction: Vec3::new(0.719_846_4, 0.342_020_1, 0.604_022_7),
                    diffuse_color: Vec3::new(0.964_705_9, 0.760_784_4, 0.407_843_2),
                    enabled: true,
                },
                // Back light
                DirectionalLight {
                    direction: Vec3::new(0.454_519_5, -0.766_044_4, 0.454_519_5),
                    diffuse_color: Vec3::new(0.323_137_3, 0.360_784_4, 0.393_725_5),
                    enabled: true,
                },
            ],
        }
    }
}

/// Render state of one mesh part.
///
/// The view matrix is installed once after loading, the projection is
/// replaced every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BasicEffect {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub diffuse_color: Color,
    /// `None` draws the diffuse colour unshaded
    pub lighting: Option<Lighting>,
}

impl BasicEffect {
    pub fn new(diffuse_color: Color) -> Self {
        BasicEffect {
            world: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            diffuse_color,
            lighting: None,
        }
    }

    pub fn enable_default_lighting(&mut self) {
        self.lighting = Some(Lighting::default_rig());
    }

    /// Object space to clip space
    pub fn world_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.world
    }
}
