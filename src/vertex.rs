use glam::{Vec2, Vec3};

/// Vertex structure with screen position, depth, and normal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Pixel coordinates, origin at the top-left corner
    pub screen_position: Vec2,
    /// Normalized device depth, visible in `0.0..=1.0`
    pub depth: f32,
    /// World space normal
    pub normal: Vec3,
}
