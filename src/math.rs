use crate::effect::Lighting;
use crate::graphics::Color;
use crate::state::AppState;
use glam::{Mat4, Vec2, Vec3};

/// Where the camera sits
pub const CAMERA_POSITION: Vec3 = Vec3::new(3.0, 3.0, 6.0);

/// Edge function used in rasterization
pub fn edge_function(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Calculates the per-channel light intensity for a surface normal
pub fn calculate_light_intensity(normal: Vec3, lighting: &Lighting) -> Vec3 {
    lighting
        .lights
        .iter()
        .filter(|light| light.enabled)
        .fold(lighting.ambient_light_color, |total, light| {
            // Lights travel along `direction`, so the surface faces them when
            // the normal points the other way
            let facing = normal.dot(-light.direction).max(0.0);
            total + light.diffuse_color * facing
        })
}

/// Applies lighting to a color
pub fn apply_lighting(color: Color, intensity: Vec3) -> Color {
    let (r, g, b) = color.as_rgb8();
    let scale = |channel: u8, factor: f32| (channel as f32 * factor).clamp(0.0, 255.0) as u8;
    Color::rgb8(
        scale(r, intensity.x),
        scale(g, intensity.y),
        scale(b, intensity.z),
    )
}

/// Camera looking from [`CAMERA_POSITION`] at the origin with +Y up
pub fn default_view() -> Mat4 {
    Mat4::look_at_rh(CAMERA_POSITION, Vec3::ZERO, Vec3::Y)
}

/// Right-handed perspective projection with a 0..1 depth range
pub fn projection_matrix(state: &AppState) -> Mat4 {
    Mat4::perspective_rh(
        state.angle.to_radians(),
        state.aspect,
        state.near_limit,
        state.far_limit,
    )
}
