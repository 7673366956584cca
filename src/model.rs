use crate::effect::BasicEffect;
use crate::graphics::{draw_mesh_part, Color, Framebuffer};
use crate::math::calculate_normal;
use glam::{Mat4, Vec3};

/// Triangles sharing one effect
#[derive(Clone, Debug)]
pub struct MeshPart {
    pub vertices: Vec<Vec3>,
    /// One normal per vertex
    pub normals: Vec<Vec3>,
    /// Vertex indices, three per triangle
    pub triangles: Vec<[usize; 3]>,
    pub effect: BasicEffect,
}

impl MeshPart {
    /// Flat-shaded quad split into two triangles; corners go around the edge
    pub fn quad(corners: [Vec3; 4], color: Color) -> Self {
        let [a, b, c, _] = corners;
        let normal = calculate_normal(a, b, c);
        MeshPart {
            vertices: corners.to_vec(),
            normals: vec![normal; 4],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            effect: BasicEffect::new(color),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub parts: Vec<MeshPart>,
}

impl Mesh {
    pub fn draw(&self, framebuffer: &mut Framebuffer) {
        for part in &self.parts {
            draw_mesh_part(part, framebuffer);
        }
    }
}

/// A drawable made of named meshes
#[derive(Clone, Debug)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

impl Model {
    /// Built-in scene: a colored cube standing on a floor tile
    pub fn demo() -> Self {
        Model {
            meshes: vec![cube_mesh(), floor_mesh()],
        }
    }

    /// Every effect slot of every mesh part
    pub fn effects_mut(&mut self) -> impl Iterator<Item = &mut BasicEffect> + '_ {
        self.meshes
            .iter_mut()
            .flat_map(|mesh| mesh.parts.iter_mut())
            .map(|part| &mut part.effect)
    }

    pub fn effects(&self) -> impl Iterator<Item = &BasicEffect> + '_ {
        self.meshes
            .iter()
            .flat_map(|mesh| mesh.parts.iter())
            .map(|part| &part.effect)
    }

    pub fn set_view(&mut self, view: Mat4) {
        for effect in self.effects_mut() {
            effect.view = view;
        }
    }

    pub fn apply_projection(&mut self, projection: Mat4) {
        for effect in self.effects_mut() {
            effect.projection = projection;
        }
    }

    pub fn enable_default_lighting(&mut self) {
        for effect in self.effects_mut() {
            effect.enable_default_lighting();
        }
    }

    pub fn draw(&self, framebuffer: &mut Framebuffer) {
        for mesh in &self.meshes {
            mesh.draw(framebuffer);
        }
    }
}

/// 2x2x2 cube centred at the origin, one part per face
fn cube_mesh() -> Mesh {
    // Define cube vertices
    let vertices = [
        Vec3::new(-1.0, -1.0, -1.0), // 0
        Vec3::new(1.0, -1.0, -1.0),  // 1
        Vec3::new(1.0, 1.0, -1.0),   // 2
        Vec3::new(-1.0, 1.0, -1.0),  // 3
        Vec3::new(-1.0, -1.0, 1.0),  // 4
        Vec3::new(1.0, -1.0, 1.0),   // 5
        Vec3::new(1.0, 1.0, 1.0),    // 6
        Vec3::new(-1.0, 1.0, 1.0),   // 7
    ];

    // Define cube faces (each face is defined by 4 vertex indices)
    let faces = [
        (0, 1, 2, 3),
        (5, 4, 7, 6),
        (4, 0, 3, 7),
        (1, 5, 6, 2),
        (4, 5, 1, 0),
        (3, 2, 6, 7),
    ];

    // Define face colors
    let face_colors = [
        Color::rgb8(255, 0, 0),   // Red
        Color::rgb8(0, 255, 0),   // Green
        Color::rgb8(0, 0, 255),   // Blue
        Color::rgb8(255, 255, 0), // Yellow
        Color::rgb8(255, 0, 255), // Magenta
        Color::rgb8(0, 255, 255), // Cyan
    ];

    let parts = faces
        .iter()
        .zip(face_colors)
        .map(|(&(a, b, c, d), color)| {
            let mut part = MeshPart::quad(
                [vertices[a], vertices[b], vertices[c], vertices[d]],
                color,
            );
            // Face normals point away from the cube's centre
            let centroid = part.vertices.iter().copied().sum::<Vec3>() / 4.0;
            if part.normals[0].dot(centroid) < 0.0 {
                for normal in &mut part.normals {
                    *normal = -*normal;
                }
            }
            part
        })
        .collect();

    Mesh {
        name: "Cube".to_string(),
        parts,
    }
}

/// Grey tile just under the cube
fn floor_mesh() -> Mesh {
    let y = -1.01;
    let floor = MeshPart::quad(
        [
            Vec3::new(-4.0, y, -4.0),
            Vec3::new(-4.0, y, 4.0),
            Vec3::new(4.0, y, 4.0),
            Vec3::new(4.0, y, -4.0),
        ],
        Color::rgb8(128, 128, 128),
    );
    Mesh {
        name: "Floor".to_string(),
        parts: vec![floor],
    }
}
