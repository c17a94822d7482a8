// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! A low poly bunny built from ellipsoids. It faces +Z, its up is +Y and it rests on `y = 0`.

use glam::{vec3, Mat3, Vec3};
use renderer::{derive_vertex, MeshBuilder};
use std::f32::consts::{PI, TAU};

derive_vertex!(
    /// Vertex of the bunny mesh.
    pub struct BunnyVertex {
        /// Position in model space.
        pub position: Vec3,
        /// Unit length outward normal.
        pub normal: Vec3,
    }
);

const STACKS: usize = 12;
const SLICES: usize = 16;

/// One ellipsoid of the bunny.
struct Part {
    center: Vec3,
    radii: Vec3,
    /// Tilt around +Z in radians.
    roll: f32,
}

fn parts() -> [Part; 5] {
    let part = |center: Vec3, radii: Vec3, roll: f32| Part {
        center,
        radii,
        roll,
    };
    let ear = vec3(0.08, 0.35, 0.05);

    [
        // Body.
        part(vec3(0.0, 0.5, 0.0), vec3(0.55, 0.5, 0.7), 0.0),
        // Head.
        part(vec3(0.0, 1.05, 0.6), vec3(0.33, 0.3, 0.35), 0.0),
        // Ears.
        part(vec3(-0.13, 1.55, 0.5), ear, 0.2),
        part(vec3(0.13, 1.55, 0.5), ear, -0.2),
        // Tail.
        part(vec3(0.0, 0.6, -0.72), Vec3::splat(0.15), 0.0),
    ]
}

/// Builds the bunny mesh.
pub fn bunny_mesh() -> MeshBuilder<BunnyVertex> {
    let mut mesh = MeshBuilder::new();
    for part in &parts() {
        mesh.extend(&ellipsoid(part));
    }
    mesh
}

/// A UV sphere scaled by `radii`, rolled and moved to `center`.
fn ellipsoid(part: &Part) -> MeshBuilder<BunnyVertex> {
    let rotation = Mat3::from_rotation_z(part.roll);
    let mut mesh = MeshBuilder::new();

    for stack in 0..=STACKS {
        let (sin_phi, cos_phi) = (stack as f32 * (PI / STACKS as f32)).sin_cos();
        for slice in 0..=SLICES {
            let (sin_theta, cos_theta) = (slice as f32 * (TAU / SLICES as f32)).sin_cos();
            let unit = vec3(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);

            // The normal of an ellipsoid is the gradient of its implicit equation.
            mesh.vertices.push(BunnyVertex {
                position: part.center + rotation * (unit * part.radii),
                normal: (rotation * (unit / part.radii)).normalize(),
            });
        }
    }

    let row = SLICES as u16 + 1;
    for stack in 0..STACKS as u16 {
        for slice in 0..SLICES as u16 {
            let a = stack * row + slice;
            let b = a + row;
            mesh.push_triangle([a, a + 1, b]);
            mesh.push_triangle([a + 1, b + 1, b]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_in_range() {
        let mesh = bunny_mesh();
        assert_eq!(mesh.triangle_count(), parts().len() * STACKS * SLICES * 2);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn normals_are_unit() {
        for v in bunny_mesh().vertices {
            assert!((v.normal.length() - 1.0).abs() < 1e-4, "{:?}", v.normal);
        }
    }

    #[test]
    fn rests_on_ground() {
        let min_y = bunny_mesh()
            .vertices
            .iter()
            .map(|v| v.position.y)
            .fold(f32::INFINITY, f32::min);
        assert!(min_y.abs() < 1e-4, "{}", min_y);
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = bunny_mesh();
        for triangle in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices[triangle[i] as usize]);
            let face = (b.position - a.position).cross(c.position - a.position);

            // Triangles touching the poles are degenerate.
            if face.length() < 1e-6 {
                continue;
            }
            let normal = a.normal + b.normal + c.normal;
            assert!(face.dot(normal) > 0.0, "{:?}", triangle);
        }
    }
}
