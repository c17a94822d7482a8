// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use glam::{Mat4, Vec3};
use renderer::{Camera, Renderer, ShaderBinding};

/// A 3 dimensional camera. It's recommended to create a new one each frame.
#[derive(Clone, Debug, Default)]
pub struct Camera3d {
    /// The [camera matrix](https://en.wikipedia.org/wiki/Camera_matrix).
    pub camera_matrix: Mat4,
    /// The [projection matrix](https://en.wikipedia.org/wiki/Projection_matrix).
    pub projection_matrix: Mat4,
    /// The [`inverse`][`Mat4::inverse`] of `camera_matrix`.
    pub view_matrix: Mat4,
    /// Equal to `projection_matrix * view_matrix`.
    pub vp_matrix: Mat4,
}

impl Camera for Camera3d {
    /// Sets `uniform vec3 uCameraPos;`, `uniform mat4 uView;` and
    /// `uniform mat4 uViewProjection;`.
    fn prepare(&self, shader: &ShaderBinding) {
        self.debug_assert_valid();
        shader.uniform3f("uCameraPos", self.position());
        shader.uniform_matrix4f("uView", &self.view_matrix);
        shader.uniform_matrix4f("uViewProjection", &self.vp_matrix);
    }
}

impl Camera3d {
    /// Enables the depth test and back face culling that 3D draws expect.
    pub fn init(renderer: &Renderer) {
        renderer.set_depth_test(true);
        renderer.enable_cull_face();
    }

    fn debug_assert_valid(&self) {
        #[cfg(debug_assertions)]
        if self.vp_matrix == Mat4::default() {
            js_hooks::console_log!("using invalid Camera3d")
        }
    }
}

/// [`Perspective`] projections make objects that are further from the [`Camera3d`] appear smaller.
#[derive(Clone, Debug)]
pub struct Perspective {
    /// [Aspect ratio](https://en.wikipedia.org/wiki/Aspect_ratio_(image)) of viewport (get with
    /// [`Renderer::aspect_ratio`][`renderer::Renderer::aspect_ratio`]). Required
    /// or defaults to `1.0`.
    pub aspect: f32,
    /// Vertical [field of view](https://en.wikipedia.org/wiki/Field_of_view) in degrees.
    /// Defaults to `45.0`.
    pub fov: f32,
    /// Near [clip](https://en.wikipedia.org/wiki/Clipping_(computer_graphics)) plane in world
    /// space. Defaults to `0.01`.
    pub z_near: f32,
    /// Far [clip](https://en.wikipedia.org/wiki/Clipping_(computer_graphics)) plane in world space.
    /// Defaults to `1000.0`.
    pub z_far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            fov: 45.0,
            z_near: 0.01,
            z_far: 1000.0,
        }
    }
}

impl Projection for Perspective {
    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.z_near, self.z_far)
    }
}

/// A [`Projection`] defines how objects appear based on their distance to the [`Camera3d`].
pub trait Projection {
    /// Gets the [projection matrix](https://en.wikipedia.org/wiki/Projection_matrix).
    fn projection_matrix(&self) -> Mat4;
}

impl Camera3d {
    /// Creates a new [`Camera3d`] that is looking from `pos` at `target`. Assumes up is +Y.
    pub fn looking_at(pos: Vec3, target: Vec3, projection: impl Projection) -> Self {
        let view_matrix = Mat4::look_at_rh(pos, target, Vec3::Y);
        Self::with_view(view_matrix, projection)
    }

    /// Creates a new [`Camera3d`] with a `view_matrix`.
    pub fn with_view(view_matrix: Mat4, projection: impl Projection) -> Self {
        let camera_matrix = view_matrix.inverse();
        let projection_matrix = projection.projection_matrix();
        let vp_matrix = projection_matrix * view_matrix;

        Self {
            camera_matrix,
            projection_matrix,
            view_matrix,
            vp_matrix,
        }
    }

    /// Returns the position of the [`Camera3d`].
    pub fn position(&self) -> Vec3 {
        self.camera_matrix.w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn looking_at() {
        let pos = Vec3::new(0.0, 0.0, 10.0);
        let camera = Camera3d::looking_at(pos, Vec3::ZERO, Perspective::default());
        assert!(approx(camera.position(), pos));

        // The target is straight ahead, 10 units deep.
        assert!(approx(
            camera.view_matrix.transform_point3(Vec3::ZERO),
            Vec3::new(0.0, 0.0, -10.0)
        ));

        // The target lands in the center of the screen.
        let ndc = camera.vp_matrix.project_point3(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }
}
