// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{Camera3d, Projection};
use glam::{vec3, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Keeps the camera from flipping over the poles where `looking_at` degenerates.
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

/// Starting pose and input sensitivity of an [`OrbitCamera`].
#[derive(Clone, Debug)]
pub struct OrbitConfig {
    /// Point the camera orbits around and looks at.
    pub center: Vec3,
    /// Starting distance from `center`.
    pub distance: f32,
    /// Starting rotation around +Y in radians. `0` looks down -Z.
    pub yaw: f32,
    /// Starting elevation in radians. Positive looks down on `center`.
    pub pitch: f32,
    /// Closest zoom.
    pub min_distance: f32,
    /// Farthest zoom.
    pub max_distance: f32,
    /// Radians per pixel dragged.
    pub rotate_speed: f32,
    /// Exponential zoom per wheel pixel.
    pub zoom_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.3,
            min_distance: 1.0,
            max_distance: 200.0,
            rotate_speed: 0.005,
            zoom_speed: 0.001,
        }
    }
}

/// A camera that orbits a center point, driven by mouse drags and the wheel
/// (see [`OrbitControls`][`crate::OrbitControls`]).
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    center: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    config: OrbitConfig,
}

impl OrbitCamera {
    /// Creates a new [`OrbitCamera`] posed as `config` describes. Reversed distance bounds are
    /// swapped and a NaN bound leaves that side unbounded.
    pub fn new(mut config: OrbitConfig) -> Self {
        (config.min_distance, config.max_distance) =
            distance_bounds(config.min_distance, config.max_distance);

        let mut camera = Self {
            center: config.center,
            distance: config.distance,
            yaw: config.yaw,
            pitch: 0.0,
            config,
        };
        camera.rotate(Vec2::new(0.0, camera.config.pitch));
        camera.zoom(1.0);
        camera
    }

    /// Rotates by `delta_radians` (x is yaw, y is pitch). Pitch stays strictly between the poles.
    pub fn rotate(&mut self, delta_radians: Vec2) {
        self.yaw = (self.yaw + delta_radians.x).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_radians.y).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Multiplies the distance by `factor`, clamped to the configured range.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Applies a mouse drag of `delta_pixels`. Dragging right spins the scene right, dragging
    /// down tilts the camera to look from above.
    pub fn drag(&mut self, delta_pixels: Vec2) {
        let speed = self.config.rotate_speed;
        self.rotate(Vec2::new(-delta_pixels.x * speed, delta_pixels.y * speed));
    }

    /// Applies a wheel scroll of `delta_pixels`. Scrolling down (positive) zooms out.
    pub fn wheel(&mut self, delta_pixels: f32) {
        self.zoom((delta_pixels * self.config.zoom_speed).exp());
    }

    /// The orbited point.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Distance from [`center`][`Self::center`].
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Elevation in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World space position of the eye.
    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.center + vec3(sy * cp, sp, cy * cp) * self.distance
    }

    /// Gets the [`Camera3d`] from the [`OrbitCamera`].
    pub fn camera_3d(&self, projection: impl Projection) -> Camera3d {
        Camera3d::looking_at(self.position(), self.center, projection)
    }
}

/// Makes `min..=max` a valid range for [`f32::clamp`].
fn distance_bounds(min: f32, max: f32) -> (f32, f32) {
    let min = if min.is_nan() { 0.0 } else { min };
    let max = if max.is_nan() { f32::INFINITY } else { max };
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Perspective;

    #[test]
    fn default_pose() {
        let camera = OrbitCamera::new(OrbitConfig {
            pitch: 0.0,
            ..Default::default()
        });
        assert!((camera.position() - vec3(0.0, 0.0, 10.0)).length() < 1e-4);
        let camera_3d = camera.camera_3d(Perspective::default());
        let center = camera_3d.view_matrix.transform_point3(camera.center());
        assert!((center - vec3(0.0, 0.0, -10.0)).length() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = OrbitCamera::new(OrbitConfig::default());
        camera.rotate(Vec2::new(0.0, 10.0));
        assert!(camera.pitch() < FRAC_PI_2);
        camera.rotate(Vec2::new(0.0, -20.0));
        assert!(camera.pitch() > -FRAC_PI_2);

        // Distance from center is preserved at the pole.
        assert!((camera.position().distance(camera.center()) - 10.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::new(OrbitConfig::default());
        camera.wheel(1_000_000.0);
        assert_eq!(camera.distance(), 200.0);
        camera.zoom(0.0);
        assert_eq!(camera.distance(), 1.0);
        camera.wheel(0.0);
        assert_eq!(camera.distance(), 1.0);
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let mut camera = OrbitCamera::new(OrbitConfig {
            min_distance: 50.0,
            max_distance: 10.0,
            ..Default::default()
        });
        assert_eq!(camera.distance(), 10.0);
        camera.wheel(1_000_000.0);
        assert_eq!(camera.distance(), 50.0);
        camera.zoom(0.0);
        assert_eq!(camera.distance(), 10.0);
    }

    #[test]
    fn nan_bounds_are_open() {
        let mut camera = OrbitCamera::new(OrbitConfig {
            min_distance: f32::NAN,
            max_distance: f32::NAN,
            ..Default::default()
        });
        assert_eq!(camera.distance(), 10.0);
        camera.zoom(2.0);
        assert_eq!(camera.distance(), 20.0);
    }

    #[test]
    fn drag_down_raises_camera() {
        let mut camera = OrbitCamera::new(OrbitConfig::default());
        let before = camera.position().y;
        camera.drag(Vec2::new(0.0, 50.0));
        assert!(camera.position().y > before);
    }
}
