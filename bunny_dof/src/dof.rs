// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Depth of field in three passes:
//!
//! 1. The scene is drawn normally into the sharp [`Framebuffer`].
//! 2. The scene is drawn again into the focal [`Framebuffer`], writing how out of focus each
//!    pixel is (see [`focal_weight`]).
//! 3. A full screen quad samples the sharp image with a disc kernel scaled by the focal map and
//!    writes the result to the canvas.

use crate::config::DofConfig;
use glam::{vec2, UVec2, Vec2, Vec4};
use renderer::{Framebuffer, MeshBuilder, Renderer, Shader, ShaderBinding, TriangleBuffer};

/// Fragment shader of the sharp pass. Pairs with a scene's vertex shader.
pub const SHARP_FRAGMENT: &str = include_str!("shaders/sharp.frag");
/// Fragment shader of the focal pass. Pairs with a scene's vertex shader.
pub const FOCAL_FRAGMENT: &str = include_str!("shaders/focal.frag");

/// How out of focus something at view space `depth` is, from `0` (sharp) to `1` (maximum blur).
/// Mirrors `focal.frag`.
pub fn focal_weight(depth: f32, focus_distance: f32, focus_range: f32) -> f32 {
    if focus_range <= 0.0 {
        return if depth == focus_distance { 0.0 } else { 1.0 };
    }
    ((depth - focus_distance).abs() / focus_range).clamp(0.0, 1.0)
}

/// Offscreen targets and the composite shader of the depth of field effect.
pub struct DepthOfField {
    sharp: Framebuffer,
    focal: Framebuffer,
    quad: TriangleBuffer<Vec2>,
    blur_shader: Shader,
}

impl DepthOfField {
    /// Creates the framebuffers. They start out 1x1 and follow the canvas size in
    /// [`begin_frame`][`Self::begin_frame`].
    pub fn new(renderer: &Renderer, background: Vec4) -> Result<Self, String> {
        let sharp = Framebuffer::new(renderer, background, true, true)?;

        // Background is out of focus.
        let focal = Framebuffer::new(renderer, Vec4::ONE, true, true)?;

        let mut quad = TriangleBuffer::new(renderer);
        quad.buffer_mesh(renderer, &screen_quad());

        let blur_shader = renderer.create_shader(
            include_str!("shaders/screen.vert"),
            include_str!("shaders/blur.frag"),
        );

        Ok(Self {
            sharp,
            focal,
            quad,
            blur_shader,
        })
    }

    /// Resizes both framebuffers to the canvas.
    pub fn begin_frame(&mut self, renderer: &Renderer) {
        if let Some(size) = resize_to(self.sharp.dimensions(), renderer.canvas_size()) {
            self.sharp.set_viewport(renderer, size);
            self.focal.set_viewport(renderer, size);
        }
        debug_assert_eq!(self.focal.dimensions(), self.sharp.dimensions());
    }

    /// Clears the sharp framebuffer to the background and lets `draw` render the lit scene into it.
    pub fn sharp_pass(
        &self,
        renderer: &Renderer,
        shader: &Shader,
        draw: impl FnOnce(&ShaderBinding),
    ) {
        let binding = self.sharp.bind(renderer);
        binding.clear();
        if let Some(shader) = shader.bind(renderer) {
            draw(&shader);
        }
    }

    /// Clears the focal framebuffer to maximum blur and lets `draw` render the scene with the
    /// focus uniforms already set.
    pub fn focal_pass(
        &self,
        renderer: &Renderer,
        shader: &Shader,
        focus_distance: f32,
        config: &DofConfig,
        draw: impl FnOnce(&ShaderBinding),
    ) {
        let binding = self.focal.bind(renderer);
        binding.clear();
        if let Some(shader) = shader.bind(renderer) {
            shader.uniform1f("uFocusDistance", focus_distance);
            shader.uniform1f("uFocusRange", config.focus_range.max(f32::EPSILON));
            draw(&shader);
        }
    }

    /// Blurs the sharp image according to the focal map onto the canvas.
    pub fn blur_pass(&self, renderer: &Renderer, config: &DofConfig) {
        renderer.clear(config.background);

        let Some(shader) = self.blur_shader.bind(renderer) else {
            return;
        };

        // Full screen quad must not be depth tested against the cleared canvas.
        renderer.set_depth_test(false);

        shader.uniform_texture("uSharp", self.sharp.as_texture(), 0);
        shader.uniform_texture("uFocal", self.focal.as_texture(), 1);
        shader.uniform2f("uTexelSize", texel_size(self.sharp.dimensions()));
        shader.uniform1f("uBlurRadius", config.blur_radius);
        self.quad.bind(renderer).draw();

        renderer.set_depth_test(true);
    }
}

/// Two counter-clockwise triangles covering clip space.
fn screen_quad() -> MeshBuilder<Vec2> {
    let mut mesh = MeshBuilder::new();
    mesh.vertices.extend_from_slice(&[
        vec2(-1.0, -1.0),
        vec2(1.0, -1.0),
        vec2(1.0, 1.0),
        vec2(-1.0, 1.0),
    ]);
    mesh.push_quad([0, 1, 2, 3]);
    mesh
}

/// New size of the targets if they don't match the canvas.
fn resize_to(current: UVec2, canvas: UVec2) -> Option<UVec2> {
    (current != canvas).then_some(canvas)
}

fn texel_size(dimensions: UVec2) -> Vec2 {
    Vec2::ONE / dimensions.max(UVec2::ONE).as_vec2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::uvec2;

    #[test]
    fn focal_weight_ramps() {
        assert_eq!(focal_weight(10.0, 10.0, 4.0), 0.0);
        assert_eq!(focal_weight(12.0, 10.0, 4.0), 0.5);
        assert_eq!(focal_weight(8.0, 10.0, 4.0), 0.5);
        assert_eq!(focal_weight(20.0, 10.0, 4.0), 1.0);
        assert_eq!(focal_weight(0.0, 10.0, 4.0), 1.0);
    }

    #[test]
    fn focal_weight_zero_range() {
        assert_eq!(focal_weight(5.0, 5.0, 0.0), 0.0);
        assert_eq!(focal_weight(5.1, 5.0, 0.0), 1.0);
    }

    #[test]
    fn quad_covers_clip_space() {
        let quad = screen_quad();
        assert_eq!(quad.triangle_count(), 2);
        for triangle in quad.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| quad.vertices[triangle[i] as usize]);
            assert!((b - a).perp_dot(c - a) > 0.0);
        }
    }

    #[test]
    fn targets_follow_canvas() {
        // Freshly created targets are 1x1.
        let mut targets = UVec2::ONE;
        for canvas in [uvec2(2000, 1200), uvec2(2000, 1200), uvec2(1000, 600)] {
            if let Some(size) = resize_to(targets, canvas) {
                assert_ne!(size, targets);
                targets = size;
            }
            assert_eq!(targets, canvas);
            assert_eq!(resize_to(targets, canvas), None);
            assert_eq!(texel_size(targets), Vec2::ONE / canvas.as_vec2());
        }
    }

    #[test]
    fn texel_sizes() {
        assert_eq!(texel_size(uvec2(1000, 500)), vec2(0.001, 0.002));
        assert_eq!(texel_size(uvec2(0, 0)), Vec2::ONE);
    }
}
