// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tunables for the demos. Every struct has a [`Default`] matching what the demo pages use.

use glam::{uvec2, vec3, UVec2, Vec3, Vec4};
use renderer::{rgb_hex, rgba};
use renderer3d::OrbitConfig;

/// Which canvas to use and how big it should appear on the page.
#[derive(Clone, Debug)]
pub struct CanvasConfig {
    /// CSS selector of the canvas.
    pub selector: &'static str,
    /// Size in CSS pixels. The backing store is scaled by the device pixel ratio.
    pub size: UVec2,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            selector: js_hooks::CANVAS_SELECTOR,
            size: uvec2(1000, 600),
        }
    }
}

/// Configuration of the canvas clearing test.
#[derive(Clone, Debug)]
pub struct ClearConfig {
    /// The canvas to clear.
    pub canvas: CanvasConfig,
    /// RGBA color to clear to.
    pub color: Vec4,
}

impl Default for ClearConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            color: rgba(255, 0, 0, 255),
        }
    }
}

/// Depth of field parameters.
#[derive(Clone, Debug)]
pub struct DofConfig {
    /// View space depth that is perfectly sharp. [`None`] keeps the orbit center in focus.
    pub focus_distance: Option<f32>,
    /// Depth difference from the focal plane at which blur reaches its maximum.
    pub focus_range: f32,
    /// Maximum blur radius in pixels.
    pub blur_radius: f32,
    /// Color behind the scene. The background is treated as fully out of focus.
    pub background: Vec4,
}

impl Default for DofConfig {
    fn default() -> Self {
        Self {
            focus_distance: None,
            focus_range: 4.0,
            blur_radius: 8.0,
            background: rgba(20, 20, 30, 255),
        }
    }
}

/// Lighting and color of the bunnies.
#[derive(Clone, Debug)]
pub struct ShadingConfig {
    /// Diffuse color.
    pub color: Vec3,
    /// Direction towards the light.
    pub light_direction: Vec3,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            color: rgb_hex(0xe8d9c4),
            light_direction: vec3(0.4, 1.0, 0.6),
        }
    }
}

/// Layout of the instanced bunny grid.
#[derive(Clone, Debug)]
pub struct GridConfig {
    /// Bunnies per side; the grid has `size * size` instances.
    pub size: usize,
    /// Distance between neighboring bunnies.
    pub spacing: f32,
    /// Uniform scale of each bunny.
    pub scale: f32,
    /// Radians each bunny turns per frame.
    pub angle_step: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 10,
            spacing: 2.5,
            scale: 1.0,
            angle_step: 0.01,
        }
    }
}

/// Everything a depth of field bunny demo needs.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// The canvas to render to.
    pub canvas: CanvasConfig,
    /// Request an antialiased context.
    pub antialias: bool,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Depth of field parameters.
    pub dof: DofConfig,
    /// Bunny shading.
    pub shading: ShadingConfig,
    /// Grid layout, only used by [`BunnyGrid`][`crate::scene::BunnyGrid`].
    pub grid: GridConfig,
    /// Starting camera pose.
    pub orbit: OrbitConfig,
}

impl DemoConfig {
    /// A single bunny, close up.
    pub fn single_bunny() -> Self {
        Self {
            orbit: OrbitConfig {
                center: vec3(0.0, 0.8, 0.0),
                distance: 4.0,
                min_distance: 1.5,
                max_distance: 40.0,
                ..Default::default()
            },
            dof: DofConfig {
                focus_range: 1.5,
                ..Default::default()
            },
            ..Self::default()
        }
    }

    /// A grid of spinning bunnies seen from above at an angle.
    pub fn bunny_grid() -> Self {
        Self {
            orbit: OrbitConfig {
                distance: 30.0,
                pitch: 0.6,
                ..Default::default()
            },
            ..Self::default()
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            antialias: true,
            fov: 45.0,
            dof: DofConfig::default(),
            shading: ShadingConfig::default(),
            grid: GridConfig::default(),
            orbit: OrbitConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let clear = ClearConfig::default();
        assert_eq!(clear.canvas.selector, "#canvas");
        assert_eq!(clear.canvas.size, uvec2(1000, 600));
        assert_eq!(clear.color, Vec4::new(1.0, 0.0, 0.0, 1.0));

        let grid = DemoConfig::bunny_grid();
        assert_eq!(grid.grid.size, 10);
        assert!(grid.grid.angle_step > 0.0);
        assert!(grid.orbit.distance > grid.grid.spacing * grid.grid.size as f32);
    }
}
