// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bunny scenes and the loop that renders them with depth of field.

use crate::bunny::{bunny_mesh, BunnyVertex};
use crate::canvas::CanvasSize;
use crate::config::{DemoConfig, GridConfig};
use crate::dof::{DepthOfField, FOCAL_FRAGMENT, SHARP_FRAGMENT};
use crate::grid::{fill_instances, grid_offsets, BunnyInstance, InstanceAngles};
use crate::WEBGL_UNAVAILABLE;
use glam::{Mat4, Vec3};
use renderer::{Camera, InstanceBuffer, RenderLoop, Renderer, ShaderBinding, TriangleBuffer};
use renderer3d::{Camera3d, OrbitCamera, OrbitControls, Perspective};
use std::cell::RefCell;
use std::rc::Rc;

/// Something [`run_scene`] can draw with depth of field.
pub trait Scene {
    /// Vertex shader used by both the sharp and the focal pass. It must declare
    /// `attribute vec3 position; attribute vec3 normal;` first, use `uView` and
    /// `uViewProjection`, and output `varying vec3 vNormal; varying float vDepth;`.
    const VERTEX_SHADER: &'static str;

    /// Called once per frame before drawing.
    fn update(&mut self, _renderer: &Renderer) {}

    /// Issues draw calls. Called twice per frame, once per pass, with camera uniforms set.
    fn draw(&self, renderer: &Renderer, shader: &ShaderBinding);
}

/// One static bunny at the origin.
pub struct SingleBunny {
    mesh: TriangleBuffer<BunnyVertex>,
    model: Mat4,
}

impl SingleBunny {
    /// Uploads the bunny mesh.
    pub fn new(renderer: &Renderer) -> Self {
        let mut mesh = TriangleBuffer::new(renderer);
        mesh.buffer_mesh(renderer, &bunny_mesh());
        Self {
            mesh,
            model: Mat4::IDENTITY,
        }
    }
}

impl Scene for SingleBunny {
    const VERTEX_SHADER: &'static str = include_str!("shaders/bunny.vert");

    fn draw(&self, renderer: &Renderer, shader: &ShaderBinding) {
        shader.uniform_matrix4f("uModel", &self.model);
        self.mesh.bind(renderer).draw();
    }
}

/// A square grid of instanced bunnies that each spin around their own axis.
pub struct BunnyGrid {
    mesh: TriangleBuffer<BunnyVertex>,
    instances: InstanceBuffer<BunnyInstance>,
    offsets: Vec<Vec3>,
    angles: InstanceAngles,
    staging: Vec<BunnyInstance>,
    config: GridConfig,
}

impl BunnyGrid {
    /// Uploads the bunny mesh. `renderer` must have instancing enabled.
    pub fn new(renderer: &Renderer, config: GridConfig) -> Self {
        let mut mesh = TriangleBuffer::new(renderer);
        mesh.buffer_mesh(renderer, &bunny_mesh());

        let offsets = grid_offsets(config.size, config.spacing);
        let angles = InstanceAngles::new(offsets.len());

        Self {
            mesh,
            instances: InstanceBuffer::new(renderer),
            staging: Vec::with_capacity(offsets.len()),
            offsets,
            angles,
            config,
        }
    }

    /// Current angle of each bunny.
    pub fn angles(&self) -> &InstanceAngles {
        &self.angles
    }
}

impl Scene for BunnyGrid {
    const VERTEX_SHADER: &'static str = include_str!("shaders/bunnies.vert");

    fn update(&mut self, renderer: &Renderer) {
        self.angles.advance(self.config.angle_step);
        fill_instances(&self.offsets, &self.angles, &mut self.staging);
        self.instances.buffer(renderer, &self.staging);
    }

    fn draw(&self, renderer: &Renderer, shader: &ShaderBinding) {
        shader.uniform1f("uScale", self.config.scale);
        self.instances.bind(renderer, &self.mesh).draw();
    }
}

/// Sizes the canvas, starts WebGL and renders the scene that `create` builds every animation
/// frame, orbiting with the mouse. If WebGL can't start, the user is alerted and the underlying
/// error is returned.
pub fn run_scene<S: Scene + 'static>(
    config: DemoConfig,
    create: impl FnOnce(&Renderer, &DemoConfig) -> S,
) -> Result<(), String> {
    let canvas = js_hooks::query_canvas(config.canvas.selector)?;
    CanvasSize::of_window(config.canvas.size).apply(&canvas)?;

    let renderer = Renderer::new(canvas, config.antialias)
        .and_then(|mut renderer| {
            renderer.enable_angle_instanced_arrays()?;
            Ok(renderer)
        })
        .map_err(|e| {
            js_hooks::alert(WEBGL_UNAVAILABLE);
            e
        })?;

    Camera3d::init(&renderer);
    let mut scene = create(&renderer, &config);
    let mut dof = DepthOfField::new(&renderer, config.dof.background)?;

    let orbit = Rc::new(RefCell::new(OrbitCamera::new(config.orbit.clone())));
    OrbitControls::new(renderer.canvas(), Rc::clone(&orbit)).forget();

    // Compile both passes before the first frame.
    let sharp_shader = renderer.create_shader(S::VERTEX_SHADER, SHARP_FRAGMENT);
    let focal_shader = renderer.create_shader(S::VERTEX_SHADER, FOCAL_FRAGMENT);

    RenderLoop::start(renderer, move |renderer| {
        let renderer = &*renderer;
        scene.update(renderer);

        let orbit = orbit.borrow();
        let camera = orbit.camera_3d(Perspective {
            aspect: renderer.aspect_ratio(),
            fov: config.fov,
            ..Default::default()
        });
        let focus_distance = config.dof.focus_distance.unwrap_or_else(|| orbit.distance());

        dof.begin_frame(renderer);

        dof.sharp_pass(renderer, &sharp_shader, |shader| {
            camera.prepare(shader);
            shader.uniform3f("uColor", config.shading.color);
            shader.uniform3f("uLightDir", config.shading.light_direction);
            scene.draw(renderer, shader);
        });

        dof.focal_pass(renderer, &focal_shader, focus_distance, &config.dof, |shader| {
            camera.prepare(shader);
            scene.draw(renderer, shader);
        });

        dof.blur_pass(renderer, &config.dof);
    })
    .forget();

    Ok(())
}

/// Renders a single bunny.
pub fn run_single_bunny(config: DemoConfig) -> Result<(), String> {
    run_scene(config, |renderer, _| SingleBunny::new(renderer))
}

/// Renders the instanced bunny grid.
pub fn run_bunny_grid(config: DemoConfig) -> Result<(), String> {
    run_scene(config, |renderer, config| {
        BunnyGrid::new(renderer, config.grid.clone())
    })
}
