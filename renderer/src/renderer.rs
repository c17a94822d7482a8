// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::framebuffer::OwnedFramebufferBinding;
use crate::gl::*;
use crate::shader::Shader;
use glam::*;
use js_hooks::error_message;
use linear_map::LinearMap;
use std::cell::{Cell, RefCell};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;

/// A WebGL context attached to a canvas plus the state the demos share between passes.
pub struct Renderer {
    /// HTML Canvas.
    canvas: HtmlCanvasElement,
    cached_canvas_size: Cell<Option<UVec2>>,
    /// WebGL context.
    pub(crate) gl: Gl,
    /// WebGL extensions.
    pub(crate) aia: Option<Aia>,
    pub(crate) khr: Option<Khr>,
    pub(crate) ovao: Ovao,
    /// Cache of static shaders.
    shader_cache: RefCell<LinearMap<(&'static str, &'static str), Shader>>,
    /// Stack of bound framebuffers, innermost last.
    pub(crate) bound_framebuffers: Cell<Vec<OwnedFramebufferBinding>>,
}

impl Renderer {
    /// Creates a new WebGL renderer attached to `canvas`. Fails if the browser can't produce a
    /// WebGL context or lacks vertex array objects.
    pub fn new(canvas: HtmlCanvasElement, antialias: bool) -> Result<Self, String> {
        let options = js_sys::Object::new();
        let set = |key: &str, value: JsValue| {
            js_sys::Reflect::set(&options, &JsValue::from_str(key), &value)
                .map(drop)
                .map_err(|e| error_message(&e).unwrap_or_else(|| format!("invalid option {key}")))
        };
        set("alpha", JsValue::TRUE)?;
        set("antialias", JsValue::from_bool(antialias))?;
        set("powerPreference", JsValue::from_str("high-performance"))?;
        set("premultipliedAlpha", JsValue::TRUE)?;
        set("preserveDrawingBuffer", JsValue::FALSE)?;

        // See: https://developer.mozilla.org/en-US/docs/Web/API/HTMLCanvasElement/getContext
        let gl = canvas
            .get_context_with_context_options(GL_NAME, &options)
            .map_err(|e| {
                error_message(&e)
                    .unwrap_or_else(|| concat!("Error initializing ", gl_title!()).into())
            })?
            .ok_or(concat!(gl_title!(), " unsupported"))?
            .dyn_into::<Gl>()
            .map_err(|_| concat!("context is not ", gl_title!()))?;

        crate::texture::reset_active_texture();

        let khr = gl
            .has_extension("KHR_parallel_shader_compile")
            .then_some(KhrParallelShaderCompile);

        let ovao = gl.ovao()?;

        gl.enable(Gl::BLEND);

        // Premultiplied alpha.
        gl.blend_func(Gl::ONE, Gl::ONE_MINUS_SRC_ALPHA);

        Ok(Self {
            canvas,
            cached_canvas_size: Cell::new(None),
            gl,
            aia: None,
            khr,
            ovao,
            shader_cache: Default::default(),
            bound_framebuffers: Default::default(),
        })
    }

    /// Call early on if using instancing.
    pub fn enable_angle_instanced_arrays(&mut self) -> Result<(), String> {
        self.aia = Some(self.gl.aia()?);
        Ok(())
    }

    /// Returns the aspect ratio (width / height) of the canvas.
    pub fn aspect_ratio(&self) -> f32 {
        viewport_to_aspect(self.canvas_size())
    }

    /// Size of the canvas in real pixels (already includes any device pixel ratio scaling
    /// applied to the canvas).
    pub fn canvas_size(&self) -> UVec2 {
        let cached_size = self.cached_canvas_size.get();
        if let Some(size) = cached_size {
            size
        } else {
            let size = uvec2(self.canvas.width(), self.canvas.height());
            self.cached_canvas_size.set(Some(size));
            size
        }
    }

    /// The canvas this renderer draws to.
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Creates a new shader from static glsl sources. Only compiles each shader once.
    /// For runtime defined shaders use [`Shader::new`].
    pub fn create_shader(&self, vertex: &'static str, fragment: &'static str) -> Shader {
        self.shader_cache
            .borrow_mut()
            .entry((vertex, fragment))
            .or_insert_with(|| Shader::new(self, vertex, fragment))
            .clone()
    }

    /// Enables or disables the depth test with depth func less.
    pub fn set_depth_test(&self, enabled: bool) {
        if enabled {
            self.gl.enable(Gl::DEPTH_TEST);
        } else {
            self.gl.disable(Gl::DEPTH_TEST);
        }
    }

    /// Culls back faces of counter-clockwise triangles.
    pub fn enable_cull_face(&self) {
        self.gl.enable(Gl::CULL_FACE)
    }

    /// Sets the background color to RGBA with components 0.0-1.0. Takes effect on the next
    /// [`clear`][`Self::clear`] of the canvas.
    pub fn set_background_color(&self, color: Vec4) {
        self.gl.clear_color(color.x, color.y, color.z, color.w);
    }

    /// Clears the currently bound framebuffer (or canvas) to `color`, including depth.
    pub fn clear(&self, color: Vec4) {
        self.set_background_color(color);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    /// Not useful outside renderer. Use a framebuffer instead.
    pub(crate) fn set_viewport(&self, viewport: UVec2) {
        let size = viewport.as_ivec2();
        self.gl.viewport(0, 0, size.x, size.y);
    }

    /// Forgets the cached canvas size, since the page may have resized it. Called by
    /// [`RenderLoop`][`crate::RenderLoop`] before each frame callback.
    pub fn begin_frame(&self) {
        self.cached_canvas_size.set(None);

        // Render directly to the canvas unless a framebuffer is bound.
        self.set_viewport(self.canvas_size());
    }
}

/// Converts a viewport to an aspect ratio.
pub fn viewport_to_aspect(viewport: UVec2) -> f32 {
    let [width, height] = viewport.as_vec2().to_array();
    width / height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect() {
        assert_eq!(viewport_to_aspect(uvec2(2000, 1200)), 2000.0 / 1200.0);
        assert_eq!(viewport_to_aspect(uvec2(600, 600)), 1.0);
    }
}
