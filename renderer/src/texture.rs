// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::gl::*;
use crate::renderer::Renderer;
use glam::UVec2;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use web_sys::WebGlTexture;

/// A 2D RGBA texture, as cheap to clone as an [`Rc`]. The demos only create them as
/// [`Framebuffer`][`crate::Framebuffer`] color attachments.
#[derive(Clone)]
pub struct Texture {
    inner: Rc<TextureInner>,
}

struct TextureInner {
    texture: WebGlTexture,
    dimensions: Cell<UVec2>,
}

impl Texture {
    pub(crate) fn inner(&self) -> &WebGlTexture {
        &self.inner.texture
    }

    /// Gets dimensions in pixels.
    pub fn dimensions(&self) -> UVec2 {
        self.inner.dimensions.get()
    }

    /// Creates a new empty [`Texture`] that clamps to its edges. Mipmaps and repeating
    /// cannot be used.
    pub fn new_empty(renderer: &Renderer, linear_filter: bool) -> Self {
        let gl = &renderer.gl;
        let texture = Self {
            inner: Rc::new(TextureInner {
                texture: gl
                    .create_texture()
                    .unwrap_or_else(|| panic!("{} context lost", gl_title!())),
                dimensions: Cell::new(UVec2::ZERO),
            }),
        };
        gl.bind_texture(Gl::TEXTURE_2D, Some(texture.inner()));

        // Can't be repeating because size isn't known yet (and may not be a power of 2).
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);

        let filter = if linear_filter {
            Gl::LINEAR
        } else {
            Gl::NEAREST
        } as i32;

        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, filter);
        gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, filter);

        unbind_texture_cfg_debug(gl);
        texture
    }

    /// Reallocates the [`Texture`] storage to `dimensions` with undefined contents. Does
    /// nothing if the dimensions are unchanged.
    pub fn realloc(&self, renderer: &Renderer, dimensions: UVec2) {
        if self.dimensions() == dimensions {
            return;
        }
        self.inner.dimensions.set(dimensions);

        let gl = &renderer.gl;
        gl.bind_texture(Gl::TEXTURE_2D, Some(self.inner()));

        let [width, height] = dimensions.as_ivec2().to_array();
        let level = 0;
        let border = 0;
        if let Err(e) = gl
            .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
                Gl::TEXTURE_2D,
                level,
                Gl::RGBA as i32,
                width,
                height,
                border,
                Gl::RGBA,
                Gl::UNSIGNED_BYTE,
                None,
            )
        {
            js_hooks::console_error!(
                "could not allocate {}x{} texture: {:?}",
                width,
                height,
                js_hooks::error_message(&e)
            );
        }

        unbind_texture_cfg_debug(gl);
    }

    /// Bind a texture for affecting subsequent draw calls.
    pub(crate) fn bind<'a>(&self, gl: &'a Gl, index: usize) -> TextureBinding<'a> {
        TextureBinding::new(gl, index, self)
    }
}

pub(crate) struct TextureBinding<'a> {
    gl: &'a Gl,
    index: usize,
}

impl<'a> TextureBinding<'a> {
    fn new(gl: &'a Gl, index: usize, texture: &Texture) -> Self {
        active_texture(gl, index);
        gl.bind_texture(Gl::TEXTURE_2D, Some(texture.inner()));
        Self { gl, index }
    }

    /// Texture must have been created from the same index and passed to [`std::mem::forget`].
    pub(crate) fn drop_raw_parts(gl: &'a Gl, index: usize) {
        drop(Self { gl, index })
    }
}

impl<'a> Drop for TextureBinding<'a> {
    fn drop(&mut self) {
        // Set active texture (not required in release mode because not unbinding).
        if cfg!(debug_assertions) {
            active_texture(self.gl, self.index);
            unbind_texture_cfg_debug(self.gl)
        }
    }
}

// Unbind texture in debug mode (not required in release mode).
fn unbind_texture_cfg_debug(gl: &Gl) {
    if cfg!(debug_assertions) {
        gl.bind_texture(Gl::TEXTURE_2D, None);
    }
}

static ACTIVE_TEXTURE: AtomicUsize = AtomicUsize::new(0);

/// Call if renderer is recreated.
pub(crate) fn reset_active_texture() {
    ACTIVE_TEXTURE.store(0, Ordering::Relaxed);
}

fn active_texture(gl: &Gl, index: usize) {
    // Don't do redundant calls.
    if index == ACTIVE_TEXTURE.load(Ordering::Relaxed) {
        return;
    }
    ACTIVE_TEXTURE.store(index, Ordering::Relaxed);

    assert!(index < 32, "only 32 textures supported");
    gl.active_texture(Gl::TEXTURE0 + index as u32);
}
