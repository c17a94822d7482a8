// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::gl::*;
use crate::renderer::Renderer;
use crate::texture::Texture;
use glam::{UVec2, Vec4};
use std::rc::Rc;
use web_sys::{WebGlFramebuffer, WebGlRenderbuffer};

/// An offscreen [`Texture`] that you can draw to, optionally with a depth buffer.
pub struct Framebuffer {
    background_color: Vec4,
    color: Texture,
    depth: Option<WebGlRenderbuffer>,
    dimensions: UVec2,
    framebuffer: Rc<WebGlFramebuffer>, // For cheap clones for restoring previous.
}

impl Framebuffer {
    /// Creates a new [`Framebuffer`] that is cleared to `background_color`. `linear_filter`
    /// specifies if its [texture][`Self::as_texture`] uses linear filtering. `depth` adds a
    /// depth renderbuffer so 3D draws can depth test.
    pub fn new(
        renderer: &Renderer,
        background_color: Vec4,
        linear_filter: bool,
        depth: bool,
    ) -> Result<Self, String> {
        let gl = &renderer.gl;

        // Create framebuffer but don't bind it yet.
        let framebuffer = gl
            .create_framebuffer()
            .ok_or(concat!(gl_title!(), " context lost"))?;

        let depth = depth
            .then(|| gl.create_renderbuffer())
            .map(|r| r.ok_or(concat!(gl_title!(), " context lost")))
            .transpose()?;

        let mut ret = Self {
            background_color,
            color: Texture::new_empty(renderer, linear_filter),
            depth,
            dimensions: UVec2::ZERO,
            framebuffer: Rc::new(framebuffer),
        };

        // Android WebGL can silently error without the initial allocation.
        ret.set_viewport(renderer, UVec2::ONE);

        let binding = FramebufferBinding::new(renderer, &ret);
        gl.framebuffer_texture_2d(
            Gl::FRAMEBUFFER,
            Gl::COLOR_ATTACHMENT0,
            Gl::TEXTURE_2D,
            Some(ret.color.inner()),
            0,
        );

        if let Some(renderbuffer) = &ret.depth {
            gl.framebuffer_renderbuffer(
                Gl::FRAMEBUFFER,
                Gl::DEPTH_ATTACHMENT,
                Gl::RENDERBUFFER,
                Some(renderbuffer),
            );
        }

        let status = status_message(gl.check_framebuffer_status(Gl::FRAMEBUFFER));
        drop(binding);

        match status {
            Some(status) => Err(format!("framebuffer {status}")),
            None => Ok(ret),
        }
    }

    /// Sets the dimensions of the [`Framebuffer`]. If you want to render a whole screen,
    /// `viewport` should be [`Renderer::canvas_size`].
    ///
    /// NOTE: the contents are undefined after the viewport changes.
    pub fn set_viewport(&mut self, renderer: &Renderer, viewport: UVec2) {
        if viewport == self.dimensions {
            return;
        }
        self.dimensions = viewport;
        self.color.realloc(renderer, viewport);

        if let Some(renderbuffer) = &self.depth {
            let gl = &renderer.gl;
            let d = viewport.as_ivec2();

            // bind renderbuffer ->>
            gl.bind_renderbuffer(Gl::RENDERBUFFER, Some(renderbuffer));
            gl.renderbuffer_storage(Gl::RENDERBUFFER, Gl::DEPTH_COMPONENT16, d.x, d.y);
            // <-- unbind renderbuffer
            gl.bind_renderbuffer(Gl::RENDERBUFFER, None);
        }
    }

    /// Dimensions in pixels set by the last [`set_viewport`][`Self::set_viewport`].
    pub fn dimensions(&self) -> UVec2 {
        self.dimensions
    }

    /// Binds the [`Framebuffer`], causing all draws to draw to it until the binding is dropped.
    ///
    /// NOTE: Does not get cleared between frames.
    #[must_use]
    pub fn bind<'a>(&'a self, renderer: &'a Renderer) -> FramebufferBinding<'a> {
        FramebufferBinding::new(renderer, self)
    }

    /// Gets the texture that the [`Framebuffer`] renders to.
    pub fn as_texture(&self) -> &Texture {
        &self.color
    }
}

fn status_message(status: u32) -> Option<&'static str> {
    match status {
        Gl::FRAMEBUFFER_COMPLETE => None,
        Gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => Some("incomplete attachment"),
        Gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => Some("incomplete missing attachment"),
        Gl::FRAMEBUFFER_INCOMPLETE_DIMENSIONS => Some("incomplete dimensions"),
        Gl::FRAMEBUFFER_UNSUPPORTED => Some("unsupported"),
        _ => Some("incomplete"),
    }
}

/// A bound [`Framebuffer`] that will be capture all draws. You can use the results with
/// [`Framebuffer::as_texture`].
pub struct FramebufferBinding<'a> {
    renderer: &'a Renderer,
    framebuffer: &'a Framebuffer,
}

impl<'a> FramebufferBinding<'a> {
    fn new(renderer: &'a Renderer, framebuffer: &'a Framebuffer) -> Self {
        let owned = OwnedFramebufferBinding {
            framebuffer: Rc::clone(&framebuffer.framebuffer),
            dimensions: framebuffer.dimensions,
        };
        OwnedFramebufferBinding::restore(renderer, Some(&owned));
        let mut bindings = renderer.bound_framebuffers.take();
        bindings.push(owned);
        renderer.bound_framebuffers.set(bindings);

        Self {
            renderer,
            framebuffer,
        }
    }

    /// Clears the [`Framebuffer`] to its background color and clears its depth.
    pub fn clear(&self) {
        self.renderer.clear(self.framebuffer.background_color);
    }
}

impl<'a> Drop for FramebufferBinding<'a> {
    fn drop(&mut self) {
        let renderer = self.renderer;

        let mut bindings = renderer.bound_framebuffers.take();
        let _ = bindings.pop();

        OwnedFramebufferBinding::restore(renderer, bindings.last());

        renderer.bound_framebuffers.set(bindings);
    }
}

/// For restoring [`FramebufferBinding`]s if multiple are bound recursively. Uses an [`Rc`] for
/// cheap clones.
pub(crate) struct OwnedFramebufferBinding {
    framebuffer: Rc<WebGlFramebuffer>,
    dimensions: UVec2,
}

impl OwnedFramebufferBinding {
    fn restore(renderer: &Renderer, me: Option<&Self>) {
        if let Some(me) = me {
            // Set viewport and bind framebuffer.
            renderer.set_viewport(me.dimensions);
            renderer
                .gl
                .bind_framebuffer(Gl::FRAMEBUFFER, Some(&me.framebuffer));
        } else {
            // Reset viewport and unbind framebuffer.
            renderer.set_viewport(renderer.canvas_size());
            renderer.gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_status_is_ok() {
        assert_eq!(status_message(Gl::FRAMEBUFFER_COMPLETE), None);
        assert_eq!(
            status_message(Gl::FRAMEBUFFER_UNSUPPORTED),
            Some("unsupported")
        );
        assert_eq!(status_message(0), Some("incomplete"));
    }
}
