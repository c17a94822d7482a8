// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "renderer"]

//! # Renderer
//!
//! [`renderer`][`crate`] is a small layer over
//! [WebGL](https://rustwasm.github.io/wasm-bindgen/api/web_sys/struct.WebGlRenderingContext.html)
//! covering what the demos draw with: shaders, vertex/index/instance buffers, off-screen
//! framebuffers and an animation frame loop.

// Gl primitives should not escape this crate.
#[macro_use]
mod gl;

mod attribs;
mod buffer;
mod camera;
mod framebuffer;
mod index;
mod instance;
mod render_loop;
mod renderer;
mod rgb;
mod shader;
mod texture;
mod vertex;

// Required to be public so derive Vertex works.
#[doc(hidden)]
pub use attribs::*;

// Re-export to provide a simpler api.
pub use buffer::*;
pub use camera::*;
pub use framebuffer::*;
pub use index::*;
pub use instance::*;
pub use render_loop::*;
pub use renderer::*;
pub use rgb::*;
pub use shader::*;
pub use texture::*;
pub use vertex::*;
