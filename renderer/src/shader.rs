// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::gl::*;
use crate::renderer::Renderer;
use crate::texture::{Texture, TextureBinding};
use glam::*;
use js_hooks::{console_error, console_log};
use linear_map::LinearMap;
use std::cell::{Cell, RefCell, RefMut};
use std::mem;
use std::rc::Rc;
use web_sys::{WebGlProgram, WebGlShader, WebGlUniformLocation};

/// References a glsl shader. As cheap to clone as an [`Rc`].
#[derive(Clone)]
pub struct Shader(Rc<ShaderInner>);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LinkState {
    Pending,
    Linked,
    Failed,
}

struct ShaderInner {
    program: WebGlProgram,
    vert_shader: WebGlShader,
    frag_shader: WebGlShader,
    link_state: Cell<LinkState>,
    // Use a LinearMap because there are relatively few uniforms.
    uniform_cache: RefCell<LinearMap<&'static str, Option<WebGlUniformLocation>>>,
}

impl Shader {
    /// Compiles a new glsl shader from sources. Attribute locations are indexed exactly according
    /// to their order in the vertex source.
    pub fn new(renderer: &Renderer, vertex: &str, fragment: &str) -> Self {
        let gl = &renderer.gl;
        let vert_shader = compile_shader(gl, Gl::VERTEX_SHADER, vertex);
        let frag_shader = compile_shader(gl, Gl::FRAGMENT_SHADER, fragment);

        // Defers failing to shader bind.
        let program = link_program(gl, &vert_shader, &frag_shader, parse_attributes(vertex));

        Self(Rc::new(ShaderInner {
            program,
            vert_shader,
            frag_shader,
            link_state: Cell::new(LinkState::Pending),
            uniform_cache: Default::default(),
        }))
    }

    /// Binds the shader for handling subsequent draw calls. Returns [`None`] while the shader is
    /// still compiling asynchronously, or if it failed to compile (the error is logged once).
    pub fn bind<'a>(&'a self, renderer: &'a Renderer) -> Option<ShaderBinding<'a>> {
        let gl = &renderer.gl;
        match self.0.link_state.get() {
            LinkState::Linked => {}
            LinkState::Failed => return None,
            LinkState::Pending => match self.0.query_link_status(gl, renderer.khr.as_ref()) {
                Ok(true) => self.0.link_state.set(LinkState::Linked),
                Ok(false) => return None,
                Err(e) => {
                    console_error!("shader failed to link: {}", e);
                    self.0.link_state.set(LinkState::Failed);
                    return None;
                }
            },
        }
        Some(ShaderBinding::new(gl, &self.0))
    }
}

impl ShaderInner {
    /// uniform gets the (cached) location of a named uniform.
    fn uniform<'a>(
        &'a self,
        gl: &Gl,
        name: &'static str,
    ) -> RefMut<'a, Option<WebGlUniformLocation>> {
        // Pre-borrow because using self in closure borrows all of self.
        let program = &self.program;
        let r = self.uniform_cache.borrow_mut();

        // Map mutable ref to avoid indexing again.
        RefMut::map(r, |r| {
            r.entry(name).or_insert_with(|| {
                let uniform = gl.get_uniform_location(program, name);
                if uniform.is_none() && cfg!(debug_assertions) {
                    console_log!("warning: uniform {} does not exist or is not in use", name);
                }
                uniform
            })
        })
    }

    /// Returns either Ok with a bool of if its done compiling or and Err with a compile error.
    fn query_link_status(&self, gl: &Gl, khr: Option<&Khr>) -> Result<bool, String> {
        // Not done if async compile not complete.
        if !cfg!(feature = "blocking")
            && khr.is_some()
            && !gl
                .get_program_parameter(&self.program, Khr::COMPLETION_STATUS_KHR)
                .as_bool()
                .unwrap_or(true)
        {
            return Ok(false);
        }

        if gl
            .get_program_parameter(&self.program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(true)
        } else {
            let mut error = format_log(gl.get_program_info_log(&self.program), "\n");
            error += &format_log(gl.get_shader_info_log(&self.vert_shader), "vs: ");
            error += &format_log(gl.get_shader_info_log(&self.frag_shader), "fs: ");
            Err(error)
        }
    }
}

/// Prefixes a non-empty info log, dropping trailing nulls some drivers emit.
fn format_log(log: Option<String>, prefix: &str) -> String {
    let log = log.unwrap_or_default();
    let log = log.trim_end_matches('\x00');
    if log.is_empty() {
        String::new()
    } else {
        format!("{prefix}{log}")
    }
}

/// A bound [`Shader`] that can you can draw with.
pub struct ShaderBinding<'a> {
    gl: &'a Gl,
    shader: &'a ShaderInner,
    bound_textures: Cell<u32>, // bitset
}

impl<'a> ShaderBinding<'a> {
    fn new(gl: &'a Gl, shader: &'a ShaderInner) -> Self {
        gl.use_program(Some(&shader.program));
        Self {
            gl,
            shader,
            bound_textures: Cell::new(0),
        }
    }

    /// Sets a `sampler2D` uniform at an `index` in range `0..32`.
    pub fn uniform_texture(&self, name: &'static str, texture: &Texture, index: usize) {
        self.uniform1i(name, index as i32);

        let mask = 1u32 << index;

        // Already bound unbind it.
        if self.bound_textures.get() & mask != 0 {
            TextureBinding::drop_raw_parts(self.gl, index);
        }

        // Can't keep borrow of gl.
        mem::forget(texture.bind(self.gl, index));

        // Instead set into bitset.
        self.bound_textures.set(self.bound_textures.get() | mask);
    }

    /// Sets an `int` uniform.
    fn uniform1i(&self, name: &'static str, v: i32) {
        let u = self.shader.uniform(self.gl, name);
        self.gl.uniform1i(u.as_ref(), v);
    }

    /// Sets a `float` uniform.
    pub fn uniform1f(&self, name: &'static str, v: f32) {
        let u = self.shader.uniform(self.gl, name);
        self.gl.uniform1f(u.as_ref(), v);
    }

    /// Sets a `vec2` uniform.
    pub fn uniform2f(&self, name: &'static str, v: Vec2) {
        let u = self.shader.uniform(self.gl, name);
        self.gl.uniform2f(u.as_ref(), v.x, v.y);
    }

    /// Sets a `vec3` uniform.
    pub fn uniform3f(&self, name: &'static str, v: Vec3) {
        let u = self.shader.uniform(self.gl, name);
        self.gl.uniform3f(u.as_ref(), v.x, v.y, v.z);
    }

    /// Sets a `mat4` uniform.
    pub fn uniform_matrix4f(&self, name: &'static str, m: &Mat4) {
        let u = self.shader.uniform(self.gl, name);
        self.gl
            .uniform_matrix4fv_with_f32_array(u.as_ref(), false, &m.to_cols_array());
    }
}

impl<'a> Drop for ShaderBinding<'a> {
    fn drop(&mut self) {
        // Unbind (not required in release mode).
        #[cfg(debug_assertions)]
        self.gl.use_program(None);

        let mut bitset = self.bound_textures.get();
        while bitset != 0 {
            let index = bitset.trailing_zeros() as usize;
            bitset &= bitset - 1;
            TextureBinding::drop_raw_parts(self.gl, index);
        }
    }
}

/// Parse attribute names and their location counts from shader source.
fn parse_attributes(vertex_source: &str) -> impl Iterator<Item = (&str, u32)> {
    debug_assert!(
        !vertex_source.contains("/*"),
        "attribute parser cannot handle multiline comments in vertex shader"
    );

    vertex_source.lines().filter_map(|l| {
        let mut tokens = l.split_ascii_whitespace();
        if tokens.next() != Some("attribute") {
            return None;
        }
        let type_ = tokens.next()?;
        let name = tokens.next()?.trim_end_matches(';');

        let size = match type_ {
            "mat3" => 3,
            "mat4" => 4,
            _ => 1,
        };
        Some((name, size))
    })
}

/// compile_shader compiles either the vertex or fragment shader of a shader program.
/// Errors surface when the program is linked.
fn compile_shader(gl: &Gl, shader_type: u32, source: &str) -> WebGlShader {
    let shader = gl
        .create_shader(shader_type)
        .unwrap_or_else(|| panic!("{} context lost", gl_title!()));
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    shader
}

/// link_program links the two shaders to form a shader program. It indexes attribute locations
/// in the exact order they appear in the input.
fn link_program<'a>(
    gl: &Gl,
    vert_shader: &WebGlShader,
    frag_shader: &WebGlShader,
    attributes: impl Iterator<Item = (&'a str, u32)>,
) -> WebGlProgram {
    let program = gl
        .create_program()
        .unwrap_or_else(|| panic!("{} context lost", gl_title!()));

    gl.attach_shader(&program, vert_shader);
    gl.attach_shader(&program, frag_shader);

    let mut location = 0;
    for (name, size) in attributes {
        gl.bind_attrib_location(&program, location, name);
        location += size;
    }

    gl.link_program(&program);
    program
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_in_declaration_order() {
        let source = "\
precision mediump float;
attribute vec3 position;
attribute vec3 normal;
attribute mat4 iModel;
attribute float iAngle;
uniform mat4 uViewProjection;
varying vec3 vNormal;
// attribute vec2 commented;
void main() {}";
        let attributes: Vec<_> = parse_attributes(source).collect();
        assert_eq!(
            attributes,
            [("position", 1), ("normal", 1), ("iModel", 4), ("iAngle", 1)]
        );
    }

    #[test]
    fn empty_logs_are_dropped() {
        assert_eq!(format_log(None, "vs: "), "");
        assert_eq!(format_log(Some("\x00".into()), "vs: "), "");
        assert_eq!(format_log(Some("bad\x00".into()), "fs: "), "fs: bad");
    }
}
