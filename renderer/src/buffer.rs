// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::attribs::Attribs;
use crate::gl::*;
use crate::index::Index;
use crate::renderer::Renderer;
use crate::vertex::Vertex;
use bytemuck::Pod;
use std::marker::PhantomData;
use std::mem::size_of;
use web_sys::{WebGlBuffer, WebGlVertexArrayObject};

/// Vertex indices of a triangle, in counter-clockwise order.
pub type Triangle<I> = [I; 3];

/// Vertex indices of a quad, in counter-clockwise order.
pub type Quad<I> = [I; 4];

/// Allows building a triangle mesh presumably to draw with [`TriangleBuffer`].
#[derive(Debug, Clone)]
pub struct MeshBuilder<V, I = u16> {
    /// Vertices of a mesh that are indexed by indices.
    pub vertices: Vec<V>,
    /// Indices into `vertices` that form counter-clockwise triangles.
    pub indices: Vec<I>,
}

impl<V: Vertex, I: Index> Default for MeshBuilder<V, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex, I: Index> MeshBuilder<V, I> {
    /// Create an empty [`MeshBuilder`].
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Pushes a single [`Triangle`] to `indices`.
    pub fn push_triangle(&mut self, triangle: Triangle<I>) {
        self.indices.extend_from_slice(&triangle);
    }

    /// Pushes a single [`Quad`] to `indices` as two triangles.
    pub fn push_quad(&mut self, quad: Quad<I>) {
        self.indices
            .extend_from_slice(&[quad[0], quad[1], quad[2], quad[2], quad[3], quad[0]]);
    }

    /// Appends another mesh, offsetting its indices past the current vertices.
    pub fn extend(&mut self, other: &Self) {
        let base = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(
            other
                .indices
                .iter()
                .map(|&i| I::from_usize(base + i.to_usize())),
        );
    }

    /// Number of triangles described by `indices`.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A WebGL buffer of `E` bound to either `ARRAY_BUFFER` or `ELEMENT_ARRAY_BUFFER`.
pub(crate) struct GpuBuffer<E> {
    elements: WebGlBuffer,
    target: u32,
    length: u32,   // The amount of valid elements in the buffer.
    capacity: u32, // The amount of capacity (in elements) that is available in the buffer.
    element: PhantomData<E>,
}

impl<E: Pod> GpuBuffer<E> {
    pub(crate) fn new_array(gl: &Gl) -> Self {
        Self::new(gl, Gl::ARRAY_BUFFER)
    }

    pub(crate) fn new_element(gl: &Gl) -> Self {
        Self::new(gl, Gl::ELEMENT_ARRAY_BUFFER)
    }

    fn new(gl: &Gl, target: u32) -> Self {
        Self {
            elements: gl
                .create_buffer()
                .unwrap_or_else(|| panic!("{} context lost", gl_title!())),
            target,
            length: 0,
            capacity: 0,
            element: PhantomData,
        }
    }

    /// Binds the buffer to its target. Element buffers stay bound to the current VAO.
    pub(crate) fn bind(&self, gl: &Gl) {
        gl.bind_buffer(self.target, Some(&self.elements));
    }

    pub(crate) fn inner(&self) -> &WebGlBuffer {
        &self.elements
    }

    pub(crate) fn len(&self) -> u32 {
        self.length
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Uploads `elements`, growing the allocation to the next power of 2 (never shrinks).
    pub(crate) fn buffer(&mut self, gl: &Gl, elements: &[E]) {
        self.length = elements.len() as u32;

        // Don't bind if empty (length set earlier).
        if elements.is_empty() {
            return;
        }

        // Element buffers are VAO state, so never rebind them while a VAO is bound.
        debug_assert!(
            self.target == Gl::ARRAY_BUFFER
                || gl
                    .get_parameter(Ovao::VERTEX_ARRAY_BINDING_OES)
                    .map_or(true, |v| v.is_null()),
            "buffering elements with a VAO bound"
        );

        gl.bind_buffer(self.target, Some(&self.elements));

        let new_cap = buffer_capacity(elements.len());
        if new_cap > self.capacity {
            gl.buffer_data_with_i32(
                self.target,
                (new_cap as usize * size_of::<E>()) as i32,
                Gl::DYNAMIC_DRAW,
            );
            self.capacity = new_cap;
        }

        let bytes: &[u8] = bytemuck::cast_slice(elements);
        // Safety: the view is consumed before any allocation can move wasm memory.
        unsafe {
            let view = js_sys::Uint8Array::view(bytes);
            gl.buffer_sub_data_with_i32_and_array_buffer_view(self.target, 0, &view);
        }

        // Unbind (not required in release mode).
        #[cfg(debug_assertions)]
        gl.bind_buffer(self.target, None);
    }
}

/// Capacity in elements allocated for `len` elements.
fn buffer_capacity(len: usize) -> u32 {
    len.next_power_of_two() as u32
}

/// [`TriangleBuffer`] facilitates drawing a triangle mesh.
pub struct TriangleBuffer<V, I = u16> {
    pub(crate) vertices: GpuBuffer<V>,
    pub(crate) indices: GpuBuffer<I>,
    vao: WebGlVertexArrayObject,
}

impl<V: Vertex, I: Index> TriangleBuffer<V, I> {
    /// Creates a new [`TriangleBuffer`].
    pub fn new(renderer: &Renderer) -> Self {
        let gl = &renderer.gl;
        let ovao = &renderer.ovao;

        let buffer = Self {
            vertices: GpuBuffer::new_array(gl),
            indices: GpuBuffer::new_element(gl),
            vao: ovao
                .create_vertex_array_oes()
                .unwrap_or_else(|| panic!("{} context lost", gl_title!())),
        };

        ovao.bind_vertex_array_oes(Some(&buffer.vao));
        buffer.bind_attribs(gl);
        buffer.indices.bind(gl);

        // Unbinding VAO is ALWAYS required (unlike all other render unbinds).
        ovao.bind_vertex_array_oes(None);
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, None);

        buffer
    }

    /// Binds the vertex buffer and points the per-vertex attributes at it. Returns the
    /// [`Attribs`] so instanced attributes can continue numbering after them.
    pub(crate) fn bind_attribs<'a>(&self, gl: &'a Gl) -> Attribs<'a> {
        self.vertices.bind(gl);
        let mut attribs = Attribs::new::<V>(gl);
        V::bind_attribs(&mut attribs);
        attribs
    }

    /// Binds the [`TriangleBuffer`] to draw triangles.
    #[must_use]
    pub fn bind<'a>(&'a self, renderer: &'a Renderer) -> TriangleBufferBinding<'a, V, I> {
        TriangleBufferBinding::new(&renderer.gl, &renderer.ovao, self)
    }

    /// Copies a whole [`MeshBuilder`] into the buffer.
    pub fn buffer_mesh(&mut self, renderer: &Renderer, mesh: &MeshBuilder<V, I>) {
        self.buffer(renderer, &mesh.vertices, &mesh.indices);
    }

    /// Copies vertices and indices into the render buffer.
    /// If indices is empty it performs array based rendering.
    pub fn buffer(&mut self, renderer: &Renderer, vertices: &[V], indices: &[I]) {
        let gl = &renderer.gl;
        self.vertices.buffer(gl, vertices);
        self.indices.buffer(gl, indices);
    }

    pub(crate) fn draw_count(&self) -> i32 {
        if self.indices.is_empty() {
            self.vertices.len() as i32
        } else {
            self.indices.len() as i32
        }
    }
}

/// A bound [`TriangleBuffer`] that can draw triangles.
pub struct TriangleBufferBinding<'a, V: Vertex, I: Index> {
    gl: &'a Gl,
    ovao: &'a Ovao,
    buffer: &'a TriangleBuffer<V, I>,
}

impl<'a, V: Vertex, I: Index> TriangleBufferBinding<'a, V, I> {
    fn new(gl: &'a Gl, ovao: &'a Ovao, buffer: &'a TriangleBuffer<V, I>) -> Self {
        ovao.bind_vertex_array_oes(Some(&buffer.vao));
        Self { gl, ovao, buffer }
    }

    /// Draws triangles.
    pub fn draw(&self) {
        let primitive = Gl::TRIANGLES;
        let count = self.buffer.draw_count();
        if count == 0 {
            return;
        }
        if self.buffer.indices.is_empty() {
            self.gl.draw_arrays(primitive, 0, count)
        } else {
            self.gl
                .draw_elements_with_i32(primitive, count, I::GL_ENUM, 0);
        }
    }
}

impl<'a, V: Vertex, I: Index> Drop for TriangleBufferBinding<'a, V, I> {
    fn drop(&mut self) {
        // Unbind ALWAYS required (unlike all other render unbinds).
        self.ovao.bind_vertex_array_oes(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_two_triangles() {
        let mut mesh = MeshBuilder::<f32, u16>::new();
        mesh.vertices.extend_from_slice(&[0.0, 1.0, 2.0, 3.0]);
        mesh.push_quad([0, 1, 2, 3]);
        assert_eq!(mesh.indices, [0, 1, 2, 2, 3, 0]);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn extend_offsets_indices() {
        let mut a = MeshBuilder::<f32, u16>::new();
        a.vertices.extend_from_slice(&[0.0, 0.0, 0.0]);
        a.push_triangle([0, 1, 2]);

        let b = a.clone();
        a.extend(&b);

        assert_eq!(a.vertices.len(), 6);
        assert_eq!(a.indices, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn capacity_grows_by_powers_of_two() {
        assert_eq!(buffer_capacity(1), 1);
        assert_eq!(buffer_capacity(3), 4);
        assert_eq!(buffer_capacity(100), 128);
    }
}
