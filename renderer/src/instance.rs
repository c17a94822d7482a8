// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::attribs::Attribs;
use crate::buffer::*;
use crate::gl::*;
use crate::index::Index;
use crate::renderer::Renderer;
use crate::vertex::Vertex;
use std::cell::RefCell;
use web_sys::{WebGlBuffer, WebGlVertexArrayObject};

/// [`InstanceBuffer`] facilitates drawing a [`TriangleBuffer`] multiple times, with per-instance
/// attributes `M` following the mesh's per-vertex attributes in the vertex shader.
pub struct InstanceBuffer<M> {
    instances: GpuBuffer<M>,
    vao: WebGlVertexArrayObject,
    last_vertex_buffer: RefCell<Option<WebGlBuffer>>,
}

impl<M: Vertex> InstanceBuffer<M> {
    /// Creates a new [`InstanceBuffer`].
    pub fn new(renderer: &Renderer) -> Self {
        Self {
            instances: GpuBuffer::new_array(&renderer.gl),
            vao: renderer
                .ovao
                .create_vertex_array_oes()
                .unwrap_or_else(|| panic!("{} context lost", gl_title!())),
            last_vertex_buffer: Default::default(),
        }
    }

    /// Binds the [`InstanceBuffer`] and a [`TriangleBuffer`] to draw instances of triangles.
    ///
    /// # Panics
    ///
    /// If [`Renderer::enable_angle_instanced_arrays`] wasn't called.
    #[must_use]
    pub fn bind<'a, V: Vertex, I: Index>(
        &'a self,
        renderer: &'a Renderer,
        triangle_buffer: &'a TriangleBuffer<V, I>,
    ) -> InstanceBufferBinding<'a, V, I, M> {
        let gl = &renderer.gl;
        let aia = renderer
            .aia
            .as_ref()
            .expect("must enable AngleInstancedArrays");
        let ovao = &renderer.ovao;

        // Don't redo attribs if the mesh doesn't change.
        let mut last_vertex_buffer = self.last_vertex_buffer.borrow_mut();
        let vertex_buffer = triangle_buffer.vertices.inner();
        if last_vertex_buffer.as_ref() != Some(vertex_buffer) {
            *last_vertex_buffer = Some(vertex_buffer.clone());

            ovao.bind_vertex_array_oes(Some(&self.vao));

            let attribs = triangle_buffer.bind_attribs(gl);
            triangle_buffer.indices.bind(gl);

            self.instances.bind(gl);
            M::bind_attribs(&mut Attribs::new_instanced::<M>(gl, aia, &attribs));
            drop(attribs);

            // Unbinding VAO is ALWAYS required (unlike all other render unbinds).
            ovao.bind_vertex_array_oes(None);
            gl.bind_buffer(Gl::ARRAY_BUFFER, None);
            gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, None);
        }

        ovao.bind_vertex_array_oes(Some(&self.vao));
        InstanceBufferBinding {
            aia,
            ovao,
            triangle_buffer,
            buffer: self,
        }
    }

    /// Copies instances into the [`InstanceBuffer`].
    pub fn buffer(&mut self, renderer: &Renderer, instances: &[M]) {
        self.instances.buffer(&renderer.gl, instances);
    }
}

/// A bound [`InstanceBuffer`] that can draw instances of triangles.
pub struct InstanceBufferBinding<'a, V, I, M> {
    aia: &'a Aia,
    ovao: &'a Ovao,
    triangle_buffer: &'a TriangleBuffer<V, I>,
    buffer: &'a InstanceBuffer<M>,
}

impl<'a, V: Vertex, I: Index, M: Vertex> InstanceBufferBinding<'a, V, I, M> {
    /// Draws every buffered instance of the triangles.
    pub fn draw(&self) {
        let primitive = Gl::TRIANGLES;
        let count = self.triangle_buffer.draw_count();
        let instances = self.buffer.instances.len() as i32;
        if count == 0 || instances == 0 {
            return;
        }
        if self.triangle_buffer.indices.is_empty() {
            self.aia
                .draw_arrays_instanced_angle(primitive, 0, count, instances)
        } else {
            self.aia.draw_elements_instanced_angle_with_i32(
                primitive,
                count,
                I::GL_ENUM,
                0,
                instances,
            );
        }
    }
}

impl<'a, V, I, M> Drop for InstanceBufferBinding<'a, V, I, M> {
    fn drop(&mut self) {
        // Unbind ALWAYS required (unlike all other render unbinds).
        self.ovao.bind_vertex_array_oes(None);
    }
}
