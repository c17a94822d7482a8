// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Aliases for the WebGL context and the two extensions the demos rely on, ANGLE instanced arrays
//! ([`Aia`]) and OES vertex array objects ([`Ovao`]).

use wasm_bindgen::JsCast;
use web_sys::{AngleInstancedArrays, OesVertexArrayObject, WebGlRenderingContext};

pub(crate) type Gl = WebGlRenderingContext;
pub(crate) type Aia = AngleInstancedArrays;
pub(crate) type Ovao = OesVertexArrayObject;

/// Name of context for get_context call.
pub(crate) const GL_NAME: &str = "webgl";

// Use a macro so concat!() works.
macro_rules! gl_title {
    () => {
        "WebGL"
    };
}

/// For compiling shaders in parallel.
pub(crate) struct KhrParallelShaderCompile;
impl KhrParallelShaderCompile {
    pub(crate) const COMPLETION_STATUS_KHR: u32 = 37297;
}
pub(crate) type Khr = KhrParallelShaderCompile;

pub(crate) trait GlExtensions {
    fn aia(&self) -> Result<Aia, String>;
    fn ovao(&self) -> Result<Ovao, String>;
    fn has_extension(&self, name: &str) -> bool;
}

impl GlExtensions for Gl {
    fn aia(&self) -> Result<Aia, String> {
        extension(self, "ANGLE_instanced_arrays").map(|e| e.unchecked_into::<Aia>())
    }

    fn ovao(&self) -> Result<Ovao, String> {
        extension(self, "OES_vertex_array_object").map(|e| e.unchecked_into::<Ovao>())
    }

    fn has_extension(&self, name: &str) -> bool {
        matches!(self.get_extension(name), Ok(Some(_)))
    }
}

fn extension(gl: &Gl, name: &str) -> Result<js_sys::Object, String> {
    gl.get_extension(name)
        .map_err(|e| js_hooks::error_message(&e).unwrap_or_else(|| format!("error enabling {name}")))?
        .ok_or_else(|| format!("{name} unsupported"))
}
