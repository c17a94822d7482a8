// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::shader::ShaderBinding;

/// A view into world space that knows how to set its uniforms.
pub trait Camera {
    /// Sets the camera's uniforms, e.g. `uniform mat4 uViewProjection;`.
    fn prepare(&self, shader: &ShaderBinding);
}
