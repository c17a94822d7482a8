// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Smoke test that WebGL works at all: size the canvas and clear it to a solid color.

use crate::canvas::CanvasSize;
use crate::config::ClearConfig;
use crate::WEBGL_UNAVAILABLE;
use wasm_bindgen::JsCast;
use web_sys::WebGlRenderingContext as Gl;

/// Clears the configured canvas once. If WebGL can't start, the user is alerted and the
/// underlying error is returned.
///
/// Uses a bare context instead of [`Renderer`][`renderer::Renderer`], so browsers missing the
/// extensions the bunny scenes need can still pass.
pub fn run(config: &ClearConfig) -> Result<(), String> {
    let canvas = js_hooks::query_canvas(config.canvas.selector)?;
    CanvasSize::of_window(config.canvas.size).apply(&canvas)?;

    let context = canvas.get_context("webgl").map_err(|e| {
        js_hooks::error_message(&e).unwrap_or_else(|| "Error initializing WebGL".to_owned())
    });
    let gl = require_context(context)
        .map_err(|e| {
            js_hooks::alert(WEBGL_UNAVAILABLE);
            e
        })?
        .dyn_into::<Gl>()
        .map_err(|_| "context is not WebGL".to_owned())?;

    let color = config.color;
    gl.clear_color(color.x, color.y, color.z, color.w);
    gl.clear(Gl::COLOR_BUFFER_BIT);
    Ok(())
}

/// Only a missing or failed `getContext` means WebGL is unavailable.
fn require_context<T>(context: Result<Option<T>, String>) -> Result<T, String> {
    context?.ok_or_else(|| "WebGL unsupported".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_all_that_is_required() {
        assert_eq!(require_context(Ok(Some(7))), Ok(7));
        assert_eq!(
            require_context::<u8>(Ok(None)),
            Err("WebGL unsupported".to_owned())
        );
        assert_eq!(
            require_context::<u8>(Err("blocked".to_owned())),
            Err("blocked".to_owned())
        );
    }
}
