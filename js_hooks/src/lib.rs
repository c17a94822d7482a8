// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "js_hooks"]

//! # Js Hooks
//!
//! [`js_hooks`][`crate`] is a collection of utilities for a WASM demo running in a browser page.

use js_sys::Reflect;
use std::fmt;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

/// Selector of the canvas every demo page provides.
pub const CANVAS_SELECTOR: &str = "#canvas";

/// Gets the window.
pub fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "no window".to_owned())
}

/// Gets the document.
pub fn document() -> Result<Document, String> {
    window()?.document().ok_or_else(|| "no document".to_owned())
}

/// Gets the canvas matching `selector` (e.g. `"#canvas"`).
pub fn query_canvas(selector: &str) -> Result<HtmlCanvasElement, String> {
    document()?
        .query_selector(selector)
        .map_err(|e| error_message(&e).unwrap_or_else(|| format!("invalid selector {selector}")))?
        .ok_or_else(|| format!("no element matches {selector}"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| format!("{selector} is not a canvas"))
}

/// Returns `window.devicePixelRatio`, or `1.0` if there is no window.
pub fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

/// Shows a blocking alert dialog. Failures to show it are logged instead.
pub fn alert(message: &str) {
    let result = window().and_then(|w| {
        w.alert_with_message(message)
            .map_err(|e| error_message(&e).unwrap_or_default())
    });
    if let Err(e) = result {
        console_error!("could not alert {:?}: {}", message, e);
    }
}

/// Extracts an error message from a JavaScript error.
pub fn error_message(error: &JsValue) -> Option<String> {
    Reflect::get(error, &JsValue::from_str("message"))
        .as_ref()
        .ok()
        .and_then(JsValue::as_string)
}

/// Log an error to JavaScript's console. Use this instead of [`eprintln!`].
#[macro_export]
macro_rules! console_error {
    ($($t:tt)*) => {
        $crate::error_args(&format_args!($($t)*))
    };
}

/// Log to JavaScript's console. Use this instead of [`println!`].
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        $crate::log_args(&format_args!($($t)*))
    };
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[doc(hidden)]
pub fn error_args(args: &fmt::Arguments) {
    error(&args.to_string())
}

#[doc(hidden)]
pub fn log_args(args: &fmt::Arguments) {
    log(&args.to_string())
}
