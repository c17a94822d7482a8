// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(missing_docs)]
#![crate_name = "bunny_dof"]

//! # Bunny DoF
//!
//! [`bunny_dof`][`crate`] contains small WebGL demos: a canvas [`clear`] test, and bunny
//! [`scene`]s rendered with a [`dof`] (depth of field) pipeline that composites a sharp pass, a
//! focal distance pass and a blur pass.

pub mod bunny;
pub mod canvas;
pub mod clear;
pub mod config;
pub mod dof;
pub mod grid;
pub mod scene;

/// Shown when the browser can't create a WebGL context.
pub const WEBGL_UNAVAILABLE: &str = "Unable to start WebGL!";
