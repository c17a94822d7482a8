// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub(crate) mod vertex;

extern crate proc_macro;
extern crate proc_macro2;
extern crate syn;

use proc_macro::TokenStream;

/// Implements `renderer::Vertex` for a `#[repr(C)]` struct of float fields, binding one
/// attribute per field in declaration order.
#[proc_macro_derive(Vertex)]
pub fn derive_vertex(input: TokenStream) -> TokenStream {
    crate::vertex::derive_vertex(input)
}
