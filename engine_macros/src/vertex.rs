// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericParam, Generics};

pub(crate) fn derive_vertex(input: TokenStream) -> TokenStream {
    let DeriveInput {
        ident,
        data,
        generics,
        ..
    } = parse_macro_input!(input);

    let fields = match data {
        Data::Struct(data) => data.fields,
        _ => {
            return quote_spanned! {ident.span()=>
                compile_error!("Vertex can only be derived on structs");
            }
            .into()
        }
    };

    let named = match fields {
        Fields::Named(named) => named.named,
        fields => {
            return quote_spanned! {fields.span()=>
                compile_error!("Vertex requires named fields");
            }
            .into()
        }
    };

    // Inside the renderer crate itself the derive must refer to `crate`.
    let c = renderer_path();

    let bind_attribs = named.iter().map(|field| {
        let ty = &field.ty;
        quote! {
            <#ty as #c::Vertex>::bind_attribs(attribs);
        }
    });

    let generics = add_trait_bounds(generics, &c);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let output = quote! {
        impl #impl_generics #c::Vertex for #ident #ty_generics #where_clause {
            fn bind_attribs(attribs: &mut #c::Attribs) {
                #(#bind_attribs)*
            }
        }
    };
    output.into()
}

fn renderer_path() -> TokenStream2 {
    if std::env::var("CARGO_PKG_NAME").as_deref() == Ok("renderer") {
        quote!(crate)
    } else {
        quote!(renderer)
    }
}

// Add a bound `T: Vertex` to every type parameter T.
fn add_trait_bounds(mut generics: Generics, c: &TokenStream2) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(#c::Vertex));
        }
    }
    generics
}
