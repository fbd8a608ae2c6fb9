//! Derive macro for error enums.
//!
//! Generates `std::fmt::Display` from per-variant `#[error("...")]`
//! attributes, plus an empty `std::error::Error` implementation.
//! Replacement for the `thiserror` crate.
//!
//! # Usage
//!
//! ```ignore
//! use cowvm_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum MachineError {
//!     #[error("tape exhausted at cell {cell}")]
//!     TapeExhausted { cell: usize },
//!
//!     #[error("nothing to run")]
//!     EmptyProgram,
//! }
//! ```
//!
//! Supported variants: unit variants, and struct variants whose named fields
//! are interpolated with `{field_name}`. Every named field must appear in the
//! message, since all of them are handed to `write!` as named arguments.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derives `Display` and `Error` for an enum.
///
/// Each variant must carry an `#[error("...")]` attribute with its display
/// message.
pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Error can only be derived for enums",
        ));
    };

    let name = &input.ident;
    let display_arms = data
        .variants
        .iter()
        .map(|variant| {
            let ident = &variant.ident;
            let message = error_attribute(variant)?;

            match &variant.fields {
                Fields::Unit => Ok(quote! {
                    Self::#ident => write!(f, #message),
                }),
                Fields::Named(fields) => {
                    let names: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
                    Ok(quote! {
                        Self::#ident { #(#names),* } => write!(f, #message, #(#names = #names),*),
                    })
                }
                Fields::Unnamed(_) => Err(syn::Error::new_spanned(
                    variant,
                    "Error variants must use named fields so the message can interpolate them",
                )),
            }
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    #(#display_arms)*
                }
            }
        }

        impl ::std::error::Error for #name {}
    })
}

/// Pulls the message out of a variant's `#[error("...")]` attribute.
fn error_attribute(variant: &syn::Variant) -> syn::Result<String> {
    for attr in &variant.attrs {
        if attr.path().is_ident("error") {
            let lit = attr.parse_args::<LitStr>().map_err(|_| {
                syn::Error::new_spanned(
                    attr,
                    "expected a string literal, e.g. #[error(\"tape exhausted at cell {cell}\")]",
                )
            })?;
            return Ok(lit.value());
        }
    }

    Err(syn::Error::new_spanned(
        &variant.ident,
        format!(
            "missing #[error(\"...\")] attribute on variant `{}`",
            variant.ident
        ),
    ))
}
