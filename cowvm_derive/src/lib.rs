//! Derive macros for the cowvm crate.
//!
//! Provides `#[derive(Error)]`: display and error-trait boilerplate for
//! error enums.

mod error;

use proc_macro::TokenStream;

/// Automatically implements `Display` and `Error` for an error enum.
#[proc_macro_derive(Error, attributes(error))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
