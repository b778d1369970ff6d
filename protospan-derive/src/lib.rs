//! Derive macro for `protospan::Message`.
//!
//! This crate holds the Schema Extractor and Code Synthesizer: it reads
//! a struct's `#[wire(...)]` attributes into the Intermediate Schema
//! (`schema`/`meta`) and emits the `Write<M>`/`Read<M>`/`SizeOf<M>` code
//! (`field::*`/`message`) the runtime crate's `Message` trait expects.
//! Grounded throughout on `prost-derive/src/lib.rs`'s `try_message`
//! entry point and error-reporting convention: a parse/validation
//! failure becomes a `syn::Error`, rendered back as a `compile_error!`
//! invocation rather than a panic, so the user sees a normal diagnostic
//! at the derive site.

extern crate proc_macro;

mod field;
mod message;
mod meta;
mod schema;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `protospan::Message` for a struct whose fields carry
/// `#[wire(...)]` attributes.
#[proc_macro_derive(Message, attributes(wire))]
pub fn derive_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ident_span = input.ident.clone();
    match message::expand(input) {
        Ok(expanded) => expanded.into(),
        Err(error) => syn::Error::new(proc_macro2::Span::call_site(), format!("{ident_span}: {error}"))
            .to_compile_error()
            .into(),
    }
}
