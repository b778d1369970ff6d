//! Codegen for the 128-bit `Identifier` Type Kind. Delegates entirely to
//! `protospan::identifier`'s free functions — the BCL nested-message
//! layout and absent-when-zero convention live there, not in generated
//! code, the same split `prost-derive`'s `map.rs` uses for `HashMap`
//! (generic codegen, concrete wire shape lives in the runtime crate).

use proc_macro2::TokenStream;
use quote::quote;

use crate::schema::Cardinality;

pub fn generate(tag: u32, member: &TokenStream, cardinality: Cardinality) -> (TokenStream, TokenStream, TokenStream) {
    match cardinality {
        Cardinality::Single => (
            quote! { ::protospan::identifier::encode_optional(#tag, &self.#member, writer)?; },
            quote! {
                ::protospan::identifier::merge(wire_type, &mut self.#member, reader, budget)?;
            },
            quote! { sizer.size_bytes(::protospan::identifier::encoded_len(#tag, &self.#member)); },
        ),
        Cardinality::Optional => (
            quote! {
                if let Some(__value) = self.#member.as_ref() {
                    ::protospan::identifier::encode(#tag, __value, writer)?;
                }
            },
            quote! {
                ::protospan::identifier::merge(
                    wire_type,
                    self.#member.get_or_insert_with(::protospan::Identifier::default),
                    reader,
                    budget,
                )?;
            },
            quote! {
                if let Some(__value) = self.#member.as_ref() {
                    sizer.size_bytes(::protospan::identifier::encoded_len(#tag, __value));
                }
            },
        ),
        Cardinality::Repeated => (
            quote! {
                for __value in self.#member.iter() {
                    ::protospan::identifier::encode(#tag, __value, writer)?;
                }
            },
            quote! {
                let mut __element = ::protospan::Identifier::default();
                ::protospan::identifier::merge(wire_type, &mut __element, reader, budget)?;
                self.#member.push(__element);
            },
            quote! {
                for __value in self.#member.iter() {
                    sizer.size_bytes(::protospan::identifier::encoded_len(#tag, __value));
                }
            },
        ),
    }
}
