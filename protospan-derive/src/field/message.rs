//! Codegen for a nested-message field: another type implementing
//! `protospan::Message`, embedded as a length-delimited field. Grounded on
//! `prost-derive/src/field/message.rs`'s `encode`/`merge`/`encoded_len`,
//! generalized here to the explicit `Cardinality` model instead of
//! `prost`'s `Label`.
//!
//! The per-value helpers (`encode_one`/`size_one`/`merge_one`) are also
//! reused by `field::collection` for message-typed map values, pair
//! components, and set/sequence elements — a nested message is a nested
//! message regardless of which container it sits inside.

use proc_macro2::TokenStream;
use quote::quote;

use crate::schema::Cardinality;

/// Writes one message value (already a reference expression) at `tag`.
/// Assumes a `writer` in scope of type `&mut StreamWriter<'_, impl Sink>`.
pub fn encode_one(tag: TokenStream, value: TokenStream, writer: TokenStream) -> TokenStream {
    quote! {
        {
            let mut __sizer = ::protospan::SizeCalculator::new();
            ::protospan::Message::size_fields(#value, &mut __sizer);
            let __len = __sizer.finish();
            #writer.write_tag(#tag, ::protospan::WireType::LengthDelimited)?;
            #writer.write_length_delimited_header(__len)?;
            ::protospan::Message::write_fields(#value, #writer)?;
        }
    }
}

pub fn size_one(tag: TokenStream, value: TokenStream, sizer: TokenStream) -> TokenStream {
    quote! {
        {
            let mut __inner = ::protospan::SizeCalculator::new();
            ::protospan::Message::size_fields(#value, &mut __inner);
            #sizer.size_tag(#tag, ::protospan::WireType::LengthDelimited).size_length_delimited(__inner.finish());
        }
    }
}

/// Merges a nested message's wire body into `target` (a `&mut M`
/// expression). Assumes `wire_type`, `reader`, and `budget` are in scope
/// with their usual `Message::merge_field` meanings.
pub fn merge_one(target: TokenStream, wire_type: TokenStream, reader: TokenStream, budget: TokenStream) -> TokenStream {
    quote! {
        ::protospan::wire_type::check_wire_type(::protospan::WireType::LengthDelimited, #wire_type)?;
        let __budget = #budget.enter()?;
        let mut __body = #reader.read_length_delimited()?;
        while let Some((__tag, __wt)) = __body.read_tag()? {
            ::protospan::Message::merge_field(#target, __tag, __wt, &mut __body, __budget)?;
        }
    }
}

/// Generates the `write_fields`/`merge_field`/`size_fields` fragments for
/// one struct field holding a nested message, at whatever cardinality.
/// `rust_ty` is the user-declared element type (the message type itself,
/// never wrapped in `Option`/`Vec` — that wrapping is this function's job).
pub fn generate(
    tag: u32,
    member: &TokenStream,
    cardinality: Cardinality,
    rust_ty: &TokenStream,
) -> (TokenStream, TokenStream, TokenStream) {
    let tag_tok = quote!(#tag);
    match cardinality {
        Cardinality::Single => {
            let encode = encode_one(tag_tok.clone(), quote!(&self.#member), quote!(writer));
            let size = size_one(tag_tok, quote!(&self.#member), quote!(sizer));
            let merge = merge_one(quote!(&mut self.#member), quote!(wire_type), quote!(reader), quote!(budget));
            (encode, merge, size)
        }
        Cardinality::Optional => {
            let encode_inner = encode_one(tag_tok.clone(), quote!(__value), quote!(writer));
            let encode = quote! {
                if let Some(__value) = self.#member.as_ref() {
                    #encode_inner
                }
            };
            let size_inner = size_one(tag_tok, quote!(__value), quote!(sizer));
            let size = quote! {
                if let Some(__value) = self.#member.as_ref() {
                    #size_inner
                }
            };
            let merge_inner = merge_one(
                quote!(self.#member.get_or_insert_with(<#rust_ty as Default>::default)),
                quote!(wire_type),
                quote!(reader),
                quote!(budget),
            );
            (encode, merge_inner, size)
        }
        Cardinality::Repeated => {
            let encode_inner = encode_one(tag_tok.clone(), quote!(__value), quote!(writer));
            let encode = quote! {
                for __value in self.#member.iter() {
                    #encode_inner
                }
            };
            let size_inner = size_one(tag_tok, quote!(__value), quote!(sizer));
            let size = quote! {
                for __value in self.#member.iter() {
                    #size_inner
                }
            };
            let merge_inner = merge_one(quote!(&mut __element), quote!(wire_type), quote!(reader), quote!(budget));
            let merge = quote! {
                let mut __element = <#rust_ty as Default>::default();
                #merge_inner
                self.#member.push(__element);
            };
            (encode, merge, size)
        }
    }
}
