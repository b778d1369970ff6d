//! Codegen for the two-component and container Type Kinds: `Pair<A, B>`,
//! `Mapping<K, V>`, and `Set<T>`. All three share one idea — a component
//! (key, value, first, second, or set element) is either a scalar or
//! another message type, and either way we need an encode/merge/size
//! closure for it to hand to the runtime's generic
//! `collections::encode_map_entry`-family helpers. Grounded on
//! `prost-derive/src/field/map.rs`'s `key_ty`/`value_ty` dispatch, which
//! does the same scalar-or-message split for `HashMap` fields.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Path;

use crate::field::{message, scalar};
use crate::schema::Cardinality;

enum Component {
    Scalar(scalar::ScalarKind),
    Message(TokenStream),
}

fn resolve(path: &Path) -> Component {
    if let Some(ident) = path.get_ident() {
        if let Some(kind) = scalar::lookup(&ident.to_string()) {
            return Component::Scalar(kind);
        }
    }
    Component::Message(quote!(#path))
}

fn rust_ty(component: &Component) -> TokenStream {
    match component {
        Component::Scalar(kind) => kind.rust_ty.clone(),
        Component::Message(ty) => ty.clone(),
    }
}

/// Builds `|tag: u32, value: &T, writer: &mut ::protospan::StreamWriter<'_, S>| -> Result<(), ::protospan::EncodeError> { .. }`.
fn encode_closure(component: &Component) -> TokenStream {
    let ty = rust_ty(component);
    let body = match component {
        Component::Scalar(kind) => {
            let stmt = scalar::encode_expr(kind, quote!(tag), quote!(*value), quote!(writer));
            quote! { #stmt Ok(()) }
        }
        Component::Message(_) => {
            let stmt = message::encode_one(quote!(tag), quote!(value), quote!(writer));
            quote! { #stmt Ok(()) }
        }
    };
    quote! {
        |tag: u32, value: &#ty, writer: &mut ::protospan::StreamWriter<'_, _>| -> Result<(), ::protospan::EncodeError> {
            #body
        }
    }
}

/// Builds `|tag: u32, value: &T| -> usize { .. }`.
fn size_closure(component: &Component) -> TokenStream {
    let ty = rust_ty(component);
    let body = match component {
        Component::Scalar(kind) => scalar::size_expr(kind, quote!(tag), quote!(*value), quote!(sizer)),
        Component::Message(_) => message::size_one(quote!(tag), quote!(value), quote!(sizer)),
    };
    quote! {
        |tag: u32, value: &#ty| -> usize {
            let mut sizer = ::protospan::SizeCalculator::new();
            #body
            sizer.finish()
        }
    }
}

/// Builds `|wire_type, value: &mut T, reader, budget| -> Result<(), DecodeError> { .. }`.
fn merge_closure(component: &Component) -> TokenStream {
    let ty = rust_ty(component);
    let body = match component {
        Component::Scalar(kind) => scalar::merge_expr(kind, quote!(wire_type), quote!(reader), quote!(*value)),
        Component::Message(_) => message::merge_one(quote!(value), quote!(wire_type), quote!(reader), quote!(budget)),
    };
    quote! {
        |wire_type: ::protospan::WireType,
         value: &mut #ty,
         reader: &mut ::protospan::SpanReader<'_>,
         budget: ::protospan::reader::RecursionBudget|
         -> Result<(), ::protospan::DecodeError> {
            #body
            Ok(())
        }
    }
}

/// `Mapping<K, V>`, represented as `std::collections::HashMap<K, V>`. Maps
/// are never wrapped in `Option`/`Vec` — an absent map is an empty map, and
/// merging accumulates entries directly into the field.
pub fn generate_map(tag: u32, member: &TokenStream, key: &Path, value: &Path) -> (TokenStream, TokenStream, TokenStream) {
    let key_component = resolve(key);
    let value_component = resolve(value);
    let encode_key = encode_closure(&key_component);
    let encode_value = encode_closure(&value_component);
    let size_key = size_closure(&key_component);
    let size_value = size_closure(&value_component);
    let merge_key = merge_closure(&key_component);
    let merge_value = merge_closure(&value_component);

    let encode = quote! {
        for (__key, __value) in self.#member.iter() {
            ::protospan::collections::encode_map_entry(#tag, __key, __value, writer, #encode_key, #encode_value, #size_key, #size_value)?;
        }
    };
    let size = quote! {
        for (__key, __value) in self.#member.iter() {
            sizer.size_bytes(::protospan::collections::size_map_entry(#tag, __key, __value, #size_key, #size_value));
        }
    };
    let merge = quote! {
        let (__key, __value) = ::protospan::collections::merge_map_entry(wire_type, reader, budget, #merge_key, #merge_value)?;
        self.#member.insert(__key, __value);
    };
    (encode, merge, size)
}

/// `Set<T>`, represented as `Vec<T>` with decode-time uniqueness
/// enforcement (`insert_unique`) rather than a native `HashSet`, so that
/// `T` need not be `Hash` — only `PartialEq`, matching the runtime's
/// `collections::insert_unique`.
pub fn generate_set(tag: u32, member: &TokenStream, element: &Path) -> (TokenStream, TokenStream, TokenStream) {
    let component = resolve(element);
    let ty = rust_ty(&component);
    let (encode_one, merge_one_body, size_one) = match &component {
        Component::Scalar(kind) => (
            scalar::encode_expr(kind, quote!(#tag), quote!(*__value), quote!(writer)),
            scalar::merge_expr(kind, quote!(wire_type), quote!(reader), quote!(__element)),
            scalar::size_expr(kind, quote!(#tag), quote!(*__value), quote!(sizer)),
        ),
        Component::Message(_) => (
            message::encode_one(quote!(#tag), quote!(__value), quote!(writer)),
            message::merge_one(quote!(&mut __element), quote!(wire_type), quote!(reader), quote!(budget)),
            message::size_one(quote!(#tag), quote!(__value), quote!(sizer)),
        ),
    };

    let encode = quote! {
        for __value in self.#member.iter() {
            #encode_one
        }
    };
    let size = quote! {
        for __value in self.#member.iter() {
            #size_one
        }
    };
    let merge = quote! {
        let mut __element: #ty = Default::default();
        #merge_one_body
        ::protospan::collections::insert_unique(&mut self.#member, __element);
    };
    (encode, merge, size)
}

/// `Pair<A, B>`, at any cardinality, always wire-shaped as
/// `{1: first, 2: second}`.
pub fn generate_pair(
    tag: u32,
    member: &TokenStream,
    first: &Path,
    second: &Path,
    cardinality: Cardinality,
) -> (TokenStream, TokenStream, TokenStream) {
    let first_component = resolve(first);
    let second_component = resolve(second);
    let first_ty = rust_ty(&first_component);
    let second_ty = rust_ty(&second_component);
    let pair_ty = quote!(::protospan::Pair<#first_ty, #second_ty>);
    let encode_first = encode_closure(&first_component);
    let encode_second = encode_closure(&second_component);
    let size_first = size_closure(&first_component);
    let size_second = size_closure(&second_component);
    let merge_first = merge_closure(&first_component);
    let merge_second = merge_closure(&second_component);

    let encode_one = |value: TokenStream, writer: TokenStream| {
        quote! {
            ::protospan::pair::encode(#tag, #value, #writer, #encode_first, #encode_second, #size_first, #size_second)?;
        }
    };
    let size_one = |value: TokenStream, sizer: TokenStream| {
        let size_pair = quote! { ::protospan::pair::size(#tag, #value, #size_first, #size_second) };
        quote! { #sizer.size_bytes(#size_pair); }
    };
    let merge_one = |target: TokenStream| {
        quote! {
            #target = ::protospan::pair::merge(wire_type, reader, budget, #merge_first, #merge_second)?;
        }
    };

    match cardinality {
        Cardinality::Single => (
            encode_one(quote!(&self.#member), quote!(writer)),
            merge_one(quote!(self.#member)),
            size_one(quote!(&self.#member), quote!(sizer)),
        ),
        Cardinality::Optional => {
            let encode_inner = encode_one(quote!(__value), quote!(writer));
            let size_inner = size_one(quote!(__value), quote!(sizer));
            (
                quote! {
                    if let Some(__value) = self.#member.as_ref() {
                        #encode_inner
                    }
                },
                quote! {
                    let __element: #pair_ty = ::protospan::pair::merge(wire_type, reader, budget, #merge_first, #merge_second)?;
                    self.#member = Some(__element);
                },
                quote! {
                    if let Some(__value) = self.#member.as_ref() {
                        #size_inner
                    }
                },
            )
        }
        Cardinality::Repeated => {
            let encode_inner = encode_one(quote!(__value), quote!(writer));
            let size_inner = size_one(quote!(__value), quote!(sizer));
            (
                quote! {
                    for __value in self.#member.iter() {
                        #encode_inner
                    }
                },
                quote! {
                    let __element: #pair_ty = ::protospan::pair::merge(wire_type, reader, budget, #merge_first, #merge_second)?;
                    self.#member.push(__element);
                },
                quote! {
                    for __value in self.#member.iter() {
                        #size_inner
                    }
                },
            )
        }
    }
}
