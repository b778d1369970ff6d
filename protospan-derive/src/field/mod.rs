//! Per-field code generation, one module per family of Type Kinds:
//! `scalar` (integers/bool/float/double/string/bytes), `message` (nested
//! messages, also reused by `collection` for message-typed components),
//! `identifier` (the 128-bit BCL type), and `collection` (`Mapping`,
//! `Set`, `Pair`). `Field::generate` is the single entry point
//! `crate::message::expand` calls once per struct field.

pub mod collection;
pub mod identifier;
pub mod message;
pub mod scalar;

use anyhow::{bail, Context, Error};
use proc_macro2::TokenStream;
use quote::quote;
use syn::Member;

use crate::meta::{field_attrs, FieldAttrs};
use crate::schema::{Cardinality, FieldSchema, WireForm};

/// Resolves one struct field's `#[wire(...)]` attributes plus its `syn`
/// field data into a fully codegen'd `FieldSchema`. Returns `Ok(None)` for
/// a field the derive should ignore entirely (the synthesized
/// `#[wire(derived)]` marker field, handled separately by
/// `crate::message::expand`).
pub fn resolve(member: Member, ty: &syn::Type, attrs: &[syn::Attribute]) -> Result<Option<FieldSchema>, Error> {
    let parsed = field_attrs(attrs).with_context(|| format!("field `{}`", member_name(&member)))?;
    if parsed.derived_marker {
        return Ok(None);
    }
    let kind = parsed
        .kind
        .as_ref()
        .ok_or_else(|| Error::msg(format!("field `{}` has no `#[wire(...)]` type attribute", member_name(&member))))?;
    let tag = parsed
        .tag
        .ok_or_else(|| Error::msg(format!("field `{}` is missing `tag = N`", member_name(&member))))?;

    let kind_name = kind.get_ident().map(|i| i.to_string()).unwrap_or_default();
    let cardinality = if parsed.optional {
        Cardinality::Optional
    } else if parsed.repeated {
        Cardinality::Repeated
    } else {
        Cardinality::Single
    };

    let member_tok = member_tokens(&member);

    let (encode, merge, size, wire_form) = match kind_name.as_str() {
        "map" => {
            let key = parsed.key.as_ref().ok_or_else(|| Error::msg("`map` field requires `key = ...`"))?;
            let value = parsed.value.as_ref().ok_or_else(|| Error::msg("`map` field requires `value = ...`"))?;
            let (e, m, s) = collection::generate_map(tag, &member_tok, key, value);
            (e, m, s, WireForm::LengthDelimited)
        }
        "set" => {
            let element = parsed.element.as_ref().ok_or_else(|| Error::msg("`set` field requires `element = ...`"))?;
            let (e, m, s) = collection::generate_set(tag, &member_tok, element);
            (e, m, s, WireForm::LengthDelimited)
        }
        "pair" => {
            let first = parsed.first.as_ref().ok_or_else(|| Error::msg("`pair` field requires `first = ...`"))?;
            let second = parsed.second.as_ref().ok_or_else(|| Error::msg("`pair` field requires `second = ...`"))?;
            let (e, m, s) = collection::generate_pair(tag, &member_tok, first, second, cardinality);
            (e, m, s, WireForm::LengthDelimited)
        }
        "identifier" => {
            let (e, m, s) = identifier::generate(tag, &member_tok, cardinality);
            (e, m, s, WireForm::LengthDelimited)
        }
        "message" => {
            let rust_ty = message_element_ty(ty, cardinality)
                .with_context(|| format!("field `{}`", member_name(&member)))?;
            let (e, m, s) = message::generate(tag, &member_tok, cardinality, &rust_ty);
            (e, m, s, WireForm::LengthDelimited)
        }
        _ => {
            let scalar_kind = scalar::lookup(&kind_name)
                .ok_or_else(|| Error::msg(format!("unrecognized `#[wire(...)]` type `{kind_name}`")))?;
            let wire_form = wire_form_of(&kind_name);
            if cardinality == Cardinality::Repeated && is_packable(&kind_name) {
                let (e, m, s) = generate_repeated_scalar(tag, &member_tok, &scalar_kind, parsed.packed);
                (e, m, s, wire_form)
            } else {
                let (e, m, s) = generate_scalar(tag, &member_tok, &scalar_kind, cardinality);
                (e, m, s, wire_form)
            }
        }
    };

    if parsed.packed && !(cardinality == Cardinality::Repeated && is_packable(&kind_name)) {
        bail!(
            "`packed` is only meaningful on a `repeated` field of a packable scalar kind (field `{}`)",
            member_name(&member)
        );
    }

    Ok(Some(FieldSchema {
        member,
        tag,
        wire_form,
        cardinality,
        is_packed: parsed.packed,
        encode,
        merge,
        size,
        default: quote!(Default::default()),
    }))
}

fn member_name(member: &Member) -> String {
    match member {
        Member::Named(ident) => ident.to_string(),
        Member::Unnamed(index) => index.index.to_string(),
    }
}

fn member_tokens(member: &Member) -> TokenStream {
    quote!(#member)
}

/// Extracts the message element type from a field's declared Rust type:
/// `Foo` itself for `Cardinality::Single`, the `T` of `Option<T>` for
/// `Optional`, the `T` of `Vec<T>` for `Repeated`. Unlike the scalar
/// kinds (whose Rust type is implied entirely by the `#[wire(...)]`
/// keyword), a message field's element type can only come from the
/// struct definition itself — there is no second source of truth to
/// duplicate it in an attribute.
fn message_element_ty(ty: &syn::Type, cardinality: Cardinality) -> Result<TokenStream, Error> {
    match cardinality {
        Cardinality::Single => Ok(quote!(#ty)),
        Cardinality::Optional => unwrap_generic(ty, "Option"),
        Cardinality::Repeated => unwrap_generic(ty, "Vec"),
    }
}

fn unwrap_generic(ty: &syn::Type, wrapper: &str) -> Result<TokenStream, Error> {
    if let syn::Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == wrapper {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                        return Ok(quote!(#inner));
                    }
                }
            }
        }
    }
    bail!("expected a field of type `{wrapper}<T>` for this cardinality")
}

fn is_packable(kind_name: &str) -> bool {
    matches!(
        kind_name,
        "bool"
            | "int8"
            | "uint8"
            | "int16"
            | "uint16"
            | "int32"
            | "uint32"
            | "int64"
            | "uint64"
            | "sint32"
            | "sint64"
            | "fixed32"
            | "sfixed32"
            | "fixed64"
            | "sfixed64"
            | "float"
            | "double"
            | "char16"
    )
}

fn wire_form_of(kind_name: &str) -> WireForm {
    match kind_name {
        "fixed32" | "sfixed32" | "float" => WireForm::Fixed32,
        "fixed64" | "sfixed64" | "double" => WireForm::Fixed64,
        "string" | "bytes" => WireForm::LengthDelimited,
        "bool" | "int8" | "uint8" | "int16" | "uint16" | "int32" | "uint32" | "int64" | "uint64"
        | "sint32" | "sint64" | "char16" => WireForm::Varint,
        _ => WireForm::Varint,
    }
}

fn generate_scalar(
    tag: u32,
    member: &TokenStream,
    kind: &scalar::ScalarKind,
    cardinality: Cardinality,
) -> (TokenStream, TokenStream, TokenStream) {
    let tag_tok = quote!(#tag);
    match cardinality {
        Cardinality::Single => {
            // A singular scalar at its default value (`0`, `false`, empty
            // string/bytes) is absent on the wire, the same "semantic
            // absence" rule `identifier::encode_optional` applies to the
            // all-zero `Identifier` (§7).
            let rust_ty = &kind.rust_ty;
            let encode_inner = scalar::encode_expr(kind, tag_tok.clone(), quote!(self.#member), quote!(writer));
            let encode = quote! {
                if self.#member != <#rust_ty as Default>::default() {
                    #encode_inner
                }
            };
            let merge = scalar::merge_expr(kind, quote!(wire_type), quote!(reader), quote!(self.#member));
            let size_inner = scalar::size_expr(kind, tag_tok, quote!(self.#member), quote!(sizer));
            let size = quote! {
                if self.#member != <#rust_ty as Default>::default() {
                    #size_inner
                }
            };
            (encode, merge, size)
        }
        Cardinality::Optional => {
            let encode_inner = scalar::encode_expr(kind, tag_tok.clone(), quote!(*__value), quote!(writer));
            let encode = quote! {
                if let Some(__value) = self.#member.as_ref() {
                    #encode_inner
                }
            };
            let size_inner = scalar::size_expr(kind, tag_tok, quote!(*__value), quote!(sizer));
            let size = quote! {
                if let Some(__value) = self.#member.as_ref() {
                    #size_inner
                }
            };
            let rust_ty = &kind.rust_ty;
            let merge_inner = scalar::merge_expr(kind, quote!(wire_type), quote!(reader), quote!(*self.#member.get_or_insert_with(<#rust_ty as Default>::default)));
            (encode, merge_inner, size)
        }
        Cardinality::Repeated => {
            let encode_inner = scalar::encode_expr(kind, tag_tok.clone(), quote!(*__value), quote!(writer));
            let encode = quote! {
                for __value in self.#member.iter() {
                    #encode_inner
                }
            };
            let size_inner = scalar::size_expr(kind, tag_tok, quote!(*__value), quote!(sizer));
            let size = quote! {
                for __value in self.#member.iter() {
                    #size_inner
                }
            };
            let rust_ty = &kind.rust_ty;
            let merge_inner = scalar::merge_expr(kind, quote!(wire_type), quote!(reader), quote!(__element));
            let merge = quote! {
                let mut __element: #rust_ty = Default::default();
                #merge_inner
                self.#member.push(__element);
            };
            (encode, merge, size)
        }
    }
}

/// A `repeated` field of a packable scalar kind: encodes in whichever
/// form (`packed`/non-packed) the schema declares, but always *decodes*
/// either form (§4.1, Packed/non-packed adaptive decoding).
fn generate_repeated_scalar(
    tag: u32,
    member: &TokenStream,
    kind: &scalar::ScalarKind,
    packed: bool,
) -> (TokenStream, TokenStream, TokenStream) {
    let wire_type = &kind.wire_type;
    let rust_ty = &kind.rust_ty;
    let raw_write = scalar::raw_write_expr(kind, quote!(*__value), quote!(writer));
    let raw_size = scalar::raw_size_expr(kind, quote!(*__value));
    let raw_read = scalar::raw_read_expr(kind, quote!(__r));

    let (encode, size) = if packed {
        let encode = quote! {
            if !self.#member.is_empty() {
                let mut __body_len = 0usize;
                for __value in self.#member.iter() {
                    __body_len += #raw_size;
                }
                writer.write_tag(#tag, ::protospan::WireType::LengthDelimited)?;
                writer.write_length_delimited_header(__body_len)?;
                for __value in self.#member.iter() {
                    #raw_write
                }
            }
        };
        let size = quote! {
            if !self.#member.is_empty() {
                let mut __body_len = 0usize;
                for __value in self.#member.iter() {
                    __body_len += #raw_size;
                }
                sizer.size_tag(#tag, ::protospan::WireType::LengthDelimited).size_length_delimited(__body_len);
            }
        };
        (encode, size)
    } else {
        let encode_one = scalar::encode_expr(kind, quote!(#tag), quote!(*__value), quote!(writer));
        let size_one = scalar::size_expr(kind, quote!(#tag), quote!(*__value), quote!(sizer));
        (
            quote! {
                for __value in self.#member.iter() {
                    #encode_one
                }
            },
            quote! {
                for __value in self.#member.iter() {
                    #size_one
                }
            },
        )
    };

    let merge = quote! {
        ::protospan::collections::merge_repeated_scalar_adaptive(
            wire_type,
            &mut self.#member,
            reader,
            #wire_type,
            |__r: &mut ::protospan::SpanReader<'_>| -> Result<#rust_ty, ::protospan::DecodeError> { Ok(#raw_read) },
        )?;
    };

    (encode, merge, size)
}
