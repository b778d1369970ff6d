//! Codegen for the scalar Type Kinds: integers of every declared
//! signedness and width (8/16/32/64, plus the zigzag and fixed-width
//! variants chosen by kind name), `bool`, `char16`, `float`/`double`,
//! `string`, and `bytes`. Grounded on `prost-derive/src/field/scalar.rs`'s
//! `Ty` enum and its `encode`/`merge`/`encoded_len` token generation.

use proc_macro2::TokenStream;
use quote::quote;

/// One scalar kind's Rust type and the `StreamWriter`/`SpanReader`/
/// `SizeCalculator` method names that move a value of that type.
pub struct ScalarKind {
    pub rust_ty: TokenStream,
    pub wire_type: TokenStream,
    write_method: TokenStream,
    read_method: TokenStream,
    size_method: TokenStream,
    /// Casts applied around the write/read calls for kinds whose wire
    /// method operates on a wider or differently-signed primitive than the
    /// schema's declared type (e.g. `sfixed32` writes via `write_fixed32`
    /// on the bit pattern, `sint32` round-trips through zigzag).
    cast_to_wire: fn(TokenStream) -> TokenStream,
    cast_from_wire: fn(TokenStream) -> TokenStream,
}

fn identity(expr: TokenStream) -> TokenStream {
    expr
}

pub fn lookup(kind: &str) -> Option<ScalarKind> {
    use quote::quote as q;
    Some(match kind {
        "bool" => ScalarKind {
            rust_ty: q!(bool),
            wire_type: q!(::protospan::WireType::Varint),
            write_method: q!(write_bool),
            read_method: q!(read_bool),
            size_method: q!(size_bool),
            cast_to_wire: identity,
            cast_from_wire: identity,
        },
        "int8" | "uint8" | "int16" | "uint16" | "int32" | "uint32" => ScalarKind {
            rust_ty: match kind {
                "int8" => q!(i8),
                "uint8" => q!(u8),
                "int16" => q!(i16),
                "uint16" => q!(u16),
                "int32" => q!(i32),
                _ => q!(u32),
            },
            wire_type: q!(::protospan::WireType::Varint),
            write_method: q!(write_varint32),
            read_method: q!(read_varint32),
            size_method: q!(size_varint),
            cast_to_wire: |e| q!(#e as u32),
            cast_from_wire: match kind {
                "int8" => |e| q!(#e as i8),
                "uint8" => |e| q!(#e as u8),
                "int16" => |e| q!(#e as i16),
                "uint16" => |e| q!(#e as u16),
                "int32" => |e| q!(#e as i32),
                _ => identity,
            },
        },
        "char16" => ScalarKind {
            rust_ty: q!(u16),
            wire_type: q!(::protospan::WireType::Varint),
            write_method: q!(write_varint32),
            read_method: q!(read_varint32),
            size_method: q!(size_varint),
            cast_to_wire: |e| q!(#e as u32),
            cast_from_wire: |e| q!(#e as u16),
        },
        "int64" | "uint64" => ScalarKind {
            rust_ty: if kind == "int64" { q!(i64) } else { q!(u64) },
            wire_type: q!(::protospan::WireType::Varint),
            write_method: q!(write_varint),
            read_method: q!(read_varint64),
            size_method: q!(size_varint),
            cast_to_wire: |e| q!(#e as u64),
            cast_from_wire: if kind == "int64" { |e| q!(#e as i64) } else { identity },
        },
        "sint32" => ScalarKind {
            rust_ty: q!(i32),
            wire_type: q!(::protospan::WireType::Varint),
            write_method: q!(write_varint32),
            read_method: q!(read_zigzag32),
            size_method: q!(size_varint),
            cast_to_wire: |e| q!(::protospan::zigzag_encode32(#e)),
            cast_from_wire: identity,
        },
        "sint64" => ScalarKind {
            rust_ty: q!(i64),
            wire_type: q!(::protospan::WireType::Varint),
            write_method: q!(write_varint),
            read_method: q!(read_zigzag64),
            size_method: q!(size_varint),
            cast_to_wire: |e| q!(::protospan::zigzag_encode64(#e)),
            cast_from_wire: identity,
        },
        "fixed32" | "sfixed32" => ScalarKind {
            rust_ty: if kind == "fixed32" { q!(u32) } else { q!(i32) },
            wire_type: q!(::protospan::WireType::ThirtyTwoBit),
            write_method: q!(write_fixed32),
            read_method: q!(read_fixed32),
            size_method: q!(size_fixed32_marker),
            cast_to_wire: |e| q!(#e as u32),
            cast_from_wire: if kind == "sfixed32" { |e| q!(#e as i32) } else { identity },
        },
        "fixed64" | "sfixed64" => ScalarKind {
            rust_ty: if kind == "fixed64" { q!(u64) } else { q!(i64) },
            wire_type: q!(::protospan::WireType::SixtyFourBit),
            write_method: q!(write_fixed64),
            read_method: q!(read_fixed64),
            size_method: q!(size_fixed64_marker),
            cast_to_wire: |e| q!(#e as u64),
            cast_from_wire: if kind == "sfixed64" { |e| q!(#e as i64) } else { identity },
        },
        "float" => ScalarKind {
            rust_ty: q!(f32),
            wire_type: q!(::protospan::WireType::ThirtyTwoBit),
            write_method: q!(write_float),
            read_method: q!(read_float),
            size_method: q!(size_fixed32_marker),
            cast_to_wire: identity,
            cast_from_wire: identity,
        },
        "double" => ScalarKind {
            rust_ty: q!(f64),
            wire_type: q!(::protospan::WireType::SixtyFourBit),
            write_method: q!(write_double),
            read_method: q!(read_double),
            size_method: q!(size_fixed64_marker),
            cast_to_wire: identity,
            cast_from_wire: identity,
        },
        "string" => ScalarKind {
            rust_ty: q!(::std::string::String),
            wire_type: q!(::protospan::WireType::LengthDelimited),
            write_method: q!(write_str),
            read_method: q!(read_utf8_string_into_new_owned),
            size_method: q!(size_length_delimited_marker),
            cast_to_wire: |e| q!(#e.as_str()),
            cast_from_wire: identity,
        },
        "bytes" => ScalarKind {
            rust_ty: q!(::std::vec::Vec<u8>),
            wire_type: q!(::protospan::WireType::LengthDelimited),
            write_method: q!(write_bytes),
            read_method: q!(read_bytes_into_new_owned),
            size_method: q!(size_length_delimited_marker),
            cast_to_wire: |e| q!(#e.as_slice()),
            cast_from_wire: identity,
        },
        _ => return None,
    })
}

/// Writes one present scalar value at `tag` through `writer`.
///
/// `write_str` is not called like the other wire methods: it emits its own
/// length prefix internally (so it can pick the short-string stack fast
/// path before knowing the final encoded form), so the tag is written but
/// the length header is not. `write_bytes` has no such helper and needs
/// the header written explicitly, like every other length-delimited kind.
pub fn encode_expr(kind: &ScalarKind, tag: TokenStream, value: TokenStream, writer: TokenStream) -> TokenStream {
    let write_method = &kind.write_method;
    let wire_type = &kind.wire_type;
    let wired = (kind.cast_to_wire)(value);
    match kind.write_method.to_string().as_str() {
        "write_str" => quote! {
            #writer.write_tag(#tag, #wire_type)?;
            #writer.#write_method(#wired)?;
        },
        "write_bytes" => quote! {
            #writer.write_tag(#tag, #wire_type)?;
            #writer.write_length_delimited_header(#wired.len())?;
            #writer.#write_method(#wired)?;
        },
        _ => quote! {
            #writer.write_tag(#tag, #wire_type)?;
            #writer.#write_method(#wired)?;
        },
    }
}

/// Decodes one scalar value from `reader`, assigning it to `target`.
pub fn merge_expr(kind: &ScalarKind, wire_type_expr: TokenStream, reader: TokenStream, target: TokenStream) -> TokenStream {
    let expected = &kind.wire_type;
    let read_method = &kind.read_method;
    let from_wire = (kind.cast_from_wire)(quote!(#reader.#read_method()?));
    quote! {
        ::protospan::wire_type::check_wire_type(#expected, #wire_type_expr)?;
        #target = #from_wire;
    }
}

/// The three `packed`-form helpers below write/read/size one element with
/// no tag and no wire-type check — used inside a packed span's element
/// loop, where the field's single tag and wire type were already consumed
/// by the caller. Only scalar kinds with a fixed or varint wire form are
/// ever packable; `string`/`bytes` never reach these.
pub fn raw_write_expr(kind: &ScalarKind, value: TokenStream, writer: TokenStream) -> TokenStream {
    let write_method = &kind.write_method;
    let wired = (kind.cast_to_wire)(value);
    quote! { #writer.#write_method(#wired)?; }
}

pub fn raw_read_expr(kind: &ScalarKind, reader: TokenStream) -> TokenStream {
    let read_method = &kind.read_method;
    (kind.cast_from_wire)(quote!(#reader.#read_method()?))
}

pub fn raw_size_expr(kind: &ScalarKind, value: TokenStream) -> TokenStream {
    let wired = (kind.cast_to_wire)(value);
    match kind.size_method.to_string().as_str() {
        "size_varint" => quote!(::protospan::encoded_len_varint(u64::from(#wired))),
        "size_fixed32_marker" => quote!(4usize),
        "size_fixed64_marker" => quote!(8usize),
        "size_bool" => quote!(1usize),
        other => unreachable!("unhandled packed scalar size method {other}"),
    }
}

/// `SpanReader::check_wire_type` is private to the crate in our runtime's
/// module layout; generated code instead relies on the re-exported
/// `protospan::wire_type::check_wire_type` free function.
pub fn size_expr(kind: &ScalarKind, tag: TokenStream, value: TokenStream, sizer: TokenStream) -> TokenStream {
    let wire_type = &kind.wire_type;
    let size_method = kind.size_method.to_string();
    let wired = (kind.cast_to_wire)(value);
    match size_method.as_str() {
        "size_varint" => quote! { #sizer.size_tag(#tag, #wire_type).size_varint(u64::from(#wired)); },
        "size_fixed32_marker" => quote! { #sizer.size_tag(#tag, #wire_type).size_fixed32(); },
        "size_fixed64_marker" => quote! { #sizer.size_tag(#tag, #wire_type).size_fixed64(); },
        "size_bool" => quote! { #sizer.size_tag(#tag, #wire_type).size_bool(); },
        "size_length_delimited_marker" => quote! { #sizer.size_tag(#tag, #wire_type).size_length_delimited(#wired.len()); },
        other => unreachable!("unhandled scalar size method {other}"),
    }
}
