//! Attribute parsing: turns `#[wire(...)]` token trees into the small
//! structured attribute records `field`/`message` build the Intermediate
//! Schema from. Grounded on `prost-derive`'s `field::set_option` /
//! `word_attr` / `tag_attr` helpers — the same "walk a `Punctuated<Meta,
//! Comma>`, match on `Meta::Path`/`Meta::NameValue`/`Meta::List`" shape.

use anyhow::{bail, Error};
use syn::{Attribute, Expr, ExprLit, Lit, Meta, Path};

/// The parsed `#[wire(...)]` contents of one struct field.
#[derive(Default)]
pub struct FieldAttrs {
    pub kind: Option<Path>,
    pub tag: Option<u32>,
    pub packed: bool,
    pub optional: bool,
    pub repeated: bool,
    pub derived_marker: bool,
    pub key: Option<Path>,
    pub value: Option<Path>,
    pub first: Option<Path>,
    pub second: Option<Path>,
    pub element: Option<Path>,
}

/// One `derived(tag = N, ty = Path)` entry from the container-level
/// attribute, naming a discriminator tag and the sub-type it selects.
pub struct DerivedAttr {
    pub tag: u32,
    pub ty: Path,
}

/// The parsed container-level `#[wire(...)]` contents.
#[derive(Default)]
pub struct ContainerAttrs {
    pub wire_path: Option<String>,
    pub derived: Vec<DerivedAttr>,
}

fn wire_metas(attrs: &[Attribute]) -> syn::Result<Vec<Meta>> {
    let mut metas = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("wire") {
            continue;
        }
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;
        metas.extend(nested);
    }
    Ok(metas)
}

fn int_literal(meta: &Meta) -> syn::Result<u32> {
    match meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit { lit: Lit::Int(i), .. }) => i.base10_parse(),
            _ => Err(syn::Error::new_spanned(nv, "expected an integer literal")),
        },
        _ => Err(syn::Error::new_spanned(meta, "expected `name = <int>`")),
    }
}

fn path_value(meta: &Meta) -> syn::Result<Path> {
    match meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => s.parse(),
            Expr::Path(p) => Ok(p.path.clone()),
            _ => Err(syn::Error::new_spanned(nv, "expected a type path, quoted or bare")),
        },
        _ => Err(syn::Error::new_spanned(meta, "expected `name = Type`")),
    }
}

fn str_value(meta: &Meta) -> syn::Result<String> {
    match meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Ok(s.value()),
            _ => Err(syn::Error::new_spanned(nv, "expected a string literal")),
        },
        _ => Err(syn::Error::new_spanned(meta, "expected `name = \"...\"`")),
    }
}

const SCALAR_KINDS: &[&str] = &[
    "bool", "int8", "uint8", "int16", "uint16", "int32", "int64", "uint32", "uint64", "sint32",
    "sint64", "fixed32", "fixed64", "sfixed32", "sfixed64", "float", "double", "char16", "string",
    "bytes",
];
const STRUCTURED_KINDS: &[&str] = &["identifier", "message", "pair", "map", "set"];

fn is_kind_path(path: &Path) -> bool {
    path.get_ident().is_some_and(|id| {
        let s = id.to_string();
        SCALAR_KINDS.contains(&s.as_str()) || STRUCTURED_KINDS.contains(&s.as_str())
    })
}

/// Parses every `#[wire(...)]` attribute on a field into one `FieldAttrs`.
/// Mirrors `prost-derive::field::Field::extract_attrs`'s single pass over
/// all `Meta` entries, matching each by path name.
pub fn field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs, Error> {
    let mut out = FieldAttrs::default();
    for meta in wire_metas(attrs)? {
        match &meta {
            Meta::Path(path) if is_kind_path(path) => {
                if out.kind.is_some() {
                    bail!("duplicate wire type attribute on field");
                }
                out.kind = Some(path.clone());
            }
            Meta::Path(path) if path.is_ident("packed") => out.packed = true,
            Meta::Path(path) if path.is_ident("optional") => out.optional = true,
            Meta::Path(path) if path.is_ident("repeated") => out.repeated = true,
            Meta::Path(path) if path.is_ident("derived") => out.derived_marker = true,
            Meta::NameValue(nv) if nv.path.is_ident("tag") => out.tag = Some(int_literal(&meta)?),
            Meta::NameValue(nv) if nv.path.is_ident("key") => out.key = Some(path_value(&meta)?),
            Meta::NameValue(nv) if nv.path.is_ident("value") => out.value = Some(path_value(&meta)?),
            Meta::NameValue(nv) if nv.path.is_ident("first") => out.first = Some(path_value(&meta)?),
            Meta::NameValue(nv) if nv.path.is_ident("second") => out.second = Some(path_value(&meta)?),
            Meta::NameValue(nv) if nv.path.is_ident("element") => out.element = Some(path_value(&meta)?),
            other => bail!("unknown `#[wire(...)]` attribute: {}", quote::quote!(#other)),
        }
    }
    Ok(out)
}

/// Parses the container-level `#[wire(...)]` attributes on the struct
/// itself: `wire_path = "..."` (§4.9 configuration) and any number of
/// `derived(tag = N, ty = "...")` entries (§4.5 polymorphism).
pub fn container_attrs(attrs: &[Attribute]) -> Result<ContainerAttrs, Error> {
    let mut out = ContainerAttrs::default();
    for meta in wire_metas(attrs)? {
        match &meta {
            Meta::NameValue(nv) if nv.path.is_ident("wire_path") => {
                out.wire_path = Some(str_value(&meta)?);
            }
            Meta::List(list) if list.path.is_ident("derived") => {
                let nested = list.parse_args_with(
                    syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
                )?;
                let mut tag = None;
                let mut ty = None;
                for item in nested {
                    match &item {
                        Meta::NameValue(nv) if nv.path.is_ident("tag") => tag = Some(int_literal(&item)?),
                        Meta::NameValue(nv) if nv.path.is_ident("ty") => ty = Some(path_value(&item)?),
                        other => bail!("unknown `derived(...)` attribute: {}", quote::quote!(#other)),
                    }
                }
                let tag = tag.ok_or_else(|| Error::msg("`derived(...)` entry is missing `tag`"))?;
                let ty = ty.ok_or_else(|| Error::msg("`derived(...)` entry is missing `ty`"))?;
                out.derived.push(DerivedAttr { tag, ty });
            }
            other => bail!("unknown container-level `#[wire(...)]` attribute: {}", quote::quote!(#other)),
        }
    }
    Ok(out)
}
