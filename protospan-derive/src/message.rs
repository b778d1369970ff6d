//! Container-level expansion: takes a `DeriveInput` for a struct and
//! produces its `impl protospan::Message`. Grounded on
//! `prost-derive/src/lib.rs`'s `try_message` — gather fields, assign and
//! validate tags, emit the three trait methods — generalized to also
//! synthesize the polymorphism dispatch enum from the struct's
//! `derived(...)` attributes (§4.5), which has no direct analogue in the
//! teacher (protobuf/`prost` has no notion of inheritance).

use anyhow::{bail, Error};
use itertools::Itertools;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DataStruct, DeriveInput, Fields, Ident};

use crate::field;
use crate::meta::{container_attrs, field_attrs, DerivedAttr};
use crate::schema::{all_tags, DerivedEntry, FieldSchema};

pub fn expand(input: DeriveInput) -> Result<TokenStream, Error> {
    let ident = input.ident.clone();
    let container = container_attrs(&input.attrs)?;

    let data = match input.data {
        Data::Struct(data) => data,
        Data::Enum(_) | Data::Union(_) => {
            bail!("`#[derive(Message)]` only supports structs; model enum-shaped wire data as a base struct with `derived(...)` variants")
        }
    };

    let (fields, derived_marker) = collect_fields(&ident, data)?;
    let derived_entries = resolve_derived(&container.derived)?;

    if derived_marker.is_none() && !derived_entries.is_empty() {
        bail!(
            "`{ident}` declares `derived(...)` entries but has no field marked `#[wire(derived)]` to hold the decoded variant"
        );
    }
    if derived_marker.is_some() && derived_entries.is_empty() {
        bail!("`{ident}` has a `#[wire(derived)]` field but the struct has no `derived(...)` entries");
    }

    let own_tags = all_tags(fields.iter(), derived_entries.iter());
    if let Some((tag, count)) = own_tags.iter().counts().into_iter().find(|(_, count)| *count > 1) {
        bail!("`{ident}` uses tag {tag} on {count} fields/derived entries; tags must be unique within a message");
    }

    let derived_enum = derived_marker
        .as_ref()
        .map(|marker| generate_derived_enum(&ident, marker, &derived_entries));

    let write_fields_body = fields.iter().map(|f| &f.encode);
    let size_fields_body = fields.iter().map(|f| &f.size);
    let struct_name = ident.to_string();
    let merge_arms = fields.iter().map(|f| {
        let tag = f.tag;
        let body = &f.merge;
        let field_name = member_label(&f.member);
        quote! {
            #tag => {
                (|| -> Result<(), ::protospan::DecodeError> {
                    #body
                    Ok(())
                })()
                .map_err(|mut __error| {
                    __error.push(#struct_name, #field_name);
                    __error
                })?
            }
        }
    });

    let enum_ident = format_ident!("{}Derived", ident);
    let (derived_write, derived_size, derived_merge_arms) = match &derived_marker {
        Some(marker) => derived_codegen(marker, &derived_entries, &enum_ident, &struct_name),
        None => (quote!(), quote!(), Vec::new()),
    };

    let wire_path_method = container.wire_path.as_ref().map(|path| {
        quote! {
            impl #ident {
                /// The configured logical wire path for this message (§4.9).
                pub fn wire_path() -> Option<&'static str> {
                    Some(#path)
                }
            }
        }
    });

    let expanded = quote! {
        #derived_enum

        #wire_path_method

        impl ::protospan::Message for #ident {
            fn write_fields(&self, writer: &mut ::protospan::StreamWriter<'_, impl ::protospan::Sink>) -> Result<(), ::protospan::EncodeError> {
                // Discriminator first, own fields after: matches the
                // reference implementation's emission order for a
                // polymorphic payload (§4.5/§9).
                #derived_write
                #(#write_fields_body)*
                Ok(())
            }

            fn merge_field(
                &mut self,
                tag: u32,
                wire_type: ::protospan::WireType,
                reader: &mut ::protospan::SpanReader<'_>,
                budget: ::protospan::reader::RecursionBudget,
            ) -> Result<(), ::protospan::DecodeError> {
                match tag {
                    #(#merge_arms)*
                    #(#derived_merge_arms)*
                    _ => reader.skip(wire_type)?,
                }
                Ok(())
            }

            fn size_fields(&self, sizer: &mut ::protospan::SizeCalculator) {
                #(#size_fields_body)*
                #derived_size
            }
        }
    };
    Ok(expanded)
}

fn collect_fields(ident: &Ident, data: DataStruct) -> Result<(Vec<FieldSchema>, Option<syn::Member>), Error> {
    let named = match data.fields {
        Fields::Named(named) => named.named,
        Fields::Unnamed(_) | Fields::Unit => {
            bail!("`{ident}` must have named fields; tuple structs and unit structs are not supported")
        }
    };

    let mut fields = Vec::new();
    let mut derived_marker = None;
    for field in named {
        let member = syn::Member::Named(field.ident.clone().expect("named field"));
        let attrs = field_attrs(&field.attrs)?;
        if attrs.derived_marker {
            if derived_marker.is_some() {
                bail!("`{ident}` has more than one field marked `#[wire(derived)]`");
            }
            derived_marker = Some(member);
            continue;
        }
        if let Some(schema) = field::resolve(member, &field.ty, &field.attrs)? {
            fields.push(schema);
        }
    }
    fields.sort_by_key(|f| f.tag);
    Ok((fields, derived_marker))
}

fn resolve_derived(attrs: &[DerivedAttr]) -> Result<Vec<DerivedEntry>, Error> {
    Ok(attrs
        .iter()
        .map(|d| DerivedEntry { tag: d.tag, ty: d.ty.clone() })
        .collect())
}

/// The `field` name `DecodeError::push` records for one struct member —
/// matches `prost-derive`'s `stringify!(#field_ident)`, generalized to
/// tuple-struct members (unused today; structs require named fields, but
/// `Member`'s `Unnamed` variant still needs a readable label).
fn member_label(member: &syn::Member) -> String {
    match member {
        syn::Member::Named(ident) => ident.to_string(),
        syn::Member::Unnamed(index) => index.index.to_string(),
    }
}

fn variant_ident(ty: &syn::Path) -> Ident {
    let last = &ty.segments.last().expect("non-empty path").ident;
    last.clone()
}

/// Generates `enum {Ident}Derived { Variant(Box<Ty>), ... }` — the tagged
/// union standing in for the absence of struct inheritance in Rust (§4.5).
fn generate_derived_enum(ident: &Ident, _marker: &syn::Member, derived: &[DerivedEntry]) -> TokenStream {
    let enum_ident = format_ident!("{}Derived", ident);
    let variants = derived.iter().map(|d| {
        let variant = variant_ident(&d.ty);
        let ty = &d.ty;
        quote! { #variant(::std::boxed::Box<#ty>) }
    });
    quote! {
        #[derive(Clone, Debug, PartialEq)]
        pub enum #enum_ident {
            #(#variants),*
        }
    }
}

/// Builds the write/size/merge fragments that dispatch through the
/// `derived` field: on encode, match the present variant and write its
/// sub-type's fields as a nested message at its discriminator tag (S1);
/// on decode, a discriminator tag seen in `merge_field` decodes straight
/// into the matching boxed sub-type and assigns `self.<marker> = Some(..)`
/// (the S0 -> S1 transition from §4.5).
fn derived_codegen(
    marker: &syn::Member,
    derived: &[DerivedEntry],
    enum_ident: &Ident,
    struct_name: &str,
) -> (TokenStream, TokenStream, Vec<TokenStream>) {
    if derived.is_empty() {
        return (quote!(), quote!(), Vec::new());
    }
    let write_arms = derived.iter().map(|d| {
        let variant = variant_ident(&d.ty);
        let tag = d.tag;
        let encode = field::message::encode_one(quote!(#tag), quote!(__boxed.as_ref()), quote!(writer));
        quote! { Some(#enum_ident::#variant(__boxed)) => { #encode } }
    });
    let size_arms = derived.iter().map(|d| {
        let variant = variant_ident(&d.ty);
        let tag = d.tag;
        let size = field::message::size_one(quote!(#tag), quote!(__boxed.as_ref()), quote!(sizer));
        quote! { Some(#enum_ident::#variant(__boxed)) => { #size } }
    });

    let derived_write = quote! {
        match &self.#marker {
            #(#write_arms)*
            None => {}
        }
    };
    let derived_size = quote! {
        match &self.#marker {
            #(#size_arms)*
            None => {}
        }
    };
    let merge_arms = derived
        .iter()
        .map(|d| {
            let variant = variant_ident(&d.ty);
            let ty = &d.ty;
            let tag = d.tag;
            let variant_name = variant.to_string();
            let merge = field::message::merge_one(quote!(&mut __value), quote!(wire_type), quote!(reader), quote!(budget));
            quote! {
                #tag => {
                    (|| -> Result<(), ::protospan::DecodeError> {
                        let mut __value = <#ty as Default>::default();
                        #merge
                        self.#marker = Some(#enum_ident::#variant(::std::boxed::Box::new(__value)));
                        Ok(())
                    })()
                    .map_err(|mut __error| {
                        __error.push(#struct_name, #variant_name);
                        __error
                    })?
                }
            }
        })
        .collect();

    (derived_write, derived_size, merge_arms)
}
