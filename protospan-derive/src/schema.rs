//! The Intermediate Schema: an in-memory, language-neutral description of
//! a message's fields and inheritance edges, built once per derive
//! expansion by `meta`/`field::*` and consumed exactly once by
//! `crate::message::expand`. Nothing here survives past that one
//! `TokenStream` return — there is no persistent store, matching §3's
//! stated IS lifecycle.

use proc_macro2::TokenStream;
use syn::{Member, Path};

/// One of the closed Type Kinds from §3. `Plain` wraps the scalar
/// primitives; the rest are the structured kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireForm {
    Varint,
    Fixed32,
    Fixed64,
    LengthDelimited,
}

/// How many times a field's value may appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Optional,
    Repeated,
}

/// A fully resolved field of the Intermediate Schema, ready for codegen.
pub struct FieldSchema {
    pub member: Member,
    pub tag: u32,
    pub wire_form: WireForm,
    pub cardinality: Cardinality,
    pub is_packed: bool,
    /// The per-kind codegen strategy; see `crate::field::Field`.
    pub encode: TokenStream,
    pub merge: TokenStream,
    pub size: TokenStream,
    pub default: TokenStream,
}

/// One entry of `Message.derived`: a discriminator tag and the sub-type it
/// selects. §3 requires these tags be disjoint from the message's own
/// field tags and from sibling entries.
pub struct DerivedEntry {
    pub tag: u32,
    pub ty: Path,
}

/// Collects every tag number used by a message — own fields plus inherited
/// `derived` entries — so duplicate-tag validation (§4.4) can be done in
/// one pass over the union, exactly as §3's uniqueness invariant demands.
pub fn all_tags<'a>(
    fields: impl Iterator<Item = &'a FieldSchema>,
    derived: impl Iterator<Item = &'a DerivedEntry>,
) -> Vec<u32> {
    fields.map(|f| f.tag).chain(derived.map(|d| d.tag)).collect()
}
