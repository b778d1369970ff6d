//! `Pair<A, B>`: a two-component tuple encoded as a nested message with
//! `{field 1 = A, field 2 = B}`, the same convention protobuf map entries
//! use, minus the uniqueness-of-key requirement.

use crate::collections;
use crate::error::{DecodeError, EncodeError};
use crate::reader::{RecursionBudget, SpanReader};
use crate::wire_type::WireType;
use crate::writer::{Sink, StreamWriter};

/// A two-component tuple field value. Generated code pairs this with a
/// per-component encode/decode/size callback pair supplied by the
/// synthesizer (grounded on `prost`'s `map!` macro pattern of taking
/// encode/merge/encoded_len closures rather than requiring `A`/`B` to
/// implement a shared trait).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Pair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Pair { first, second }
    }
}

/// Writes a `Pair<A, B>` field at `tag`. Thin name-clarifying wrapper over
/// `collections::encode_map_entry`, which is wire-compatible: a pair has
/// no uniqueness requirement, but the on-wire shape (`{1: first, 2:
/// second}`) is identical to a map entry.
pub fn encode<A, B, S: Sink>(
    tag: u32,
    value: &Pair<A, B>,
    writer: &mut StreamWriter<'_, S>,
    encode_first: impl Fn(u32, &A, &mut StreamWriter<'_, S>) -> Result<(), EncodeError>,
    encode_second: impl Fn(u32, &B, &mut StreamWriter<'_, S>) -> Result<(), EncodeError>,
    size_first: impl Fn(u32, &A) -> usize,
    size_second: impl Fn(u32, &B) -> usize,
) -> Result<(), EncodeError> {
    collections::encode_map_entry(tag, &value.first, &value.second, writer, encode_first, encode_second, size_first, size_second)
}

pub fn size<A, B>(
    tag: u32,
    value: &Pair<A, B>,
    size_first: impl Fn(u32, &A) -> usize,
    size_second: impl Fn(u32, &B) -> usize,
) -> usize {
    collections::size_map_entry(tag, &value.first, &value.second, size_first, size_second)
}

pub fn merge<A: Default, B: Default>(
    wire_type: WireType,
    reader: &mut SpanReader<'_>,
    budget: RecursionBudget,
    merge_first: impl Fn(WireType, &mut A, &mut SpanReader<'_>, RecursionBudget) -> Result<(), DecodeError>,
    merge_second: impl Fn(WireType, &mut B, &mut SpanReader<'_>, RecursionBudget) -> Result<(), DecodeError>,
) -> Result<Pair<A, B>, DecodeError> {
    let (first, second) = collections::merge_map_entry(wire_type, reader, budget, merge_first, merge_second)?;
    Ok(Pair::new(first, second))
}

#[cfg(test)]
mod test {
    use super::Pair;

    #[test]
    fn pair_holds_heterogeneous_components() {
        let p = Pair::new(7u32, "seven".to_string());
        assert_eq!(p.first, 7);
        assert_eq!(p.second, "seven");
    }
}
