//! Wire helpers for `Mapping<K, V>`, `Set<T>`, and the packed/non-packed
//! adaptive decoding of repeated scalar fields.
//!
//! Generated code supplies per-component encode/merge/size closures rather
//! than requiring `K`/`V`/`T` to implement a shared codec trait — the same
//! shape `prost`'s `encoding.rs` `map!` macro uses for `HashMap`/`BTreeMap`,
//! generalized here to cover `Set` and ordered `Sequence` as well.

use alloc::vec::Vec;

use crate::error::{DecodeError, EncodeError};
use crate::reader::{RecursionBudget, SpanReader};
use crate::sizer::SizeCalculator;
use crate::wire_type::WireType;
use crate::writer::{Sink, StreamWriter};

const KEY_TAG: u32 = 1;
const VALUE_TAG: u32 = 2;

/// Writes one `Mapping<K, V>` entry at `tag` as a nested message
/// `{field 1 = key, field 2 = value}`.
pub fn encode_map_entry<K, V, S: Sink>(
    tag: u32,
    key: &K,
    value: &V,
    writer: &mut StreamWriter<'_, S>,
    encode_key: impl Fn(u32, &K, &mut StreamWriter<'_, S>) -> Result<(), EncodeError>,
    encode_value: impl Fn(u32, &V, &mut StreamWriter<'_, S>) -> Result<(), EncodeError>,
    size_key: impl Fn(u32, &K) -> usize,
    size_value: impl Fn(u32, &V) -> usize,
) -> Result<(), EncodeError> {
    let body_len = size_key(KEY_TAG, key) + size_value(VALUE_TAG, value);
    writer.write_tag(tag, WireType::LengthDelimited)?;
    writer.write_length_delimited_header(body_len)?;
    encode_key(KEY_TAG, key, writer)?;
    encode_value(VALUE_TAG, value, writer)
}

/// Sizes one `Mapping<K, V>` entry at `tag`.
pub fn size_map_entry<K, V>(
    tag: u32,
    key: &K,
    value: &V,
    size_key: impl Fn(u32, &K) -> usize,
    size_value: impl Fn(u32, &V) -> usize,
) -> usize {
    let mut sizer = SizeCalculator::new();
    let body_len = size_key(KEY_TAG, key) + size_value(VALUE_TAG, value);
    sizer.size_tag(tag, WireType::LengthDelimited).size_length_delimited(body_len);
    sizer.finish()
}

/// Decodes one `Mapping<K, V>` entry, tolerating either field order —
/// `value` may legally precede `key` on the wire (§8, Map ordering
/// tolerance) since protobuf does not mandate field order within a
/// message.
pub fn merge_map_entry<K: Default, V: Default>(
    wire_type: WireType,
    reader: &mut SpanReader<'_>,
    budget: RecursionBudget,
    merge_key: impl Fn(WireType, &mut K, &mut SpanReader<'_>, RecursionBudget) -> Result<(), DecodeError>,
    merge_value: impl Fn(WireType, &mut V, &mut SpanReader<'_>, RecursionBudget) -> Result<(), DecodeError>,
) -> Result<(K, V), DecodeError> {
    crate::wire_type::check_wire_type(WireType::LengthDelimited, wire_type)?;
    let budget = budget.enter()?;
    let mut body = reader.read_length_delimited()?;

    let mut key = K::default();
    let mut value = V::default();
    while let Some((tag, entry_wire_type)) = body.read_tag()? {
        match tag {
            KEY_TAG => merge_key(entry_wire_type, &mut key, &mut body, budget)?,
            VALUE_TAG => merge_value(entry_wire_type, &mut value, &mut body, budget)?,
            _ => body.skip(entry_wire_type)?,
        }
    }
    Ok((key, value))
}

/// Appends a decoded `Set<T>` element if it is not already present.
/// Uniqueness is a decode-time invariant, not a wire-level distinction:
/// on the wire a `Set<T>` is indistinguishable from `repeated T`.
pub fn insert_unique<T: PartialEq>(set: &mut Vec<T>, element: T) {
    if !set.contains(&element) {
        set.push(element);
    }
}

/// Decodes a repeated scalar field, accepting both the packed and the
/// non-packed wire encoding regardless of which the schema declares (§4.1,
/// Packed/non-packed adaptive decoding). `merge_one` decodes a single
/// element assuming `Varint`/`Fixed32`/`Fixed64` wire type (whichever the
/// element type uses); this function only decides whether to loop over a
/// packed span or decode a single element.
pub fn merge_repeated_scalar_adaptive<T>(
    wire_type: WireType,
    values: &mut Vec<T>,
    reader: &mut SpanReader<'_>,
    element_wire_type: WireType,
    merge_one: impl Fn(&mut SpanReader<'_>) -> Result<T, DecodeError>,
) -> Result<(), DecodeError> {
    if wire_type == WireType::LengthDelimited {
        // Packed: a length-delimited span of concatenated raw elements,
        // with no per-element tag.
        let mut packed = reader.read_length_delimited()?;
        while !packed.is_empty() {
            values.push(merge_one(&mut packed)?);
        }
        Ok(())
    } else {
        crate::wire_type::check_wire_type(element_wire_type, wire_type)?;
        values.push(merge_one(reader)?);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::varint::{decode_varint, encode_varint};

    fn encode_u32(tag: u32, v: &u32, w: &mut StreamWriter<'_, impl Sink>) -> Result<(), EncodeError> {
        w.write_tag(tag, WireType::Varint)?;
        w.write_varint(u64::from(*v))
    }
    fn size_u32(tag: u32, v: &u32) -> usize {
        let mut s = SizeCalculator::new();
        s.size_tag(tag, WireType::Varint).size_varint(u64::from(*v));
        s.finish()
    }
    fn merge_u32(
        wire_type: WireType,
        value: &mut u32,
        reader: &mut SpanReader<'_>,
        _budget: RecursionBudget,
    ) -> Result<(), DecodeError> {
        crate::wire_type::check_wire_type(WireType::Varint, wire_type)?;
        *value = reader.read_varint32()?;
        Ok(())
    }

    #[test]
    fn map_entry_tolerates_value_before_key() {
        // Build value(tag2) before key(tag1) manually.
        let mut body = Vec::new();
        {
            let mut w = StreamWriter::new(&mut body);
            encode_u32(2, &99, &mut w).unwrap();
            encode_u32(1, &7, &mut w).unwrap();
            w.flush().unwrap();
        }
        let mut framed = Vec::new();
        {
            let mut w = StreamWriter::new(&mut framed);
            w.write_tag(4, WireType::LengthDelimited).unwrap();
            w.write_length_delimited_header(body.len()).unwrap();
            w.write_bytes(&body).unwrap();
            w.flush().unwrap();
        }

        let mut reader = SpanReader::new(&framed);
        let (_, wire_type) = reader.read_tag().unwrap().unwrap();
        let (key, value): (u32, u32) = merge_map_entry(
            wire_type,
            &mut reader,
            RecursionBudget::default(),
            merge_u32,
            merge_u32,
        )
        .unwrap();
        assert_eq!((key, value), (7, 99));
    }

    #[test]
    fn packed_and_non_packed_decode_identically() {
        // Packed: tag, length, then raw varints 1, 2, 3.
        let mut packed = Vec::new();
        {
            let mut w = StreamWriter::new(&mut packed);
            w.write_tag(1, WireType::LengthDelimited).unwrap();
            let mut inner = Vec::new();
            encode_varint(1, &mut inner).unwrap();
            encode_varint(2, &mut inner).unwrap();
            encode_varint(3, &mut inner).unwrap();
            w.write_length_delimited_header(inner.len()).unwrap();
            w.write_bytes(&inner).unwrap();
            w.flush().unwrap();
        }

        // Non-packed: three separate tag+varint pairs.
        let mut non_packed = Vec::new();
        {
            let mut w = StreamWriter::new(&mut non_packed);
            for v in [1u32, 2, 3] {
                w.write_tag(1, WireType::Varint).unwrap();
                w.write_varint(u64::from(v)).unwrap();
            }
            w.flush().unwrap();
        }

        let mut from_packed = Vec::new();
        let mut r = SpanReader::new(&packed);
        let (_, wire_type) = r.read_tag().unwrap().unwrap();
        merge_repeated_scalar_adaptive(wire_type, &mut from_packed, &mut r, WireType::Varint, |r| {
            r.read_varint32()
        })
        .unwrap();

        let mut from_non_packed = Vec::new();
        let mut r = SpanReader::new(&non_packed);
        while let Some((_, wire_type)) = r.read_tag().unwrap() {
            merge_repeated_scalar_adaptive(wire_type, &mut from_non_packed, &mut r, WireType::Varint, |r| {
                r.read_varint32()
            })
            .unwrap();
        }

        assert_eq!(from_packed, vec![1, 2, 3]);
        assert_eq!(from_packed, from_non_packed);
        let _ = decode_varint;
        let _ = size_u32;
    }
}
