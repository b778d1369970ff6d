//! The `Message` trait and the top-level `serialize`/`deserialize` entry
//! points generated code and callers both use.

use alloc::vec::Vec;

use crate::error::{DecodeError, EncodeError};
use crate::reader::{RecursionBudget, SpanReader};
use crate::sizer::SizeCalculator;
use crate::wire_type::WireType;
use crate::writer::{Sink, StreamWriter};

/// A type with a bespoke, derive-generated protobuf wire encoding.
///
/// Implementors are produced exclusively by `#[derive(protospan_derive::Message)]`
/// (see `protospan-derive`); the three required methods are exactly the
/// `Write<M>`, `Read<M>` (as `merge_field`, invoked once per field), and
/// `SizeOf<M>` routines from the specification's Code Synthesizer section.
pub trait Message: Default {
    /// Writes every present field of `self`, in ascending tag order, to
    /// `writer`. Does not write a length prefix for `self` as a whole —
    /// that is the caller's job when `self` is itself a nested field.
    fn write_fields(&self, writer: &mut StreamWriter<'_, impl Sink>) -> Result<(), EncodeError>;

    /// Decodes one field already identified by `tag`/`wire_type` and
    /// merges it into `self`. Unrecognized tags are skipped, not errors.
    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        reader: &mut SpanReader<'_>,
        budget: RecursionBudget,
    ) -> Result<(), DecodeError>;

    /// The encoded length of `self`, not counting any length prefix for
    /// `self` as a whole. Must equal `write_fields`'s actual byte count
    /// exactly — this is the Size Fidelity property from §8.
    fn size_fields(&self, sizer: &mut SizeCalculator);
}

/// Encodes `value` to `sink`, flushing the writer's staging buffer at the
/// end. This is `Serialize<M>` from §6.
pub fn serialize<M: Message>(sink: &mut impl Sink, value: &M) -> Result<(), EncodeError> {
    let mut writer = StreamWriter::new(sink);
    value.write_fields(&mut writer)?;
    writer.flush()
}

/// Encodes `value` to a freshly allocated `Vec<u8>`.
pub fn serialize_to_vec<M: Message>(value: &M) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    serialize(&mut out, value)?;
    Ok(out)
}

/// Decodes an `M` from `bytes`. This is `Deserialize<M>` from §6: unknown
/// tags are skipped (forward compatibility), and the loop terminates
/// cleanly at end of input rather than requiring an explicit end marker.
pub fn deserialize<M: Message>(bytes: &[u8]) -> Result<M, DecodeError> {
    let mut reader = SpanReader::new(bytes);
    let mut value = M::default();
    let budget = RecursionBudget::default();
    while let Some((tag, wire_type)) = reader.read_tag()? {
        value.merge_field(tag, wire_type, &mut reader, budget)?;
    }
    Ok(value)
}

/// Computes the encoded size of `value` via its `Message::size_fields`.
pub fn encoded_len<M: Message>(value: &M) -> usize {
    let mut sizer = SizeCalculator::new();
    value.size_fields(&mut sizer);
    sizer.finish()
}
