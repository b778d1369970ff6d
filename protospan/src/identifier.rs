//! The 128-bit `Identifier` type and its BCL-compatible nested-message
//! wire encoding.
//!
//! On the wire an `Identifier` is a nested message with two `fixed64`
//! fields: tag 1 holds bytes `[0..8)` of the 16-byte value (little-endian),
//! tag 2 holds bytes `[8..16)` (also little-endian). This is the layout
//! the reference implementation uses for round-tripping GUID-shaped
//! values, and it is unrelated to either field's *numeric* value — it is
//! purely a byte-order reinterpretation of the 16-byte representation.

use crate::error::{DecodeError, EncodeError};
use crate::reader::{RecursionBudget, SpanReader};
use crate::sizer::SizeCalculator;
use crate::wire_type::WireType;
use crate::writer::{Sink, StreamWriter};

const LOW_TAG: u32 = 1;
const HIGH_TAG: u32 = 2;

/// A 128-bit identifier, stored as its raw 16-byte representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(pub [u8; 16]);

impl Identifier {
    pub const ZERO: Identifier = Identifier([0u8; 16]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 16]
    }

    fn low64(&self) -> u64 {
        u64::from_le_bytes(self.0[0..8].try_into().unwrap())
    }

    fn high64(&self) -> u64 {
        u64::from_le_bytes(self.0[8..16].try_into().unwrap())
    }

    fn from_parts(low: u64, high: u64) -> Identifier {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&low.to_le_bytes());
        bytes[8..16].copy_from_slice(&high.to_le_bytes());
        Identifier(bytes)
    }
}

/// Writes the nested-message body (the two `fixed64` fields), without a
/// tag or length prefix of its own — the caller (generated field code)
/// supplies those the same way it would for any other message field.
fn write_body(value: &Identifier, writer: &mut StreamWriter<'_, impl Sink>) -> Result<(), EncodeError> {
    writer.write_tag(LOW_TAG, WireType::SixtyFourBit)?;
    writer.write_fixed64(value.low64())?;
    writer.write_tag(HIGH_TAG, WireType::SixtyFourBit)?;
    writer.write_fixed64(value.high64())
}

fn body_len(value: &Identifier) -> usize {
    let mut sizer = SizeCalculator::new();
    sizer
        .size_tag(LOW_TAG, WireType::SixtyFourBit)
        .size_fixed64()
        .size_tag(HIGH_TAG, WireType::SixtyFourBit)
        .size_fixed64();
    sizer.finish()
}

/// Writes an `Identifier` field at `tag`. A zero identifier is absent on
/// the wire by design (see §7, Semantic absence) — callers should not
/// invoke this for a zero value; `encode_optional` below does that check.
pub fn encode(tag: u32, value: &Identifier, writer: &mut StreamWriter<'_, impl Sink>) -> Result<(), EncodeError> {
    writer.write_tag(tag, WireType::LengthDelimited)?;
    writer.write_length_delimited_header(body_len(value))?;
    write_body(value, writer)
}

/// Writes an `Identifier` field only if it is non-zero.
pub fn encode_optional(tag: u32, value: &Identifier, writer: &mut StreamWriter<'_, impl Sink>) -> Result<(), EncodeError> {
    if value.is_zero() {
        return Ok(());
    }
    encode(tag, value, writer)
}

pub fn encoded_len(tag: u32, value: &Identifier) -> usize {
    if value.is_zero() {
        return 0;
    }
    let len = body_len(value);
    let mut sizer = SizeCalculator::new();
    sizer.size_tag(tag, WireType::LengthDelimited).size_length_delimited(len);
    sizer.finish()
}

/// Decodes an `Identifier` nested message. Field order on the wire is not
/// trusted: both `low`/`high` orderings decode to the same value (see §8,
/// Map ordering tolerance — the same principle applies to any two-field
/// nested message, not only maps).
pub fn merge(
    wire_type: WireType,
    value: &mut Identifier,
    reader: &mut SpanReader<'_>,
    budget: RecursionBudget,
) -> Result<(), DecodeError> {
    crate::wire_type::check_wire_type(WireType::LengthDelimited, wire_type)?;
    let budget = budget.enter()?;
    let mut body = reader.read_length_delimited()?;

    let mut low = value.low64();
    let mut high = value.high64();
    while let Some((tag, wire_type)) = body.read_tag()? {
        match tag {
            LOW_TAG => {
                crate::wire_type::check_wire_type(WireType::SixtyFourBit, wire_type)?;
                low = body.read_fixed64()?;
            }
            HIGH_TAG => {
                crate::wire_type::check_wire_type(WireType::SixtyFourBit, wire_type)?;
                high = body.read_fixed64()?;
            }
            _ => body.skip(wire_type)?,
        }
    }
    let _ = budget;
    *value = Identifier::from_parts(low, high);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_identifier_is_absent() {
        let mut sink = Vec::new();
        {
            let mut w = StreamWriter::new(&mut sink);
            encode_optional(1, &Identifier::ZERO, &mut w).unwrap();
            w.flush().unwrap();
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn scenario_3_round_trip() {
        // 12030201-0000-0000-1100-000000000001 at tag 1 -> 20 bytes total.
        let mut bytes = [0u8; 16];
        bytes[0] = 0x01;
        bytes[1] = 0x02;
        bytes[2] = 0x03;
        bytes[3] = 0x12;
        bytes[8] = 0x11;
        bytes[15] = 0x01;
        let id = Identifier(bytes);

        let mut sink = Vec::new();
        {
            let mut w = StreamWriter::new(&mut sink);
            encode(1, &id, &mut w).unwrap();
            w.flush().unwrap();
        }
        assert_eq!(sink.len(), 20);
        assert_eq!(sink[0], 0x0A);
        assert_eq!(sink[1], 0x12);
        assert_eq!(sink[2], 0x09);
        assert_eq!(sink[11], 0x11);

        let mut reader = SpanReader::new(&sink);
        let (tag, wire_type) = reader.read_tag().unwrap().unwrap();
        assert_eq!(tag, 1);
        let mut decoded = Identifier::ZERO;
        merge(wire_type, &mut decoded, &mut reader, RecursionBudget::default()).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn decode_tolerates_high_before_low() {
        let id = Identifier::from_parts(0x0102030405060708, 0x1112131415161718);

        // Manually build the body with high64 (tag 2) before low64 (tag 1).
        let mut sink = Vec::new();
        {
            let mut w = StreamWriter::new(&mut sink);
            w.write_tag(2, WireType::SixtyFourBit).unwrap();
            w.write_fixed64(id.high64()).unwrap();
            w.write_tag(1, WireType::SixtyFourBit).unwrap();
            w.write_fixed64(id.low64()).unwrap();
            w.flush().unwrap();
        }
        let mut framed = Vec::new();
        {
            let mut w = StreamWriter::new(&mut framed);
            w.write_tag(1, WireType::LengthDelimited).unwrap();
            w.write_length_delimited_header(sink.len()).unwrap();
            w.write_bytes(&sink).unwrap();
            w.flush().unwrap();
        }

        let mut reader = SpanReader::new(&framed);
        let (_, wire_type) = reader.read_tag().unwrap().unwrap();
        let mut decoded = Identifier::ZERO;
        merge(wire_type, &mut decoded, &mut reader, RecursionBudget::default()).unwrap();
        assert_eq!(decoded, id);
    }
}
