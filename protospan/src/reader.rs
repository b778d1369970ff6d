//! `SpanReader`: a zero-copy, pull-based decoder over an immutable `&[u8]`.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DecodeError;
use crate::varint::{decode_varint, zigzag_decode32, zigzag_decode64};
use crate::wire_type::WireType;

/// How many levels of nested-message recursion remain before decoding
/// refuses to go deeper. Shared the same way `DecodeContext` threads a
/// recursion budget through the reference implementation.
#[derive(Clone, Copy)]
pub struct RecursionBudget(u32);

impl Default for RecursionBudget {
    fn default() -> Self {
        RecursionBudget(crate::RECURSION_LIMIT)
    }
}

impl RecursionBudget {
    pub fn enter(self) -> Result<RecursionBudget, DecodeError> {
        if self.0 == 0 {
            return Err(DecodeError::limit_exceeded("recursion limit reached"));
        }
        Ok(RecursionBudget(self.0 - 1))
    }
}

/// A pull-based reader over an immutable, never-mutated byte view.
///
/// `SpanReader` never copies the underlying bytes: `read_length_delimited`
/// returns a sub-slice of the same buffer, and string/byte decoding is the
/// only place that actually allocates (because the `Message` trait's
/// in-memory representation owns its strings and byte blobs).
#[derive(Clone, Copy)]
pub struct SpanReader<'a> {
    bytes: &'a [u8],
}

impl<'a> SpanReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        SpanReader { bytes }
    }

    /// True once every byte in the view has been consumed.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Remaining, unconsumed bytes.
    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.bytes = &self.bytes[n..];
    }

    /// Reads a field key: `(field_number, wire_type)`. Returns `Ok(None)`
    /// at end of input, since that is a normal, expected terminator for
    /// the decode loop rather than a failure.
    pub fn read_tag(&mut self) -> Result<Option<(u32, WireType)>, DecodeError> {
        if self.is_empty() {
            return Ok(None);
        }
        let (key, consumed) = decode_varint(self.bytes)?;
        self.advance(consumed);
        if key > u64::from(u32::MAX) {
            return Err(DecodeError::malformed("tag key overflows u32"));
        }
        let wire_type = WireType::from_u64(key & 0x07)?;
        let field_number = (key >> 3) as u32;
        if field_number == 0 {
            return Err(DecodeError::malformed("field number 0 is not valid"));
        }
        Ok(Some((field_number, wire_type)))
    }

    pub fn read_varint64(&mut self) -> Result<u64, DecodeError> {
        let (value, consumed) = decode_varint(self.bytes)?;
        self.advance(consumed);
        Ok(value)
    }

    pub fn read_varint32(&mut self) -> Result<u32, DecodeError> {
        let value = self.read_varint64()?;
        if value > u64::from(u32::MAX) {
            return Err(DecodeError::malformed("varint overflows u32"));
        }
        Ok(value as u32)
    }

    pub fn read_zigzag32(&mut self) -> Result<i32, DecodeError> {
        Ok(zigzag_decode32(self.read_varint32()?))
    }

    pub fn read_zigzag64(&mut self) -> Result<i64, DecodeError> {
        Ok(zigzag_decode64(self.read_varint64()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_varint64()? != 0)
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        if self.bytes.len() < N {
            return Err(DecodeError::truncated());
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[..N]);
        self.advance(N);
        Ok(out)
    }

    pub fn read_fixed32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_fixed_bytes::<4>()?))
    }

    pub fn read_fixed64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_fixed_bytes::<8>()?))
    }

    pub fn read_float(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.read_fixed32()?))
    }

    pub fn read_double(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.read_fixed64()?))
    }

    /// Reads a varint length prefix and returns a bounded, zero-copy view
    /// over exactly that many following bytes. The caller must consume the
    /// returned view in full; it is a logic error (not a wire error) not
    /// to, same as the reference implementation's length-delimited
    /// contract.
    pub fn read_length_delimited(&mut self) -> Result<SpanReader<'a>, DecodeError> {
        let len = self.read_varint64()?;
        if len > self.bytes.len() as u64 {
            return Err(DecodeError::limit_exceeded(
                "length prefix extends past the enclosing view",
            ));
        }
        let len = len as usize;
        let (body, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        Ok(SpanReader::new(body))
    }

    pub fn read_bytes_into_new_owned(&mut self) -> Result<Vec<u8>, DecodeError> {
        let view = self.read_length_delimited()?;
        Ok(view.bytes.to_vec())
    }

    pub fn read_utf8_string_into_new_owned(&mut self) -> Result<String, DecodeError> {
        let view = self.read_length_delimited()?;
        String::from_utf8(view.bytes.to_vec())
            .map_err(|_| DecodeError::malformed("string is not valid UTF-8"))
    }

    /// Advances past a field whose tag was already consumed but whose
    /// value is not needed, per the forward-compatibility requirement:
    /// unknown fields must be skippable without error.
    pub fn skip(&mut self, wire_type: WireType) -> Result<(), DecodeError> {
        match wire_type {
            WireType::Varint => {
                self.read_varint64()?;
            }
            WireType::ThirtyTwoBit => {
                self.read_fixed_bytes::<4>()?;
            }
            WireType::SixtyFourBit => {
                self.read_fixed_bytes::<8>()?;
            }
            WireType::LengthDelimited => {
                self.read_length_delimited()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tag_roundtrips_with_writer() {
        let bytes = [0x08u8, 0xAC, 0x02];
        let mut r = SpanReader::new(&bytes);
        let (field_number, wire_type) = r.read_tag().unwrap().unwrap();
        assert_eq!(field_number, 1);
        assert_eq!(wire_type, WireType::Varint);
        assert_eq!(r.read_varint64().unwrap(), 300);
        assert!(r.read_tag().unwrap().is_none());
    }

    #[test]
    fn length_delimited_is_zero_copy() {
        let bytes = [0x03u8, b'a', b'b', b'c', 0xFF];
        let mut r = SpanReader::new(&bytes);
        let view = r.read_length_delimited().unwrap();
        assert_eq!(view.bytes, b"abc");
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn length_prefix_past_view_is_limit_exceeded() {
        let bytes = [0x05u8, b'a', b'b'];
        let mut r = SpanReader::new(&bytes);
        let err = r.read_length_delimited().unwrap_err();
        assert!(matches!(err.kind(), crate::DecodeErrorKind::LimitExceeded(_)));
    }

    #[test]
    fn skip_advances_past_unknown_varint_and_length_delimited() {
        let bytes = [0x96u8, 0x01, 0x02, b'h', b'i'];
        let mut r = SpanReader::new(&bytes);
        r.skip(WireType::Varint).unwrap();
        assert_eq!(r.remaining(), 3);
        r.skip(WireType::LengthDelimited).unwrap();
        assert!(r.is_empty());
    }
}
