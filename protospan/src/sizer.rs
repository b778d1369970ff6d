//! `SizeCalculator` mirrors `StreamWriter`'s API but only counts bytes.
//!
//! It exists so that nested nested-message length prefixes can be computed
//! before any body bytes are written (the pre-size strategy §4.2 mandates),
//! and its output is a testable invariant: `SizeCalculator::finish()` must
//! equal the number of bytes `StreamWriter` would actually emit for the
//! same input.

use crate::varint::encoded_len_varint;
use crate::wire_type::WireType;

/// Accumulates an encoded byte count without producing any bytes.
#[derive(Default)]
pub struct SizeCalculator {
    len: usize,
}

impl SizeCalculator {
    pub fn new() -> Self {
        SizeCalculator { len: 0 }
    }

    /// Returns the accumulated size.
    pub fn finish(self) -> usize {
        self.len
    }

    pub fn size_tag(&mut self, field_number: u32, _wire_type: WireType) -> &mut Self {
        let key = u64::from(field_number) << 3;
        self.len += encoded_len_varint(key);
        self
    }

    pub fn size_varint(&mut self, value: u64) -> &mut Self {
        self.len += encoded_len_varint(value);
        self
    }

    pub fn size_fixed32(&mut self) -> &mut Self {
        self.len += 4;
        self
    }

    pub fn size_fixed64(&mut self) -> &mut Self {
        self.len += 8;
        self
    }

    pub fn size_bool(&mut self) -> &mut Self {
        self.len += 1;
        self
    }

    /// Sizes a length-delimited body of `body_len` bytes: the varint length
    /// prefix plus the body itself.
    pub fn size_length_delimited(&mut self, body_len: usize) -> &mut Self {
        self.len += encoded_len_varint(body_len as u64) + body_len;
        self
    }

    pub fn size_bytes(&mut self, len: usize) -> &mut Self {
        self.len += len;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::writer::StreamWriter;

    #[test]
    fn matches_writer_byte_count_for_tag_and_varint() {
        let mut sizer = SizeCalculator::new();
        sizer.size_tag(5, WireType::Varint).size_varint(300);
        let predicted = sizer.finish();

        let mut sink = Vec::new();
        {
            let mut w = StreamWriter::new(&mut sink);
            w.write_tag(5, WireType::Varint).unwrap();
            w.write_varint(300).unwrap();
            w.flush().unwrap();
        }
        assert_eq!(predicted, sink.len());
    }
}
