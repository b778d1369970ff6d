//! The wire type tag that accompanies every field key.

use crate::error::DecodeError;

/// One of the four wire types the protobuf wire format emits. Values `3`
/// (`StartGroup`) and `4` (`EndGroup`) are intentionally absent: `group` is
/// a non-goal (see spec §1) and this runtime never emits or expects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    SixtyFourBit = 1,
    LengthDelimited = 2,
    ThirtyTwoBit = 5,
}

impl WireType {
    #[inline]
    pub(crate) fn from_u64(value: u64) -> Result<WireType, DecodeError> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::SixtyFourBit),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::ThirtyTwoBit),
            _ => Err(DecodeError::malformed("wire type not in {0, 1, 2, 5}")),
        }
    }
}

/// Checks that `actual` matches `expected`, failing with a `Malformed`
/// decode error otherwise.
#[inline]
pub fn check_wire_type(expected: WireType, actual: WireType) -> Result<(), DecodeError> {
    if expected != actual {
        return Err(DecodeError::malformed("unexpected wire type for field"));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_group_wire_types() {
        assert!(WireType::from_u64(3).is_err());
        assert!(WireType::from_u64(4).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(WireType::from_u64(6).is_err());
        assert!(WireType::from_u64(u64::MAX).is_err());
    }
}
