#![doc(html_root_url = "https://docs.rs/protospan/0.1.0")]
#![cfg_attr(not(feature = "std"), no_std)]

//! Wire-format runtime for bespoke, derive-generated Protocol Buffers
//! encoders and decoders.
//!
//! This crate carries no schema knowledge of its own — `SpanReader`,
//! `StreamWriter` and `SizeCalculator` only know how to move bytes around
//! according to the protobuf wire format. The `Message` trait is the seam
//! `#[derive(Message)]` (see `protospan-derive`) hangs generated code on.

extern crate alloc;

mod error;
mod message;
mod pool;

pub mod collections;
pub mod identifier;
pub mod pair;
pub mod reader;
pub mod sizer;
pub mod varint;
pub mod wire_type;
pub mod writer;

pub use crate::error::{DecodeError, DecodeErrorKind, EncodeError, ErrorPath, ErrorPathSegment};
pub use crate::identifier::Identifier;
pub use crate::message::{deserialize, encoded_len, serialize, serialize_to_vec, Message};
pub use crate::pair::Pair;
pub use crate::reader::SpanReader;
pub use crate::sizer::SizeCalculator;
pub use crate::varint::{
    decode_varint, encode_varint, encoded_len_varint, zigzag_decode32, zigzag_decode64,
    zigzag_encode32, zigzag_encode64,
};
pub use crate::wire_type::WireType;
pub use crate::writer::{Sink, StreamWriter};

#[cfg(feature = "derive")]
#[allow(unused_imports)]
#[macro_use]
extern crate protospan_derive;

#[cfg(feature = "derive")]
#[doc(hidden)]
pub use protospan_derive::Message;

/// Recursion budget for nested message decoding. Mirrors the reference
/// implementation's default of 100 and exists for the same reason: an
/// attacker-controlled byte stream must not be able to blow the native
/// stack via self-referential nested messages.
#[cfg(not(feature = "no-recursion-limit"))]
pub(crate) const RECURSION_LIMIT: u32 = 100;

#[cfg(feature = "no-recursion-limit")]
pub(crate) const RECURSION_LIMIT: u32 = u32::MAX;

/// Threshold, in UTF-16 code units, below which `StreamWriter` encodes a
/// string directly into a stack-allocated scratch buffer instead of
/// reaching for the pooled heap temporary. See `writer::STACK_STRING_CHARS`.
pub const SHORT_STRING_CHARS: usize = 256;
