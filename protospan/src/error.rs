//! Wire-format decode and encode errors.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A decode-time failure of the wire format.
///
/// `DecodeError` is 'best effort': the wire format rarely makes it possible
/// to say exactly *why* a byte stream is malformed, only *where* decoding
/// gave up.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodeError {
    inner: Box<Inner>,
}

#[derive(Clone, PartialEq, Eq)]
struct Inner {
    kind: DecodeErrorKind,
    path: ErrorPath,
}

/// The root cause of a `DecodeError`.
///
/// Maps onto the three wire-error categories from the error taxonomy:
/// `TruncatedInput`, `Malformed`, and `LimitExceeded`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// A primitive could not be read to completion: the byte view ended
    /// mid-varint, mid-fixed-width-integer, or mid-length-delimited-body.
    TruncatedInput,
    /// A varint exceeded its declared width, or a wire type was not one of
    /// `{0, 1, 2, 5}`.
    Malformed(&'static str),
    /// A length prefix claimed a span that would extend past the
    /// enclosing view, or the recursion limit was reached.
    LimitExceeded(&'static str),
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::TruncatedInput => f.write_str("truncated input"),
            DecodeErrorKind::Malformed(detail) => write!(f, "malformed input: {detail}"),
            DecodeErrorKind::LimitExceeded(detail) => write!(f, "limit exceeded: {detail}"),
        }
    }
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind) -> Self {
        DecodeError {
            inner: Box::new(Inner {
                kind,
                path: ErrorPath::new(),
            }),
        }
    }

    #[cold]
    pub(crate) fn truncated() -> Self {
        Self::new(DecodeErrorKind::TruncatedInput)
    }

    #[cold]
    pub(crate) fn malformed(detail: &'static str) -> Self {
        Self::new(DecodeErrorKind::Malformed(detail))
    }

    #[cold]
    pub(crate) fn limit_exceeded(detail: &'static str) -> Self {
        Self::new(DecodeErrorKind::LimitExceeded(detail))
    }

    /// Returns the root cause of this error.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.inner.kind
    }

    /// Returns the stack of `(message, field)` segments identifying where,
    /// within a nested decode, this error actually occurred.
    pub fn path(&self) -> &ErrorPath {
        &self.inner.path
    }

    /// Pushes a `(message, field)` segment onto the error path.
    ///
    /// Called by generated `merge_field` bodies as an error unwinds out of
    /// a nested decode, one level at a time, so the final error reads like
    /// a breadcrumb trail from the root message down to the failing field.
    #[doc(hidden)]
    pub fn push(&mut self, message: &'static str, field: &'static str) {
        self.inner.path.segments.push(ErrorPathSegment { message, field });
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeError")
            .field("kind", &self.inner.kind)
            .field("path", &self.inner.path)
            .finish()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode message: {}", self.inner.kind)?;
        for segment in self.inner.path.iter() {
            write!(f, ": {}.{}", segment.message, segment.field)?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

#[cfg(feature = "std")]
impl From<DecodeError> for std::io::Error {
    fn from(error: DecodeError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidData, error.to_string())
    }
}

/// Logical path to where a `DecodeError` occurred, expressed as a stack of
/// `(message, field)` name pairs from the root message down to the field
/// where decoding failed.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ErrorPath {
    segments: Vec<ErrorPathSegment>,
}

impl ErrorPath {
    fn new() -> Self {
        Self { segments: Vec::new() }
    }

    /// Iterates the segments from the root message down to the field where
    /// the error occurred.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ErrorPathSegment> {
        self.segments.iter()
    }
}

/// One segment of an `ErrorPath`: a message name and the field within it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ErrorPathSegment {
    pub message: &'static str,
    pub field: &'static str,
}

/// An encode-time failure: the sink could not accept the encoded bytes.
///
/// Encoding a well-formed value never fails for any other reason; this
/// mirrors the reference implementation's guarantee that message encoding
/// is infallible except for sink capacity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EncodeError {
    required: usize,
    remaining: usize,
}

impl EncodeError {
    pub(crate) fn new(required: usize, remaining: usize) -> EncodeError {
        debug_assert!(required > remaining);
        EncodeError { required, remaining }
    }

    /// The number of bytes the encode operation needed.
    pub fn required_capacity(&self) -> usize {
        self.required
    }

    /// The number of bytes that were actually available.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to encode message; insufficient sink capacity (required: {}, remaining: {})",
            self.required, self.remaining
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

#[cfg(feature = "std")]
impl From<EncodeError> for std::io::Error {
    fn from(error: EncodeError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, error.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn path_renders_root_to_leaf() {
        let mut error = DecodeError::malformed("bad varint");
        error.push("Outer", "inner");
        error.push("Inner", "value");

        assert_eq!(
            error.to_string(),
            "failed to decode message: malformed input: bad varint: Outer.inner: Inner.value"
        );
    }
}
