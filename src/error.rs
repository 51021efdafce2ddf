//! Error types for decode and encode operations.
//!
//! Both error types carry the byte offset at which the operation stopped,
//! matching the "offset at which parsing stopped" contract from the
//! propagation policy: every failure is reported as a typed reason plus a
//! position, never a partial result.

use thiserror::Error;

/// Why a decode failed, independent of where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The byte at the error position did not start any valid production.
    UnexpectedByte(u8),
    /// End of input reached while a string, comment, array, or object was
    /// still open.
    UnterminatedString,
    UnterminatedComment,
    UnterminatedArray,
    UnterminatedObject,
    /// A `\` escape used something other than `"\/bfnrt u`.
    InvalidEscape,
    /// A `\uXXXX` escape had fewer than four hex digits, or a high
    /// surrogate was not followed by a valid low surrogate.
    InvalidUnicodeEscape,
    /// `true`/`false`/`null` did not match byte-for-byte.
    InvalidLiteral,
    /// A number was malformed: bare `-`, missing exponent digits, or a
    /// leading zero followed by more digits.
    InvalidNumber,
    /// A trailing comma preceded a closing bracket.
    TrailingComma,
    /// An object field name was not a quoted string.
    ExpectedFieldName,
    /// Extra non-whitespace content followed the root value.
    TrailingGarbage,
    /// Array/object nesting exceeded the configured maximum depth.
    DepthExceeded,
    /// A string contained bytes that do not form valid UTF-8 once
    /// unescaped.
    InvalidUtf8,
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeErrorKind::UnexpectedByte(b) => {
                write!(f, "unexpected byte 0x{b:02x}")
            }
            DecodeErrorKind::UnterminatedString => write!(f, "unterminated string"),
            DecodeErrorKind::UnterminatedComment => write!(f, "unterminated comment"),
            DecodeErrorKind::UnterminatedArray => write!(f, "unterminated array"),
            DecodeErrorKind::UnterminatedObject => write!(f, "unterminated object"),
            DecodeErrorKind::InvalidEscape => write!(f, "invalid escape sequence"),
            DecodeErrorKind::InvalidUnicodeEscape => write!(f, "invalid \\u escape"),
            DecodeErrorKind::InvalidLiteral => write!(f, "invalid literal"),
            DecodeErrorKind::InvalidNumber => write!(f, "invalid number"),
            DecodeErrorKind::TrailingComma => write!(f, "trailing comma"),
            DecodeErrorKind::ExpectedFieldName => write!(f, "expected a quoted field name"),
            DecodeErrorKind::TrailingGarbage => write!(f, "trailing content after root value"),
            DecodeErrorKind::DepthExceeded => write!(f, "maximum nesting depth exceeded"),
            DecodeErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 in string"),
        }
    }
}

/// A decode failure: what went wrong, and where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {position}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    position: usize,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, position: usize) -> Self {
        DecodeError { kind, position }
    }

    /// Byte offset into the input at which the decoder stopped.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Why an encode operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeErrorKind {
    /// A named append (or begin-object) happened while no frame, or an
    /// array frame, was open.
    NameNotAllowed,
    /// An unnamed append happened while an object frame was open.
    NameRequired,
    /// `end_array`/`end_object` was called but the open frame's kind
    /// doesn't match, or no frame is open.
    FrameMismatch,
    /// `begin_array`/`begin_object` would exceed the configured max depth.
    DepthExceeded,
    /// A string append was given bytes that are not valid UTF-8.
    InvalidUtf8,
    /// `finish` was called before every opened container was closed.
    UnterminatedDocument,
    /// A second top-level value was appended after the root value (scalar
    /// or container) had already been completed.
    RootAlreadyWritten,
}

impl std::fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeErrorKind::NameNotAllowed => write!(f, "a field name is not allowed here"),
            EncodeErrorKind::NameRequired => write!(f, "a field name is required here"),
            EncodeErrorKind::FrameMismatch => write!(f, "mismatched container close"),
            EncodeErrorKind::DepthExceeded => write!(f, "maximum nesting depth exceeded"),
            EncodeErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 in appended string"),
            EncodeErrorKind::UnterminatedDocument => {
                write!(f, "document has unclosed containers")
            }
            EncodeErrorKind::RootAlreadyWritten => {
                write!(f, "a root value has already been written")
            }
        }
    }
}

/// An encode failure: what went wrong, and at which buffer offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at buffer offset {position}")]
pub struct EncodeError {
    pub kind: EncodeErrorKind,
    position: usize,
}

impl EncodeError {
    pub(crate) fn new(kind: EncodeErrorKind, position: usize) -> Self {
        EncodeError { kind, position }
    }

    /// Buffer offset the encoder had reached before the failing append.
    pub fn position(&self) -> usize {
        self.position
    }
}
