//! Append-only JSON encoder: an explicit frame stack over a growable
//! output buffer, mirroring the decoder's recursive-descent shape in
//! reverse. Every append rolls the buffer back to its pre-append length
//! on failure, so a half-written value never lingers in the output.

use crate::decoder::DEFAULT_MAX_DEPTH;
use crate::error::{EncodeError, EncodeErrorKind};
use smallvec::SmallVec;

use EncodeErrorKind::*;

/// Frames are kept inline up to this depth before the stack spills to the
/// heap — chosen to cover ordinary nesting depths without an allocation.
const INLINE_FRAMES: usize = 16;

/// Configuration for an [`Encoder`].
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// Emit object field names verbatim, without JSON escaping. Callers
    /// are responsible for supplying only safe names.
    pub raw_fieldname: bool,
    /// Maximum array/object nesting depth.
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            raw_fieldname: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Array,
    Object,
}

struct Frame {
    kind: FrameKind,
    count: usize,
}

/// A reusable encode context. Grows its output buffer by doubling;
/// [`Encoder::clear`] resets it for reuse without shrinking the
/// allocation.
pub struct Encoder {
    options: EncodeOptions,
    buf: Vec<u8>,
    frames: SmallVec<[Frame; INLINE_FRAMES]>,
    /// Set the first time a depth-0 value (scalar or container) is
    /// started. A second depth-0 append, after the root has been
    /// completed, is rejected rather than silently concatenated.
    root_established: bool,
}

impl Encoder {
    pub fn new(options: EncodeOptions) -> Self {
        Encoder {
            options,
            buf: Vec::with_capacity(256),
            frames: SmallVec::new(),
            root_established: false,
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.frames.clear();
        self.root_established = false;
    }

    fn err(&self, kind: EncodeErrorKind) -> EncodeError {
        EncodeError::new(kind, self.buf.len())
    }

    /// Validate and emit the comma/field-name prefix for an append.
    /// Returns the buffer length to roll back to if the value payload
    /// itself later fails to serialize.
    fn before_value(&mut self, name: Option<&[u8]>) -> Result<usize, EncodeError> {
        let mark = self.buf.len();
        match self.frames.last() {
            None => {
                if name.is_some() {
                    return Err(self.err(NameNotAllowed));
                }
                if self.root_established {
                    return Err(self.err(RootAlreadyWritten));
                }
                self.root_established = true;
            }
            Some(frame) => match frame.kind {
                FrameKind::Array => {
                    if name.is_some() {
                        return Err(self.err(NameNotAllowed));
                    }
                    if frame.count > 0 {
                        self.buf.push(b',');
                    }
                }
                FrameKind::Object => {
                    if name.is_none() {
                        return Err(self.err(NameRequired));
                    }
                    if frame.count > 0 {
                        self.buf.push(b',');
                    }
                }
            },
        }
        if let Some(name) = name {
            if let Err(e) = self.write_field_name(name) {
                self.buf.truncate(mark);
                return Err(e);
            }
            self.buf.push(b':');
        }
        Ok(mark)
    }

    fn after_value(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.count += 1;
        }
    }

    fn write_field_name(&mut self, name: &[u8]) -> Result<(), EncodeError> {
        if self.options.raw_fieldname {
            self.buf.push(b'"');
            self.buf.extend_from_slice(name);
            self.buf.push(b'"');
            Ok(())
        } else {
            self.write_string_escaped(name)
        }
    }

    fn write_string_escaped(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        let text = simdutf8::basic::from_utf8(bytes).map_err(|_| self.err(InvalidUtf8))?;
        self.buf.push(b'"');
        for ch in text.chars() {
            match ch {
                '"' => self.buf.extend_from_slice(b"\\\""),
                '\\' => self.buf.extend_from_slice(b"\\\\"),
                '\u{8}' => self.buf.extend_from_slice(b"\\b"),
                '\u{c}' => self.buf.extend_from_slice(b"\\f"),
                '\n' => self.buf.extend_from_slice(b"\\n"),
                '\r' => self.buf.extend_from_slice(b"\\r"),
                '\t' => self.buf.extend_from_slice(b"\\t"),
                c if (c as u32) < 0x20 => push_hex4(&mut self.buf, c as u16),
                c if (c as u32) < 0x80 => self.buf.push(c as u8),
                c => {
                    let cp = c as u32;
                    if cp <= 0xFFFF {
                        push_hex4(&mut self.buf, cp as u16);
                    } else {
                        let v = cp - 0x10000;
                        push_hex4(&mut self.buf, (0xD800 + (v >> 10)) as u16);
                        push_hex4(&mut self.buf, (0xDC00 + (v & 0x3FF)) as u16);
                    }
                }
            }
        }
        self.buf.push(b'"');
        Ok(())
    }

    pub fn append_null(&mut self, name: Option<&[u8]>) -> Result<(), EncodeError> {
        self.before_value(name)?;
        self.buf.extend_from_slice(b"null");
        self.after_value();
        Ok(())
    }

    pub fn append_bool(&mut self, name: Option<&[u8]>, value: bool) -> Result<(), EncodeError> {
        self.before_value(name)?;
        self.buf
            .extend_from_slice(if value { b"true" } else { b"false" });
        self.after_value();
        Ok(())
    }

    pub fn append_int(&mut self, name: Option<&[u8]>, value: i64) -> Result<(), EncodeError> {
        self.before_value(name)?;
        let mut fmt = itoa::Buffer::new();
        self.buf.extend_from_slice(fmt.format(value).as_bytes());
        self.after_value();
        Ok(())
    }

    pub fn append_real(&mut self, name: Option<&[u8]>, value: f64) -> Result<(), EncodeError> {
        self.before_value(name)?;
        let mut fmt = ryu::Buffer::new();
        self.buf.extend_from_slice(fmt.format(value).as_bytes());
        self.after_value();
        Ok(())
    }

    pub fn append_string(&mut self, name: Option<&[u8]>, value: &[u8]) -> Result<(), EncodeError> {
        let mark = self.before_value(name)?;
        let was_root = self.frames.is_empty();
        if let Err(e) = self.write_string_escaped(value) {
            self.buf.truncate(mark);
            // before_value already flagged the root as established for
            // this call; since the payload never actually landed, undo
            // that so a retried root append isn't rejected for nothing.
            if was_root {
                self.root_established = false;
            }
            return Err(e);
        }
        self.after_value();
        Ok(())
    }

    /// Append pre-formatted JSON text verbatim, without validation.
    pub fn append_raw(&mut self, name: Option<&[u8]>, bytes: &[u8]) -> Result<(), EncodeError> {
        self.before_value(name)?;
        self.buf.extend_from_slice(bytes);
        self.after_value();
        Ok(())
    }

    pub fn begin_array(&mut self, name: Option<&[u8]>) -> Result<(), EncodeError> {
        self.begin_container(name, b'[', FrameKind::Array)
    }

    pub fn end_array(&mut self) -> Result<(), EncodeError> {
        self.end_container(b']', FrameKind::Array)
    }

    pub fn begin_object(&mut self, name: Option<&[u8]>) -> Result<(), EncodeError> {
        self.begin_container(name, b'{', FrameKind::Object)
    }

    pub fn end_object(&mut self) -> Result<(), EncodeError> {
        self.end_container(b'}', FrameKind::Object)
    }

    fn begin_container(
        &mut self,
        name: Option<&[u8]>,
        open: u8,
        kind: FrameKind,
    ) -> Result<(), EncodeError> {
        if self.frames.len() >= self.options.max_depth {
            return Err(self.err(DepthExceeded));
        }
        let mark = self.before_value(name)?;
        self.buf.push(open);
        if let Some(frame) = self.frames.last_mut() {
            frame.count += 1;
        }
        self.frames.push(Frame { kind, count: 0 });
        let _ = mark; // nothing can fail past this point; kept for symmetry with other appenders
        Ok(())
    }

    fn end_container(&mut self, close: u8, expected: FrameKind) -> Result<(), EncodeError> {
        match self.frames.last() {
            Some(frame) if frame.kind == expected => {
                self.frames.pop();
                self.buf.push(close);
                Ok(())
            }
            _ => Err(self.err(FrameMismatch)),
        }
    }

    /// Finish the document: succeeds only once every opened container has
    /// been closed (or a single scalar was appended at root). Returns a
    /// slice into the encoder's own buffer, valid until the next mutation.
    pub fn finish(&mut self) -> Result<&[u8], EncodeError> {
        if !self.frames.is_empty() {
            return Err(self.err(UnterminatedDocument));
        }
        Ok(&self.buf)
    }
}

fn push_hex4(buf: &mut Vec<u8>, cp: u16) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    buf.push(b'\\');
    buf.push(b'u');
    buf.push(HEX[((cp >> 12) & 0xF) as usize]);
    buf.push(HEX[((cp >> 8) & 0xF) as usize]);
    buf.push(HEX[((cp >> 4) & 0xF) as usize]);
    buf.push(HEX[(cp & 0xF) as usize]);
}
