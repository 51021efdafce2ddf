//! The tagged value model: {null, true, false, integer, real, raw-number,
//! string, array, object}, with lazy conversion for numbers and strings
//! that haven't been paid for yet.

use crate::number::{self, NumberValue};
use crate::unescape;
use std::cell::Cell;

/// A raw, unconverted number: three slices of the source buffer (integer
/// part, fraction digits, exponent digits) plus the exponent's sign.
#[derive(Debug, Clone, Copy)]
pub struct RawNumber {
    pub(crate) num_start: usize,
    pub(crate) num_end: usize,
    pub(crate) frac_start: usize,
    pub(crate) frac_end: usize,
    pub(crate) exp_start: usize,
    pub(crate) exp_end: usize,
    pub(crate) exp_negative: bool,
}

/// A borrowed or owned string body.
#[derive(Debug, Clone)]
pub enum StringData {
    /// Byte range into the document's owned input buffer.
    Borrowed { start: usize, end: usize },
    /// Separately allocated (the `ALLOC` flag in the source terminology).
    Owned(Box<[u8]>),
}

/// A string value: its data, whether it still carries backslash escapes
/// (`ESCAPES`), and — once resolved — a cached unescaped form.
#[derive(Debug, Clone)]
pub struct JsonString {
    pub(crate) data: StringData,
    pub(crate) has_escapes: Cell<bool>,
    /// Present once an escaped borrowed string has been unescaped; holds
    /// the owned, decoded bytes so repeated reads don't redo the work.
    pub(crate) resolved: std::cell::RefCell<Option<Box<[u8]>>>,
}

impl JsonString {
    pub(crate) fn borrowed(start: usize, end: usize, has_escapes: bool) -> Self {
        JsonString {
            data: StringData::Borrowed { start, end },
            has_escapes: Cell::new(has_escapes),
            resolved: std::cell::RefCell::new(None),
        }
    }

    pub(crate) fn owned(bytes: Vec<u8>) -> Self {
        JsonString {
            data: StringData::Owned(bytes.into_boxed_slice()),
            has_escapes: Cell::new(false),
            resolved: std::cell::RefCell::new(None),
        }
    }

    /// Resolve to the unescaped byte slice, unescaping on first access if
    /// the `ESCAPES` flag is set. `input` must be the same buffer the
    /// value was parsed from when `data` is `Borrowed`.
    pub fn bytes<'a>(&'a self, input: &'a [u8]) -> std::borrow::Cow<'a, [u8]> {
        if !self.has_escapes.get() {
            return match &self.data {
                StringData::Borrowed { start, end } => std::borrow::Cow::Borrowed(&input[*start..*end]),
                StringData::Owned(b) => std::borrow::Cow::Borrowed(b),
            };
        }

        {
            let cached = self.resolved.borrow();
            if let Some(bytes) = cached.as_ref() {
                return std::borrow::Cow::Owned(bytes.to_vec());
            }
        }

        let raw: Vec<u8> = match &self.data {
            StringData::Borrowed { start, end } => input[*start..*end].to_vec(),
            StringData::Owned(b) => b.to_vec(),
        };
        let mut buf = raw;
        let len = unescape::unescape_in_place(&mut buf, 0, buf.len())
            .expect("string was validated as escapable during parse");
        buf.truncate(len);
        self.has_escapes.set(false);
        *self.resolved.borrow_mut() = Some(buf.clone().into_boxed_slice());
        std::borrow::Cow::Owned(buf)
    }
}

/// A single object field: name (always a [`JsonString`]) and value.
#[derive(Debug, Clone)]
pub struct Pair {
    pub name: JsonString,
    pub value: Value,
}

/// An object's pair array, with a `SORT` flag recording whether it has
/// been reordered by key for binary search.
#[derive(Debug, Clone)]
pub struct JsonObject {
    pub(crate) pairs: Vec<Pair>,
    pub(crate) sorted: Cell<bool>,
}

impl JsonObject {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }
}

/// The tagged value union: {NONE is represented by the absence of a
/// `Value`, e.g. inside an `Option`}, NULL, TRUE, FALSE, NUM_RAW, INT,
/// REAL, STRING, OBJECT, ARRAY, RAW.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    /// Deferred number conversion (RAW decode mode).
    NumRaw(RawNumber),
    Int(i64),
    Real(f64),
    String(JsonString),
    Array(Vec<Value>),
    Object(JsonObject),
    /// Pre-formatted JSON text, copied verbatim during encode. Used
    /// internally for container-opening bytes; not produced by the
    /// decoder.
    Raw(Box<[u8]>),
}

impl Value {
    /// Coerce a `NumRaw` value to `Int`/`Real` in place, returning the
    /// coerced value. No-op (returns the already-coerced copy) for any
    /// other numeric variant; panics if called on a non-numeric value.
    pub fn coerce_number(&mut self, input: &[u8]) {
        if let Value::NumRaw(raw) = self {
            let num = &input[raw.num_start..raw.num_end];
            let frac = &input[raw.frac_start..raw.frac_end];
            let exp = &input[raw.exp_start..raw.exp_end];
            let converted = number::convert_number(num, frac, exp, raw.exp_negative);
            *self = match converted {
                NumberValue::Int(i) => Value::Int(i),
                NumberValue::Real(r) => Value::Real(r),
            };
        }
    }

    /// Accessor: the value as an `f64`, coercing a raw number or accepting
    /// an already-converted one. Returns `None` for non-numeric values.
    pub fn as_f64(&self, input: &[u8]) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            Value::NumRaw(raw) => {
                let num = &input[raw.num_start..raw.num_end];
                let frac = &input[raw.frac_start..raw.frac_end];
                let exp = &input[raw.exp_start..raw.exp_end];
                match number::convert_number(num, frac, exp, raw.exp_negative) {
                    NumberValue::Int(i) => Some(i as f64),
                    NumberValue::Real(r) => Some(r),
                }
            }
            _ => None,
        }
    }

    /// Accessor: the value as a string's byte content (unescaping lazily),
    /// or `None` if not a string.
    pub fn as_str_bytes<'a>(&'a self, input: &'a [u8]) -> Option<std::borrow::Cow<'a, [u8]>> {
        match self {
            Value::String(s) => Some(s.bytes(input)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

/// The owning wrapper around a parsed value tree and the input buffer its
/// borrowed strings view into. Because `Document` owns the buffer, it has
/// no lifetime parameter and can be stored or moved freely.
pub struct Document {
    pub(crate) input: Box<[u8]>,
    pub(crate) root: Value,
}

impl Document {
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    /// The input buffer this document's borrowed strings view into.
    pub fn input(&self) -> &[u8] {
        &self.input
    }
}
