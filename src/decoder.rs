//! Recursive-descent decoder: consumes the scanner and emits values into
//! the scratch buffer. Grammar is RFC 8259 JSON extended with `//` and
//! `/* */` comments between tokens.

use crate::error::{DecodeError, DecodeErrorKind};
use crate::number::{self, NumberValue};
use crate::scanner;
use crate::scratch::ScratchBuffer;
use crate::unescape;
use crate::value::{Document, JsonObject, JsonString, Pair, RawNumber, Value};
use std::cell::Cell;

use DecodeErrorKind::*;

/// Default recursion-depth cap, shared with the encoder's default frame
/// stack depth so one constant governs both directions (see design notes
/// on why the decoder needs a cap the original source didn't enforce).
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for a [`Decoder`].
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Defer number and string conversion: numbers stay `NumRaw` and
    /// strings stay unescaped-with-flag-set until first accessed.
    pub raw: bool,
    /// Skip unescaping strings during parse, independent of `raw`. Strings
    /// are still validated for well-formedness; only the byte rewrite is
    /// deferred.
    pub unescape_off: bool,
    /// Maximum array/object nesting depth. Exceeding it fails the parse
    /// rather than recursing further.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            raw: false,
            unescape_off: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A reusable decode context. The scratch buffers inside are retained
/// across calls to [`Decoder::parse`] to amortize allocation; they carry
/// no borrowed state from any previous document.
pub struct Decoder {
    options: DecodeOptions,
    array_scratch: ScratchBuffer<Value>,
    object_scratch: ScratchBuffer<Pair>,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Decoder {
            options,
            array_scratch: ScratchBuffer::new(),
            object_scratch: ScratchBuffer::new(),
        }
    }

    /// Parse `input` into a [`Document`]. The document takes ownership of
    /// (a copy of) `input`; borrowed strings in the resulting tree view
    /// into that owned copy, so the document has no lifetime tied to the
    /// caller's original buffer. Padding for the SIMD scanners is added
    /// and stripped internally — callers do not need to pad their input.
    pub fn parse(&mut self, input: &[u8]) -> Result<Document, DecodeError> {
        let logical_len = input.len();
        let mut buf = Vec::with_capacity(logical_len + scanner::CHUNK * 2);
        buf.extend_from_slice(input);
        buf.resize(logical_len + scanner::CHUNK * 2, 0);

        let mut pos = 0usize;
        let result = self.parse_value(&mut buf, &mut pos, logical_len, 0);

        let root = match result {
            Ok(root) => root,
            Err(e) => return Err(e),
        };

        if let Err(kind) = skip_content(&buf, &mut pos, logical_len) {
            return Err(DecodeError::new(kind, pos));
        }
        if pos != logical_len {
            return Err(DecodeError::new(TrailingGarbage, pos));
        }

        buf.truncate(logical_len);
        Ok(Document {
            input: buf.into_boxed_slice(),
            root,
        })
    }

    fn err(&self, kind: DecodeErrorKind, pos: usize) -> DecodeError {
        DecodeError::new(kind, pos)
    }

    fn skip_content_checked(
        &self,
        input: &[u8],
        pos: &mut usize,
        logical_len: usize,
    ) -> Result<(), DecodeError> {
        skip_content(input, pos, logical_len).map_err(|k| self.err(k, *pos))
    }

    fn parse_value(
        &mut self,
        input: &mut [u8],
        pos: &mut usize,
        logical_len: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        self.skip_content_checked(input, pos, logical_len)?;
        if *pos >= logical_len {
            return Err(self.err(UnexpectedByte(0), *pos));
        }
        match input[*pos] {
            b'"' => self.parse_string(input, pos, logical_len).map(Value::String),
            b'-' | b'0'..=b'9' => self.parse_number(input, pos, logical_len),
            b'[' => self.parse_array(input, pos, logical_len, depth),
            b'{' => self.parse_object(input, pos, logical_len, depth),
            b't' => self.parse_literal(input, pos, logical_len, b"true", Value::Bool(true)),
            b'f' => self.parse_literal(input, pos, logical_len, b"false", Value::Bool(false)),
            b'n' => self.parse_literal(input, pos, logical_len, b"null", Value::Null),
            b => Err(self.err(UnexpectedByte(b), *pos)),
        }
    }

    fn parse_literal(
        &self,
        input: &[u8],
        pos: &mut usize,
        logical_len: usize,
        literal: &'static [u8],
        value: Value,
    ) -> Result<Value, DecodeError> {
        let start = *pos;
        if start + literal.len() <= logical_len && &input[start..start + literal.len()] == literal
        {
            *pos = start + literal.len();
            Ok(value)
        } else {
            Err(self.err(InvalidLiteral, start))
        }
    }

    fn parse_string(
        &self,
        input: &mut [u8],
        pos: &mut usize,
        logical_len: usize,
    ) -> Result<JsonString, DecodeError> {
        let start = *pos;
        let (body_start, body_end, has_escapes) =
            scan_string_body(input, pos, logical_len).map_err(|k| self.err(k, start))?;

        if has_escapes && !self.options.raw && !self.options.unescape_off {
            let new_len = unescape::unescape_in_place(input, body_start, body_end)
                .map_err(|k| self.err(k, body_start))?;
            Ok(JsonString::borrowed(body_start, body_start + new_len, false))
        } else {
            Ok(JsonString::borrowed(body_start, body_end, has_escapes))
        }
    }

    fn parse_number(
        &self,
        input: &[u8],
        pos: &mut usize,
        logical_len: usize,
    ) -> Result<Value, DecodeError> {
        let start = *pos;
        let mut p = start;

        if p < logical_len && input[p] == b'-' {
            p += 1;
        }

        if p >= logical_len || !input[p].is_ascii_digit() {
            return Err(self.err(InvalidNumber, start));
        }
        if input[p] == b'0' {
            p += 1;
            if p < logical_len && input[p].is_ascii_digit() {
                return Err(self.err(InvalidNumber, start));
            }
        } else {
            p += 1;
            scanner::skip_ascii_digits(input, &mut p);
        }
        let int_end = p;

        let mut frac_start = p;
        let mut frac_end = p;
        if p < logical_len && input[p] == b'.' {
            p += 1;
            frac_start = p;
            if p >= logical_len || !input[p].is_ascii_digit() {
                return Err(self.err(InvalidNumber, start));
            }
            scanner::skip_ascii_digits(input, &mut p);
            frac_end = p;
        }

        let mut exp_start = p;
        let mut exp_end = p;
        let mut exp_negative = false;
        if p < logical_len && (input[p] == b'e' || input[p] == b'E') {
            p += 1;
            if p < logical_len && (input[p] == b'+' || input[p] == b'-') {
                exp_negative = input[p] == b'-';
                p += 1;
            }
            exp_start = p;
            if p >= logical_len || !input[p].is_ascii_digit() {
                return Err(self.err(InvalidNumber, start));
            }
            scanner::skip_ascii_digits(input, &mut p);
            exp_end = p;
        }

        *pos = p;
        let raw = RawNumber {
            num_start: start,
            num_end: int_end,
            frac_start,
            frac_end,
            exp_start,
            exp_end,
            exp_negative,
        };

        if self.options.raw {
            Ok(Value::NumRaw(raw))
        } else {
            let num = &input[raw.num_start..raw.num_end];
            let frac = &input[raw.frac_start..raw.frac_end];
            let exp = &input[raw.exp_start..raw.exp_end];
            Ok(match number::convert_number(num, frac, exp, raw.exp_negative) {
                NumberValue::Int(i) => Value::Int(i),
                NumberValue::Real(r) => Value::Real(r),
            })
        }
    }

    fn parse_array(
        &mut self,
        input: &mut [u8],
        pos: &mut usize,
        logical_len: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if depth >= self.options.max_depth {
            return Err(self.err(DepthExceeded, *pos));
        }
        *pos += 1; // consume '['
        let mark = self.array_scratch.mark();
        let result = self.parse_array_body(input, pos, logical_len, depth, mark);
        if result.is_err() {
            self.array_scratch.truncate_to(mark);
        }
        result
    }

    fn parse_array_body(
        &mut self,
        input: &mut [u8],
        pos: &mut usize,
        logical_len: usize,
        depth: usize,
        mark: usize,
    ) -> Result<Value, DecodeError> {
        self.skip_content_checked(input, pos, logical_len)?;
        if *pos < logical_len && input[*pos] == b']' {
            *pos += 1;
            return Ok(Value::Array(Vec::new()));
        }
        loop {
            let value = self.parse_value(input, pos, logical_len, depth + 1)?;
            self.array_scratch.push(value);
            self.skip_content_checked(input, pos, logical_len)?;
            match input.get(*pos) {
                Some(b',') => {
                    *pos += 1;
                    self.skip_content_checked(input, pos, logical_len)?;
                    if input.get(*pos) == Some(&b']') {
                        return Err(self.err(TrailingComma, *pos));
                    }
                }
                Some(b']') => {
                    *pos += 1;
                    break;
                }
                _ => return Err(self.err(UnterminatedArray, *pos)),
            }
        }
        let items = self.array_scratch.take_since(mark).into_vec();
        Ok(Value::Array(items))
    }

    fn parse_object(
        &mut self,
        input: &mut [u8],
        pos: &mut usize,
        logical_len: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if depth >= self.options.max_depth {
            return Err(self.err(DepthExceeded, *pos));
        }
        *pos += 1; // consume '{'
        let mark = self.object_scratch.mark();
        let result = self.parse_object_body(input, pos, logical_len, depth, mark);
        if result.is_err() {
            self.object_scratch.truncate_to(mark);
        }
        result
    }

    fn parse_object_body(
        &mut self,
        input: &mut [u8],
        pos: &mut usize,
        logical_len: usize,
        depth: usize,
        mark: usize,
    ) -> Result<Value, DecodeError> {
        self.skip_content_checked(input, pos, logical_len)?;
        if *pos < logical_len && input[*pos] == b'}' {
            *pos += 1;
            return Ok(Value::Object(JsonObject {
                pairs: Vec::new(),
                sorted: Cell::new(false),
            }));
        }
        loop {
            self.skip_content_checked(input, pos, logical_len)?;
            if input.get(*pos) != Some(&b'"') {
                return Err(self.err(ExpectedFieldName, *pos));
            }
            let name = self.parse_string(input, pos, logical_len)?;

            self.skip_content_checked(input, pos, logical_len)?;
            if input.get(*pos) != Some(&b':') {
                return Err(self.err(UnterminatedObject, *pos));
            }
            *pos += 1;

            let value = self.parse_value(input, pos, logical_len, depth + 1)?;
            self.object_scratch.push(Pair { name, value });

            self.skip_content_checked(input, pos, logical_len)?;
            match input.get(*pos) {
                Some(b',') => {
                    *pos += 1;
                    self.skip_content_checked(input, pos, logical_len)?;
                    if input.get(*pos) == Some(&b'}') {
                        return Err(self.err(TrailingComma, *pos));
                    }
                }
                Some(b'}') => {
                    *pos += 1;
                    break;
                }
                _ => return Err(self.err(UnterminatedObject, *pos)),
            }
        }
        let pairs = self.object_scratch.take_since(mark).into_vec();
        Ok(Value::Object(JsonObject {
            pairs,
            sorted: Cell::new(false),
        }))
    }
}

/// Skip whitespace, then `//` and `/* */` comments, repeating until
/// neither advances the position further.
fn skip_content(input: &[u8], pos: &mut usize, logical_len: usize) -> Result<(), DecodeErrorKind> {
    loop {
        scanner::skip_whitespace(input, pos);
        if *pos + 1 < logical_len && input[*pos] == b'/' {
            match input[*pos + 1] {
                b'/' => {
                    *pos += 2;
                    while *pos < logical_len && input[*pos] != b'\n' {
                        *pos += 1;
                    }
                    continue;
                }
                b'*' => {
                    *pos += 2;
                    let mut closed = false;
                    while *pos + 1 < logical_len {
                        if input[*pos] == b'*' && input[*pos + 1] == b'/' {
                            *pos += 2;
                            closed = true;
                            break;
                        }
                        *pos += 1;
                    }
                    if !closed {
                        return Err(UnterminatedComment);
                    }
                    continue;
                }
                _ => {}
            }
        }
        break;
    }
    Ok(())
}

/// Scan a string body starting at the opening `"` (at `*pos`). Advances
/// `pos` past the closing `"`. Returns `(body_start, body_end,
/// has_escapes)`, fully validating every `\` escape (including surrogate
/// pairing) so that later unescaping — whether eager or deferred to first
/// access — can never fail.
fn scan_string_body(
    input: &[u8],
    pos: &mut usize,
    logical_len: usize,
) -> Result<(usize, usize, bool), DecodeErrorKind> {
    *pos += 1;
    let start = *pos;
    let mut has_escapes = false;

    loop {
        scanner::skip_plain_string_bytes(input, pos);
        if *pos >= logical_len {
            return Err(UnterminatedString);
        }
        match input[*pos] {
            b'"' => {
                let end = *pos;
                *pos += 1;
                return Ok((start, end, has_escapes));
            }
            b'\\' => {
                has_escapes = true;
                *pos += 1;
                if *pos >= logical_len {
                    return Err(UnterminatedString);
                }
                match input[*pos] {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                        *pos += 1;
                    }
                    b'u' => {
                        *pos += 1;
                        let cp = read_hex4(input, *pos, logical_len)?;
                        *pos += 4;
                        if (0xD800..=0xDBFF).contains(&cp) {
                            if *pos + 6 > logical_len
                                || input[*pos] != b'\\'
                                || input[*pos + 1] != b'u'
                            {
                                return Err(InvalidUnicodeEscape);
                            }
                            let low = read_hex4(input, *pos + 2, logical_len)?;
                            if !(0xDC00..=0xDFFF).contains(&low) {
                                return Err(InvalidUnicodeEscape);
                            }
                            *pos += 6;
                        } else if (0xDC00..=0xDFFF).contains(&cp) {
                            return Err(InvalidUnicodeEscape);
                        }
                    }
                    _ => return Err(InvalidEscape),
                }
            }
            b if b < 0x20 => return Err(UnterminatedString),
            _ => unreachable!("skip_plain_string_bytes stops only on '\"', '\\\\', or control bytes"),
        }
    }
}

fn read_hex4(input: &[u8], pos: usize, logical_len: usize) -> Result<u16, DecodeErrorKind> {
    if pos + 4 > logical_len {
        return Err(InvalidUnicodeEscape);
    }
    let mut value: u32 = 0;
    for &b in &input[pos..pos + 4] {
        let digit = unescape::hex_digit(b).ok_or(InvalidUnicodeEscape)?;
        value = (value << 4) | digit;
    }
    Ok(value as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(src: &str) -> Result<Document, DecodeError> {
        Decoder::new(DecodeOptions::default()).parse(src.as_bytes())
    }

    #[test]
    fn empty_containers_parse() {
        assert!(matches!(decode("[]").unwrap().root(), Value::Array(v) if v.is_empty()));
        assert!(matches!(decode("{}").unwrap().root(), Value::Object(o) if o.is_empty()));
    }

    #[test]
    fn scenario_one_mixed_object() {
        let doc = decode(r#"{"a":1,"b":[true,null,-2.5e2]}"#).unwrap();
        let obj = doc.root().as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(matches!(obj.pairs()[0].value, Value::Int(1)));
        let arr = obj.pairs()[1].value.as_array().unwrap();
        assert!(matches!(arr[0], Value::Bool(true)));
        assert!(matches!(arr[1], Value::Null));
        match arr[2] {
            Value::Real(r) => assert_eq!(r, -250.0),
            ref other => panic!("expected REAL, got {other:?}"),
        }
    }

    #[test]
    fn scenario_two_bmp_escape() {
        let doc = decode(r#""é""#).unwrap();
        let bytes = doc.root().as_str_bytes(doc.input()).unwrap();
        assert_eq!(&*bytes, &[0xC3, 0xA9]);
    }

    #[test]
    fn scenario_three_exponent_forms() {
        let doc = decode("[1e-2,0.01,1E2]").unwrap();
        let arr = doc.root().as_array().unwrap();
        for (v, expected) in arr.iter().zip([0.01, 0.01, 100.0]) {
            match v {
                Value::Real(r) => assert!((r - expected).abs() < 1e-12),
                other => panic!("expected REAL, got {other:?}"),
            }
        }
    }

    #[test]
    fn scenario_four_comments_between_tokens() {
        let doc = decode(r#"{"k" /*x*/ : /*y*/ "v"}"#).unwrap();
        let obj = doc.root().as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(&*obj.pairs()[0].value.as_str_bytes(doc.input()).unwrap(), b"v");
    }

    #[test]
    fn nineteen_vs_twenty_digit_boundary() {
        let doc = decode("9223372036854775807").unwrap();
        assert!(matches!(doc.root(), Value::Int(9223372036854775807)));
        let doc = decode("92233720368547758070").unwrap();
        assert!(matches!(doc.root(), Value::Real(_)));
    }

    #[test]
    fn bare_minus_is_rejected() {
        assert!(decode("-").is_err());
        assert!(decode("-a").is_err());
    }

    #[test]
    fn exponent_with_no_digits_is_rejected() {
        assert!(decode("1e").is_err());
        assert!(decode("1e+").is_err());
    }

    #[test]
    fn leading_zero_followed_by_digit_is_rejected() {
        assert!(decode("01").is_err());
    }

    #[test]
    fn trailing_comma_is_rejected() {
        assert!(decode("[1,]").is_err());
        assert!(decode(r#"{"a":1,}"#).is_err());
    }

    #[test]
    fn trailing_garbage_after_root_is_rejected() {
        assert!(decode("1 2").is_err());
        assert!(decode("{} x").is_err());
    }

    #[test]
    fn depth_cap_is_enforced() {
        let mut opts = DecodeOptions::default();
        opts.max_depth = 4;
        let mut decoder = Decoder::new(opts);
        let nested = "[".repeat(5) + &"]".repeat(5);
        assert!(matches!(
            decoder.parse(nested.as_bytes()).unwrap_err().kind,
            DecodeErrorKind::DepthExceeded
        ));
        let shallow = "[".repeat(3) + &"]".repeat(3);
        assert!(decoder.parse(shallow.as_bytes()).is_ok());
    }

    #[test]
    fn raw_mode_defers_conversion_and_matches_eager_after_coercion() {
        let mut raw_decoder = Decoder::new(DecodeOptions {
            raw: true,
            ..DecodeOptions::default()
        });
        let mut doc = raw_decoder.parse(b"[1,2.5,\"a\\tb\"]").unwrap();
        {
            let arr = doc.root().as_array().unwrap();
            assert!(matches!(arr[0], Value::NumRaw(_)));
        }
        let input_ptr = doc.input().to_vec();
        if let Value::Array(items) = doc.root_mut() {
            for item in items.iter_mut() {
                item.coerce_number(&input_ptr);
            }
        }
        let eager_doc = decode("[1,2.5,\"a\\tb\"]").unwrap();
        let raw_arr = doc.root().as_array().unwrap();
        let eager_arr = eager_doc.root().as_array().unwrap();
        assert!(matches!(raw_arr[0], Value::Int(1)));
        assert!(matches!(eager_arr[0], Value::Int(1)));
        match (&raw_arr[1], &eager_arr[1]) {
            (Value::Real(a), Value::Real(b)) => assert_eq!(a, b),
            other => panic!("expected REAL/REAL, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_fails_cleanly() {
        assert!(decode("\"abc").is_err());
    }

    #[test]
    fn unterminated_block_comment_fails_cleanly() {
        assert!(decode("1 /* unterminated").is_err());
    }

    #[test]
    fn invalid_literal_spelling_is_rejected() {
        assert!(decode("tru").is_err());
        assert!(decode("nul").is_err());
    }
}
