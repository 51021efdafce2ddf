//! High-performance, allocation-frugal JSON decoder/encoder for embedding
//! in host applications: a recursive-descent decoder producing a tagged
//! value tree backed by a single owned input buffer, lazy number/string
//! conversion, sort-on-threshold object lookup, and an append-only
//! encoder over an explicit frame stack.
//!
//! Chunked byte scanning (see [`scanner`]) is built on plain byte
//! comparisons rather than any vector intrinsic, so the crate builds on
//! stable Rust across targets.

mod decoder;
mod encoder;
mod error;
mod number;
mod query;
mod scanner;
mod scratch;
mod unescape;
mod value;

pub use decoder::{DecodeOptions, Decoder, DEFAULT_MAX_DEPTH};
pub use encoder::{EncodeOptions, Encoder};
pub use error::{DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind};
pub use query::{array_get, query_path, PathStep, SORT_THRESHOLD};
pub use value::{Document, JsonObject, JsonString, Pair, RawNumber, StringData, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_then_encode_round_trips_structurally() {
        let mut decoder = Decoder::new(DecodeOptions::default());
        let doc = decoder
            .parse(br#"{"name":"café","tags":[1,2,3],"ok":true,"n":null}"#)
            .unwrap();

        let obj = doc.root().as_object().unwrap();
        assert_eq!(obj.len(), 4);

        let mut encoder = Encoder::new(EncodeOptions::default());
        encoder.begin_object(None).unwrap();
        for pair in obj.pairs() {
            let name = pair.name.bytes(doc.input());
            match &pair.value {
                Value::Null => encoder.append_null(Some(&name)).unwrap(),
                Value::Bool(b) => encoder.append_bool(Some(&name), *b).unwrap(),
                Value::Int(i) => encoder.append_int(Some(&name), *i).unwrap(),
                Value::Real(r) => encoder.append_real(Some(&name), *r).unwrap(),
                Value::String(s) => encoder
                    .append_string(Some(&name), &s.bytes(doc.input()))
                    .unwrap(),
                Value::Array(items) => {
                    encoder.begin_array(Some(&name)).unwrap();
                    for item in items {
                        if let Value::Int(i) = item {
                            encoder.append_int(None, *i).unwrap();
                        }
                    }
                    encoder.end_array().unwrap();
                }
                other => panic!("unexpected value in fixture: {other:?}"),
            }
        }
        encoder.end_object().unwrap();

        let out = encoder.finish().unwrap();
        let mut redecoder = Decoder::new(DecodeOptions::default());
        let redoc = redecoder.parse(out).unwrap();
        let reobj = redoc.root().as_object().unwrap();
        assert_eq!(reobj.len(), 4);
        assert_eq!(
            &*reobj.get(b"name", redoc.input()).unwrap().as_str_bytes(redoc.input()).unwrap(),
            "café".as_bytes()
        );
    }

    #[test]
    fn malformed_input_reports_position() {
        let mut decoder = Decoder::new(DecodeOptions::default());
        let err = decoder.parse(b"{\"a\": }").unwrap_err();
        assert_eq!(err.position(), 6);
    }
}
