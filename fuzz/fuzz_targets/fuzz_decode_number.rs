#![no_main]
use ferrojson::{DecodeOptions, Decoder};
use libfuzzer_sys::fuzz_target;

// Wrap arbitrary bytes as a single-element array so the fuzzer mutates a
// number token in context without needing to synthesize valid surrounding
// JSON itself.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 256 {
        return;
    }
    let mut wrapped = Vec::with_capacity(data.len() + 2);
    wrapped.push(b'[');
    wrapped.extend_from_slice(data);
    wrapped.push(b']');
    let _ = Decoder::new(DecodeOptions::default()).parse(&wrapped);
    let _ = Decoder::new(DecodeOptions {
        raw: true,
        ..DecodeOptions::default()
    })
    .parse(&wrapped);
});
