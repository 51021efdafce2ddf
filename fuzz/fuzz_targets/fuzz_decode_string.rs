#![no_main]
use ferrojson::{DecodeOptions, Decoder};
use libfuzzer_sys::fuzz_target;

// Wrap arbitrary bytes in quotes so the fuzzer explores string-body parsing
// (plain runs, escapes, control bytes, malformed UTF-8) without needing to
// synthesize the surrounding quotes itself.
fuzz_target!(|data: &[u8]| {
    if data.len() > 65536 {
        return;
    }
    let mut wrapped = Vec::with_capacity(data.len() + 2);
    wrapped.push(b'"');
    wrapped.extend_from_slice(data);
    wrapped.push(b'"');
    let _ = Decoder::new(DecodeOptions::default()).parse(&wrapped);

    if let Ok(doc) = Decoder::new(DecodeOptions {
        raw: true,
        unescape_off: true,
        ..DecodeOptions::default()
    })
    .parse(&wrapped)
    {
        let _ = doc.root().as_str_bytes(doc.input());
    }
});
