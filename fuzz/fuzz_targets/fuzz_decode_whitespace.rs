#![no_main]
use ferrojson::{DecodeOptions, Decoder};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes followed by a valid scalar, exercising the
// whitespace/comment skip loop at every possible chunk-boundary
// alignment the fuzzer happens to generate.
fuzz_target!(|data: &[u8]| {
    if data.len() > 65536 {
        return;
    }
    let mut wrapped = data.to_vec();
    wrapped.extend_from_slice(b"1");
    let _ = Decoder::new(DecodeOptions::default()).parse(&wrapped);
});
