#![no_main]
use ferrojson::{EncodeOptions, Encoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 (string append requires it).
    if std::str::from_utf8(data).is_ok() {
        let mut enc = Encoder::new(EncodeOptions::default());
        let _ = enc.append_string(None, data);

        let mut raw_enc = Encoder::new(EncodeOptions {
            raw_fieldname: true,
            ..EncodeOptions::default()
        });
        if raw_enc.begin_object(None).is_ok() {
            let _ = raw_enc.append_string(Some(b"k"), data);
        }
    }
});
