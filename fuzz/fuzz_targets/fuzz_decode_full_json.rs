#![no_main]
use ferrojson::{DecodeOptions, Decoder, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Eager conversion: every number/string is resolved during parse.
    let _ = Decoder::new(DecodeOptions::default()).parse(data);

    // RAW mode: numbers and strings are left deferred. Walk the tree and
    // force every lazy conversion, since that path (not the parse itself)
    // is where a validation gap would show up as a panic.
    if let Ok(doc) = Decoder::new(DecodeOptions {
        raw: true,
        ..DecodeOptions::default()
    })
    .parse(data)
    {
        force_resolve(doc.root(), doc.input());
    }
});

fn force_resolve(value: &Value, input: &[u8]) {
    match value {
        Value::NumRaw(_) => {
            let _ = value.as_f64(input);
        }
        Value::String(_) => {
            let _ = value.as_str_bytes(input);
        }
        Value::Array(items) => {
            for item in items {
                force_resolve(item, input);
            }
        }
        Value::Object(obj) => {
            for pair in obj.pairs() {
                let _ = pair.name.bytes(input);
                force_resolve(&pair.value, input);
            }
        }
        _ => {}
    }
}
