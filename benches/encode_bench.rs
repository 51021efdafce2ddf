use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferrojson::{EncodeOptions, Encoder};

fn plain_ascii(len: usize) -> String {
    (0..len).map(|i| (b'a' + (i % 26) as u8) as char).collect()
}

fn needs_escaping(len: usize) -> String {
    let pattern = "hello \"world\"\nnew\tline\\slash";
    pattern.chars().cycle().take(len).collect()
}

fn unicode_heavy(len: usize) -> String {
    let chars = ['a', '\u{00e9}', '\u{4e16}', '\u{1f600}', 'z'];
    (0..len).map(|i| chars[i % chars.len()]).collect()
}

fn bench_string_escaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_escape");

    for size in [16, 64, 256, 1024, 4096] {
        let plain = plain_ascii(size);
        group.throughput(Throughput::Bytes(plain.len() as u64));
        group.bench_with_input(BenchmarkId::new("ascii", size), &plain, |b, data| {
            let mut enc = Encoder::new(EncodeOptions::default());
            b.iter(|| {
                enc.clear();
                enc.append_string(None, black_box(data.as_bytes())).unwrap();
            })
        });

        let escaped = needs_escaping(size);
        group.throughput(Throughput::Bytes(escaped.len() as u64));
        group.bench_with_input(BenchmarkId::new("escaped", size), &escaped, |b, data| {
            let mut enc = Encoder::new(EncodeOptions::default());
            b.iter(|| {
                enc.clear();
                enc.append_string(None, black_box(data.as_bytes())).unwrap();
            })
        });

        let uni = unicode_heavy(size);
        group.throughput(Throughput::Bytes(uni.len() as u64));
        group.bench_with_input(BenchmarkId::new("unicode", size), &uni, |b, data| {
            let mut enc = Encoder::new(EncodeOptions::default());
            b.iter(|| {
                enc.clear();
                enc.append_string(None, black_box(data.as_bytes())).unwrap();
            })
        });
    }
    group.finish();
}

fn bench_integer_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("integer_format");

    let cases: &[(&str, i64)] = &[
        ("zero", 0),
        ("small", 42),
        ("medium", 1_234_567),
        ("large", 9_223_372_036_854_775_807),
        ("negative", -1_234_567_890),
        ("neg_large", -9_223_372_036_854_775_807),
    ];

    for (name, value) in cases {
        group.bench_with_input(BenchmarkId::new("append_int", *name), value, |b, &val| {
            let mut enc = Encoder::new(EncodeOptions::default());
            b.iter(|| {
                enc.clear();
                enc.append_int(None, black_box(val)).unwrap();
            })
        });
    }

    group.bench_function("append_int_batch_100", |b| {
        let values: Vec<i64> = (0..100).map(|i| i * 1234567).collect();
        let mut enc = Encoder::new(EncodeOptions::default());
        b.iter(|| {
            enc.clear();
            enc.begin_array(None).unwrap();
            for &v in &values {
                enc.append_int(None, black_box(v)).unwrap();
            }
            enc.end_array().unwrap();
        })
    });

    group.finish();
}

fn bench_float_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("float_format");

    let cases: &[(&str, f64)] = &[
        ("zero", 0.0),
        ("simple", 3.14159265),
        ("scientific", 6.022e23),
        ("tiny", 5e-324),
        ("max", 1.7976931348623157e308),
        ("negative", -273.15),
        ("precise", 1.23456789012345),
    ];

    for (name, value) in cases {
        group.bench_with_input(BenchmarkId::new("append_real", *name), value, |b, &val| {
            let mut enc = Encoder::new(EncodeOptions::default());
            b.iter(|| {
                enc.clear();
                enc.append_real(None, black_box(val)).unwrap();
            })
        });
    }

    group.bench_function("append_real_batch_100", |b| {
        let values: Vec<f64> = (0..100).map(|i| i as f64 * 3.14159265).collect();
        let mut enc = Encoder::new(EncodeOptions::default());
        b.iter(|| {
            enc.clear();
            enc.begin_array(None).unwrap();
            for &v in &values {
                enc.append_real(None, black_box(v)).unwrap();
            }
            enc.end_array().unwrap();
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_string_escaping,
    bench_integer_format,
    bench_float_format,
);
criterion_main!(benches);
