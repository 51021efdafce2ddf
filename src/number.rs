//! Number conversion: turns the three digit slices a number token splits
//! into (integer part, fraction digits, exponent digits) into either a
//! signed 64-bit integer or a double.
//!
//! Grounded in a chunked base-10 accumulator: digit runs longer than 19
//! bytes are consumed in groups, carrying the running total forward by
//! `10^19` between groups, rather than parsing the whole run through a
//! single `u64`/`u128` that could overflow. Only the final, possibly
//! shorter, group scales by its own width instead of `10^19`.

/// 10^0 .. 10^19 as exact u64 values. 10^19 itself overflows u64 (max is
/// ~1.8e19) but is kept at index 19 via a saturating widen so chunk-carry
/// math that multiplies by it stays exact up to the point it would matter:
/// callers only ever use indices 0..=19 to scale an already-bounded partial
/// sum, never as a standalone magnitude.
const POWER10_INT: [u64; 20] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

/// 10^0 .. 10^308 as f64, the full representable range of a positive
/// double's decimal exponent. Exponents beyond 308 saturate here.
fn power10_float(k: u32) -> f64 {
    static TABLE: std::sync::OnceLock<[f64; 309]> = std::sync::OnceLock::new();
    let table = TABLE.get_or_init(|| {
        let mut t = [0.0f64; 309];
        let mut acc = 1.0f64;
        t[0] = 1.0;
        for i in 1..309 {
            acc *= 10.0;
            t[i] = acc;
        }
        t
    });
    table[k.min(308) as usize]
}

/// Converted numeric value: either exact-fitting INT or a REAL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Int(i64),
    Real(f64),
}

/// Accumulate a run of ASCII digits (no sign) as a chunked base-10 value,
/// in groups of up to 19 digits, carrying the running total by `10^19`
/// between groups. The final group is never full-width unless the run's
/// length is an exact multiple of 19, so it scales by its own width
/// rather than a fixed `10^19`.
fn accumulate_chunked(digits: &[u8]) -> f64 {
    let mut ret = 0.0f64;
    let mut i = 0;
    while i < digits.len() {
        let take = (digits.len() - i).min(19);
        let chunk = &digits[i..i + take];
        let mut chunk_val: u64 = 0;
        for &b in chunk {
            chunk_val = chunk_val * 10 + (b - b'0') as u64;
        }
        ret = ret * (POWER10_INT[take] as f64) + chunk_val as f64;
        i += take;
    }
    ret
}

/// Parse a digit run (no sign) as an exact `u64`, or `None` if it would
/// overflow. Used for the fast-path INT case, where the value must be
/// exact rather than an `f64` approximation.
fn parse_u64_exact(digits: &[u8]) -> Option<u64> {
    if digits.is_empty() || digits.len() > 20 {
        return None;
    }
    let mut acc: u128 = 0;
    for &b in digits {
        acc = acc * 10 + (b - b'0') as u128;
        if acc > u64::MAX as u128 {
            return None;
        }
    }
    Some(acc as u64)
}

/// Convert the three digit slices of a number token into a [`NumberValue`].
///
/// `num` may carry a leading `-` or `+`; `frac` and `exp` are plain digit
/// runs (the exponent's own sign, if any, is passed separately via
/// `exp_negative`). `flen`/`elen` being zero means no fraction/exponent was
/// present in the source token.
pub fn convert_number(num: &[u8], frac: &[u8], exp: &[u8], exp_negative: bool) -> NumberValue {
    let (negative, int_digits) = match num.first() {
        Some(b'-') => (true, &num[1..]),
        Some(b'+') => (false, &num[1..]),
        _ => (false, num),
    };

    if frac.is_empty() && exp.is_empty() {
        if let Some(mag) = parse_u64_exact(int_digits) {
            // i64::MIN's magnitude (2^63) is one more than i64::MAX's.
            let fits = if negative {
                mag <= (i64::MAX as u64) + 1
            } else {
                mag <= i64::MAX as u64
            };
            if fits {
                let value = if negative {
                    if mag == (i64::MAX as u64) + 1 {
                        i64::MIN
                    } else {
                        -(mag as i64)
                    }
                } else {
                    mag as i64
                };
                return NumberValue::Int(value);
            }
        }
    }

    let mut value = accumulate_chunked(int_digits);
    if !frac.is_empty() {
        value += accumulate_chunked(frac) / power10_float(frac.len() as u32);
    }
    if !exp.is_empty() {
        let exp_val = accumulate_chunked(exp) as u32;
        let scale = power10_float(exp_val);
        value = if exp_negative { value / scale } else { value * scale };
    }
    if negative {
        value = -value;
    }
    NumberValue::Real(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(s: &str) -> NumberValue {
        convert_number(s.as_bytes(), b"", b"", false)
    }

    #[test]
    fn small_integers_are_exact() {
        assert_eq!(int("0"), NumberValue::Int(0));
        assert_eq!(int("42"), NumberValue::Int(42));
        assert_eq!(int("-42"), NumberValue::Int(-42));
    }

    #[test]
    fn nineteen_digits_fits_i64_twenty_does_not() {
        assert_eq!(
            convert_number(b"9223372036854775807", b"", b"", false),
            NumberValue::Int(9223372036854775807)
        );
        assert_eq!(
            convert_number(b"-9223372036854775808", b"", b"", false),
            NumberValue::Int(i64::MIN)
        );
        match convert_number(b"92233720368547758070", b"", b"", false) {
            NumberValue::Real(_) => {}
            other => panic!("expected REAL for 20-digit overflow, got {other:?}"),
        }
    }

    #[test]
    fn exponent_sign_pins_rfc_behavior() {
        // 1e-2 == 0.01 : a `-` exponent divides.
        match convert_number(b"1", b"", b"2", true) {
            NumberValue::Real(v) => assert!((v - 0.01).abs() < 1e-12),
            other => panic!("expected REAL, got {other:?}"),
        }
        // 1e2 == 100.0 : no sign / `+` multiplies.
        match convert_number(b"1", b"", b"2", false) {
            NumberValue::Real(v) => assert!((v - 100.0).abs() < 1e-9),
            other => panic!("expected REAL, got {other:?}"),
        }
    }

    #[test]
    fn fraction_is_added_as_frac_over_10_to_flen() {
        match convert_number(b"0", b"5", b"", false) {
            NumberValue::Real(v) => assert!((v - 0.5).abs() < 1e-12),
            other => panic!("expected REAL, got {other:?}"),
        }
    }

    #[test]
    fn exponent_saturates_at_308() {
        let exp_digits: Vec<u8> = b"309".to_vec();
        let saturated = convert_number(b"1", b"", &exp_digits, false);
        let at_308 = convert_number(b"1", b"", b"308", false);
        assert_eq!(saturated, at_308);
    }

    #[test]
    fn presence_of_fraction_or_exponent_forces_real_even_when_integral() {
        match convert_number(b"5", b"0", b"", false) {
            NumberValue::Real(v) => assert_eq!(v, 5.0),
            other => panic!("expected REAL, got {other:?}"),
        }
        match convert_number(b"5", b"", b"0", false) {
            NumberValue::Real(v) => assert_eq!(v, 5.0),
            other => panic!("expected REAL, got {other:?}"),
        }
    }
}
