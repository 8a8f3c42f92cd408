//! Canonical decimal rendering and recognition of number tokens.
//!
//! The wire grammar has no exponent form: integers print bare, floats always
//! carry a fraction so the integer/float distinction survives decoding. A
//! token is a number only if it matches that canonical grammar, which keeps
//! `needs_quoting` and the decoder in exact agreement.

use crate::value::Number;

pub(crate) fn write_number_into(n: &Number, out: &mut String) {
    match n {
        Number::PosInt(u) => {
            let mut buf = itoa::Buffer::new();
            out.push_str(buf.format(*u));
        }
        Number::NegInt(i) => {
            let mut buf = itoa::Buffer::new();
            out.push_str(buf.format(*i));
        }
        Number::Float(f) => write_float_into(*f, out),
    }
}

fn write_float_into(f: f64, out: &mut String) {
    // The encoder rejects non-finite floats before reaching this point;
    // Display falls back to the JSON convention.
    if !f.is_finite() {
        out.push_str("null");
        return;
    }
    let mut buf = ryu::Buffer::new();
    let raw = buf.format(f);
    if raw.contains('e') || raw.contains('E') {
        expand_exponent(raw, out);
    } else {
        out.push_str(raw);
    }
}

/// Rewrite ryu's exponent form as plain decimal digits. The digits are
/// shortest-round-trip, so shifting the decimal point denotes the same f64
/// and parses back to it exactly.
fn expand_exponent(raw: &str, out: &mut String) {
    let bytes = raw.as_bytes();
    let mut i = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        i += 1;
    }

    let mut digits = String::new();
    let mut dot_pos = None;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => digits.push(bytes[i] as char),
            b'.' => dot_pos = Some(digits.len()),
            b'e' | b'E' => {
                i += 1;
                break;
            }
            _ => {}
        }
        i += 1;
    }

    let mut exp_sign = 1i32;
    match bytes.get(i) {
        Some(&b'-') => {
            exp_sign = -1;
            i += 1;
        }
        Some(&b'+') => i += 1,
        _ => {}
    }
    let mut exp: i32 = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            exp = exp
                .saturating_mul(10)
                .saturating_add((bytes[i] - b'0') as i32);
        }
        i += 1;
    }
    exp *= exp_sign;

    let dot_pos = dot_pos.unwrap_or(digits.len());
    let point = dot_pos as i32 + exp;

    if negative {
        out.push('-');
    }
    if point <= 0 {
        out.push_str("0.");
        for _ in 0..(-point) as usize {
            out.push('0');
        }
        out.push_str(&digits);
    } else if point as usize >= digits.len() {
        out.push_str(&digits);
        for _ in 0..point as usize - digits.len() {
            out.push('0');
        }
        // Keep the float marker so decoding restores a Float, not an integer.
        out.push_str(".0");
    } else {
        out.push_str(&digits[..point as usize]);
        out.push('.');
        out.push_str(&digits[point as usize..]);
    }
}

/// Recognize a canonical number token: optional minus, an integer part with
/// no leading zeros, an optional fraction. No exponent, no leading plus.
pub(crate) fn parse_number_token(token: &str) -> Option<Number> {
    let bytes = token.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut idx = 0;
    let negative = bytes[0] == b'-';
    if negative {
        idx += 1;
    }
    let int_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    let int_digits = &token[int_start..idx];
    if int_digits.is_empty() {
        return None;
    }
    if int_digits.len() > 1 && int_digits.starts_with('0') {
        return None;
    }
    let mut is_float = false;
    if idx < bytes.len() && bytes[idx] == b'.' {
        is_float = true;
        idx += 1;
        let frac_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == frac_start {
            return None;
        }
    }
    if idx != bytes.len() {
        return None;
    }

    if is_float {
        let f: f64 = token.parse().ok()?;
        return f.is_finite().then_some(Number::Float(f));
    }
    if negative {
        if let Ok(i) = token.parse::<i64>() {
            return Some(Number::from(i));
        }
    } else if let Ok(u) = token.parse::<u64>() {
        return Some(Number::PosInt(u));
    }
    // Integer wider than 64 bits: keep the nearest float.
    let f: f64 = token.parse().ok()?;
    f.is_finite().then_some(Number::Float(f))
}
