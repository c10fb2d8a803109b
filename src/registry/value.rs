//! Text conversion of register values.
//!
//! Argument parsing is as lenient as the C library conversions clients were
//! written against: leading whitespace is skipped, the longest numeric prefix
//! wins and anything unparsable reads as zero. Values go back out as decimal
//! integers or C `%e` scientific notation (`2.430000e+08`).

use core::fmt::Write;

/// Capacity of a formatted value.
pub const MAX_VALUE_TEXT: usize = 32;

/// A register value read from the radar.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Value {
    /// Integer or enumerated register, formatted as decimal
    Int(i64),
    /// Physical quantity, formatted in scientific notation
    Float(f64),
}

impl Value {
    /// Render the value the way it goes on the wire.
    pub fn format(&self) -> heapless::String<MAX_VALUE_TEXT> {
        match self {
            Value::Int(v) => {
                let mut out = heapless::String::new();
                let _ = write!(out, "{}", v);
                out
            }
            Value::Float(v) => format_scientific(*v),
        }
    }

    /// Integer view, truncating a float toward zero.
    pub fn as_int(&self) -> i32 {
        match *self {
            Value::Int(v) => v as i32,
            Value::Float(v) => v as i32,
        }
    }

    /// Single-precision view, as the driver's float setters take it.
    pub fn as_float(&self) -> f32 {
        match *self {
            Value::Int(v) => v as f32,
            Value::Float(v) => v as f32,
        }
    }
}

fn is_c_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Parse an integer argument like C `atoi`.
///
/// Skips leading whitespace, accepts one optional sign, then consumes digits
/// until the first non-digit. Returns 0 when no digits follow. Overflow wraps.
pub fn parse_int(text: &str) -> i32 {
    let mut chars = text.trim_start_matches(is_c_space).chars().peekable();

    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let mut value: i32 = 0;
    for c in chars {
        match c.to_digit(10) {
            Some(d) => value = value.wrapping_mul(10).wrapping_add(d as i32),
            None => break,
        }
    }

    if negative { value.wrapping_neg() } else { value }
}

/// Parse a float argument like C `atof`.
///
/// Skips leading whitespace and converts the longest prefix that forms a
/// valid number, decimal or `0x` hexadecimal with an optional binary `p`
/// exponent. Returns 0.0 when there is none.
pub fn parse_float(text: &str) -> f32 {
    let trimmed = text.trim_start_matches(is_c_space);

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let hex = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
        .and_then(parse_hex_float);
    if let Some(v) = hex {
        return if negative { -v as f32 } else { v as f32 };
    }

    let mut end = trimmed.len();
    while end > 0 {
        if trimmed.is_char_boundary(end) {
            if let Ok(v) = trimmed[..end].parse::<f64>() {
                return v as f32;
            }
        }
        end -= 1;
    }

    0.0
}

/// Hex digits with an optional point, then an optional `p` exponent.
/// `None` when no hex digit follows the `0x`.
fn parse_hex_float(digits: &str) -> Option<f64> {
    let bytes = digits.as_bytes();
    let mut mantissa = 0.0f64;
    let mut exponent: i32 = 0;
    let mut seen_digit = false;
    let mut seen_point = false;

    let mut i = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'.' if !seen_point => seen_point = true,
            _ => match char::from(b).to_digit(16) {
                Some(d) => {
                    mantissa = mantissa * 16.0 + f64::from(d);
                    if seen_point {
                        exponent -= 4;
                    }
                    seen_digit = true;
                }
                None => break,
            },
        }
        i += 1;
    }
    if !seen_digit {
        return None;
    }

    if let Some(b'p' | b'P') = bytes.get(i) {
        let tail = &digits[i + 1..];
        let unsigned = tail.strip_prefix(['+', '-']).unwrap_or(tail);
        if unsigned.starts_with(|c: char| c.is_ascii_digit()) {
            exponent = exponent.saturating_add(parse_int(tail));
        }
    }

    // Scale by powers of two; past this range the result is 0 or inf anyway.
    let mut value = mantissa;
    for _ in 0..exponent.clamp(0, 2200) {
        value *= 2.0;
    }
    for _ in 0..exponent.clamp(-2200, 0).unsigned_abs() {
        value *= 0.5;
    }
    Some(value)
}

/// Format like C `printf("%e")`: six fractional digits and a signed exponent
/// of at least two digits.
pub fn format_scientific(value: f64) -> heapless::String<MAX_VALUE_TEXT> {
    let mut out = heapless::String::new();

    if value.is_nan() {
        let _ = out.push_str(if value.is_sign_negative() { "-nan" } else { "nan" });
        return out;
    }
    if value.is_infinite() {
        let _ = out.push_str(if value < 0.0 { "-inf" } else { "inf" });
        return out;
    }

    let mut rust_form: heapless::String<MAX_VALUE_TEXT> = heapless::String::new();
    let _ = write!(rust_form, "{:.6e}", value);

    match rust_form.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            let _ = write!(out, "{}e{}{:02}", mantissa, sign, exponent.unsigned_abs());
        }
        None => {
            let _ = out.push_str(&rust_form);
        }
    }

    out
}
