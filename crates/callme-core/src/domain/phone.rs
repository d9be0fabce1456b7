//! Progressive phone mask for Russian numbers: `+7 (XXX) XXX-XX-XX`.
//!
//! The mask is applied on every keystroke, so each group is shown in
//! partial form while digits accrue instead of padding a fixed template.

pub const MAX_PHONE_DIGITS: usize = 11;

const COUNTRY_CODE: &str = "+7";

/// Digits of `raw` (ASCII only), truncated to [`MAX_PHONE_DIGITS`], with a
/// leading domestic `8` rewritten to the `7` country code.
pub fn phone_digits(raw: &str) -> String {
    let mut digits: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit())
        .take(MAX_PHONE_DIGITS)
        .collect();
    if digits.starts_with('8') {
        digits.replace_range(..1, "7");
    }
    digits
}

pub fn format_phone(raw: &str) -> String {
    let digits = phone_digits(raw);
    let len = digits.len();
    if len == 0 {
        return String::new();
    }

    // The first digit is always displayed as the country code, whatever it was.
    let mut out = String::with_capacity(COUNTRY_CODE.len() + 16);
    out.push_str(COUNTRY_CODE);

    if len >= 2 {
        out.push_str(" (");
        out.push_str(group(&digits, 1, 4));
        out.push(')');
    }
    if len >= 5 {
        out.push(' ');
        out.push_str(group(&digits, 4, 7));
    }
    if len >= 8 {
        out.push('-');
        out.push_str(group(&digits, 7, 9));
    }
    if len >= 10 {
        out.push('-');
        out.push_str(group(&digits, 9, 11));
    }

    out
}

// `digits` is ASCII, so byte offsets are char offsets.
fn group(digits: &str, start: usize, end: usize) -> &str {
    let end = end.min(digits.len());
    digits.get(start..end).unwrap_or("")
}
