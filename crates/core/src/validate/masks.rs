#![forbid(unsafe_code)]

use super::checks::digits_only;
use crate::schema::FieldKind;

/// Canonical display form for values typed into masked fields. Other kinds pass through.
pub fn mask_input(kind: FieldKind, value: &str) -> String {
    match kind {
        FieldKind::NationalId => mask_national_id(value),
        FieldKind::Phone => mask_phone(value),
        FieldKind::PostalCode => mask_postal_code(value),
        _ => value.to_string(),
    }
}

/// `000.000.000-00`, filled progressively as digits arrive. More than 11 digits stay bare.
pub fn mask_national_id(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() > 11 {
        return digits;
    }
    let mut out = String::with_capacity(14);
    for (index, digit) in digits.chars().enumerate() {
        match index {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(digit);
    }
    out
}

/// `(00) 00000-0000` for mobile numbers, `(00) 0000-0000` for landlines; any other digit
/// count is kept as bare digits.
pub fn mask_phone(value: &str) -> String {
    let digits = digits_only(value);
    let split = match digits.len() {
        11 => 7,
        10 => 6,
        _ => return digits,
    };
    format!(
        "({}) {}-{}",
        &digits[..2],
        &digits[2..split],
        &digits[split..]
    )
}

pub fn mask_postal_code(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() > 5 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}
