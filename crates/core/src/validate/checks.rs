#![forbid(unsafe_code)]

use regex::Regex;
use std::sync::LazyLock;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn has_no_digits(value: &str) -> bool {
    !value.chars().any(|c| c.is_ascii_digit())
}

pub fn is_integer(value: &str) -> bool {
    value.trim().parse::<i64>().is_ok()
}

pub fn is_decimal(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|number| number.is_finite())
}

pub fn parse_iso_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

pub fn is_iso_date(value: &str) -> bool {
    parse_iso_date(value).is_some()
}

pub fn is_clock_time(value: &str) -> bool {
    Time::parse(value.trim(), format_description!("[hour]:[minute]")).is_ok()
}

pub fn phone_ok(value: &str) -> bool {
    digits_only(value).len() >= 10
}

pub fn postal_code_ok(value: &str) -> bool {
    digits_only(value).len() == 8
}

pub fn email_ok(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

/// Editable `YYYY-MM-DD` form of a stored date. Full timestamps keep their calendar date;
/// anything unparsable is returned unchanged so the user can still see and fix it.
pub fn normalize_date_for_edit(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Some(date) = parse_iso_date(trimmed) {
        return crate::schema::format_date(date);
    }
    if let Ok(stamp) =
        OffsetDateTime::parse(trimmed, &time::format_description::well_known::Rfc3339)
    {
        return crate::schema::format_date(stamp.date());
    }
    if let Ok(stamp) = PrimitiveDateTime::parse(
        trimmed,
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    ) {
        return crate::schema::format_date(stamp.date());
    }
    value.to_string()
}
