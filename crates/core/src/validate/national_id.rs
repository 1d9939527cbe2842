#![forbid(unsafe_code)]

use super::checks::digits_only;
use super::errors::ValidationErrors;

pub const NATIONAL_ID_INVALID_MESSAGE: &str = "CPF is invalid.";
pub const NATIONAL_ID_DIGITS: usize = 11;

/// Outcome of the external national-id lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NationalIdVerdict {
    Valid,
    Invalid,
    /// The service could not be reached or answered with something unusable.
    Unknown,
}

/// What an [`NationalIdVerdict::Unknown`] verdict means for the record being saved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnavailablePolicy {
    #[default]
    FailClosed,
    FailOpen,
}

impl UnavailablePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailClosed => "fail-closed",
            Self::FailOpen => "fail-open",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail-closed" | "closed" => Some(Self::FailClosed),
            "fail-open" | "open" => Some(Self::FailOpen),
            _ => None,
        }
    }
}

impl NationalIdVerdict {
    pub fn accepted_under(self, policy: UnavailablePolicy) -> bool {
        match self {
            Self::Valid => true,
            Self::Invalid => false,
            Self::Unknown => policy == UnavailablePolicy::FailOpen,
        }
    }
}

/// 11 digits once punctuation is stripped, and not a single repeated digit.
pub fn national_id_format_ok(value: &str) -> bool {
    let digits = digits_only(value);
    if digits.len() != NATIONAL_ID_DIGITS {
        return false;
    }
    let first = digits.as_bytes()[0];
    !digits.bytes().all(|b| b == first)
}

pub fn apply_national_id_verdict(
    errors: &mut ValidationErrors,
    field: &str,
    verdict: NationalIdVerdict,
    policy: UnavailablePolicy,
) {
    if !verdict.accepted_under(policy) {
        errors.insert(field, NATIONAL_ID_INVALID_MESSAGE);
    }
}
