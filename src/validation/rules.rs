use chrono::{DateTime, Datelike, NaiveDate};
use validator::ValidateEmail;

use super::field::Field;
use super::gender::Gender;
use crate::schemas::NormalizedSignupInput;

/// Minimum age, in whole years, to open an account.
pub const MIN_AGE: i32 = 18;

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// A predicate over one field's normalized value.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Check {
    /// At least this many UTF-16 code units, the unit browsers measure
    /// string length in.
    MinLength(usize),
    /// Non-empty, only Latin letters, Arabic-block letters and whitespace.
    NameCharacters,
    Email,
    /// `09` followed by nine ASCII digits.
    IranianMobile,
    GenderOption,
    /// At least one character satisfies the predicate.
    ContainsAny(fn(&char) -> bool),
    NonEmpty,
    CalendarDate,
    /// Whole years elapsed since the birth date, on `today`.
    MinimumAge(i32),
}

impl Check {
    pub(crate) fn passes(self, value: &str, today: NaiveDate) -> bool {
        match self {
            Check::MinLength(min) => value.encode_utf16().count() >= min,
            Check::NameCharacters => !value.is_empty() && value.chars().all(is_name_char),
            Check::Email => value.validate_email() && is_dotted_address(value),
            Check::IranianMobile => {
                value.len() == 11
                    && value.starts_with("09")
                    && value.bytes().all(|b| b.is_ascii_digit())
            }
            Check::GenderOption => value.parse::<Gender>().is_ok(),
            Check::ContainsAny(predicate) => value.chars().any(|c| predicate(&c)),
            Check::NonEmpty => !value.is_empty(),
            Check::CalendarDate => parse_birth_date(value).is_some(),
            Check::MinimumAge(min) => {
                parse_birth_date(value).is_some_and(|birth| age_on(birth, today) >= min)
            }
        }
    }
}

pub(crate) struct FieldRule {
    pub field: Field,
    pub check: Check,
    pub message: &'static str,
}

/// Every per-field rule, grouped by field and ordered as messages should be reported.
pub(crate) static FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::FirstName,
        check: Check::MinLength(2),
        message: "First name must be at least 2 characters",
    },
    FieldRule {
        field: Field::FirstName,
        check: Check::NameCharacters,
        message: "First name must contain only letters",
    },
    FieldRule {
        field: Field::LastName,
        check: Check::MinLength(2),
        message: "Last name must be at least 2 characters",
    },
    FieldRule {
        field: Field::LastName,
        check: Check::NameCharacters,
        message: "Last name must contain only letters",
    },
    FieldRule {
        field: Field::Email,
        check: Check::Email,
        message: "Please enter a valid email address",
    },
    FieldRule {
        field: Field::Phone,
        check: Check::IranianMobile,
        message: "Phone number must be a valid Iranian mobile (e.g., 09123456789)",
    },
    FieldRule {
        field: Field::Gender,
        check: Check::GenderOption,
        message: "invalid option",
    },
    FieldRule {
        field: Field::Password,
        check: Check::MinLength(8),
        message: "Password must be at least 8 characters",
    },
    FieldRule {
        field: Field::Password,
        check: Check::ContainsAny(char::is_ascii_uppercase),
        message: "Password must contain at least one uppercase letter",
    },
    FieldRule {
        field: Field::Password,
        check: Check::ContainsAny(char::is_ascii_lowercase),
        message: "Password must contain at least one lowercase letter",
    },
    FieldRule {
        field: Field::Password,
        check: Check::ContainsAny(char::is_ascii_digit),
        message: "Password must contain at least one number",
    },
    FieldRule {
        field: Field::Password,
        check: Check::ContainsAny(is_special_char),
        message: "Password must contain at least one special character",
    },
    FieldRule {
        field: Field::ConfirmPassword,
        check: Check::NonEmpty,
        message: "Please confirm your password",
    },
    FieldRule {
        field: Field::DateOfBirth,
        check: Check::CalendarDate,
        message: "Invalid date format",
    },
    FieldRule {
        field: Field::DateOfBirth,
        check: Check::MinimumAge(MIN_AGE),
        message: "You must be at least 18 years old",
    },
    FieldRule {
        field: Field::Address,
        check: Check::MinLength(10),
        message: "Address must be at least 10 characters long",
    },
];

/// A rule reading several fields whose failure is reported on `target`.
pub(crate) struct CrossFieldRule {
    pub name: &'static str,
    pub target: Field,
    pub check: fn(&NormalizedSignupInput) -> bool,
    pub message: &'static str,
}

/// Evaluated after all of [`FIELD_RULES`].
pub(crate) static CROSS_FIELD_RULES: &[CrossFieldRule] = &[CrossFieldRule {
    name: "passwords_match",
    target: Field::ConfirmPassword,
    check: passwords_match,
    message: "Passwords don't match",
}];

fn passwords_match(input: &NormalizedSignupInput) -> bool {
    input.password == input.confirm_password
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{0600}'..='\u{06FF}').contains(&c) || c.is_whitespace()
}

fn is_special_char(c: &char) -> bool {
    !c.is_ascii_alphanumeric()
}

/// The stricter grammar client-side form libraries apply on top of RFC 5322:
/// a plain local part without leading or doubled dots, and a dotted hostname
/// ending in an alphabetic TLD of two or more letters.
fn is_dotted_address(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.starts_with('.') || value.contains("..") {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_'+-.".contains(c))
        && local
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric() || "_+-".contains(c));

    let Some((hosts, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    let hosts_ok = hosts.split('.').all(|label| {
        let mut chars = label.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    local_ok && tld_ok && hosts_ok
}

/// Parse a date of birth as entered by a date input (`YYYY-MM-DD`).
///
/// A full RFC 3339 timestamp is also accepted; its calendar date in its own
/// offset is used.
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, BIRTH_DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

/// Completed years between `birth` and `today`.
///
/// The year difference drops by one when this year's birthday is still ahead,
/// so the 18th birthday itself counts as 18.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let age = today.year() - birth.year();
    let month_diff = today.month() as i32 - birth.month() as i32;
    if month_diff < 0 || (month_diff == 0 && today.day() < birth.day()) {
        age - 1
    } else {
        age
    }
}
