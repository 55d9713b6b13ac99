//! Signup form validation.
//!
//! A submission is normalized first, then every rule in [`rules`] runs against
//! the normalized record. Nothing short-circuits: one call reports every
//! problem with the form.

mod field;
mod gender;
mod normalize;
mod rules;

use chrono::{Local, NaiveDate};

use crate::schemas::{NormalizedSignupInput, RawSignupInput};

pub use field::{Field, FieldErrors, UnknownField};
pub use gender::{Gender, InvalidGender};
pub use normalize::{canonicalize_phone, normalize};
pub use rules::{MIN_AGE, age_on, parse_birth_date};

use rules::{CROSS_FIELD_RULES, FIELD_RULES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted(NormalizedSignupInput),
    Rejected(FieldErrors),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted(_))
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationResult::Accepted(_) => None,
            ValidationResult::Rejected(errors) => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<NormalizedSignupInput, FieldErrors> {
        match self {
            ValidationResult::Accepted(input) => Ok(input),
            ValidationResult::Rejected(errors) => Err(errors),
        }
    }
}

/// Runs the signup rules.
///
/// Age checks use the local calendar date at the time of the call unless the
/// validator was built with [`FormValidator::on`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormValidator {
    today: Option<NaiveDate>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator that treats `today` as the current date.
    pub fn on(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    pub fn validate(&self, raw: &RawSignupInput) -> ValidationResult {
        let input = normalize(raw);
        let errors = self.collect_errors(&input);
        if errors.is_empty() {
            ValidationResult::Accepted(input)
        } else {
            ValidationResult::Rejected(errors)
        }
    }

    /// Messages the full validation would report for `field` alone.
    ///
    /// Used for live feedback while a single field is edited; an empty list
    /// means the field is currently well-formed.
    pub fn validate_field(&self, raw: &RawSignupInput, field: Field) -> Vec<String> {
        let input = normalize(raw);
        self.collect_errors(&input).remove(field)
    }

    fn collect_errors(&self, input: &NormalizedSignupInput) -> FieldErrors {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let mut errors = FieldErrors::new();

        for rule in FIELD_RULES {
            if !rule.check.passes(input.value(rule.field), today) {
                errors.add(rule.field, rule.message);
            }
        }
        for rule in CROSS_FIELD_RULES {
            if !(rule.check)(input) {
                tracing::trace!(rule = rule.name, field = %rule.target, "cross-field rule failed");
                errors.add(rule.target, rule.message);
            }
        }
        errors
    }
}

/// Validate against the current local date.
pub fn validate(raw: &RawSignupInput) -> ValidationResult {
    FormValidator::new().validate(raw)
}
