use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The nine form fields, in the order the form declares them.
///
/// The derived ordering follows declaration order, so error maps keyed by
/// `Field` iterate the way the form is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Gender,
    Password,
    ConfirmPassword,
    DateOfBirth,
    Address,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::Gender,
        Field::Password,
        Field::ConfirmPassword,
        Field::DateOfBirth,
        Field::Address,
    ];

    /// Wire name, as used in JSON payloads and error maps.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Gender => "gender",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::DateOfBirth => "dateOfBirth",
            Field::Address => "address",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Field name -> ordered error messages.
///
/// Entries are only created by [`FieldErrors::add`], so a field present in the
/// map always carries at least one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Messages for `field`, empty when it passed every check.
    pub fn get(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remove(&mut self, field: Field) -> Vec<String> {
        self.0.remove(&field).unwrap_or_default()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &[String])> {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip_through_from_str() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>(), Ok(field));
        }
        assert_eq!(
            "first_name".parse::<Field>(),
            Err(UnknownField("first_name".into()))
        );
    }

    #[test]
    fn errors_keep_insertion_order_per_field() {
        let mut errors = FieldErrors::new();
        errors.add(Field::Password, "first");
        errors.add(Field::Email, "bad email");
        errors.add(Field::Password, "second");

        assert_eq!(errors.get(Field::Password), ["first", "second"]);
        assert!(errors.get(Field::Address).is_empty());
        assert_eq!(errors.len(), 2);
        // declaration order, not insertion order
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![Field::Email, Field::Password]
        );
    }

    #[test]
    fn errors_serialize_as_camel_case_map() {
        let mut errors = FieldErrors::new();
        errors.add(Field::ConfirmPassword, "Passwords don't match");
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "confirmPassword": ["Passwords don't match"] })
        );
    }
}
