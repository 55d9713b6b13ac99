use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::Field;

// Request schema: every field is a plain string as typed; missing keys read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSignupInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub confirm_password: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub date_of_birth: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub address: String,
}

// An untouched form control may be sent as `null`; it reads the same as an empty one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The same record after trimming and phone canonicalization.
///
/// Only `validation::normalize` produces one from user input, so holding a
/// value of this type means the transforms have already been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSignupInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub password: String,
    pub confirm_password: String,
    pub date_of_birth: String,
    pub address: String,
}

impl NormalizedSignupInput {
    /// Value currently held by `field`.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Gender => &self.gender,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
            Field::DateOfBirth => &self.date_of_birth,
            Field::Address => &self.address,
        }
    }
}

impl From<NormalizedSignupInput> for RawSignupInput {
    fn from(input: NormalizedSignupInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            gender: input.gender,
            password: input.password,
            confirm_password: input.confirm_password,
            date_of_birth: input.date_of_birth,
            address: input.address,
        }
    }
}

// Response schema: the accepted account as echoed back, credentials left out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponseSchema {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub date_of_birth: String,
    pub address: String,
}

impl From<&NormalizedSignupInput> for SignupResponseSchema {
    fn from(input: &NormalizedSignupInput) -> Self {
        Self {
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            gender: input.gender.clone(),
            date_of_birth: input.date_of_birth.clone(),
            address: input.address.clone(),
        }
    }
}
