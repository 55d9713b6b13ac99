use crate::schemas::{NormalizedSignupInput, RawSignupInput};

/// International forms of the Iranian country code, checked in this order.
const INTERNATIONAL_PREFIXES: [&str; 2] = ["+98", "0098"];

/// Apply the validation-independent transforms to a raw submission.
///
/// Names, email, phone, date of birth and address are trimmed; the phone is
/// then canonicalized. Password fields are carried over untouched.
pub fn normalize(raw: &RawSignupInput) -> NormalizedSignupInput {
    NormalizedSignupInput {
        first_name: raw.first_name.trim().to_string(),
        last_name: raw.last_name.trim().to_string(),
        email: raw.email.trim().to_string(),
        phone: canonicalize_phone(&raw.phone),
        gender: raw.gender.clone(),
        password: raw.password.clone(),
        confirm_password: raw.confirm_password.clone(),
        date_of_birth: raw.date_of_birth.trim().to_string(),
        address: raw.address.trim().to_string(),
    }
}

/// Strip whitespace and hyphens, then rewrite `+98` / `0098` to a leading `0`.
///
/// The rewrite repeats while a prefix is still present, which keeps the
/// function idempotent: `+98098...` becomes `0098...` after one rewrite and
/// `0...` after the second, so `+980989123456789` canonicalizes to
/// `09123456789`.
pub fn canonicalize_phone(value: &str) -> String {
    let mut phone: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    while let Some(rest) = INTERNATIONAL_PREFIXES
        .iter()
        .find_map(|prefix| phone.strip_prefix(prefix))
    {
        phone = format!("0{rest}");
    }
    phone
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded_input() -> RawSignupInput {
        RawSignupInput {
            first_name: "  John ".into(),
            last_name: "\tDoe\n".into(),
            email: " john.doe@example.com ".into(),
            phone: " +98 912-345 6789 ".into(),
            gender: "male".into(),
            password: " Password1! ".into(),
            confirm_password: " Password1! ".into(),
            date_of_birth: " 2000-01-01 ".into(),
            address: "  123 Main Street, City, State  ".into(),
        }
    }

    #[test]
    fn accepted_phone_spellings_share_one_canonical_form() {
        for phone in [
            "09123456789",
            "+989123456789",
            "00989123456789",
            "0912 345 6789",
            "0912-345-6789",
        ] {
            assert_eq!(canonicalize_phone(phone), "09123456789", "input {phone:?}");
        }
    }

    #[test]
    fn unrelated_numbers_only_lose_separators() {
        assert_eq!(canonicalize_phone("1234567890"), "1234567890");
        assert_eq!(canonicalize_phone("+1 555-0100"), "+15550100");
        assert_eq!(canonicalize_phone(""), "");
    }

    #[test]
    fn trims_text_fields_but_not_passwords() {
        let normalized = normalize(&padded_input());
        assert_eq!(normalized.first_name, "John");
        assert_eq!(normalized.last_name, "Doe");
        assert_eq!(normalized.email, "john.doe@example.com");
        assert_eq!(normalized.phone, "09123456789");
        assert_eq!(normalized.date_of_birth, "2000-01-01");
        assert_eq!(normalized.address, "123 Main Street, City, State");
        assert_eq!(normalized.password, " Password1! ");
        assert_eq!(normalized.confirm_password, " Password1! ");
    }

    #[test]
    fn prefix_exposed_by_a_rewrite_is_rewritten_too() {
        assert_eq!(canonicalize_phone("+980989123456789"), "09123456789");
        assert_eq!(canonicalize_phone("+98 098 912-345-6789"), "09123456789");
        assert_eq!(
            canonicalize_phone(&canonicalize_phone("+980989123456789")),
            "09123456789"
        );
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let inputs = [
            padded_input(),
            RawSignupInput::default(),
            RawSignupInput {
                phone: "+98 0098 912 345 6789".into(),
                ..RawSignupInput::default()
            },
            RawSignupInput {
                phone: "+980989123456789".into(),
                ..RawSignupInput::default()
            },
        ];
        for raw in inputs {
            let once = normalize(&raw);
            let twice = normalize(&RawSignupInput::from(once.clone()));
            assert_eq!(once, twice);
        }
    }
}
