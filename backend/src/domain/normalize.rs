//! Normalizers for identifying fields.
//!
//! Uniqueness checks only make sense over canonical values: a CPF typed with
//! punctuation and one typed bare must collide, and `Foo@Bar.com` must match
//! `foo@bar.com`. Each function here is total and deterministic: it returns
//! the cleaned value, or `None` when the input does not carry a usable value,
//! and callers use `None` to skip the corresponding uniqueness check.

/// Canonicalise a CPF (Brazilian taxpayer number) to its 11 digits.
///
/// Strips every non-digit character; anything that does not leave exactly
/// 11 digits is not a CPF and yields `None`.
///
/// # Examples
/// ```
/// use vetdesk::domain::normalize::normalize_cpf;
///
/// assert_eq!(normalize_cpf("529.982.247-25"), Some("52998224725".into()));
/// assert_eq!(normalize_cpf("12345"), None);
/// ```
pub fn normalize_cpf(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    (digits.len() == 11).then_some(digits)
}

/// Canonicalise an email address.
///
/// Trims surrounding whitespace and lowercases, then checks the permissive
/// `local@domain.tld` shape: exactly one `@`, a non-empty local part, and a
/// domain containing at least one dot with non-empty labels around it. No
/// whitespace anywhere.
pub fn normalize_email(raw: &str) -> Option<String> {
    let cleaned = raw.trim().to_lowercase();
    is_email_shaped(&cleaned).then_some(cleaned)
}

fn is_email_shaped(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if value.contains(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Canonicalise a free-text record sequence for lookups.
///
/// Trims whitespace and uppercases; there is no length or shape constraint.
/// Inputs that are empty after trimming carry no value.
pub fn normalize_sequence(raw: &str) -> Option<String> {
    let cleaned = raw.trim().to_uppercase();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Canonicalise a contact phone number to bare digits.
///
/// Accepts common formatting (spaces, dashes, parentheses, a leading `+`)
/// and requires 8 to 15 digits once stripped.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    ((8..=15).contains(&digits.len())).then_some(digits)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::{normalize_cpf, normalize_email, normalize_phone, normalize_sequence};

    #[rstest]
    #[case("529.982.247-25", Some("52998224725"))]
    #[case("52998224725", Some("52998224725"))]
    #[case(" 529 982 247 25 ", Some("52998224725"))]
    #[case("529.982.247-2", None)]
    #[case("529.982.247-250", None)]
    #[case("", None)]
    #[case("abc", None)]
    fn cpf_requires_exactly_eleven_digits(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_cpf(raw), expected.map(String::from));
    }

    #[rstest]
    #[case("  FERNANDA@Example.COM ", Some("fernanda@example.com"))]
    #[case("a@b.co", Some("a@b.co"))]
    #[case("first.last@sub.domain.org", Some("first.last@sub.domain.org"))]
    #[case("missing-at.example.com", None)]
    #[case("no-tld@example", None)]
    #[case("two@@example.com", None)]
    #[case("spaced name@example.com", None)]
    #[case("@example.com", None)]
    #[case("user@.com", None)]
    #[case("user@domain.", None)]
    #[case("", None)]
    fn email_is_trimmed_lowercased_and_shape_checked(
        #[case] raw: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(normalize_email(raw), expected.map(String::from));
    }

    #[rstest]
    #[case("  vd-102 ", Some("VD-102"))]
    #[case("7", Some("7"))]
    #[case("   ", None)]
    #[case("", None)]
    fn sequence_is_trimmed_and_uppercased(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_sequence(raw), expected.map(String::from));
    }

    #[rstest]
    #[case("(11) 98888-7777", Some("11988887777"))]
    #[case("+55 11 98888-7777", Some("5511988887777"))]
    #[case("12345678", Some("12345678"))]
    #[case("1234567", None)]
    #[case("phone", None)]
    fn phone_strips_formatting_and_bounds_length(
        #[case] raw: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(normalize_phone(raw), expected.map(String::from));
    }
}
