//! Input masks
use formdef_core::MaskKind;

/// Keep only ASCII digits
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// `(DDD) DDD-DDDD` when exactly ten digits remain, otherwise the digits
/// unformatted.
pub fn phone_mask(input: &str) -> String {
    let digits = digits_only(input);
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        digits
    }
}

/// `DDDDD DDDDD...` once ten digits are present, otherwise the digits
/// unformatted.
pub fn generic_mask(input: &str) -> String {
    let digits = digits_only(input);
    if digits.len() >= 10 {
        format!("{} {}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}

pub fn apply_mask(kind: MaskKind, input: &str) -> String {
    match kind {
        MaskKind::Phone => phone_mask(input),
        MaskKind::Generic => generic_mask(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_phone_boundary_at_ten_digits() {
        assert_eq!(phone_mask("555123456"), "555123456");
        assert_eq!(phone_mask("5551234567"), "(555) 123-4567");
        assert_eq!(phone_mask("55512345678"), "55512345678");
    }

    #[test]
    fn test_phone_strips_punctuation() {
        assert_eq!(phone_mask("+1 (555) 123-45"), "155512345");
        assert_eq!(phone_mask("555-123-4567"), "(555) 123-4567");
        assert_eq!(phone_mask("abc"), "");
    }

    #[test]
    fn test_phone_mask_is_stable() {
        let once = phone_mask("555 123 4567");
        assert_eq!(phone_mask(&once), once);
    }

    #[test]
    fn test_generic_mask() {
        assert_eq!(generic_mask("12345-67890"), "12345 67890");
        assert_eq!(generic_mask("1234"), "1234");
        assert_eq!(generic_mask("123456789012"), "12345 6789012");
    }

    proptest! {
        #[test]
        fn prop_phone_mask_shape(s in "[ -~]{0,24}") {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            let masked = phone_mask(&s);
            if digits.len() == 10 {
                let re = regex::Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").unwrap();
                prop_assert!(re.is_match(&masked));
                prop_assert_eq!(digits_only(&masked), digits);
            } else {
                prop_assert_eq!(masked, digits);
            }
        }
    }
}
