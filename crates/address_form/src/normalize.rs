//! Live input normalization.
//!
//! Applied on every write to the draft, before any validation runs.

use crate::AddressField;

/// Keep ASCII digits and hyphens, in their original order.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Keep ASCII digits only.
pub fn normalize_zipcode(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize `raw` for `field`. Free-text fields pass through unchanged.
pub fn normalize(field: AddressField, raw: &str) -> String {
    match field {
        AddressField::Phone => normalize_phone(raw),
        AddressField::Zipcode => normalize_zipcode(raw),
        AddressField::Name | AddressField::Address1 | AddressField::Address2 => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_keeps_digits_and_hyphens_in_order() {
        assert_eq!(normalize_phone("010 1234 5678"), "01012345678");
        assert_eq!(normalize_phone("(010)-12a34-5678!"), "010-1234-5678");
        assert_eq!(normalize_phone("--1-"), "--1-");
        assert_eq!(normalize_phone("전화 없음"), "");
    }

    #[test]
    fn phone_drops_non_ascii_digits() {
        // Fullwidth and Arabic-Indic digits are not accepted as phone digits.
        assert_eq!(normalize_phone("０１０٣-1"), "-1");
    }

    #[test]
    fn zipcode_keeps_only_digits() {
        assert_eq!(normalize_zipcode("12345-"), "12345");
        assert_eq!(normalize_zipcode(" 06-236 "), "06236");
        assert_eq!(normalize_zipcode("abc"), "");
    }

    #[test]
    fn free_text_fields_pass_through() {
        assert_eq!(normalize(AddressField::Name, "  김철수 "), "  김철수 ");
        assert_eq!(normalize(AddressField::Address2, "101동 1001호"), "101동 1001호");
        assert_eq!(normalize(AddressField::Zipcode, "1 2 3"), "123");
    }

    #[test]
    fn every_output_char_comes_from_the_input() {
        let samples = ["", "abc", "010-xx-99", "📦12-3", "  -  ", "１２-3"];
        for raw in samples {
            let phone = normalize_phone(raw);
            assert!(phone.chars().all(|c| c.is_ascii_digit() || c == '-'));
            let expected: String = raw
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '-')
                .collect();
            assert_eq!(phone, expected);

            let zip = normalize_zipcode(raw);
            assert!(zip.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
