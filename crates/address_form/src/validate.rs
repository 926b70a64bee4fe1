//! Whole-form validation applied at submission.
//!
//! `validate` is pure: it reads a draft and returns a fresh `ValidationErrors`.
//! Per-field clearing while the user edits is the controller's business.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::{AddressDraft, AddressField, normalize_phone, normalize_zipcode};

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_ADDRESS2_CHARS: usize = 2;
pub const ZIPCODE_LEN: usize = 5;

lazy_static! {
    // 01x mobile numbers with optional hyphens between the groups.
    static ref MOBILE_RE: Regex = Regex::new(r"^01[0-9]-?[0-9]{3,4}-?[0-9]{4}$").unwrap();
    static ref BARE_DIGITS_RE: Regex = Regex::new(r"^[0-9]{10,11}$").unwrap();
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    TooShort,
    Format,
    Length,
}

impl FieldErrorKind {
    /// Inline message shown next to `field`.
    pub fn message(self, field: AddressField) -> &'static str {
        use AddressField::*;
        use FieldErrorKind::*;
        match (field, self) {
            (Name, Required) => "수령인을 입력해주세요.",
            (Name, TooShort) => "수령인은 2자 이상 입력하세요.",
            (Phone, Required) => "전화번호를 입력해주세요.",
            (Phone, Format) => "전화번호 형식을 확인하세요. 예: 010-1234-5678",
            (Zipcode, Required) => "우편번호를 입력해주세요.",
            (Zipcode, Length) => "우편번호 5자리를 입력하세요.",
            (Address1, Required) => "주소를 입력해주세요.",
            (Address2, Required) => "상세주소를 입력해주세요.",
            (Address2, TooShort) => "상세주소를 2자 이상 입력하세요.",
            _ => "입력값을 확인하세요.",
        }
    }
}

/// Field → error map. A missing key means the field is currently valid.
///
/// Iteration follows field order, so `first()` is the field focus recovery
/// should land on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<AddressField, FieldErrorKind>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: AddressField) -> Option<FieldErrorKind> {
        self.errors.get(&field).copied()
    }

    pub fn contains(&self, field: AddressField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn message(&self, field: AddressField) -> Option<&'static str> {
        self.get(field).map(|kind| kind.message(field))
    }

    /// First invalid field in declaration order.
    pub fn first(&self) -> Option<AddressField> {
        self.errors.keys().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AddressField, FieldErrorKind)> + '_ {
        self.errors.iter().map(|(field, kind)| (*field, *kind))
    }

    pub(crate) fn insert(&mut self, field: AddressField, kind: FieldErrorKind) {
        self.errors.insert(field, kind);
    }

    /// Drop the error of a single field; returns whether one was present.
    pub(crate) fn clear(&mut self, field: AddressField) -> bool {
        self.errors.remove(&field).is_some()
    }
}

/// Serialized as `{ "<key>": "<message>" }` in field order.
impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.iter()
                .map(|(field, kind)| (field.key(), kind.message(field))),
        )
    }
}

/// Phone acceptance on an already normalized value.
pub fn is_valid_phone(normalized: &str) -> bool {
    MOBILE_RE.is_match(normalized) || BARE_DIGITS_RE.is_match(normalized)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Validate every field of `draft` in declaration order.
pub fn validate(draft: &AddressDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.insert(AddressField::Name, FieldErrorKind::Required);
    } else if char_len(name) < MIN_NAME_CHARS {
        errors.insert(AddressField::Name, FieldErrorKind::TooShort);
    }

    let phone = normalize_phone(&draft.phone);
    if phone.is_empty() {
        errors.insert(AddressField::Phone, FieldErrorKind::Required);
    } else if !is_valid_phone(&phone) {
        errors.insert(AddressField::Phone, FieldErrorKind::Format);
    }

    let zipcode = normalize_zipcode(&draft.zipcode);
    if zipcode.is_empty() {
        errors.insert(AddressField::Zipcode, FieldErrorKind::Required);
    } else if zipcode.len() != ZIPCODE_LEN {
        errors.insert(AddressField::Zipcode, FieldErrorKind::Length);
    }

    if draft.address1.trim().is_empty() {
        errors.insert(AddressField::Address1, FieldErrorKind::Required);
    }

    let address2 = draft.address2.trim();
    if address2.is_empty() {
        errors.insert(AddressField::Address2, FieldErrorKind::Required);
    } else if char_len(address2) < MIN_ADDRESS2_CHARS {
        errors.insert(AddressField::Address2, FieldErrorKind::TooShort);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_draft() -> AddressDraft {
        AddressDraft {
            name: "김철수".into(),
            phone: "010-1234-5678".into(),
            zipcode: "12345".into(),
            address1: "서울시".into(),
            address2: "1동".into(),
        }
    }

    fn with(field: AddressField, value: &str) -> AddressDraft {
        let mut draft = valid_draft();
        match field {
            AddressField::Name => draft.name = value.into(),
            AddressField::Phone => draft.phone = value.into(),
            AddressField::Zipcode => draft.zipcode = value.into(),
            AddressField::Address1 => draft.address1 = value.into(),
            AddressField::Address2 => draft.address2 = value.into(),
        }
        draft
    }

    #[test]
    fn valid_draft_has_no_errors() {
        assert!(validate(&valid_draft()).is_empty());
    }

    #[test]
    fn accepted_phone_numbers() {
        for phone in [
            "010-1234-5678",
            "01012345678",
            "01023456789",
            "011-123-4567",
            "0212345678",
            "010 1234 5678",
        ] {
            let errors = validate(&with(AddressField::Phone, phone));
            assert_eq!(errors.get(AddressField::Phone), None, "{phone}");
        }
    }

    #[test]
    fn rejected_phone_numbers() {
        for phone in ["02-1234-5678", "010-12-5678", "123456789", "010--1234-5678", "-"] {
            let errors = validate(&with(AddressField::Phone, phone));
            assert_eq!(
                errors.get(AddressField::Phone),
                Some(FieldErrorKind::Format),
                "{phone}"
            );
        }
        let errors = validate(&with(AddressField::Phone, "없음"));
        assert_eq!(errors.get(AddressField::Phone), Some(FieldErrorKind::Required));
    }

    #[test]
    fn zipcode_must_have_exactly_five_digits() {
        assert_eq!(
            validate(&with(AddressField::Zipcode, "1234")).get(AddressField::Zipcode),
            Some(FieldErrorKind::Length)
        );
        assert_eq!(
            validate(&with(AddressField::Zipcode, "12345")).get(AddressField::Zipcode),
            None
        );
        assert_eq!(
            validate(&with(AddressField::Zipcode, "123456")).get(AddressField::Zipcode),
            Some(FieldErrorKind::Length)
        );
        assert_eq!(
            validate(&with(AddressField::Zipcode, "-")).get(AddressField::Zipcode),
            Some(FieldErrorKind::Required)
        );
    }

    #[test]
    fn name_rules() {
        for blank in ["", "   ", "\t\n"] {
            assert_eq!(
                validate(&with(AddressField::Name, blank)).get(AddressField::Name),
                Some(FieldErrorKind::Required)
            );
        }
        assert_eq!(
            validate(&with(AddressField::Name, "a")).get(AddressField::Name),
            Some(FieldErrorKind::TooShort)
        );
        assert_eq!(
            validate(&with(AddressField::Name, " 김 ")).get(AddressField::Name),
            Some(FieldErrorKind::TooShort)
        );
        assert_eq!(
            validate(&with(AddressField::Name, "김철")).get(AddressField::Name),
            None
        );
    }

    #[test]
    fn address_rules() {
        assert_eq!(
            validate(&with(AddressField::Address1, "  ")).get(AddressField::Address1),
            Some(FieldErrorKind::Required)
        );
        assert_eq!(
            validate(&with(AddressField::Address2, "")).get(AddressField::Address2),
            Some(FieldErrorKind::Required)
        );
        assert_eq!(
            validate(&with(AddressField::Address2, "1")).get(AddressField::Address2),
            Some(FieldErrorKind::TooShort)
        );
    }

    #[test]
    fn empty_draft_fails_everywhere_in_order() {
        let errors = validate(&AddressDraft::default());
        let fields: Vec<_> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, AddressField::ORDER.to_vec());
        assert_eq!(errors.first(), Some(AddressField::Name));
        assert_eq!(errors.message(AddressField::Zipcode), Some("우편번호를 입력해주세요."));
    }

    #[test]
    fn serializes_messages_by_key() {
        let errors = validate(&with(AddressField::Address2, ""));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "address2": "상세주소를 입력해주세요." })
        );
    }
}
