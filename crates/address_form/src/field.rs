//! Field identity for the address form.
//!
//! `AddressField` is the key type used everywhere a field is referenced: the draft
//! accessors, the error map, focus recovery and the terminal renderer. The string
//! form (`key`) matches the wire names of the address API.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::FormError;

/// One of the five inputs of the address form.
///
/// Declaration order is the validation order and the focus-recovery order.
/// `Ord` follows it, so ordered collections keyed by field iterate front to back.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AddressField {
    Name,
    Phone,
    Zipcode,
    Address1,
    Address2,
}

impl AddressField {
    /// All fields in declaration order.
    pub const ORDER: [AddressField; 5] = [
        AddressField::Name,
        AddressField::Phone,
        AddressField::Zipcode,
        AddressField::Address1,
        AddressField::Address2,
    ];

    /// Wire / form key (`name`, `phone`, `zipcode`, `address1`, `address2`).
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Parse a form key. Unknown keys are rejected instead of silently ignored.
    pub fn from_key(key: &str) -> Result<Self, FormError> {
        key.parse()
            .map_err(|_| FormError::UnknownField(key.to_string()))
    }

    pub fn label(self) -> &'static str {
        match self {
            AddressField::Name => "수령인",
            AddressField::Phone => "전화번호",
            AddressField::Zipcode => "우편번호",
            AddressField::Address1 => "주소",
            AddressField::Address2 => "상세주소",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            AddressField::Name => "수령인",
            AddressField::Phone => "010-1234-5678",
            AddressField::Zipcode => "우편번호",
            AddressField::Address1 => "도로명/지번 주소",
            AddressField::Address2 => "동/호수 등 상세 주소",
        }
    }

    /// Position in `ORDER`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Next field, wrapping around after the last one.
    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    /// Previous field, wrapping around before the first one.
    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }

    pub fn is_last(self) -> bool {
        self.index() + 1 == Self::ORDER.len()
    }
}
