use serde::{Deserialize, Serialize};

use crate::{AddressField, normalize};

/// In-progress values of the address form.
///
/// Values held by a controller are always normalized per field (see
/// `normalize.rs`). A draft built by hand may not be; `normalized()` fixes that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub address2: String,
}

impl AddressDraft {
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Name => &self.name,
            AddressField::Phone => &self.phone,
            AddressField::Zipcode => &self.zipcode,
            AddressField::Address1 => &self.address1,
            AddressField::Address2 => &self.address2,
        }
    }

    fn slot_mut(&mut self, field: AddressField) -> &mut String {
        match field {
            AddressField::Name => &mut self.name,
            AddressField::Phone => &mut self.phone,
            AddressField::Zipcode => &mut self.zipcode,
            AddressField::Address1 => &mut self.address1,
            AddressField::Address2 => &mut self.address2,
        }
    }

    /// Store `raw` for `field` after normalizing it.
    pub fn set(&mut self, field: AddressField, raw: &str) {
        *self.slot_mut(field) = normalize(field, raw);
    }

    /// Return the draft with phone and zipcode normalized.
    pub fn normalized(mut self) -> Self {
        for field in AddressField::ORDER {
            let current = std::mem::take(self.slot_mut(field));
            self.set(field, &current);
        }
        self
    }

    /// Build the submission payload: free text trimmed, phone/zipcode normalized.
    ///
    /// This does not validate; `AddressFormController::submit` only calls it once
    /// `validate` came back empty.
    pub fn to_dto(&self) -> AddressDto {
        AddressDto {
            name: self.name.trim().to_string(),
            phone: normalize(AddressField::Phone, &self.phone),
            zipcode: normalize(AddressField::Zipcode, &self.zipcode),
            address1: self.address1.trim().to_string(),
            address2: self.address2.trim().to_string(),
        }
    }
}

/// Validated address handed to the caller for persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDto {
    pub name: String,
    pub phone: String,
    pub zipcode: String,
    pub address1: String,
    pub address2: String,
}
