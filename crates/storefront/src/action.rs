use address_form::{AddressDto, PostcodeResult};
use serde::Serialize;
use strum::Display;

use crate::services::{AddressBookState, AddressId};

#[derive(Debug, Clone, PartialEq, Serialize, Display)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Update,
    Error(String),
    /// One-line message for the page status bar
    Status(String),

    // Address book
    ReloadAddresses,
    SeedAddresses,
    NewAddress,
    EditAddress(AddressId),
    DeleteAddress(AddressId),
    SetDefaultAddress(AddressId),
    SubmitAddress(AddressDto),
    AddressSaved,
    FormCancelled,
    AddressBookChanged(AddressBookState),

    // Postcode lookup
    LookupReady,
    OpenLookup,
    ClosePopup,
    SearchPostcode(String),
    PostcodeResults {
        query: String,
        result: Result<Vec<PostcodeResult>, String>,
    },
    LookupCompleted(PostcodeResult),
}
