pub mod address_book;
pub mod api;
pub mod postcode;

pub use address_book::{AddressBookState, AddressListController, BookCommand, LOAD_FAILED_MESSAGE};
pub use api::{AddressApi, AddressId, ApiError, HttpAddressApi, StoredAddress};
pub use postcode::{HttpPostcodeSearch, PostcodeSearch};
