//! Address form workflow for the storefront client.
//!
//! The crate is split the same way the form popup is split in the terminal host:
//! - `field.rs`      : `AddressField`, the five inputs in their fixed order
//! - `draft.rs`      : `AddressDraft` (editing state) and `AddressDto` (validated output)
//! - `normalize.rs`  : per-field input normalization applied while typing
//! - `validate.rs`   : pure `validate` returning `ValidationErrors`
//! - `focus.rs`      : two-stage focus recovery task stepped by the host
//! - `lookup.rs`     : postcode lookup readiness and completion payload
//! - `controller.rs` : `AddressFormController`, which ties the pieces together
//!
//! Nothing in here performs I/O. Persisting the produced `AddressDto` is the
//! caller's job.

mod controller;
mod draft;
mod error;
mod field;
mod focus;
mod lookup;
mod normalize;
mod validate;

pub use controller::{AddressFormController, FormOutcome};
pub use draft::{AddressDraft, AddressDto};
pub use error::FormError;
pub use field::AddressField;
pub use focus::{DEFAULT_FOCUS_DELAY, FocusStep, FocusTask};
pub use lookup::{LookupOpen, LookupReadiness, PostcodeResult};
pub use normalize::{normalize, normalize_phone, normalize_zipcode};
pub use validate::{
    FieldErrorKind, MIN_ADDRESS2_CHARS, MIN_NAME_CHARS, ValidationErrors, ZIPCODE_LEN,
    is_valid_phone, validate,
};
