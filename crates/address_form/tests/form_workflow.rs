//! End-to-end form workflows as the terminal host drives them:
//! - typing with live normalization, then submitting
//! - rejected submit with two-stage focus recovery
//! - reloading the edited item

use std::time::{Duration, Instant};

use address_form::{
    AddressDraft, AddressDto, AddressField, AddressFormController, FieldErrorKind, FocusStep,
    FormOutcome,
};
use pretty_assertions::assert_eq;

fn type_all(form: &mut AddressFormController, values: [&str; 5]) {
    for (field, value) in AddressField::ORDER.into_iter().zip(values) {
        form.set_field(field, value);
    }
}

#[test]
fn typed_values_are_normalized_and_submitted() {
    let mut form = AddressFormController::new();
    type_all(
        &mut form,
        ["김철수", "010 1234 5678", "12345-", "서울시", "1동"],
    );

    assert_eq!(form.value(AddressField::Phone), "01012345678");
    assert_eq!(form.value(AddressField::Zipcode), "12345");

    assert_eq!(
        form.submit(),
        FormOutcome::Submitted(AddressDto {
            name: "김철수".into(),
            phone: "01012345678".into(),
            zipcode: "12345".into(),
            address1: "서울시".into(),
            address2: "1동".into(),
        })
    );
    assert!(form.errors().is_empty());
}

#[test]
fn empty_detail_address_is_rejected_with_focus_recovery() {
    let delay = Duration::from_millis(200);
    let mut form = AddressFormController::with_focus_delay(delay);
    type_all(&mut form, ["김철수", "010-1234-5678", "12345", "서울시", ""]);

    assert_eq!(
        form.submit(),
        FormOutcome::Rejected {
            first_invalid: AddressField::Address2
        }
    );
    let errors: Vec<_> = form.errors().iter().collect();
    assert_eq!(errors, vec![(AddressField::Address2, FieldErrorKind::Required)]);
    assert_eq!(
        form.error_message(AddressField::Address2),
        Some("상세주소를 입력해주세요.")
    );

    let start = Instant::now();
    assert_eq!(
        form.poll_focus(start),
        Some(FocusStep::ScrollIntoView(AddressField::Address2))
    );
    assert_eq!(form.poll_focus(start + Duration::from_millis(100)), None);
    assert_eq!(
        form.poll_focus(start + delay),
        Some(FocusStep::Focus(AddressField::Address2))
    );
    assert!(form.pending_focus().is_none());
}

#[test]
fn first_invalid_field_follows_declaration_order() {
    let mut form = AddressFormController::new();
    type_all(&mut form, ["김철수", "02-1234-5678", "123", "서울시", "1동"]);
    assert_eq!(
        form.submit(),
        FormOutcome::Rejected {
            first_invalid: AddressField::Phone
        }
    );
    assert_eq!(form.errors().get(AddressField::Phone), Some(FieldErrorKind::Format));
    assert_eq!(form.errors().get(AddressField::Zipcode), Some(FieldErrorKind::Length));

    // Fixing the zipcode last does not move the focus target.
    form.set_field(AddressField::Zipcode, "12345");
    assert_eq!(
        form.submit(),
        FormOutcome::Rejected {
            first_invalid: AddressField::Phone
        }
    );
}

#[test]
fn load_initial_is_idempotent() {
    let seed = AddressDraft {
        name: "홍길동".into(),
        phone: "010.9999.0000".into(),
        zipcode: "06236".into(),
        address1: "서울 강남구 테헤란로 152".into(),
        address2: "12층".into(),
    };

    let mut form = AddressFormController::new();
    form.submit();
    form.load_initial(Some(seed.clone()));
    let once = (form.draft().clone(), form.errors().clone());
    form.load_initial(Some(seed));
    let twice = (form.draft().clone(), form.errors().clone());

    assert_eq!(once, twice);
    assert!(form.errors().is_empty());
    assert!(form.pending_focus().is_none());
    assert_eq!(form.value(AddressField::Phone), "01099990000");

    form.load_initial(None);
    assert_eq!(form.draft(), &AddressDraft::default());
}

#[test]
fn phone_examples() {
    let mut form = AddressFormController::new();
    type_all(&mut form, ["김철수", "", "12345", "서울시", "1동"]);
    for (phone, ok) in [
        ("010-1234-5678", true),
        ("01012345678", true),
        ("01023456789", true),
        ("02-1234-5678", false),
    ] {
        form.set_field(AddressField::Phone, phone);
        let rejected = form.validate().contains(AddressField::Phone);
        assert_eq!(!rejected, ok, "{phone}");
    }
}
