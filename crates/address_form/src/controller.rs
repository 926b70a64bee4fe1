use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::{
    AddressDraft, AddressDto, AddressField, DEFAULT_FOCUS_DELAY, FocusStep, FocusTask, FormError,
    LookupOpen, LookupReadiness, PostcodeResult, ValidationErrors, validate,
};

/// Result of a submit or cancel request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Every field passed; the payload is trimmed and normalized.
    Submitted(AddressDto),
    /// At least one field failed. Focus recovery targets `first_invalid`.
    Rejected { first_invalid: AddressField },
    Cancelled,
}

/// State of one address form: the draft, its errors, lookup readiness and the
/// pending focus task.
///
/// All operations are synchronous. The host feeds keystrokes in through
/// `set_field`, calls `submit`/`cancel`, and polls `poll_focus` on every tick.
#[derive(Debug, Clone)]
pub struct AddressFormController {
    draft: AddressDraft,
    errors: ValidationErrors,
    lookup: LookupReadiness,
    pending_focus: Option<FocusTask>,
    focus_delay: Duration,
}

impl Default for AddressFormController {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressFormController {
    pub fn new() -> Self {
        Self::with_focus_delay(DEFAULT_FOCUS_DELAY)
    }

    pub fn with_focus_delay(focus_delay: Duration) -> Self {
        Self {
            draft: AddressDraft::default(),
            errors: ValidationErrors::default(),
            lookup: LookupReadiness::default(),
            pending_focus: None,
            focus_delay,
        }
    }

    pub fn draft(&self) -> &AddressDraft {
        &self.draft
    }

    pub fn value(&self, field: AddressField) -> &str {
        self.draft.get(field)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error_message(&self, field: AddressField) -> Option<&'static str> {
        self.errors.message(field)
    }

    pub fn lookup_readiness(&self) -> LookupReadiness {
        self.lookup
    }

    /// Live write of one field. Normalizes, stores, and clears that field's error.
    pub fn set_field(&mut self, field: AddressField, raw: &str) {
        self.draft.set(field, raw);
        if self.errors.clear(field) {
            debug!(field = field.key(), "cleared field error on edit");
        }
    }

    pub fn set_field_by_key(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        let field = AddressField::from_key(key)?;
        self.set_field(field, raw);
        Ok(())
    }

    /// Replace the whole form with `initial` (or the empty draft).
    ///
    /// Errors and any pending focus task are dropped. Lookup readiness is kept,
    /// since it belongs to the widget rather than to the edited item.
    pub fn load_initial(&mut self, initial: Option<AddressDraft>) {
        self.draft = initial.map(AddressDraft::normalized).unwrap_or_default();
        self.errors = ValidationErrors::default();
        self.pending_focus = None;
        debug!(name = %self.draft.name, "loaded form state");
    }

    /// Validate the current draft without touching stored errors.
    pub fn validate(&self) -> ValidationErrors {
        validate(&self.draft)
    }

    pub fn submit(&mut self) -> FormOutcome {
        self.errors = validate(&self.draft);
        match self.errors.first() {
            Some(first_invalid) => {
                debug!(
                    errors = self.errors.len(),
                    first = first_invalid.key(),
                    "submit rejected"
                );
                self.pending_focus = Some(FocusTask::scroll_then_focus(
                    first_invalid,
                    self.focus_delay,
                ));
                FormOutcome::Rejected { first_invalid }
            }
            None => {
                let dto = self.draft.to_dto();
                info!(name = %dto.name, zipcode = %dto.zipcode, "address form submitted");
                FormOutcome::Submitted(dto)
            }
        }
    }

    pub fn cancel(&mut self) -> FormOutcome {
        self.pending_focus = None;
        debug!("address form cancelled");
        FormOutcome::Cancelled
    }

    /// One-shot readiness signal from the lookup widget.
    pub fn mark_lookup_ready(&mut self) -> bool {
        let changed = self.lookup.mark_loaded();
        if changed {
            debug!("postcode lookup ready");
        }
        changed
    }

    pub fn open_external_lookup(&self) -> LookupOpen {
        if self.lookup.is_ready() {
            LookupOpen::Open
        } else {
            debug!("postcode lookup requested before it was ready");
            LookupOpen::NotReady
        }
    }

    /// Apply the widget's completion payload and focus the detail address.
    pub fn complete_lookup(&mut self, result: &PostcodeResult) {
        self.draft.set(AddressField::Zipcode, &result.zonecode);
        self.draft.set(AddressField::Address1, result.address1());
        self.errors.clear(AddressField::Zipcode);
        self.errors.clear(AddressField::Address1);
        self.pending_focus = Some(FocusTask::next_frame(AddressField::Address2));
        debug!(zipcode = %self.draft.zipcode, "postcode lookup completed");
    }

    pub fn pending_focus(&self) -> Option<&FocusTask> {
        self.pending_focus.as_ref()
    }

    /// Step the pending focus task. The task is dropped once it finished.
    pub fn poll_focus(&mut self, now: Instant) -> Option<FocusStep> {
        let task = self.pending_focus.as_mut()?;
        let step = task.poll(now);
        if task.is_done() {
            self.pending_focus = None;
        }
        step
    }
}
