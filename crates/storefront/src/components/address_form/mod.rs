//! Address form pane.
//!
//! Wraps an `AddressFormController` with terminal concerns: which field owns
//! the cursor, the scroll window and the single-line input editor.
//! Rendering lives in `render.rs`.

use std::time::{Duration, Instant};

use address_form::{
    AddressDraft, AddressField, AddressFormController, FocusStep, FormOutcome, LookupOpen,
    normalize,
};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use tracing::debug;
use tui_input::{Input, InputRequest};

use crate::{
    action::Action,
    components::Component,
    tui::{EventResponse, Frame},
};

mod render;

pub const LOOKUP_LOADING_MESSAGE: &str =
    "주소 검색을 아직 불러오는 중입니다. 잠시 후 다시 시도해주세요.";

/// Rows used by one field: label, value, inline error.
pub(crate) const ROWS_PER_FIELD: u16 = 3;
/// Rows reserved below the fields for the key hints.
pub(crate) const FOOTER_ROWS: u16 = 2;

pub struct AddressFormComponent {
    controller: AddressFormController,
    focused: AddressField,
    input: Input,
    scroll: usize,
    /// Field a pending `ScrollIntoView` moved the window to; wins over `focused`
    /// until the focus step lands.
    scroll_target: Option<AddressField>,
    last_inner_height: u16,
    editing: bool,
    active: bool,
}

impl AddressFormComponent {
    pub fn new(focus_delay: Duration) -> Self {
        Self {
            controller: AddressFormController::with_focus_delay(focus_delay),
            focused: AddressField::Name,
            input: Input::default(),
            scroll: 0,
            scroll_target: None,
            last_inner_height: 0,
            editing: false,
            active: false,
        }
    }

    pub fn controller(&self) -> &AddressFormController {
        &self.controller
    }

    pub fn focused(&self) -> AddressField {
        self.focused
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Route keyboard input to the form (or stop doing so).
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn title(&self) -> &'static str {
        if self.editing {
            "배송지 수정"
        } else {
            "배송지 추가"
        }
    }

    /// Start over with `initial`; `Some` means an existing address is edited.
    pub fn load(&mut self, initial: Option<AddressDraft>) {
        self.editing = initial.is_some();
        self.controller.load_initial(initial);
        self.scroll = 0;
        self.scroll_target = None;
        self.focus(AddressField::Name);
    }

    pub fn input_value(&self) -> &str {
        self.input.value()
    }

    pub(crate) fn visual_cursor(&self) -> usize {
        self.input.visual_cursor()
    }

    fn focus(&mut self, field: AddressField) {
        self.focused = field;
        self.scroll_target = None;
        self.input = Input::new(self.controller.value(field).to_string());
    }

    pub(crate) fn max_visible(inner_height: u16) -> usize {
        (inner_height.saturating_sub(FOOTER_ROWS) / ROWS_PER_FIELD).max(1) as usize
    }

    /// Index range of the fields shown for `inner_height`.
    pub(crate) fn visible_bounds(&self, inner_height: u16) -> (usize, usize) {
        let total = AddressField::ORDER.len();
        let start = self.scroll.min(total - 1);
        let end = (start + Self::max_visible(inner_height)).min(total);
        (start, end)
    }

    /// Move the window so `field` is inside it.
    pub(crate) fn ensure_visible(&mut self, field: AddressField, inner_height: u16) {
        let max_visible = Self::max_visible(inner_height);
        let idx = field.index();
        if idx < self.scroll {
            self.scroll = idx;
        } else if idx >= self.scroll + max_visible {
            self.scroll = idx + 1 - max_visible;
        }
    }

    /// Field the render pass keeps in view.
    pub(crate) fn anchor(&self) -> AddressField {
        self.scroll_target.unwrap_or(self.focused)
    }

    pub(crate) fn set_last_inner_height(&mut self, height: u16) {
        self.last_inner_height = height;
    }

    fn apply_focus_step(&mut self, step: FocusStep) {
        match step {
            FocusStep::ScrollIntoView(field) => {
                self.ensure_visible(field, self.last_inner_height);
                self.scroll_target = Some(field);
            }
            FocusStep::Focus(field) => self.focus(field),
        }
    }

    /// Step focus recovery. Returns whether anything changed.
    pub fn poll_focus(&mut self, now: Instant) -> bool {
        match self.controller.poll_focus(now) {
            Some(step) => {
                debug!(?step, "focus recovery");
                self.apply_focus_step(step);
                true
            }
            None => false,
        }
    }

    fn submit(&mut self) -> Action {
        match self.controller.submit() {
            FormOutcome::Submitted(dto) => Action::SubmitAddress(dto),
            FormOutcome::Rejected { first_invalid } => Action::Status(
                self.controller
                    .error_message(first_invalid)
                    .unwrap_or_default()
                    .to_string(),
            ),
            FormOutcome::Cancelled => Action::FormCancelled,
        }
    }

    /// Feed one editing request through the input and the controller.
    fn edit(&mut self, request: InputRequest) {
        if self.input.handle(request).is_none() {
            return;
        }
        let typed = self.input.value().to_string();
        self.controller.set_field(self.focused, &typed);

        let stored = self.controller.value(self.focused);
        if stored != typed {
            // Normalization dropped characters; keep the cursor after the same kept chars.
            let prefix: String = typed.chars().take(self.input.cursor()).collect();
            let cursor = normalize(self.focused, &prefix).chars().count();
            self.input = Input::new(stored.to_string());
            self.input.handle(InputRequest::SetCursor(cursor));
        }
    }

    /// Pull the focused field's value back into the editor after an external write.
    fn resync_input(&mut self) {
        let value = self.controller.value(self.focused);
        if value != self.input.value() {
            self.input = Input::new(value.to_string());
        }
    }
}

fn input_request(key: &KeyEvent) -> Option<InputRequest> {
    use InputRequest::*;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(DeleteLine),
        KeyCode::Char('w') if ctrl => Some(DeletePrevWord),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(InsertChar(c)),
        KeyCode::Backspace => Some(DeletePrevChar),
        KeyCode::Delete => Some(DeleteNextChar),
        KeyCode::Left => Some(GoToPrevChar),
        KeyCode::Right => Some(GoToNextChar),
        KeyCode::Home => Some(GoToStart),
        KeyCode::End => Some(GoToEnd),
        _ => None,
    }
}

impl Component for AddressFormComponent {
    fn name(&self) -> &'static str {
        "address_form"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        if !self.active {
            return Ok(None);
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Esc => {
                self.controller.cancel();
                Action::FormCancelled
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus(self.focused.next());
                Action::Update
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus(self.focused.prev());
                Action::Update
            }
            KeyCode::Char('f') if ctrl => match self.controller.open_external_lookup() {
                LookupOpen::Open => Action::OpenLookup,
                LookupOpen::NotReady => Action::Status(LOOKUP_LOADING_MESSAGE.to_string()),
            },
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Enter if self.focused.is_last() => self.submit(),
            KeyCode::Enter => {
                self.focus(self.focused.next());
                Action::Update
            }
            _ => match input_request(&key) {
                Some(request) => {
                    self.edit(request);
                    Action::Update
                }
                // Unhandled shortcuts (Ctrl-C, Ctrl-Z) go on to the app.
                None => return Ok(None),
            },
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if self.poll_focus(Instant::now()) {
                    return Ok(Some(Action::Update));
                }
            }
            Action::LookupReady => {
                self.controller.mark_lookup_ready();
            }
            Action::LookupCompleted(result) => {
                self.controller.complete_lookup(&result);
                self.resync_input();
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        render::render_address_form(self, f, area)
    }
}
