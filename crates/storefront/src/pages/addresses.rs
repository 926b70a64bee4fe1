use std::{sync::Arc, time::Duration};

use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::Line,
    widgets::Paragraph,
};
use tokio::sync::{Mutex, mpsc::UnboundedSender};
use tracing::debug;

use super::Page;
use crate::{
    action::Action,
    components::{AddressFormComponent, AddressListComponent, Component},
    services::{AddressApi, AddressId, AddressListController, BookCommand},
    tui::{Event, EventResponse, Frame},
};

pub const SAVED_MESSAGE: &str = "배송지를 저장했습니다.";
pub const SAVING_MESSAGE: &str = "저장 중입니다…";
const LIST_HINTS: &str =
    "a: 추가  e: 수정  d: 삭제  s: 기본설정  i: 프로필 주소 가져오기  r: 새로고침  q: 종료";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    List,
    Form,
}

/// Address book page: list on the left, form on the right.
///
/// Book mutations run on spawned tasks against the shared controller and come
/// back as `AddressBookChanged` plus `AddressSaved` or `Error`.
pub struct AddressesPage {
    book: Arc<Mutex<AddressListController>>,
    list: AddressListComponent,
    form: AddressFormComponent,
    editing: Option<AddressId>,
    /// A save is in flight; further submits are ignored until it settles.
    saving: bool,
    pane: Pane,
    status: Option<String>,
    action_tx: Option<UnboundedSender<Action>>,
}

impl AddressesPage {
    pub fn new(api: Arc<dyn AddressApi>, focus_delay: Duration) -> Self {
        let mut page = Self {
            book: Arc::new(Mutex::new(AddressListController::new(api))),
            list: AddressListComponent::new(),
            form: AddressFormComponent::new(focus_delay),
            editing: None,
            saving: false,
            pane: Pane::List,
            status: None,
            action_tx: None,
        };
        page.set_pane(Pane::List);
        page
    }

    pub fn editing(&self) -> Option<AddressId> {
        self.editing
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn list(&self) -> &AddressListComponent {
        &self.list
    }

    pub fn form(&self) -> &AddressFormComponent {
        &self.form
    }

    pub fn form_has_focus(&self) -> bool {
        self.pane == Pane::Form
    }

    fn set_pane(&mut self, pane: Pane) {
        self.pane = pane;
        self.list.set_active(pane == Pane::List);
        self.form.set_active(pane == Pane::Form);
    }

    /// Drop the edited item and go back to an empty "add" form.
    fn reset_form(&mut self) {
        self.editing = None;
        self.form.load(None);
        self.set_pane(Pane::List);
    }

    fn dispatch(&mut self, command: BookCommand) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        if command == BookCommand::Reload {
            let mut snapshot = self.list.book().clone();
            snapshot.loading = true;
            self.list.set_book(snapshot);
        }
        let saves = matches!(command, BookCommand::Add(_) | BookCommand::Update(..));
        let book = self.book.clone();
        tokio::spawn(async move {
            let mut book = book.lock().await;
            let result = book.execute(command).await;
            tx.send(Action::AddressBookChanged(book.state().clone())).ok();
            match result {
                Ok(()) if saves => {
                    tx.send(Action::AddressSaved).ok();
                }
                Ok(()) => {}
                Err(err) => {
                    tx.send(Action::Error(format!("요청을 처리하지 못했습니다: {err}")))
                        .ok();
                }
            }
        });
    }
}

impl Page for AddressesPage {
    fn name(&self) -> &str {
        "addresses"
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        tx.send(Action::ReloadAddresses).ok();
        self.action_tx = Some(tx);
        Ok(())
    }

    fn focused_component(&self) -> &'static str {
        match self.pane {
            Pane::List => self.list.name(),
            Pane::Form => self.form.name(),
        }
    }

    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        match self.pane {
            Pane::List => self.list.handle_events(event),
            Pane::Form => self.form.handle_events(event),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ReloadAddresses => self.dispatch(BookCommand::Reload),
            Action::SeedAddresses => self.dispatch(BookCommand::Seed),
            Action::NewAddress => {
                self.editing = None;
                self.form.load(None);
                self.set_pane(Pane::Form);
            }
            Action::EditAddress(id) => {
                if let Some(address) = self.list.book().find(id) {
                    let draft = address.to_draft();
                    debug!(id, "editing address");
                    self.editing = Some(id);
                    self.form.load(Some(draft));
                    self.set_pane(Pane::Form);
                }
            }
            Action::DeleteAddress(id) => {
                if self.editing == Some(id) {
                    self.reset_form();
                }
                self.dispatch(BookCommand::Remove(id));
            }
            Action::SetDefaultAddress(id) => self.dispatch(BookCommand::SetDefault(id)),
            Action::SubmitAddress(_) if self.saving => {
                debug!("save already in flight, ignoring submit");
                self.status = Some(SAVING_MESSAGE.to_string());
            }
            Action::SubmitAddress(dto) => {
                self.saving = true;
                let command = match self.editing {
                    Some(id) => BookCommand::Update(id, dto),
                    None => BookCommand::Add(dto),
                };
                self.dispatch(command);
            }
            Action::AddressSaved => {
                self.saving = false;
                self.reset_form();
                self.status = Some(SAVED_MESSAGE.to_string());
            }
            Action::FormCancelled => self.reset_form(),
            Action::AddressBookChanged(_) => {
                self.list.update(action)?;
            }
            Action::Status(message) => self.status = Some(message),
            Action::Error(message) => {
                self.saving = false;
                self.status = Some(message);
            }
            Action::Tick | Action::LookupReady | Action::LookupCompleted(_) => {
                return self.form.update(action);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [main, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let [list_area, form_area] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(main);

        self.list.draw(frame, list_area)?;
        self.form.draw(frame, form_area)?;

        let status = match &self.status {
            Some(message) => Line::from(format!(" {message}")).fg(Color::Yellow),
            None if self.pane == Pane::List => Line::from(format!(" {LIST_HINTS}")).fg(Color::DarkGray),
            None => Line::raw(""),
        };
        frame.render_widget(Paragraph::new(status), status_area);
        Ok(())
    }
}
