use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    action::Action,
    components::Component,
    services::{AddressBookState, AddressId, StoredAddress},
    tui::{EventResponse, Frame},
};

pub const LOADING_MESSAGE: &str = "불러오는 중…";
pub const EMPTY_MESSAGE: &str = "등록된 배송지가 없습니다.";

/// Left pane: the stored addresses with the selection cursor.
#[derive(Default)]
pub struct AddressListComponent {
    book: AddressBookState,
    state: ListState,
    active: bool,
}

impl AddressListComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn book(&self) -> &AddressBookState {
        &self.book
    }

    /// Replace the snapshot, keeping the selection on the same id when possible.
    pub fn set_book(&mut self, book: AddressBookState) {
        let selected_id = self.selected().map(|a| a.id);
        self.book = book;
        let index = selected_id
            .and_then(|id| self.book.items.iter().position(|a| a.id == id))
            .or_else(|| {
                let len = self.book.items.len();
                (len > 0).then(|| self.state.selected().unwrap_or(0).min(len - 1))
            });
        self.state.select(index);
    }

    pub fn selected(&self) -> Option<&StoredAddress> {
        self.state.selected().and_then(|i| self.book.items.get(i))
    }

    fn selected_id(&self) -> Option<AddressId> {
        self.selected().map(|a| a.id)
    }

    fn select_next(&mut self) {
        let len = self.book.items.len();
        if len == 0 {
            return;
        }
        let next = self.state.selected().map_or(0, |i| (i + 1) % len);
        self.state.select(Some(next));
    }

    fn select_prev(&mut self) {
        let len = self.book.items.len();
        if len == 0 {
            return;
        }
        let prev = self.state.selected().map_or(0, |i| (i + len - 1) % len);
        self.state.select(Some(prev));
    }

    fn item(address: &StoredAddress) -> ListItem<'static> {
        let mut head = vec![Span::styled(
            address.receiver_name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(label) = address.label.as_deref().filter(|l| !l.is_empty()) {
            head.push(Span::raw(format!(" · {label}")));
        }
        if address.is_default {
            head.push(Span::raw(" "));
            head.push(Span::styled(" 기본 ", Style::default().fg(Color::Black).bg(Color::Yellow)));
        }
        ListItem::new(vec![
            Line::from(head),
            Line::from(format!("  {}", address.phone)).fg(Color::Gray),
            Line::from(format!(
                "  ({}) {} {}",
                address.zipcode, address.address1, address.address2
            ))
            .fg(Color::Gray),
        ])
    }
}

impl Component for AddressListComponent {
    fn name(&self) -> &'static str {
        "address_list"
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        if !self.active || key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Action::Update
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                Action::Update
            }
            KeyCode::Char('a') => Action::NewAddress,
            KeyCode::Char('e') | KeyCode::Enter => match self.selected_id() {
                Some(id) => Action::EditAddress(id),
                None => return Ok(None),
            },
            KeyCode::Char('d') | KeyCode::Delete => match self.selected_id() {
                Some(id) => Action::DeleteAddress(id),
                None => return Ok(None),
            },
            KeyCode::Char('s') => match self.selected() {
                Some(a) if a.is_default => Action::Status("이미 기본 배송지입니다.".into()),
                Some(a) => Action::SetDefaultAddress(a.id),
                None => return Ok(None),
            },
            KeyCode::Char('r') => Action::ReloadAddresses,
            KeyCode::Char('i') => Action::SeedAddresses,
            KeyCode::Char('q') => Action::Quit,
            _ => return Ok(None),
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::AddressBookChanged(book) = action {
            self.set_book(book);
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let border_style = if self.active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(format!(" 배송지 관리 ({}) ", self.book.items.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let mut notice: Vec<Line> = Vec::new();
        if self.book.loading {
            notice.push(Line::from(LOADING_MESSAGE).fg(Color::Gray));
        }
        if let Some(err) = &self.book.error {
            notice.push(Line::from(err.as_str()).fg(Color::Red));
        }
        if !self.book.loading && self.book.items.is_empty() {
            notice.push(Line::from(EMPTY_MESSAGE).fg(Color::Gray));
        }

        if !notice.is_empty() && self.book.items.is_empty() {
            f.render_widget(Paragraph::new(notice).block(block), area);
            return Ok(());
        }

        let inner = block.inner(area);
        f.render_widget(block, area);
        let notice_height = (notice.len() as u16).min(inner.height);
        if notice_height > 0 {
            f.render_widget(
                Paragraph::new(notice),
                Rect {
                    height: notice_height,
                    ..inner
                },
            );
        }
        let list_area = Rect {
            y: inner.y + notice_height,
            height: inner.height - notice_height,
            ..inner
        };
        let items: Vec<ListItem> = self.book.items.iter().map(Self::item).collect();
        let list = List::new(items)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▌");
        f.render_stateful_widget(list, list_area, &mut self.state);
        Ok(())
    }
}
