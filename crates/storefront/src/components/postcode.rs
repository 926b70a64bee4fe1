use std::sync::Arc;

use address_form::PostcodeResult;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use tui_input::{Input, InputRequest};

use super::popup::draw_popup_frame;
use crate::{
    action::Action,
    components::Component,
    services::PostcodeSearch,
    tui::{EventResponse, Frame},
};

/// Modal postcode search: query line on top, results below.
///
/// Enter searches when the query changed since the last search, otherwise it
/// completes the lookup with the highlighted result.
pub struct PostcodePopup {
    search: Arc<dyn PostcodeSearch>,
    action_tx: Option<UnboundedSender<Action>>,
    query: Input,
    searched: Option<String>,
    results: Vec<PostcodeResult>,
    state: ListState,
    searching: bool,
    error: Option<String>,
}

impl PostcodePopup {
    pub fn new(search: Arc<dyn PostcodeSearch>) -> Self {
        Self {
            search,
            action_tx: None,
            query: Input::default(),
            searched: None,
            results: Vec::new(),
            state: ListState::default(),
            searching: false,
            error: None,
        }
    }

    pub fn results(&self) -> &[PostcodeResult] {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    fn query_is_stale(&self) -> bool {
        self.searched.as_deref() != Some(self.query.value().trim())
    }

    fn start_search(&mut self) -> Action {
        let query = self.query.value().trim().to_string();
        if query.is_empty() {
            return Action::Update;
        }
        self.searched = Some(query.clone());
        self.searching = true;
        self.error = None;
        if let Some(tx) = self.action_tx.clone() {
            let search = self.search.clone();
            let query = query.clone();
            tokio::spawn(async move {
                let result = search.search(&query).await.map_err(|err| {
                    warn!(error = %err, "postcode search failed");
                    err.to_string()
                });
                tx.send(Action::PostcodeResults { query, result }).ok();
            });
        }
        Action::SearchPostcode(query)
    }

    fn move_selection(&mut self, forward: bool) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.state.select(Some(next));
    }
}

impl Component for PostcodePopup {
    fn name(&self) -> &'static str {
        "postcode"
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn popup_min_size(&self) -> Option<(u16, u16)> {
        Some((70, 20))
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let action = match key.code {
            KeyCode::Esc => Action::ClosePopup,
            KeyCode::Down => {
                self.move_selection(true);
                Action::Update
            }
            KeyCode::Up => {
                self.move_selection(false);
                Action::Update
            }
            KeyCode::Enter if self.query_is_stale() => self.start_search(),
            KeyCode::Enter => match self.state.selected().and_then(|i| self.results.get(i)) {
                Some(result) => Action::LookupCompleted(result.clone()),
                None => Action::Update,
            },
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            KeyCode::Char(c) => {
                self.query.handle(InputRequest::InsertChar(c));
                Action::Update
            }
            KeyCode::Backspace => {
                self.query.handle(InputRequest::DeletePrevChar);
                Action::Update
            }
            KeyCode::Left => {
                self.query.handle(InputRequest::GoToPrevChar);
                Action::Update
            }
            KeyCode::Right => {
                self.query.handle(InputRequest::GoToNextChar);
                Action::Update
            }
            // Modal: swallow everything else.
            _ => Action::Update,
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::PostcodeResults { query, result } = action {
            // Only the reply to the latest search counts.
            if self.searched.as_deref() != Some(query.as_str()) {
                debug!(%query, "dropping stale postcode results");
                return Ok(None);
            }
            self.searching = false;
            match result {
                Ok(results) => {
                    self.state.select((!results.is_empty()).then_some(0));
                    self.results = results;
                }
                Err(message) => {
                    self.results.clear();
                    self.state.select(None);
                    self.error = Some(message);
                }
            }
            return Ok(Some(Action::Update));
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let inner = draw_popup_frame(f, area, "우편번호 검색");
        let [query_area, status_area, results_area, hint_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let query_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" 도로명, 지번, 건물명 ");
        let query_inner = query_block.inner(query_area);
        f.render_widget(
            Paragraph::new(self.query.value()).block(query_block),
            query_area,
        );
        f.set_cursor_position((
            query_inner.x + (self.query.visual_cursor() as u16).min(query_inner.width),
            query_inner.y,
        ));

        let status = if self.searching {
            Line::from("검색 중…").fg(Color::Gray)
        } else if let Some(err) = &self.error {
            Line::from(err.as_str()).fg(Color::Red)
        } else if self.searched.is_some() && self.results.is_empty() {
            Line::from("검색 결과가 없습니다.").fg(Color::Gray)
        } else {
            Line::raw("")
        };
        f.render_widget(Paragraph::new(status), status_area);

        let items: Vec<ListItem> = self
            .results
            .iter()
            .map(|r| {
                ListItem::new(vec![
                    Line::from(format!("[{}] {}", r.zonecode, r.address1())),
                    Line::from(format!("      {}", r.address.as_deref().unwrap_or(""))).fg(Color::DarkGray),
                ])
            })
            .collect();
        f.render_stateful_widget(
            List::new(items).highlight_style(Style::default().bg(Color::DarkGray)),
            results_area,
            &mut self.state,
        );

        f.render_widget(
            Paragraph::new("Enter: 검색/선택   Up/Down: 이동   Esc: 닫기").fg(Color::DarkGray),
            hint_area,
        );
        Ok(())
    }
}
