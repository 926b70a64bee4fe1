use std::sync::Arc;

use app::Application;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::{
    action::Action,
    components::{
        Component, PostcodePopup,
        popup::{centered_rect_fixed, render_backdrop},
    },
    config::Config,
    pages::{AddressesPage, Page},
    services::{AddressApi, HttpAddressApi, HttpPostcodeSearch, PostcodeSearch},
    tui::{Event, EventResponse, Frame, Tui},
};

pub struct StorefrontApp {
    pub config: Config,
    pub version: &'static str,
    pub page: Box<dyn Page>,
    pub popup: Option<Box<dyn Component>>,
    pub postcode: Option<Arc<dyn PostcodeSearch>>,
    pub should_quit: bool,
    pub should_suspend: bool,
}

impl Application for StorefrontApp {
    const APP_ID: &'static str = "storefront";
    // Full-screen TUI: log to file only.
    const CONSOLE_LOG: bool = false;
}

impl StorefrontApp {
    pub fn new(
        config: Config,
        api: Arc<dyn AddressApi>,
        postcode: Option<Arc<dyn PostcodeSearch>>,
        version: &'static str,
    ) -> Self {
        let page = AddressesPage::new(api, config.focus_delay());
        Self {
            config,
            version,
            page: Box::new(page),
            popup: None,
            postcode,
            should_quit: false,
            should_suspend: false,
        }
    }

    /// Wire the HTTP clients named in `config`.
    pub fn from_config(config: Config, version: &'static str) -> Result<Self> {
        let api: Arc<dyn AddressApi> = Arc::new(HttpAddressApi::new(&config.api)?);
        let postcode = match config.postcode.endpoint.as_deref() {
            Some(endpoint) => {
                let search = HttpPostcodeSearch::new(endpoint, &config.api)?;
                Some(Arc::new(search) as Arc<dyn PostcodeSearch>)
            }
            None => None,
        };
        Ok(Self::new(config, api, postcode, version))
    }

    pub fn popup_open(&self) -> bool {
        self.popup.is_some()
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let mut tui = Tui::new()?
            .tick_rate(self.config.tui.tick_rate)
            .frame_rate(self.config.tui.frame_rate);
        tui.enter()?;
        self.page.register_action_handler(action_tx.clone())?;
        self.spawn_lookup_probe(&action_tx);

        loop {
            if let Some(e) = tui.next().await {
                self.handle_event(e, &action_tx);
            }

            while let Ok(action) = action_rx.try_recv() {
                match action {
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        tui.draw(|f| {
                            if let Err(err) = self.render(f) {
                                action_tx
                                    .send(Action::Error(format!("Failed to draw: {err:?}")))
                                    .ok();
                            }
                        })?;
                    }
                    Action::Render => {
                        tui.draw(|f| {
                            if let Err(err) = self.render(f) {
                                action_tx
                                    .send(Action::Error(format!("Failed to draw: {err:?}")))
                                    .ok();
                            }
                        })?;
                    }
                    action => self.dispatch(action, &action_tx)?,
                }
            }

            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume).ok();
                tui = Tui::new()?
                    .tick_rate(self.config.tui.tick_rate)
                    .frame_rate(self.config.tui.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    /// The lookup becomes usable once its service answered.
    fn spawn_lookup_probe(&self, action_tx: &UnboundedSender<Action>) {
        let Some(search) = self.postcode.clone() else {
            info!("no postcode endpoint configured, lookup disabled");
            return;
        };
        let tx = action_tx.clone();
        tokio::spawn(async move {
            match search.probe().await {
                Ok(()) => {
                    tx.send(Action::LookupReady).ok();
                }
                Err(err) => warn!(error = %err, "postcode lookup unavailable"),
            }
        });
    }

    /// Route a terminal event: popup first, then the page, then global keys.
    pub fn handle_event(&mut self, event: Event, action_tx: &UnboundedSender<Action>) {
        let forward = |response: Option<EventResponse<Action>>| match response {
            Some(EventResponse::Continue(action)) => {
                action_tx.send(action).ok();
                false
            }
            Some(EventResponse::Stop(action)) => {
                action_tx.send(action).ok();
                true
            }
            None => false,
        };

        let mut stop_event_propagation = self
            .popup
            .as_mut()
            .and_then(|popup| popup.handle_events(event.clone()).ok())
            .map(&forward)
            .unwrap_or(false);
        if !stop_event_propagation && self.popup.is_none() {
            stop_event_propagation = self
                .page
                .handle_events(event.clone())
                .ok()
                .map(&forward)
                .unwrap_or(false);
        }
        if stop_event_propagation {
            return;
        }

        let action = match event {
            Event::Error => Action::Error("terminal input failed".into()),
            Event::Tick => Action::Tick,
            Event::Render => Action::Render,
            Event::Resize(x, y) => Action::Resize(x, y),
            Event::Key(key) if key.modifiers.contains(KeyModifiers::CONTROL) => match key.code {
                KeyCode::Char('c') => Action::Quit,
                KeyCode::Char('z') => Action::Suspend,
                _ => return,
            },
            _ => return,
        };
        action_tx.send(action).ok();
    }

    /// Apply one action to the shell, then hand it to the popup and the page.
    pub fn dispatch(&mut self, action: Action, action_tx: &UnboundedSender<Action>) -> Result<()> {
        match action {
            Action::Tick | Action::Render | Action::Update => {}
            Action::Error(ref message) => error!("{message}"),
            _ => debug!("{action}"),
        }
        match action {
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::OpenLookup => {
                self.open_lookup(action_tx)?;
                return Ok(());
            }
            Action::ClosePopup => {
                self.popup = None;
                return Ok(());
            }
            Action::LookupCompleted(_) => self.popup = None,
            _ => {}
        }

        if let Some(popup) = self.popup.as_mut() {
            if let Some(next) = popup.update(action.clone())? {
                action_tx.send(next).ok();
            }
        }
        // The page keeps receiving actions behind a popup.
        if let Some(next) = self.page.update(action)? {
            action_tx.send(next).ok();
        }
        Ok(())
    }

    fn open_lookup(&mut self, action_tx: &UnboundedSender<Action>) -> Result<()> {
        let Some(search) = self.postcode.clone() else {
            warn!("lookup requested without a postcode service");
            return Ok(());
        };
        let mut popup = PostcodePopup::new(search);
        popup.register_action_handler(action_tx.clone())?;
        self.popup = Some(Box::new(popup));
        Ok(())
    }

    pub fn render(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        let [main, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        self.page.draw(frame, main)?;
        if let Some(popup) = self.popup.as_mut() {
            render_backdrop(frame, main);
            let (min_w, min_h) = popup.popup_min_size().unwrap_or((60, 10));
            let dialog = centered_rect_fixed(main, min_w, min_h);
            popup.draw(frame, dialog)?;
        }

        let focused = match self.popup.as_deref() {
            Some(popup) => popup.name(),
            None => self.page.focused_component(),
        };
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(footer);
        let chip = Style::default().fg(Color::Black).bg(Color::Cyan);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {} ", Self::APP_ID), chip),
                Span::raw(format!(" {}:{} ", self.page.name(), focused)),
            ])),
            left,
        );
        frame.render_widget(
            Paragraph::new(format!("v{} ", self.version)).alignment(Alignment::Right),
            right,
        );
        Ok(())
    }
}
