use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    action::Action,
    tui::{Event, EventResponse, Frame},
};

pub mod address_form;
pub mod address_list;
pub mod popup;
pub mod postcode;

pub use address_form::AddressFormComponent;
pub use address_list::AddressListComponent;
pub use postcode::PostcodePopup;

/// `Component` is a trait that represents a visual and interactive element of the user interface.
///
/// Implementors of this trait can be registered with the main application loop and will be able to
/// receive events, update state, and be rendered on the screen.
pub trait Component {
    fn name(&self) -> &'static str;

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        let _ = tx;
        Ok(())
    }

    /// Minimum dialog size when shown as a popup.
    fn popup_min_size(&self) -> Option<(u16, u16)> {
        None
    }

    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        match event {
            Event::Key(key_event) => self.handle_key_events(key_event),
            _ => Ok(None),
        }
    }

    fn handle_key_events(&mut self, _key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}
