use color_eyre::Result;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    action::Action,
    tui::{Event, EventResponse, Frame},
};

mod addresses;

pub use addresses::AddressesPage;

/// A `Page` composes multiple `Component`s and exposes a lifecycle similar to the
/// `Component` trait but at the page level.
pub trait Page {
    fn name(&self) -> &str;

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        let _ = tx;
        Ok(())
    }

    /// Name of the component that currently receives keys, for the footer.
    fn focused_component(&self) -> &'static str {
        "root"
    }

    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        let _ = event;
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Draw the page using the provided `Frame` and `area`.
    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()>;
}
