//! Focus recovery after a rejected submit or a completed lookup.
//!
//! The host owns the clock. It polls the pending task once per tick and applies
//! whatever step comes back; the task never sleeps or spawns anything itself.

use std::time::{Duration, Instant};

use crate::AddressField;

/// Delay between scrolling a field into view and focusing it.
pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusStep {
    ScrollIntoView(AddressField),
    Focus(AddressField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Scroll,
    Settling { since: Instant },
    Focus,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTask {
    target: AddressField,
    delay: Duration,
    stage: Stage,
}

impl FocusTask {
    /// Scroll `target` into view on the first poll, focus it once `delay` elapsed.
    pub fn scroll_then_focus(target: AddressField, delay: Duration) -> Self {
        Self {
            target,
            delay,
            stage: Stage::Scroll,
        }
    }

    /// Focus `target` on the next poll, without scrolling.
    pub fn next_frame(target: AddressField) -> Self {
        Self {
            target,
            delay: Duration::ZERO,
            stage: Stage::Focus,
        }
    }

    pub fn target(&self) -> AddressField {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Advance the task. Returns `None` while settling and after completion.
    pub fn poll(&mut self, now: Instant) -> Option<FocusStep> {
        match self.stage {
            Stage::Scroll => {
                self.stage = Stage::Settling { since: now };
                Some(FocusStep::ScrollIntoView(self.target))
            }
            Stage::Settling { since } => {
                if now.saturating_duration_since(since) >= self.delay {
                    self.stage = Stage::Done;
                    Some(FocusStep::Focus(self.target))
                } else {
                    None
                }
            }
            Stage::Focus => {
                self.stage = Stage::Done;
                Some(FocusStep::Focus(self.target))
            }
            Stage::Done => None,
        }
    }
}
