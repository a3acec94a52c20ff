use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{action::JourneyAction, error::Result, step::Step, storage::JourneySession};

/// Result of handling one action on a screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    /// Message to show to the agent or customer
    pub response: Option<String>,
    /// Where the journey should go next
    pub next_action: NextAction,
}

impl ScreenResult {
    pub fn new(response: Option<String>, next_action: NextAction) -> Self {
        Self {
            response,
            next_action,
        }
    }

    pub fn stay(response: impl Into<String>) -> Self {
        Self::new(Some(response.into()), NextAction::Stay)
    }

    pub fn go_to(step: Step) -> Self {
        Self::new(None, NextAction::GoTo(step))
    }
}

/// What should happen after a screen handled an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextAction {
    /// Remain on the current step and wait for more input
    Stay,
    /// Move to another step; must be a legal transition
    GoTo(Step),
    /// The journey is finished
    Complete,
}

/// One step of the journey. A screen mutates the session in response to an
/// action and tells the graph where to go next.
#[async_trait]
pub trait Screen: Send + Sync {
    fn step(&self) -> Step;

    async fn handle(&self, session: &mut JourneySession, action: JourneyAction)
    -> Result<ScreenResult>;
}
