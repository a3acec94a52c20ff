use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    action::JourneyAction,
    error::{JourneyError, Result},
    screen::{NextAction, Screen},
    step::Step,
    storage::JourneySession,
};

/// Type alias for transition guard functions
pub type TransitionGuard = Arc<dyn Fn(&JourneySession) -> bool + Send + Sync>;

/// Side effect applied to the session whenever its edge is taken
pub type TransitionEffect = Arc<dyn Fn(&mut JourneySession) + Send + Sync>;

/// A legal move between two steps
#[derive(Clone)]
pub struct Transition {
    pub from: Step,
    pub to: Step,
    pub guard: Option<TransitionGuard>,
    pub effect: Option<TransitionEffect>,
}

impl Transition {
    fn permits(&self, session: &JourneySession) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard(session))
    }
}

/// Screens plus the table of legal transitions between them.
///
/// Every step change requested by a screen is checked against the table.
/// Anything not listed, or whose guard fails, is rejected and the session is
/// left exactly as it was before the action.
pub struct JourneyGraph {
    pub id: String,
    screens: HashMap<Step, Arc<dyn Screen>>,
    transitions: Vec<Transition>,
}

impl JourneyGraph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            screens: HashMap::new(),
            transitions: Vec::new(),
        }
    }

    /// Whether `from -> to` is listed and its guard passes for `session`
    pub fn is_allowed(&self, from: Step, to: Step, session: &JourneySession) -> bool {
        self.find_transition(from, to, session).is_some()
    }

    fn find_transition(
        &self,
        from: Step,
        to: Step,
        session: &JourneySession,
    ) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.to == to && t.permits(session))
    }

    /// Takes a permitted edge: runs its effect, then moves the step
    fn take(&self, transition: &Transition, session: &mut JourneySession) {
        if let Some(effect) = &transition.effect {
            effect(session);
        }
        session.state.set_current_step(transition.to);
        debug!(
            graph = %self.id,
            session_id = %session.id,
            from = %transition.from,
            to = %transition.to,
            "Transition"
        );
    }

    /// Steps reachable from the session's current step right now
    pub fn allowed_transitions(&self, session: &JourneySession) -> Vec<Step> {
        let from = session.state.current_step;
        let mut targets: Vec<Step> = self
            .transitions
            .iter()
            .filter(|t| t.from == from && t.permits(session))
            .map(|t| t.to)
            .collect();
        targets.sort();
        targets.dedup();
        targets
    }

    pub fn get_screen(&self, step: Step) -> Option<Arc<dyn Screen>> {
        self.screens.get(&step).cloned()
    }

    /// Apply one action to the session's current screen.
    ///
    /// The screen works on a draft copy; the draft replaces the session only
    /// when the requested transition is legal.
    pub async fn execute_session(
        &self,
        session: &mut JourneySession,
        action: JourneyAction,
    ) -> Result<ExecutionResult> {
        let from = session.state.current_step;

        if matches!(action, JourneyAction::Reset) {
            info!(graph = %self.id, session_id = %session.id, from = %from, "Resetting journey");
            session.reset();
            return Ok(ExecutionResult {
                response: Some("Journey reset".to_string()),
                status: ExecutionStatus::WaitingForInput,
                step: session.state.current_step,
            });
        }

        let screen = self
            .get_screen(from)
            .ok_or(JourneyError::ScreenNotFound(from))?;

        let action_name = action.name();
        let mut draft = session.clone();
        let result = screen.handle(&mut draft, action).await?;

        let status = match result.next_action {
            NextAction::Stay => ExecutionStatus::WaitingForInput,
            NextAction::GoTo(to) => {
                let Some(transition) = self.find_transition(from, to, &draft) else {
                    warn!(
                        graph = %self.id,
                        session_id = %session.id,
                        from = %from,
                        to = %to,
                        action = action_name,
                        "Rejected illegal transition"
                    );
                    return Err(JourneyError::IllegalTransition { from, to });
                };
                self.take(transition, &mut draft);
                if to == Step::Success {
                    ExecutionStatus::Completed
                } else {
                    ExecutionStatus::WaitingForInput
                }
            }
            NextAction::Complete => ExecutionStatus::Completed,
        };

        *session = draft;
        Ok(ExecutionResult {
            response: result.response,
            status,
            step: session.state.current_step,
        })
    }

    /// Move directly to `to`, if the table allows it from the current step.
    /// The edge's effect runs exactly as it does for a screen-initiated move.
    pub fn jump(&self, session: &mut JourneySession, to: Step) -> Result<()> {
        let from = session.state.current_step;
        if from == to {
            return Ok(());
        }
        let transition = self
            .find_transition(from, to, session)
            .ok_or(JourneyError::IllegalTransition { from, to })?;
        self.take(transition, session);
        Ok(())
    }
}

/// Builder for creating journey graphs
pub struct JourneyGraphBuilder {
    graph: JourneyGraph,
}

impl JourneyGraphBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            graph: JourneyGraph::new(id),
        }
    }

    pub fn add_screen(mut self, screen: Arc<dyn Screen>) -> Self {
        self.graph.screens.insert(screen.step(), screen);
        self
    }

    pub fn add_edge(mut self, from: Step, to: Step) -> Self {
        self.graph.transitions.push(Transition {
            from,
            to,
            guard: None,
            effect: None,
        });
        self
    }

    /// Unguarded edge that also mutates the session when taken
    pub fn add_edge_with_effect<F>(mut self, from: Step, to: Step, effect: F) -> Self
    where
        F: Fn(&mut JourneySession) + Send + Sync + 'static,
    {
        self.graph.transitions.push(Transition {
            from,
            to,
            guard: None,
            effect: Some(Arc::new(effect)),
        });
        self
    }

    pub fn add_conditional_edge<F>(mut self, from: Step, to: Step, guard: F) -> Self
    where
        F: Fn(&JourneySession) -> bool + Send + Sync + 'static,
    {
        self.graph.transitions.push(Transition {
            from,
            to,
            guard: Some(Arc::new(guard)),
            effect: None,
        });
        self
    }

    pub fn build(self) -> JourneyGraph {
        self.graph
    }
}

/// Outcome of one action
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub response: Option<String>,
    pub status: ExecutionStatus,
    /// Step the session is on after the action
    pub step: Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Waiting for the next action on the current step
    WaitingForInput,
    /// The journey reached its final screen
    Completed,
}
