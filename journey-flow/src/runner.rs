//! JourneyRunner: load a session, apply exactly **one** action, save it back.
//!
//! An HTTP handler usually wants one action per request and the session saved
//! for the next roundtrip; the runner wraps that load → execute → save
//! sequence. Use [`JourneyGraph::execute_session`] directly when several
//! actions should be applied before a single save.
//!
//! Calls for the same session id are serialised: a screen that sleeps (link
//! dispatch, OTP check) holds the session until its result is saved, so a
//! concurrent reset or action sees that result instead of being overwritten
//! by it.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    action::JourneyAction,
    error::{JourneyError, Result},
    graph::{ExecutionResult, JourneyGraph},
    step::Step,
    storage::{JourneySession, SessionStorage},
};

#[derive(Clone)]
pub struct JourneyRunner {
    graph: Arc<JourneyGraph>,
    storage: Arc<dyn SessionStorage>,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl JourneyRunner {
    pub fn new(graph: Arc<JourneyGraph>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            graph,
            storage,
            locks: Arc::new(DashMap::new()),
        }
    }

    pub fn graph(&self) -> &JourneyGraph {
        &self.graph
    }

    async fn lock(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Creates and stores a new session with the default state
    pub async fn start(&self) -> Result<JourneySession> {
        let session = JourneySession::with_random_id();
        self.storage.save(session.clone()).await?;
        Ok(session)
    }

    pub async fn load(&self, session_id: &str) -> Result<JourneySession> {
        self.storage
            .get(session_id)
            .await?
            .ok_or_else(|| JourneyError::SessionNotFound(session_id.to_string()))
    }

    /// Applies one action and persists the session. Nothing is saved when the
    /// action fails.
    pub async fn run(
        &self,
        session_id: &str,
        action: JourneyAction,
    ) -> Result<(ExecutionResult, JourneySession)> {
        let _guard = self.lock(session_id).await;
        let mut session = self.load(session_id).await?;
        let result = self.graph.execute_session(&mut session, action).await?;
        self.storage.save(session.clone()).await?;
        Ok((result, session))
    }

    /// Guarded step change, for clients that navigate by step index
    pub async fn jump(&self, session_id: &str, step_index: u8) -> Result<JourneySession> {
        let to = Step::try_from(step_index)?;
        let _guard = self.lock(session_id).await;
        let mut session = self.load(session_id).await?;
        self.graph.jump(&mut session, to)?;
        self.storage.save(session.clone()).await?;
        Ok(session)
    }

    pub async fn reset(&self, session_id: &str) -> Result<JourneySession> {
        let (_, session) = self.run(session_id, JourneyAction::Reset).await?;
        Ok(session)
    }

    /// Deletes the session once any in-flight call on it has finished
    pub async fn discard(&self, session_id: &str) -> Result<()> {
        let guard = self.lock(session_id).await;
        let outcome = match self.load(session_id).await {
            Ok(_) => self.storage.delete(session_id).await,
            Err(e) => Err(e),
        };
        drop(guard);
        self.locks.remove(session_id);
        outcome
    }
}
