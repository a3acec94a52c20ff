use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    action::{Consents, LinkChannel},
    error::Result,
    state::JourneyState,
};

/// Record of the (simulated) customer link dispatch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerLink {
    pub sent: bool,
    pub channels: Vec<LinkChannel>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// One journey owned by one agent/customer pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySession {
    pub id: String,
    pub state: JourneyState,
    pub customer_link: CustomerLink,
    pub consents: Consents,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JourneySession {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            state: JourneyState::default(),
            customer_link: CustomerLink::default(),
            consents: Consents::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_random_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// URL the customer opens to review and confirm the products
    pub fn customer_link_url(&self) -> String {
        format!(
            "https://ambit-portal.com/customer/confirm/{}",
            self.state.los_id.as_deref().unwrap_or_default()
        )
    }

    /// Back to the demo defaults, keeping the session id
    pub fn reset(&mut self) {
        self.state.reset_journey();
        self.customer_link = CustomerLink::default();
        self.consents = Consents::default();
    }
}

/// Trait for storing and retrieving journey sessions
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn save(&self, session: JourneySession) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<JourneySession>>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// In-memory implementation of SessionStorage. Sessions are lost on restart.
#[derive(Default)]
pub struct InMemorySessionStorage {
    sessions: Arc<DashMap<String, JourneySession>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn save(&self, mut session: JourneySession) -> Result<()> {
        session.updated_at = Utc::now();
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<JourneySession>> {
        Ok(self.sessions.get(id).map(|entry| entry.clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.remove(id);
        Ok(())
    }
}
