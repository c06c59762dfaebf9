use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::PersonaId,
    protocol::{Persona, PersonaDraft},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

/// Backend address compiled in as the default; overridable through the
/// console app's settings layer.
pub const DEFAULT_BASE_URL: &str =
    "http://localhost:9090/personas-backend-java/webservice/personas";

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Mutating operations whose failures are swallowed after being reported on
/// the event channel. `list` is absent: its error goes back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Create,
    Update,
    Delete,
}

impl StoreOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreOperation::Create => "create",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        }
    }
}

/// Side-channel notifications emitted by the store. Failures of mutating
/// operations surface here (and in the log) rather than as return values.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    PersonaCreated(Persona),
    PersonaDeleted(PersonaId),
    RequestFailed {
        operation: StoreOperation,
        detail: String,
    },
}

/// Seam between the controller and the store; lets UI-level code run against
/// a stub backend in tests.
#[async_trait]
pub trait RosterHandle: Send + Sync {
    /// Fetches the full collection in backend order. Never touches the local
    /// cache; the error goes to the caller, not the event channel.
    async fn list(&self) -> Result<Vec<Persona>>;
    /// Replaces the cached sequence wholesale. No validation.
    async fn set_cache(&self, personas: Vec<Persona>);
    /// Linear scan of the cache; stale until the next list/create/delete.
    async fn find_by_id(&self, id: PersonaId) -> Option<Persona>;
    /// Submits a create carrying only the name. On success the server-assigned
    /// record is appended to the cache; on failure the cache is left alone.
    /// Callers that need fresh state must call `list` separately.
    async fn create(&self, draft: PersonaDraft);
    /// Full replacement of the record at `id`. Deliberately does not touch the
    /// cache, so cache and backend can diverge until the next `list`.
    async fn update(&self, id: PersonaId, persona: Persona);
    /// Deletes at the backend, then drops every cached entry with this id.
    async fn delete(&self, id: PersonaId);
    fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent>;
}

/// Single point of contact with the persona backend, plus a best-effort local
/// cache of the collection. The cache is only as fresh as the last `list` or
/// mutation; `update` never refreshes it.
pub struct PersonaStore {
    http: Client,
    base_url: String,
    cache: Mutex<Vec<Persona>>,
    events: broadcast::Sender<StoreEvent>,
}

impl PersonaStore {
    pub fn new(base_url: impl Into<String>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            http: Client::new(),
            base_url: base_url.into(),
            cache: Mutex::new(Vec::new()),
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list(&self) -> Result<Vec<Persona>, StoreError> {
        let personas: Vec<Persona> = self
            .http
            .get(&self.base_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(personas)
    }

    pub async fn set_cache(&self, personas: Vec<Persona>) {
        *self.cache.lock().await = personas;
    }

    pub async fn find_by_id(&self, id: PersonaId) -> Option<Persona> {
        self.cache
            .lock()
            .await
            .iter()
            .find(|persona| persona.id == id)
            .cloned()
    }

    pub async fn create(&self, draft: PersonaDraft) {
        match self.create_impl(&draft).await {
            Ok(persona) => {
                info!(id = persona.id.0, name = %persona.name, "persona created");
                self.cache.lock().await.push(persona.clone());
                let _ = self.events.send(StoreEvent::PersonaCreated(persona));
            }
            Err(err) => self.report_failure(StoreOperation::Create, &err),
        }
    }

    pub async fn update(&self, id: PersonaId, persona: Persona) {
        match self.update_impl(id, &persona).await {
            Ok(()) => info!(id = id.0, "persona updated"),
            Err(err) => self.report_failure(StoreOperation::Update, &err),
        }
    }

    pub async fn delete(&self, id: PersonaId) {
        match self.delete_impl(id).await {
            Ok(()) => {
                info!(id = id.0, "persona deleted");
                self.cache.lock().await.retain(|persona| persona.id != id);
                let _ = self.events.send(StoreEvent::PersonaDeleted(id));
            }
            Err(err) => self.report_failure(StoreOperation::Delete, &err),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    async fn create_impl(&self, draft: &PersonaDraft) -> Result<Persona, StoreError> {
        let created: Persona = self
            .http
            .post(&self.base_url)
            .json(draft)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(created)
    }

    async fn update_impl(&self, id: PersonaId, persona: &Persona) -> Result<(), StoreError> {
        self.http
            .put(format!("{}/{}", self.base_url, id.0))
            .json(persona)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_impl(&self, id: PersonaId) -> Result<(), StoreError> {
        self.http
            .delete(format!("{}/{}", self.base_url, id.0))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn report_failure(&self, operation: StoreOperation, err: &StoreError) {
        warn!(operation = operation.as_str(), "{err}");
        let _ = self.events.send(StoreEvent::RequestFailed {
            operation,
            detail: err.to_string(),
        });
    }
}

#[async_trait]
impl RosterHandle for PersonaStore {
    async fn list(&self) -> Result<Vec<Persona>> {
        Ok(PersonaStore::list(self).await?)
    }

    async fn set_cache(&self, personas: Vec<Persona>) {
        PersonaStore::set_cache(self, personas).await;
    }

    async fn find_by_id(&self, id: PersonaId) -> Option<Persona> {
        PersonaStore::find_by_id(self, id).await
    }

    async fn create(&self, draft: PersonaDraft) {
        PersonaStore::create(self, draft).await;
    }

    async fn update(&self, id: PersonaId, persona: Persona) {
        PersonaStore::update(self, id, persona).await;
    }

    async fn delete(&self, id: PersonaId) {
        PersonaStore::delete(self, id).await;
    }

    fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        PersonaStore::subscribe_events(self)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
