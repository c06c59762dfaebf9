//! Bridges console actions to the persona store and keeps a displayed
//! snapshot current by re-fetching the full list after every mutation.

use std::sync::Arc;

use roster_client::RosterHandle;
use shared::{
    domain::PersonaId,
    protocol::{Persona, PersonaDraft},
};
use tracing::warn;

pub struct RosterController {
    store: Arc<dyn RosterHandle>,
    pub draft_name: String,
    personas: Vec<Persona>,
}

impl RosterController {
    pub fn new(store: Arc<dyn RosterHandle>) -> Self {
        Self {
            store,
            draft_name: String::new(),
            personas: Vec::new(),
        }
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    /// Refreshes the displayed snapshot from the backend and re-pushes it into
    /// the store cache. On failure the previous snapshot stays visible.
    pub async fn load(&mut self) {
        match self.store.list().await {
            Ok(personas) => {
                self.store.set_cache(personas.clone()).await;
                self.personas = personas;
            }
            Err(err) => warn!("failed to load personas: {err:#}"),
        }
    }

    /// Submits the draft as a new persona. A whitespace-only draft is dropped
    /// before any request is made and keeps its value; otherwise the draft is
    /// cleared right away, independent of how the create turns out, and the
    /// displayed list is refreshed.
    pub async fn add(&mut self) {
        if self.draft_name.trim().is_empty() {
            return;
        }
        let draft = PersonaDraft {
            name: std::mem::take(&mut self.draft_name),
        };
        self.store.create(draft).await;
        self.load().await;
    }

    /// Deletes at the backend, then refreshes unconditionally.
    pub async fn remove(&mut self, id: PersonaId) {
        self.store.delete(id).await;
        self.load().await;
    }

    /// Full-record replacement of the name at `id`, then a refresh.
    pub async fn rename(&mut self, id: PersonaId, name: String) {
        self.store.update(id, Persona { id, name }).await;
        self.load().await;
    }
}
