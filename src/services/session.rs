//! Editing session: one open document, its engine and its autosave loop.
//!
//! DESIGN
//! ======
//! The engine never performs I/O; it only marks itself dirty and arms a
//! debounce deadline. The session polls that deadline (`tick`) and runs the
//! save through the adapter in three steps: claim a ticket and snapshot the
//! board (`begin_save`), send it (`send`), and settle the ticket
//! (`finish_save`). Because the ticket captures the revision at claim time,
//! a response that lands after newer edits never marks those edits as
//! persisted. Failures are logged and leave the board dirty; editing is
//! never interrupted by the backend.

use std::sync::Arc;

use canvas::autosave::SaveTicket;
use canvas::clock::now_ms;
use canvas::document::{Document, DocumentId, SavePayload};
use canvas::engine::{Action, EngineCore};
use canvas::error::BoardError;
use tracing::{debug, info, warn};

use super::store::{PersistenceAdapter, StoreError};
use crate::config::ClientConfig;

pub const UNTITLED: &str = "Untitled";

/// A claimed save: the ticket plus the board snapshot it covers.
#[derive(Debug, Clone)]
pub struct PendingSave {
    ticket: SaveTicket,
    id: Option<DocumentId>,
    payload: SavePayload,
}

impl PendingSave {
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.ticket.revision
    }

    #[must_use]
    pub fn payload(&self) -> &SavePayload {
        &self.payload
    }
}

pub struct Session {
    engine: EngineCore,
    store: Arc<dyn PersistenceAdapter>,
    document_id: Option<DocumentId>,
    name: String,
    persist: bool,
}

impl Session {
    /// A session on a new, not yet persisted board. The first save creates
    /// the document.
    #[must_use]
    pub fn new(store: Arc<dyn PersistenceAdapter>, config: &ClientConfig) -> Self {
        Self {
            engine: EngineCore::with_config(config.engine_config()),
            store,
            document_id: None,
            name: UNTITLED.to_owned(),
            persist: config.persist,
        }
    }

    /// Open an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] for unknown ids, [`BoardError::Parse`]
    /// or [`BoardError::Validation`] for a corrupt blob, and
    /// [`BoardError::Persistence`] for backend failures.
    pub async fn open(store: Arc<dyn PersistenceAdapter>, config: &ClientConfig, id: &str) -> Result<Self, BoardError> {
        let mut session = Self::new(store, config);
        session.load(id).await?;
        Ok(session)
    }

    /// Switch to another document. On failure the current board is kept.
    ///
    /// # Errors
    ///
    /// See [`Session::open`].
    pub async fn load(&mut self, id: &str) -> Result<Vec<Action>, BoardError> {
        let document = self.store.load(id).await?;
        let actions = self.engine.load_document(&document)?;
        info!(board_id = %document.id, name = %document.name, elements = self.engine.doc.len(), "board opened");
        self.adopt(&document);
        Ok(actions)
    }

    /// Create an empty document on the backend and switch to it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Persistence`] if the backend rejects the create.
    pub async fn create(&mut self, name: &str) -> Result<Vec<Action>, BoardError> {
        let document = self.store.create(&SavePayload::empty(name)).await?;
        let actions = self.engine.load_elements(Vec::new());
        info!(board_id = %document.id, name = %document.name, "board created");
        self.adopt(&document);
        Ok(actions)
    }

    /// Rename the open document. An unsaved board only changes its local
    /// name.
    ///
    /// # Errors
    ///
    /// Returns the backend failure; the local name is kept on error.
    pub async fn rename(&mut self, name: &str) -> Result<(), BoardError> {
        if let Some(id) = &self.document_id {
            if self.persist {
                self.store.rename(id, name).await?;
            }
        }
        name.clone_into(&mut self.name);
        Ok(())
    }

    fn adopt(&mut self, document: &Document) {
        self.document_id = Some(document.id.clone());
        document.name.clone_into(&mut self.name);
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EngineCore {
        &mut self.engine
    }

    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.engine.autosave.is_dirty()
    }

    pub fn set_persist(&mut self, persist: bool) {
        self.persist = persist;
    }

    // --- Saving ---

    /// Claim the next save. `Ok(None)` when the board is clean or a save is
    /// already in flight.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Persistence`] when the persist gate is closed,
    /// or the encode error if the board cannot be serialized.
    pub fn begin_save(&mut self) -> Result<Option<PendingSave>, BoardError> {
        if !self.persist {
            return Err(StoreError::Disabled.into());
        }
        let claimed = self.engine.claim_save(&self.name)?;
        Ok(claimed.map(|(ticket, payload)| PendingSave { ticket, id: self.document_id.clone(), payload }))
    }

    /// Send a claimed save. Creates the document if the board has no id yet.
    ///
    /// # Errors
    ///
    /// Returns the adapter error unchanged.
    pub async fn send(&self, pending: &PendingSave) -> Result<Document, StoreError> {
        match &pending.id {
            Some(id) => self.store.save(id, &pending.payload).await,
            None => self.store.create(&pending.payload).await,
        }
    }

    /// Settle a claimed save with the adapter's result.
    ///
    /// # Errors
    ///
    /// Returns the failure converted to a [`BoardError`]; the board stays
    /// dirty and the debounce is re-armed.
    pub fn finish_save(&mut self, pending: PendingSave, result: Result<Document, StoreError>) -> Result<(), BoardError> {
        let now = now_ms();
        match result {
            Ok(document) => {
                if self.document_id.is_none() {
                    self.document_id = Some(document.id.clone());
                }
                self.engine.autosave.finish(pending.ticket, true, now);
                debug!(board_id = %document.id, revision = pending.ticket.revision, dirty = self.is_dirty(), "board saved");
                Ok(())
            }
            Err(e) => {
                let board_id = pending.id.as_deref().unwrap_or("<new>");
                warn!(error = %e, board_id = %board_id, revision = pending.ticket.revision, "board save failed");
                self.engine.autosave.finish(pending.ticket, false, now);
                Err(e.into())
            }
        }
    }

    async fn run_save(&mut self) -> Result<bool, BoardError> {
        let Some(pending) = self.begin_save()? else {
            return Ok(false);
        };
        let result = self.send(&pending).await;
        self.finish_save(pending, result)?;
        Ok(true)
    }

    /// Save immediately, ignoring the debounce. `Ok(false)` if clean.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Persistence`] when the gate is closed or the
    /// backend fails.
    pub async fn save_now(&mut self) -> Result<bool, BoardError> {
        self.run_save().await
    }

    /// Run the autosave if its deadline has passed at `now_ms`. Returns
    /// whether a save completed. Failures are logged, never returned.
    pub async fn tick(&mut self, now_ms: i64) -> bool {
        if !self.persist || !self.engine.autosave.due(now_ms) {
            return false;
        }
        self.run_save().await.unwrap_or(false)
    }

    /// Save any pending edits before the session ends. A closed gate is
    /// not an error here.
    ///
    /// # Errors
    ///
    /// Returns backend failures.
    pub async fn flush(&mut self) -> Result<bool, BoardError> {
        if !self.persist {
            if self.is_dirty() {
                info!(board_id = ?self.document_id, "persistence disabled; discarding unsaved edits");
            }
            return Ok(false);
        }
        self.run_save().await
    }

    /// Route engine output: a save request triggers [`Session::save_now`].
    /// A failed manual save is logged and otherwise ignored.
    pub async fn handle_actions(&mut self, actions: &[Action]) {
        if !actions.iter().any(|a| matches!(a, Action::SaveRequested)) {
            return;
        }
        if let Err(e) = self.save_now().await {
            warn!(error = %e, code = e.error_code(), "manual save failed");
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
