//! EditSession: the in-memory side of the configuration editor.
//!
//! A session keeps two documents:
//!
//! - **saved** – what was last loaded from, or saved to, the repository.
//! - **draft** – the working copy the user is editing.
//!
//! ```text
//!  open() ──► saved = draft = load()
//!               │
//!        edit() / replace_draft()      (draft changes, saved does not)
//!               │
//!     save() ───┴──► validate draft ─► repository.save(draft) ─► saved = draft
//!     reload() ─────► saved = draft = load()
//!     discard() ────► draft = saved
//! ```
//!
//! Every save hands the complete draft to the repository; there is no
//! field-level merging with whatever is on disk.  When validation or the
//! repository fails, neither document changes, so the user can fix the
//! problem and retry.

use thiserror::Error;
use tracing::{info, warn};

use cpcready_core::{ConfigField, ConfigurationDocument, ValidationError};

/// Whole-document persistence used by [`EditSession`].
///
/// The production implementation is
/// [`ConfigStore`](crate::infrastructure::storage::config::ConfigStore); tests
/// use [`InMemoryConfigRepository`](crate::infrastructure::storage::mock::InMemoryConfigRepository).
pub trait ConfigRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes the default document if none exists yet.
    fn ensure_exists(&self) -> Result<(), Self::Error>;
    /// Reads the full document, filling absent keys from defaults.
    fn load(&self) -> Result<ConfigurationDocument, Self::Error>;
    /// Replaces the stored document with `document`.
    fn save(&self, document: &ConfigurationDocument) -> Result<(), Self::Error>;
}

/// Error type for session operations.
#[derive(Debug, Error)]
pub enum SessionError<E> {
    /// The draft failed validation; nothing was written.
    #[error("configuration is invalid: {0}")]
    Validation(#[from] ValidationError),

    /// The repository failed to read or write the document.
    #[error(transparent)]
    Store(E),
}

/// An editing session over one [`ConfigRepository`].
#[derive(Debug)]
pub struct EditSession<R: ConfigRepository> {
    repository: R,
    saved: ConfigurationDocument,
    draft: ConfigurationDocument,
}

impl<R: ConfigRepository> EditSession<R> {
    /// Ensures the document exists, then loads it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the document cannot be created or
    /// read.  A corrupt file is reported, not replaced.
    pub fn open(repository: R) -> Result<Self, SessionError<R::Error>> {
        repository.ensure_exists().map_err(SessionError::Store)?;
        let saved = repository.load().map_err(SessionError::Store)?;
        Ok(Self {
            repository,
            draft: saved.clone(),
            saved,
        })
    }

    /// The repository this session loads from and saves to.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// The document as last loaded or saved.
    pub fn saved(&self) -> &ConfigurationDocument {
        &self.saved
    }

    /// The working copy, including unsaved edits.
    pub fn draft(&self) -> &ConfigurationDocument {
        &self.draft
    }

    /// `true` when the draft has edits that are not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.saved
    }

    /// Replaces one field of the draft from its text form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] if `value` cannot be
    /// converted to the field's type; the draft is unchanged in that case.
    pub fn edit(&mut self, field: ConfigField, value: &str) -> Result<(), ValidationError> {
        self.draft = self.draft.with_field(field, value)?;
        Ok(())
    }

    /// Replaces the whole draft, as a form submit does.
    pub fn replace_draft(&mut self, document: ConfigurationDocument) {
        self.draft = document;
    }

    /// Validates the draft and writes it to the repository.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] if the draft is invalid, or
    /// [`SessionError::Store`] if the repository fails.  Neither the saved
    /// document nor the draft changes on error.
    pub fn save(&mut self) -> Result<(), SessionError<R::Error>> {
        if let Err(e) = self.draft.validate() {
            warn!("refusing to save invalid configuration: {e}");
            return Err(e.into());
        }
        self.repository
            .save(&self.draft)
            .map_err(SessionError::Store)?;
        self.saved = self.draft.clone();
        info!("configuration saved");
        Ok(())
    }

    /// Discards unsaved edits and re-reads the document from the repository.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the document cannot be read; the
    /// in-memory documents are unchanged in that case.
    pub fn reload(&mut self) -> Result<(), SessionError<R::Error>> {
        let loaded = self.repository.load().map_err(SessionError::Store)?;
        self.draft = loaded.clone();
        self.saved = loaded;
        info!("configuration reloaded");
        Ok(())
    }

    /// Resets the draft to the saved document without touching storage.
    pub fn discard(&mut self) {
        self.draft = self.saved.clone();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
