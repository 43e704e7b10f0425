//! In-memory configuration repository for unit testing.
//!
//! Holds the TOML text a real file would contain, so loads go through the
//! same parser and corrupt content produces a genuine
//! [`ConfigError::Parse`].  Save failures can be injected one at a time.

use std::cell::{Cell, RefCell};
use std::io;
use std::path::PathBuf;

use cpcready_core::ConfigurationDocument;

use super::config::ConfigError;
use crate::application::edit_session::ConfigRepository;

const MEMORY_PATH: &str = "<memory>/cpcready.toml";

/// A mock implementation of [`ConfigRepository`] backed by a string.
#[derive(Debug, Default)]
pub struct InMemoryConfigRepository {
    contents: RefCell<Option<String>>,
    fail_next_save: Cell<bool>,
    save_count: Cell<u32>,
}

impl InMemoryConfigRepository {
    /// Creates an empty repository, as if no file existed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository whose "file" already holds `toml`.
    pub fn with_contents(toml: &str) -> Self {
        let repo = Self::new();
        repo.set_contents(toml);
        repo
    }

    /// Replaces the stored text, as another process editing the file would.
    pub fn set_contents(&self, toml: &str) {
        *self.contents.borrow_mut() = Some(toml.to_string());
    }

    /// The stored text, or `None` if nothing was ever written.
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Makes the next [`save`](ConfigRepository::save) fail with an I/O error.
    pub fn fail_next_save(&self) {
        self.fail_next_save.set(true);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u32 {
        self.save_count.get()
    }
}

impl ConfigRepository for InMemoryConfigRepository {
    type Error = ConfigError;

    fn ensure_exists(&self) -> Result<(), ConfigError> {
        if self.contents.borrow().is_none() {
            self.save(&ConfigurationDocument::default())?;
        }
        Ok(())
    }

    fn load(&self) -> Result<ConfigurationDocument, ConfigError> {
        match self.contents.borrow().as_deref() {
            Some(text) => toml::from_str(text).map_err(|source| ConfigError::Parse {
                path: PathBuf::from(MEMORY_PATH),
                source,
            }),
            None => Ok(ConfigurationDocument::default()),
        }
    }

    fn save(&self, document: &ConfigurationDocument) -> Result<(), ConfigError> {
        if self.fail_next_save.replace(false) {
            return Err(ConfigError::Io {
                path: PathBuf::from(MEMORY_PATH),
                source: io::Error::new(io::ErrorKind::Other, "injected save failure"),
            });
        }
        let text = toml::to_string_pretty(document)?;
        *self.contents.borrow_mut() = Some(text);
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
