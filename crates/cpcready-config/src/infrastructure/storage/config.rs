//! TOML-based persistence of the CPCReady configuration document.
//!
//! The file lives at `<config root>/cpcready/cpcready.toml`, where the config
//! root is the platform-appropriate per-user directory:
//! - Windows:  `%APPDATA%`
//! - Linux:    `$XDG_CONFIG_HOME` or `~/.config`
//! - macOS:    `~/Library/Application Support`
//!
//! The root is passed to [`ConfigStore::new`] explicitly so tests can point
//! the store at an isolated temporary directory.
//! [`ConfigStore::for_current_user`] resolves the real one.
//!
//! # Load policy
//!
//! - Absent file: the default document is returned and nothing is written.
//! - Present but missing keys or tables: the gaps are filled from defaults.
//! - Present but not valid TOML (or not the expected shape):
//!   [`ConfigError::Parse`].  A corrupt file is never silently replaced by
//!   defaults, since a later save would overwrite whatever was recoverable.
//!
//! # Save policy
//!
//! Every save rewrites the whole document.  The new content is written to a
//! uniquely named temporary file in the same directory, synced, and renamed
//! over the target, so a failed save leaves the previous file intact.  There
//! is no locking: two processes saving at once resolve as last writer wins.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use cpcready_core::ConfigurationDocument;

use crate::application::edit_session::ConfigRepository;

/// Directory created under the platform config root.
pub const APP_DIR_NAME: &str = "cpcready";

/// File name of the configuration document.
pub const CONFIG_FILE_NAME: &str = "cpcready.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but its content is not a valid configuration document.
    #[error("failed to parse config TOML at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ConfigError {
    /// `true` when the file exists but could not be understood.
    pub fn is_corrupt_file(&self) -> bool {
        matches!(self, ConfigError::Parse { .. })
    }
}

// ── Config store ──────────────────────────────────────────────────────────────

/// Whole-document persistence of [`ConfigurationDocument`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store rooted at `config_root`.
    ///
    /// Nothing is touched on disk until [`ensure_exists`](Self::ensure_exists)
    /// or [`save`](Self::save) is called.
    pub fn new(config_root: impl Into<PathBuf>) -> Self {
        let dir = config_root.into().join(APP_DIR_NAME);
        let path = dir.join(CONFIG_FILE_NAME);
        Self { dir, path }
    }

    /// Creates a store rooted at the current user's platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformConfigDir`] when the base directory
    /// cannot be determined from the environment.
    pub fn for_current_user() -> Result<Self, ConfigError> {
        platform_config_root()
            .map(Self::new)
            .ok_or(ConfigError::NoPlatformConfigDir)
    }

    /// The `cpcready` directory holding the file.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of `cpcready.toml`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the default document if no file exists yet.
    ///
    /// Idempotent: an existing file, valid or not, is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the directory cannot be created, the
    /// file's existence cannot be determined, or the default cannot be written.
    pub fn ensure_exists(&self) -> Result<(), ConfigError> {
        self.create_dir()?;
        match fs::metadata(&self.path) {
            Ok(_) => {
                debug!("config already present at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.save(&ConfigurationDocument::default())?;
                info!("created default config at {}", self.path.display());
                Ok(())
            }
            Err(source) => Err(ConfigError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Reads the document, returning the defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system errors other than "not
    /// found", and [`ConfigError::Parse`] if the content is malformed.
    pub fn load(&self) -> Result<ConfigurationDocument, ConfigError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let doc = toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: self.path.clone(),
                    source,
                })?;
                debug!("loaded config from {}", self.path.display());
                Ok(doc)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config at {}; using defaults", self.path.display());
                Ok(ConfigurationDocument::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Replaces the file with `document`.
    ///
    /// No semantic validation happens here; callers validate first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system failures or
    /// [`ConfigError::Serialize`] if serialization fails.  On error the
    /// previous file is unchanged.
    pub fn save(&self, document: &ConfigurationDocument) -> Result<(), ConfigError> {
        self.create_dir()?;
        let content = toml::to_string_pretty(document)?;
        write_atomically(&self.path, |file| file.write_all(content.as_bytes()))?;
        debug!("saved config to {}", self.path.display());
        Ok(())
    }

    fn create_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.dir).map_err(|source| ConfigError::Io {
            path: self.dir.clone(),
            source,
        })
    }
}

impl ConfigRepository for ConfigStore {
    type Error = ConfigError;

    fn ensure_exists(&self) -> Result<(), ConfigError> {
        ConfigStore::ensure_exists(self)
    }

    fn load(&self) -> Result<ConfigurationDocument, ConfigError> {
        ConfigStore::load(self)
    }

    fn save(&self, document: &ConfigurationDocument) -> Result<(), ConfigError> {
        ConfigStore::save(self, document)
    }
}

// ── Atomic write ──────────────────────────────────────────────────────────────

/// Writes through `write` into a temporary sibling of `path`, then renames it
/// over `path`.  The temporary file is removed on any failure.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), ConfigError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let temp_path = temp_path_for(path);
    let outcome = write_temp_file(&temp_path, write).and_then(|()| fs::rename(&temp_path, path));
    if let Err(source) = outcome {
        let _ = fs::remove_file(&temp_path);
        return Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

fn write_temp_file<F>(temp_path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    // The handle is dropped at the end of this function, before the rename.
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)?;
    write(&mut file)?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

/// Resolves the platform config base directory, without the `cpcready` part.
fn platform_config_root() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        std::env::var_os("XDG_CONFIG_HOME")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        // Other Unix-likes follow the XDG convention.
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
