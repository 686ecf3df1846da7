//! Session persistence between runs
//!
//! The session is serialized to JSON and kept either in the operating
//! system's native credential store (Keychain on macOS, Secret Service on
//! Linux, Windows Credential Manager on Windows) or in a plain JSON file.
//! Both stores report "nothing saved" as `Ok(None)` and treat clearing a
//! missing entry as a no-op.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{Config, SessionStoreKind};
use crate::error::{CallsumError, Result};
use crate::session::Session;

/// Keyring service name under which the session is stored.
const KEYRING_SERVICE: &str = "callsum";

/// Keyring account name for the single stored session.
const KEYRING_ACCOUNT: &str = "session";

/// Persistent storage for the signed-in session
pub trait SessionStore: Send + Sync {
    /// Load the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the store is unreachable or holds malformed
    /// data. A missing entry is `Ok(None)`.
    fn load(&self) -> Result<Option<Session>>;

    /// Persist `session`, replacing any previous one.
    fn save(&self, session: &Session) -> Result<()>;

    /// Forget the stored session. Idempotent.
    fn clear(&self) -> Result<()>;
}

/// Build the store selected by the configuration.
pub fn from_config(config: &Config) -> Box<dyn SessionStore> {
    match config.session.store {
        SessionStoreKind::Keyring => Box::new(KeyringSessionStore::new()),
        SessionStoreKind::File => Box::new(FileSessionStore::new(config.session_file_path())),
    }
}

// ---------------------------------------------------------------------------
// KeyringSessionStore
// ---------------------------------------------------------------------------

/// Stateless accessor for the OS native keyring.
///
/// # Examples
///
/// ```no_run
/// use callsum::session::{KeyringSessionStore, SessionStore};
///
/// let store = KeyringSessionStore::new();
/// match store.load().unwrap() {
///     Some(session) => println!("Signed in as {}", session.user.email),
///     None => println!("No stored session"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    service: String,
}

impl KeyringSessionStore {
    /// Create a store using the default `callsum` service name.
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
        }
    }

    /// Create a store under a custom service name.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, KEYRING_ACCOUNT)
            .map_err(|e| CallsumError::Keyring(e).into())
    }
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        match self.entry()?.get_password() {
            Ok(json_str) => {
                let session: Session = serde_json::from_str(&json_str)?;
                Ok(Some(session))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CallsumError::Keyring(e).into()),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        let json_str = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&json_str)
            .map_err(CallsumError::Keyring)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CallsumError::Keyring(e).into()),
        }
    }
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

/// Session stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store backed by the file at `path`.
    ///
    /// The file and its parent directory are created on first save.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&contents).map_err(|e| {
            CallsumError::Session(format!(
                "Malformed session file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(session)?;
        let mut file = open_private(&self.path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CallsumError::Io(e).into()),
        }
    }
}

/// Open `path` for writing, readable by the owner only on Unix.
fn open_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let file = options.open(path)?;
        // An existing file keeps its old mode on open.
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        Ok(file)
    }
    #[cfg(not(unix))]
    {
        options.open(path)
    }
}
