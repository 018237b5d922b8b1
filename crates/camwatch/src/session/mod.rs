//! Session storage for camwatch.
//!
//! A session is persisted into one of two scopes, chosen by the caller's
//! "remember me" flag:
//!
//! - **Persistent**: a `SQLite` file that survives restarts (the analogue of
//!   durable browser storage).
//! - **Ephemeral**: an in-process map that disappears when the process exits.
//!
//! Both scopes live behind one [`SessionStore`] and every call names its scope
//! explicitly, so the precedence rule is a property of this module rather than
//! of two ambient globals. On read, **persistent wins** when both scopes hold
//! a token.
//!
//! The key layout is inherited from the dashboard's storage contract:
//! `nzAuthToken`, `nzUser`, `role`, `email`, `name`, `device`, `DeviceIp`,
//! `rtsp_url1`, `rtsp_url2`.

pub mod schema;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::api::models::User;
use crate::device::DeviceBinding;
use crate::error::{Error, Result};

/// Storage key for the session token.
pub const KEY_TOKEN: &str = "nzAuthToken";
/// Storage key for the serialized user record.
pub const KEY_USER: &str = "nzUser";

const KEY_ROLE: &str = "role";
const KEY_EMAIL: &str = "email";
const KEY_NAME: &str = "name";
const KEY_DEVICE: &str = "device";
const KEY_DEVICE_IP: &str = "DeviceIp";
const KEY_RTSP_URL1: &str = "rtsp_url1";
const KEY_RTSP_URL2: &str = "rtsp_url2";

/// Which of the two stores a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Survives restarts; chosen when "remember me" is set.
    Persistent,
    /// Lives for the current process only.
    Ephemeral,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistent => write!(f, "persistent"),
            Self::Ephemeral => write!(f, "ephemeral"),
        }
    }
}

/// The client-held proof of authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Opaque token issued at login.
    pub token: String,
    /// Cached user record (password always absent).
    pub user: User,
    /// Where this session was found.
    pub scope: Scope,
}

/// Dual-scope session repository.
///
/// The persistent scope is a `SQLite` key-value table; the ephemeral scope is
/// an in-process map. A shared in-memory cell caches the device binding for
/// same-process reads without re-parsing storage.
#[derive(Debug)]
pub struct SessionStore {
    /// Path to the database file.
    path: PathBuf,
    /// Persistent store connection. The mutex makes the store shareable
    /// across tasks; writes only ever come from one logical flow at a time.
    conn: Mutex<Connection>,
    /// Ephemeral store.
    ephemeral: RwLock<HashMap<String, String>>,
    /// In-memory device cache for the current process.
    device_cell: RwLock<Option<DeviceBinding>>,
}

impl SessionStore {
    /// Open or create a session store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening session store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::StoreOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            path,
            conn: Mutex::new(conn),
            ephemeral: RwLock::new(HashMap::new()),
            device_cell: RwLock::new(None),
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StoreOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
            ephemeral: RwLock::new(HashMap::new()),
            device_cell: RwLock::new(None),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        match scope {
            Scope::Persistent => {
                self.conn.lock().execute(
                    r"
                    INSERT INTO session (key, value, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3
                    ",
                    params![key, value, Utc::now().to_rfc3339()],
                )?;
            }
            Scope::Ephemeral => {
                self.ephemeral
                    .write()
                    .insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    /// Read a raw value from one scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistent query fails.
    pub fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        match scope {
            Scope::Persistent => {
                let value: Option<String> = self
                    .conn
                    .lock()
                    .query_row("SELECT value FROM session WHERE key = ?1", [key], |row| {
                        row.get(0)
                    })
                    .optional()?;
                Ok(value)
            }
            Scope::Ephemeral => Ok(self.ephemeral.read().get(key).cloned()),
        }
    }

    /// Read a value checking the persistent scope first, then ephemeral.
    fn get_either(&self, key: &str) -> Result<Option<(Scope, String)>> {
        if let Some(value) = self.get(Scope::Persistent, key)? {
            return Ok(Some((Scope::Persistent, value)));
        }
        if let Some(value) = self.get(Scope::Ephemeral, key)? {
            return Ok(Some((Scope::Ephemeral, value)));
        }
        Ok(None)
    }

    /// Persist a token and the flattened user fields into the chosen scope.
    ///
    /// The user record is sanitized before writing: the password field never
    /// reaches storage, regardless of what the server sent.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the persistent write fails.
    pub fn write(&self, scope: Scope, token: &str, user: &User) -> Result<()> {
        let user = user.sanitized();

        self.set(scope, KEY_TOKEN, token)?;
        self.set(scope, KEY_USER, &serde_json::to_string(&user)?)?;
        self.set(scope, KEY_ROLE, &user.role)?;
        self.set(scope, KEY_EMAIL, &user.email)?;
        self.set(scope, KEY_NAME, &user.name)?;

        debug!("Session written to {scope} scope for {}", user.email);
        Ok(())
    }

    /// Look up the stored token, persistent scope first.
    ///
    /// This is the route guard's read: possession of any token in either
    /// scope is what unlocks protected views.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistent query fails.
    pub fn read_token(&self) -> Result<Option<(Scope, String)>> {
        self.get_either(KEY_TOKEN)
    }

    /// Read the full session, persistent scope winning when both exist.
    ///
    /// Returns `Ok(None)` when no token is stored. A token without a
    /// readable user record is a corrupt session and reported as an error.
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure or a corrupt session record.
    pub fn read(&self) -> Result<Option<Session>> {
        let Some((scope, token)) = self.read_token()? else {
            return Ok(None);
        };

        let Some(raw_user) = self.get(scope, KEY_USER)? else {
            return Err(Error::internal(format!(
                "session in {scope} scope has a token but no user record"
            )));
        };
        let user: User = serde_json::from_str(&raw_user)?;

        Ok(Some(Session { token, user, scope }))
    }

    /// Read the cached role string, persistent scope first.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistent query fails.
    pub fn role(&self) -> Result<Option<String>> {
        Ok(self.get_either(KEY_ROLE)?.map(|(_, role)| role))
    }

    /// Write the device binding redundantly into both scopes and the
    /// in-memory cell.
    ///
    /// # Errors
    ///
    /// Returns an error if a persistent write fails.
    pub fn write_device(&self, binding: &DeviceBinding) -> Result<()> {
        for scope in [Scope::Persistent, Scope::Ephemeral] {
            self.set(scope, KEY_DEVICE, &binding.device_id)?;
            self.set(scope, KEY_DEVICE_IP, &binding.ip)?;
            self.set(scope, KEY_RTSP_URL1, &binding.rtsp_url1)?;
            self.set(scope, KEY_RTSP_URL2, &binding.rtsp_url2)?;
        }
        *self.device_cell.write() = Some(binding.clone());
        debug!("Device binding cached for {}", binding.device_id);
        Ok(())
    }

    /// Read the device binding: in-memory cell first, then storage
    /// (persistent scope winning).
    ///
    /// # Errors
    ///
    /// Returns an error if the persistent query fails.
    pub fn device(&self) -> Result<Option<DeviceBinding>> {
        if let Some(binding) = self.device_cell.read().clone() {
            return Ok(Some(binding));
        }

        let Some((scope, device_id)) = self.get_either(KEY_DEVICE)? else {
            return Ok(None);
        };
        let Some(ip) = self.get(scope, KEY_DEVICE_IP)? else {
            return Ok(None);
        };
        let rtsp_url1 = self.get(scope, KEY_RTSP_URL1)?.unwrap_or_default();
        let rtsp_url2 = self.get(scope, KEY_RTSP_URL2)?.unwrap_or_default();

        Ok(Some(DeviceBinding {
            device_id,
            ip,
            rtsp_url1,
            rtsp_url2,
        }))
    }

    /// Empty both scopes and the device cell unconditionally.
    ///
    /// Idempotent: clearing an already-empty store is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistent delete fails.
    pub fn clear(&self) -> Result<()> {
        let removed = self.conn.lock().execute("DELETE FROM session", [])?;
        self.ephemeral.write().clear();
        *self.device_cell.write() = None;

        if removed > 0 {
            info!("Session cleared ({removed} persistent entries removed)");
        }
        Ok(())
    }

    /// Check whether a scope holds any entries at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistent query fails.
    pub fn is_scope_empty(&self, scope: Scope) -> Result<bool> {
        match scope {
            Scope::Persistent => {
                let count: i64 = self.conn.lock().query_row(
                    "SELECT COUNT(*) FROM session",
                    [],
                    |row| row.get(0),
                )?;
                Ok(count == 0)
            }
            Scope::Ephemeral => Ok(self.ephemeral.read().is_empty()),
        }
    }
}
