//! Persistent session for sidang.
//!
//! The session is the only state that outlives a single command: the bearer
//! token, the role, and a login flag, kept in a small `SQLite` key-value
//! table. Writes happen on login, logout, and when the server rejects the
//! token; last writer wins.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::Role;

const KEY_TOKEN: &str = "token";
const KEY_ROLE: &str = "role";
const KEY_IS_LOGIN: &str = "is_login";

/// A logged-in session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token from the identity provider.
    pub token: String,
    /// Role chosen at sign-in.
    pub role: Role,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &format_args!("<{} chars>", self.token.len()))
            .field("role", &self.role)
            .finish()
    }
}

/// Which part of the application a launch starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// No session; sign in first.
    Login,
    /// Student area.
    Mahasiswa,
    /// Advisor area.
    Dosen,
}

impl Route {
    /// Pick the starting route from what is stored.
    ///
    /// A logged-in session with any role other than `DOSEN` lands in the
    /// student area.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn initial(store: &SessionStore) -> Result<Self> {
        if !store.is_login()? {
            return Ok(Self::Login);
        }
        Ok(match store.role()? {
            Some(Role::Dosen) => Self::Dosen,
            _ => Self::Mahasiswa,
        })
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Mahasiswa => write!(f, "mahasiswa"),
            Self::Dosen => write!(f, "dosen"),
        }
    }
}

/// Session store shared between the API client and the commands.
pub type SharedSession = Arc<Mutex<SessionStore>>;

/// Lock a shared session store.
///
/// # Errors
///
/// Returns [`Error::Internal`] if a previous holder panicked.
pub fn lock(session: &SharedSession) -> Result<MutexGuard<'_, SessionStore>> {
    session
        .lock()
        .map_err(|_| Error::internal("session store lock poisoned"))
}

#[cfg(unix)]
fn owner_only(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn owner_only(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Key-value session storage backed by `SQLite`.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    conn: Connection,
}

impl SessionStore {
    /// Open or create the session database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
                owner_only(parent, 0o700)?;
            }
        }

        debug!("Opening session database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;
        // The file holds the bearer token.
        owner_only(&path, 0o600)?;

        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Wrap this store for sharing with an [`ApiClient`](crate::api::ApiClient).
    #[must_use]
    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a successful sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn save(&mut self, token: &str, role: Role) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in [
            (KEY_TOKEN, token),
            (KEY_ROLE, role.as_str()),
            (KEY_IS_LOGIN, "true"),
        ] {
            tx.execute(
                r"
                INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                ",
                params![key, value],
            )?;
        }
        tx.commit()?;

        info!("Session saved for role {}", role);
        Ok(())
    }

    /// Stored bearer token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn token(&self) -> Result<Option<String>> {
        self.get(KEY_TOKEN)
    }

    /// Stored role, if any. An unrecognized stored value reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn role(&self) -> Result<Option<Role>> {
        let Some(raw) = self.get(KEY_ROLE)? else {
            return Ok(None);
        };
        match raw.parse() {
            Ok(role) => Ok(Some(role)),
            Err(_) => {
                warn!("Ignoring unknown stored role {:?}", raw);
                Ok(None)
            }
        }
    }

    /// Whether a sign-in has been recorded since the last logout.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn is_login(&self) -> Result<bool> {
        Ok(self.get(KEY_IS_LOGIN)?.as_deref() == Some("true"))
    }

    /// The full session, when logged in with a token and a known role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn current(&self) -> Result<Option<Session>> {
        if !self.is_login()? {
            return Ok(None);
        }
        match (self.token()?, self.role()?) {
            (Some(token), Some(role)) => Ok(Some(Session { token, role })),
            _ => Ok(None),
        }
    }

    /// The current session, or [`Error::NotLoggedIn`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] when there is no session.
    pub fn require(&self) -> Result<Session> {
        self.current()?.ok_or(Error::NotLoggedIn)
    }

    /// Clear every stored key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn logout(&mut self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM preferences", [])?;
        info!("Session cleared ({} entries)", removed);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A fresh database path under the system temp directory.
    pub fn temp_db_path(label: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir()
            .join(format!("sidang-test-{}-{label}-{n}", std::process::id()))
            .join("session.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SessionStore {
        SessionStore::open_in_memory().expect("failed to create test store")
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = test_support::temp_db_path("perms");
        let mut store = SessionStore::open(&path).unwrap();
        store.save("secret-bearer", Role::Dosen).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), 0o600);
        assert_eq!(mode(path.parent().unwrap()), 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn test_reopen_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let path = test_support::temp_db_path("perms-reopen");
        drop(SessionStore::open(&path).unwrap());
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        drop(SessionStore::open(&path).unwrap());

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_fresh_store_is_logged_out() {
        let store = create_test_store();

        assert!(!store.is_login().unwrap());
        assert!(store.token().unwrap().is_none());
        assert!(store.role().unwrap().is_none());
        assert!(store.current().unwrap().is_none());
        assert_eq!(Route::initial(&store).unwrap(), Route::Login);
    }

    #[test]
    fn test_save_and_read_back() {
        let mut store = create_test_store();
        store.save("tok-123", Role::Mahasiswa).unwrap();

        assert!(store.is_login().unwrap());
        assert_eq!(store.token().unwrap().as_deref(), Some("tok-123"));
        assert_eq!(store.role().unwrap(), Some(Role::Mahasiswa));
        assert_eq!(
            store.current().unwrap(),
            Some(Session {
                token: "tok-123".into(),
                role: Role::Mahasiswa
            })
        );
    }

    #[test]
    fn test_save_overwrites_previous_session() {
        let mut store = create_test_store();
        store.save("first", Role::Mahasiswa).unwrap();
        store.save("second", Role::Dosen).unwrap();

        assert_eq!(store.token().unwrap().as_deref(), Some("second"));
        assert_eq!(Route::initial(&store).unwrap(), Route::Dosen);
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut store = create_test_store();
        store.save("tok", Role::Dosen).unwrap();
        store.logout().unwrap();

        assert!(!store.is_login().unwrap());
        assert!(store.token().unwrap().is_none());
        assert!(store.role().unwrap().is_none());
        assert!(matches!(store.require(), Err(Error::NotLoggedIn)));
    }

    #[test]
    fn test_unknown_role_routes_to_student_area() {
        let mut store = create_test_store();
        store.save("tok", Role::Dosen).unwrap();
        store
            .conn
            .execute("UPDATE preferences SET value = 'ADMIN' WHERE key = 'role'", [])
            .unwrap();

        assert!(store.role().unwrap().is_none());
        assert!(store.current().unwrap().is_none());
        assert_eq!(Route::initial(&store).unwrap(), Route::Mahasiswa);
    }

    #[test]
    fn test_session_survives_reopen() {
        let path = test_support::temp_db_path("reopen");
        {
            let mut store = SessionStore::open(&path).unwrap();
            store.save("persisted", Role::Dosen).unwrap();
        }

        let store = SessionStore::open(&path).unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("persisted"));
        assert_eq!(Route::initial(&store).unwrap(), Route::Dosen);
        assert_eq!(store.path(), path.as_path());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session {
            token: "secret-token".into(),
            role: Role::Mahasiswa,
        };
        let debug_str = format!("{session:?}");
        assert!(!debug_str.contains("secret-token"));
        assert!(debug_str.contains("12 chars"));
    }

    #[test]
    fn test_route_display() {
        assert_eq!(Route::Login.to_string(), "login");
        assert_eq!(Route::Dosen.to_string(), "dosen");
    }
}
