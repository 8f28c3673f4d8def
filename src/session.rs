//! Login state, persisted between runs as a single JSON file.

use crate::config::Config;
use crate::error::{LedgerError, Result};
use crate::navigation::can_open;
use crate::store::Audit;
use crate::user::{User, UserLevel};
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub token: Option<String>,
}

impl Session {
    /// The logged-in user, if the session is authenticated.
    pub fn current_user(&self) -> Option<&User> {
        if self.is_authenticated {
            self.user.as_ref()
        } else {
            None
        }
    }

    /// Permission rank of the session; 0 when logged out.
    pub fn level(&self) -> u8 {
        self.current_user().map(|u| u.user_level.rank()).unwrap_or(0)
    }

    /// Returns the logged-in user or `NotAuthenticated`.
    pub fn require_user(&self) -> Result<&User> {
        self.current_user().ok_or(LedgerError::NotAuthenticated)
    }

    /// Returns the logged-in user if their level may open `page`.
    pub fn authorize(&self, page: &'static str) -> Result<&User> {
        let user = self.require_user()?;
        let level = self.level();
        if !can_open(page, level) {
            warn!("'{}' (level {}) denied {}", user.username, level, page);
            return Err(LedgerError::Forbidden { page, level });
        }
        Ok(user)
    }
}

/// Profile of the bootstrap account created for `username`.
pub fn bootstrap_user(username: &str) -> User {
    User {
        username: username.to_string(),
        first_name: "Nombre".into(),
        last_name: "Apellido".into(),
        nickname: Some("DevUser".into()),
        email: "Example@mail.com".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1),
        user_level: UserLevel::Developer,
        enabled: true,
        assigned_branches: vec!["Lux Central".into()],
        position: "Developer".into(),
        audit: Audit::default(),
        is_deleted: false,
    }
}

/// Checks `username`/`password` against the configured bootstrap account.
pub fn authenticate(config: &Config, username: &str, password: &str) -> Result<Session> {
    if username != config.bootstrap_username || password != config.bootstrap_password {
        warn!("Rejected login for '{}'", username);
        return Err(LedgerError::InvalidCredentials);
    }
    Ok(Session {
        user: Some(bootstrap_user(username)),
        is_authenticated: true,
        token: Some(format!("{}-{}", username, Utc::now().timestamp())),
    })
}

/// File-backed session storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session. A missing file is a logged-out session;
    /// an unreadable one is discarded with a warning.
    pub fn load(&self) -> Session {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => {
                debug!("No session at {}", self.path.display());
                return Session::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                warn!("Discarding session {}: {}", self.path.display(), e);
                Session::default()
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, serde_json::to_string(session)?)?;
        Ok(())
    }

    /// Removes the stored session; clearing an absent one is a no-op.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Authenticates and persists the new session.
    pub fn login(&self, config: &Config, username: &str, password: &str) -> Result<Session> {
        let session = authenticate(config, username, password)?;
        self.save(&session)?;
        info!("Logged in as '{}'", username);
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.clear()?;
        info!("Logged out");
        Ok(())
    }
}
