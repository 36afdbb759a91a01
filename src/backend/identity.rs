//! Local credential check with a persisted session
//!
//! Field devices often start offline, so sign-in compares against the
//! configured account instead of calling out. The signed-in identity is kept
//! in `session.json` so a restart resumes on the dashboard.

use super::traits::IdentityService;
use crate::error::{AuthError, StoreError};
use crate::state::{Credentials, Identity};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use uuid::Uuid;

pub struct LocalIdentityService {
    email: String,
    password: String,
    session_path: PathBuf,
    current: watch::Sender<Option<Identity>>,
}

impl LocalIdentityService {
    /// Create the service, restoring a saved session for the configured account
    pub fn new(email: &str, password: &str, session_path: impl Into<PathBuf>) -> Self {
        let session_path = session_path.into();
        let restored = Self::load_session(&session_path)
            .filter(|identity| identity.email.eq_ignore_ascii_case(email));
        if let Some(identity) = &restored {
            tracing::info!("Restored session for {}", identity.email);
        }

        let (current, _) = watch::channel(restored);
        Self {
            email: email.to_string(),
            password: password.to_string(),
            session_path,
            current,
        }
    }

    fn load_session(path: &Path) -> Option<Identity> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {e}", path.display());
                None
            }
        }
    }

    fn save_session(&self, identity: &Identity) -> Result<(), StoreError> {
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.session_path, serde_json::to_string_pretty(identity)?)?;
        Ok(())
    }
}

#[async_trait]
impl IdentityService for LocalIdentityService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if !credentials.email.eq_ignore_ascii_case(&self.email) || credentials.password != self.password {
            tracing::info!("Rejected sign-in for {}", credentials.email);
            return Err(AuthError::InvalidCredentials);
        }

        let identity = Identity {
            uid: Uuid::new_v5(&Uuid::NAMESPACE_OID, self.email.to_ascii_lowercase().as_bytes())
                .to_string(),
            email: self.email.clone(),
        };
        self.save_session(&identity)?;
        self.current.send_replace(Some(identity.clone()));
        tracing::info!("Signed in as {}", identity.email);
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.current.send_replace(None);
        if self.session_path.exists() {
            fs::remove_file(&self.session_path).map_err(StoreError::from)?;
        }
        tracing::info!("Signed out");
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}
