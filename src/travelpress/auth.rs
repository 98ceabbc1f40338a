//! Identity and ownership.
//!
//! The [`Authenticator`] trait stands in for a hosted identity service: it knows
//! who is signed in and can sign people in and out. Authoring is gated on a
//! signed-in user, and only an article's recorded owner may edit or delete it.

use crate::config::Account;
use crate::error::{PressError, Result};
use crate::model::Article;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
}

pub trait Authenticator {
    fn current_user(&self) -> Option<User>;

    fn sign_in(&mut self, email: &str, password: &str) -> Result<User>;

    fn sign_out(&mut self) -> Result<()>;
}

pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// The signed-in user, or `NotSignedIn`.
pub fn require_user<A: Authenticator + ?Sized>(auth: &A) -> Result<User> {
    auth.current_user().ok_or(PressError::NotSignedIn)
}

pub fn ensure_owner(user: &User, article: &Article) -> Result<()> {
    if user.uid != article.owner_id {
        return Err(PressError::PermissionDenied(format!(
            "{} is not the author of '{}'",
            user.email, article.title
        )));
    }
    Ok(())
}

/// Accounts from configuration, session kept in a small JSON file.
pub struct LocalAuthenticator {
    accounts: Vec<Account>,
    session_path: Option<PathBuf>,
    current: Option<User>,
}

impl LocalAuthenticator {
    /// Session lives only as long as this value.
    pub fn in_memory(accounts: Vec<Account>) -> Self {
        Self {
            accounts,
            session_path: None,
            current: None,
        }
    }

    /// Session persisted to `session_path`, restored if present.
    pub fn with_session_file(accounts: Vec<Account>, session_path: impl Into<PathBuf>) -> Result<Self> {
        let session_path = session_path.into();
        let current = if session_path.exists() {
            let content = fs::read_to_string(&session_path).map_err(PressError::Io)?;
            let user: User = serde_json::from_str(&content).map_err(PressError::Serialization)?;
            // A session for an account that was removed is not honored.
            accounts
                .iter()
                .any(|a| a.uid == user.uid)
                .then_some(user)
        } else {
            None
        };
        Ok(Self {
            accounts,
            session_path: Some(session_path),
            current,
        })
    }
}

impl Authenticator for LocalAuthenticator {
    fn current_user(&self) -> Option<User> {
        self.current.clone()
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<User> {
        let digest = hash_password(password);
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email.trim()) && a.password_sha256 == digest)
            .ok_or(PressError::InvalidCredentials)?;

        let user = User {
            uid: account.uid.clone(),
            email: account.email.clone(),
        };
        if let Some(path) = &self.session_path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(PressError::Io)?;
            }
            let content = serde_json::to_string_pretty(&user).map_err(PressError::Serialization)?;
            fs::write(path, content).map_err(PressError::Io)?;
        }
        tracing::info!(uid = %user.uid, "Signed in");
        self.current = Some(user.clone());
        Ok(user)
    }

    fn sign_out(&mut self) -> Result<()> {
        if let Some(path) = &self.session_path {
            if path.exists() {
                fs::remove_file(path).map_err(PressError::Io)?;
            }
        }
        self.current = None;
        Ok(())
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub const PASSWORD: &str = "mabuhay";

    pub fn account(uid: &str, email: &str) -> Account {
        Account {
            uid: uid.to_string(),
            email: email.to_string(),
            password_sha256: hash_password(PASSWORD),
        }
    }

    /// An authenticator with `uid-editor` already signed in.
    pub fn signed_in_editor() -> LocalAuthenticator {
        let mut auth = LocalAuthenticator::in_memory(vec![
            account("uid-editor", "editor@example.com"),
            account("uid-guest", "guest@example.com"),
        ]);
        auth.sign_in("editor@example.com", PASSWORD).unwrap();
        auth
    }
}
