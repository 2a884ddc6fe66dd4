// SPDX-License-Identifier: MPL-2.0

use crate::config::APP_ID;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const CSRF_ENV: &str = "MURMUR_CSRF_TOKEN";
const SESSION_ENV: &str = "MURMUR_SESSION_ID";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
    #[error("invalid session data: {0}")]
    InvalidData(String),
}

/// Credentials the host hands to the client: the anti-forgery token for
/// mutating requests and the server session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl Credentials {
    /// Get the credentials file path (~/.config/io.github.murmur.Murmur/credentials.json)
    fn credentials_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_ID);
            p.push("credentials.json");
            p
        })
    }

    pub fn load() -> Result<Self, SessionError> {
        let path = Self::credentials_path().ok_or(SessionError::NotFound)?;
        let contents = std::fs::read_to_string(&path).map_err(|_| SessionError::NotFound)?;
        Self::parse(&contents)
    }

    /// Load from disk, then let the environment override individual values.
    /// Missing credentials are not an error; the viewer is simply anonymous.
    pub fn resolve() -> Self {
        let mut credentials = match Self::load() {
            Ok(credentials) => credentials,
            Err(SessionError::NotFound) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring stored credentials: {e}");
                Self::default()
            }
        };

        if let Ok(token) = std::env::var(CSRF_ENV) {
            credentials.csrf_token = Some(token);
        }
        if let Ok(session) = std::env::var(SESSION_ENV) {
            credentials.session_id = Some(session);
        }

        credentials
    }

    fn parse(contents: &str) -> Result<Self, SessionError> {
        serde_json::from_str(contents).map_err(|e| SessionError::InvalidData(e.to_string()))
    }

    /// A session id means the server knows who we are.
    pub fn is_authenticated(&self) -> bool {
        self.session_id.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Value for the `Cookie` header, if there is anything to send.
    pub fn cookie_header(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(session) = self.session_id.as_deref() {
            parts.push(format!("sessionid={session}"));
        }
        if let Some(token) = self.csrf_token.as_deref() {
            parts.push(format!("csrftoken={token}"));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
