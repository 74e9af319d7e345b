//! Stored login session.
//!
//! The session is an explicit value persisted as a single JSON file under
//! `~/.userhub/`: the server URL, the access token, and the last-known
//! identity. On startup the stored token's payload is decoded locally to
//! check expiry — no network round trip, no signature verification (the
//! server re-verifies on every request anyway).

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use userhub_core::PublicUser;

/// A stored login session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub server: String,
    pub access_token: String,
    pub user: PublicUser,
}

impl Session {
    /// `true` when the stored token's `exp` has passed (or can't be read).
    pub fn is_expired(&self) -> bool {
        token_is_expired(&self.access_token)
    }
}

fn session_path() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".userhub");
    fs::create_dir_all(&dir)?;
    Ok(dir.join("session.json"))
}

/// Loads the stored session, if any.
pub fn load_session() -> Result<Option<Session>> {
    let path = session_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(Some(session))
}

/// Persists the session.
pub fn save_session(session: &Session) -> Result<()> {
    let path = session_path()?;
    let content = serde_json::to_string_pretty(session)?;
    fs::write(path, content)?;
    Ok(())
}

/// Removes the stored session. Returns `true` if one existed.
pub fn clear_session() -> Result<bool> {
    let path = session_path()?;
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Checks a JWT's expiry by decoding its payload locally.
///
/// Unreadable tokens count as expired: the caller treats the session as
/// logged out rather than sending a doomed request.
pub fn token_is_expired(token: &str) -> bool {
    let Some(exp) = decode_exp(token) else {
        return true;
    };
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    exp <= now
}

fn decode_exp(token: &str) -> Option<u64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_u64()
}
