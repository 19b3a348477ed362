//! Bearer token sessions
//!
//! Tokens are random UUIDs handed to the client once; only their SHA-256
//! digest is stored.

use chrono::{Duration, Utc};
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{format_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// Hex SHA-256 of a session token
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

impl Database {
    /// Start a session for a user and return the bearer token
    pub fn create_session(&self, user_id: i64, ttl: Duration) -> Result<String> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::InvalidData(format!("Session lifetime {} is too long", ttl)))?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?, ?, ?)",
            params![hash_token(&token), user_id, format_datetime(&expires_at)],
        )?;

        debug!(user_id, "Session created");
        Ok(token)
    }

    /// Resolve a token to its user; expired or unknown tokens yield `None`
    pub fn get_session_user(&self, token: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user_id: Option<i64> = conn
            .query_row(
                "SELECT user_id FROM sessions WHERE token_hash = ? AND expires_at > ?",
                params![hash_token(token), format_datetime(&Utc::now())],
                |row| row.get(0),
            )
            .optional()?;
        drop(conn);

        match user_id {
            Some(id) => self.get_user(id),
            None => Ok(None),
        }
    }

    /// End a session; false when the token was unknown
    pub fn delete_session(&self, token: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?",
            params![hash_token(token)],
        )?;
        Ok(deleted > 0)
    }

    /// Remove expired sessions, returning how many were dropped
    pub fn purge_expired_sessions(&self) -> Result<usize> {
        let conn = self.conn()?;
        let purged = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?",
            params![format_datetime(&Utc::now())],
        )?;
        if purged > 0 {
            debug!(purged, "Expired sessions purged");
        }
        Ok(purged)
    }
}
