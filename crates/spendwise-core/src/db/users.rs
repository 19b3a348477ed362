//! User accounts, credentials and budgets

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{normalize_email, NewUser, User};

const USER_COLUMNS: &str = "id, name, email, budget, created_at";

/// Hash a password into a PHC string with a fresh random salt
fn hash_password(password: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| Error::PasswordHash(format!("Failed to create salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> Result<bool> {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed = PasswordHash::new(stored)
        .map_err(|e| Error::PasswordHash(format!("Stored hash is malformed: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl Database {
    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(4)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            budget: row.get(3)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Register a new user
    ///
    /// Emails are compared case-insensitively; a second registration with the
    /// same address fails with [`Error::Conflict`].
    pub fn create_user(&self, new_user: &NewUser) -> Result<User> {
        new_user.validate()?;

        let email = normalize_email(&new_user.email);
        if self.get_user_by_email(&email)?.is_some() {
            return Err(Error::Conflict(format!(
                "A user with email {} already exists",
                email
            )));
        }

        let password_hash = hash_password(&new_user.password)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)",
            params![new_user.name.trim(), email, password_hash],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::Conflict(format!("A user with email {} already exists", email))
            }
            other => Error::Database(other),
        })?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} vanished after insert", id)))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by email (case-insensitive)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![normalize_email(email)],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Check an email/password pair
    ///
    /// Returns `None` for an unknown email or a wrong password.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let stored: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE email = ?",
                params![normalize_email(email)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        drop(conn);

        let Some((id, password_hash)) = stored else {
            return Ok(None);
        };

        if !verify_password(password, &password_hash)? {
            return Ok(None);
        }

        self.get_user(id)
    }

    /// Set or clear a user's budget
    pub fn update_budget(&self, user_id: i64, budget: Option<f64>) -> Result<User> {
        if let Some(limit) = budget {
            if !limit.is_finite() || limit < 0.0 {
                return Err(Error::InvalidData(
                    "Budget must be zero or a positive number".to_string(),
                ));
            }
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET budget = ? WHERE id = ?",
            params![budget, user_id],
        )?;
        drop(conn);

        if updated == 0 {
            return Err(Error::NotFound(format!("User {} not found", user_id)));
        }

        self.get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }

    /// Delete a user together with their transactions and sessions
    pub fn delete_user(&self, user_id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM users WHERE id = ?", params![user_id])?;
        Ok(deleted > 0)
    }

    /// List all users, oldest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY id ASC",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
