//! Transaction CRUD, always scoped to the owning user

use rusqlite::{params, params_from_iter, OptionalExtension};
use tracing::debug;

use super::{parse_datetime, Database, TransactionFilter};
use crate::error::{Error, Result};
use crate::models::{Category, NewTransaction, Transaction, TransactionType, TransactionUpdate};

const TRANSACTION_COLUMNS: &str = "id, owner_id, title, amount, category, type, date, created_at";

impl Database {
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let category_str: String = row.get(4)?;
        let type_str: String = row.get(5)?;
        let date_str: String = row.get(6)?;
        let created_at_str: String = row.get(7)?;

        let category: Category = category_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(Error::InvalidData(e)),
            )
        })?;
        let transaction_type: TransactionType = type_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(Error::InvalidData(e)),
            )
        })?;
        let date = chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Transaction {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            amount: row.get(3)?,
            category,
            transaction_type,
            date,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Insert a transaction for a user
    pub fn insert_transaction(&self, owner_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        tx.validate()?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (owner_id, title, amount, category, type, date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                owner_id,
                tx.title.trim(),
                tx.amount,
                tx.category.as_str(),
                tx.transaction_type.as_str(),
                tx.date.to_string(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        debug!(owner_id, id, "Transaction inserted");

        self.get_transaction(owner_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {} vanished after insert", id)))
    }

    /// Get a single transaction, if it exists and belongs to `owner_id`
    pub fn get_transaction(&self, owner_id: i64, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let transaction = conn
            .query_row(
                &format!(
                    "SELECT {} FROM transactions WHERE id = ? AND owner_id = ?",
                    TRANSACTION_COLUMNS
                ),
                params![id, owner_id],
                Self::row_to_transaction,
            )
            .optional()?;

        Ok(transaction)
    }

    /// List one page of a user's transactions, newest first
    pub fn list_transactions(
        &self,
        owner_id: i64,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let built = filter.build(owner_id);
        let sql = format!(
            "SELECT {} FROM transactions {} ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS, built.where_clause
        );

        let mut params = built.params;
        params.push(Box::new(filter.effective_limit()));
        params.push(Box::new(filter.effective_offset()));

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(
                params_from_iter(params.iter().map(|p| p.as_ref())),
                Self::row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Count a user's transactions matching the filter, ignoring paging
    pub fn count_transactions(&self, owner_id: i64, filter: &TransactionFilter) -> Result<i64> {
        let built = filter.build(owner_id);
        let sql = format!("SELECT COUNT(*) FROM transactions {}", built.where_clause);

        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            &sql,
            params_from_iter(built.params.iter().map(|p| p.as_ref())),
            |row| row.get(0),
        )?;

        Ok(count)
    }

    /// Every transaction a user owns, newest first
    pub fn all_transactions(&self, owner_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE owner_id = ? ORDER BY date DESC, id DESC",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![owner_id], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Apply a partial update
    ///
    /// Returns `None` when the transaction does not exist or is not owned by
    /// `owner_id`. An empty update returns the row unchanged.
    pub fn update_transaction(
        &self,
        owner_id: i64,
        id: i64,
        update: &TransactionUpdate,
    ) -> Result<Option<Transaction>> {
        update.validate()?;

        let Some(existing) = self.get_transaction(owner_id, id)? else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(existing));
        }

        let title = update
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.title);
        let amount = update.amount.unwrap_or(existing.amount);
        let category = update.category.unwrap_or(existing.category);
        let transaction_type = update.transaction_type.unwrap_or(existing.transaction_type);
        let date = update.date.unwrap_or(existing.date);

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE transactions
            SET title = ?, amount = ?, category = ?, type = ?, date = ?
            WHERE id = ? AND owner_id = ?
            "#,
            params![
                title,
                amount,
                category.as_str(),
                transaction_type.as_str(),
                date.to_string(),
                id,
                owner_id,
            ],
        )?;
        drop(conn);

        self.get_transaction(owner_id, id)
    }

    /// Delete a transaction; false when missing or not owned
    pub fn delete_transaction(&self, owner_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )?;
        Ok(deleted > 0)
    }
}
