//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
        }
    }

    fn expense(title: &str, amount: f64, category: Category, day: u32) -> NewTransaction {
        NewTransaction {
            title: title.to_string(),
            amount,
            category,
            transaction_type: TransactionType::Expense,
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
        }
    }

    fn income(title: &str, amount: f64, day: u32) -> NewTransaction {
        NewTransaction {
            title: title.to_string(),
            amount,
            category: Category::Salary,
            transaction_type: TransactionType::Income,
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_users().unwrap().is_empty());
        assert!(db.list_audit_log(10).unwrap().is_empty());
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'owner_id', 'title', 'amount', 'category', 'type', 'date', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 8, "transactions table should have 8 expected columns");
    }

    #[test]
    fn test_create_and_fetch_user() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("Asha@Example.com")).unwrap();

        assert!(user.id > 0);
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.budget, None);

        let by_email = db.get_user_by_email("ASHA@example.COM").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(db.get_user(user.id).unwrap().unwrap(), by_email);
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let db = Database::in_memory().unwrap();
        db.create_user(&new_user("dup@example.com")).unwrap();

        let err = db.create_user(&new_user(" DUP@example.com ")).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_registration_rejected() {
        let db = Database::in_memory().unwrap();
        let mut user = new_user("short@example.com");
        user.password = "12345".to_string();

        let err = db.create_user(&user).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_verify_credentials() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("login@example.com")).unwrap();

        let ok = db
            .verify_credentials("LOGIN@example.com", "hunter22")
            .unwrap();
        assert_eq!(ok.map(|u| u.id), Some(user.id));

        assert!(db
            .verify_credentials("login@example.com", "wrong-password")
            .unwrap()
            .is_none());
        assert!(db
            .verify_credentials("nobody@example.com", "hunter22")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let db = Database::in_memory().unwrap();
        db.create_user(&new_user("hash@example.com")).unwrap();

        let conn = db.conn().unwrap();
        let stored: String = conn
            .query_row(
                "SELECT password_hash FROM users WHERE email = 'hash@example.com'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(!stored.contains("hunter22"));
    }

    #[test]
    fn test_update_budget() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("budget@example.com")).unwrap();

        let updated = db.update_budget(user.id, Some(1500.0)).unwrap();
        assert_eq!(updated.budget, Some(1500.0));

        let cleared = db.update_budget(user.id, None).unwrap();
        assert_eq!(cleared.budget, None);

        assert!(matches!(
            db.update_budget(user.id, Some(-1.0)).unwrap_err(),
            Error::InvalidData(_)
        ));
        assert!(matches!(
            db.update_budget(9999, Some(10.0)).unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn test_transaction_crud() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("crud@example.com")).unwrap();

        let tx = db
            .insert_transaction(user.id, &expense("  Groceries ", 42.5, Category::Food, 3))
            .unwrap();
        assert_eq!(tx.title, "Groceries");
        assert_eq!(tx.owner_id, user.id);
        assert_eq!(tx.category, Category::Food);

        let fetched = db.get_transaction(user.id, tx.id).unwrap().unwrap();
        assert_eq!(fetched, tx);

        let update = TransactionUpdate {
            amount: Some(50.0),
            category: Some(Category::Shopping),
            ..Default::default()
        };
        let updated = db.update_transaction(user.id, tx.id, &update).unwrap().unwrap();
        assert_eq!(updated.amount, 50.0);
        assert_eq!(updated.category, Category::Shopping);
        assert_eq!(updated.title, "Groceries");
        assert_eq!(updated.date, tx.date);

        assert!(db.delete_transaction(user.id, tx.id).unwrap());
        assert!(!db.delete_transaction(user.id, tx.id).unwrap());
        assert!(db.get_transaction(user.id, tx.id).unwrap().is_none());
    }

    #[test]
    fn test_insert_rejects_bad_amount() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("bad@example.com")).unwrap();

        let err = db
            .insert_transaction(user.id, &expense("Nothing", 0.0, Category::Food, 1))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(db.all_transactions(user.id).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_category_is_a_read_error() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("corrupt@example.com")).unwrap();
        let tx = db
            .insert_transaction(user.id, &expense("Snack", 5.0, Category::Food, 1))
            .unwrap();

        db.conn()
            .unwrap()
            .execute(
                "UPDATE transactions SET category = 'Gadgets' WHERE id = ?",
                rusqlite::params![tx.id],
            )
            .unwrap();

        let err = db.get_transaction(user.id, tx.id).unwrap_err();
        assert!(matches!(
            err,
            Error::Database(rusqlite::Error::FromSqlConversionFailure(4, _, _))
        ));
    }

    #[test]
    fn test_transactions_are_owner_scoped() {
        let db = Database::in_memory().unwrap();
        let alice = db.create_user(&new_user("alice@example.com")).unwrap();
        let bob = db.create_user(&new_user("bob@example.com")).unwrap();

        let tx = db
            .insert_transaction(alice.id, &expense("Taxi", 20.0, Category::Transport, 2))
            .unwrap();

        assert!(db.get_transaction(bob.id, tx.id).unwrap().is_none());
        assert!(db
            .update_transaction(
                bob.id,
                tx.id,
                &TransactionUpdate {
                    amount: Some(1.0),
                    ..Default::default()
                }
            )
            .unwrap()
            .is_none());
        assert!(!db.delete_transaction(bob.id, tx.id).unwrap());
        assert!(db.all_transactions(bob.id).unwrap().is_empty());
        assert_eq!(db.all_transactions(alice.id).unwrap().len(), 1);
    }

    #[test]
    fn test_list_order_and_filters() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("list@example.com")).unwrap();

        db.insert_transaction(user.id, &income("Paycheck", 3000.0, 1))
            .unwrap();
        db.insert_transaction(user.id, &expense("Lunch", 12.0, Category::Food, 5))
            .unwrap();
        db.insert_transaction(user.id, &expense("Dinner", 30.0, Category::Food, 5))
            .unwrap();
        db.insert_transaction(user.id, &expense("Bus pass", 45.0, Category::Transport, 9))
            .unwrap();

        let all = db
            .list_transactions(user.id, &TransactionFilter::new())
            .unwrap();
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        // Same-day rows fall back to newest id first
        assert_eq!(titles, vec!["Bus pass", "Dinner", "Lunch", "Paycheck"]);

        let food = TransactionFilter::new().category(Some(Category::Food));
        assert_eq!(db.count_transactions(user.id, &food).unwrap(), 2);

        let incomes = TransactionFilter::new().transaction_type(Some(TransactionType::Income));
        let rows = db.list_transactions(user.id, &incomes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Paycheck");

        let ranged = TransactionFilter::new().date_range(
            NaiveDate::from_ymd_opt(2024, 4, 2),
            NaiveDate::from_ymd_opt(2024, 4, 5),
        );
        assert_eq!(db.count_transactions(user.id, &ranged).unwrap(), 2);

        let search = TransactionFilter::new().search(Some("DIN".to_string()));
        let rows = db.list_transactions(user.id, &search).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Dinner");

        let page = TransactionFilter::new().limit(Some(2)).offset(Some(1));
        let rows = db.list_transactions(user.id, &page).unwrap();
        let titles: Vec<&str> = rows.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Dinner", "Lunch"]);
        assert_eq!(db.count_transactions(user.id, &page).unwrap(), 4);
    }

    #[test]
    fn test_sessions() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("session@example.com")).unwrap();

        let token = db.create_session(user.id, Duration::hours(1)).unwrap();
        let resolved = db.get_session_user(&token).unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        assert!(db.get_session_user("not-a-token").unwrap().is_none());

        assert!(db.delete_session(&token).unwrap());
        assert!(db.get_session_user(&token).unwrap().is_none());
    }

    #[test]
    fn test_expired_sessions_ignored_and_purged() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("expired@example.com")).unwrap();

        let stale = db.create_session(user.id, Duration::hours(-1)).unwrap();
        let fresh = db.create_session(user.id, Duration::hours(1)).unwrap();

        assert!(db.get_session_user(&stale).unwrap().is_none());
        assert_eq!(db.purge_expired_sessions().unwrap(), 1);
        assert!(db.get_session_user(&fresh).unwrap().is_some());
    }

    #[test]
    fn test_session_lifetime_overflow_rejected() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("forever@example.com")).unwrap();

        let result = db.create_session(user.id, Duration::hours(10_000_000_000));
        assert!(matches!(result, Err(crate::error::Error::InvalidData(_))));
    }

    #[test]
    fn test_token_stored_hashed() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("digest@example.com")).unwrap();
        let token = db.create_session(user.id, Duration::hours(1)).unwrap();

        let conn = db.conn().unwrap();
        let stored: String = conn
            .query_row("SELECT token_hash FROM sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, hash_token(&token));
        assert_ne!(stored, token);
    }

    #[test]
    fn test_delete_user_cascades() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user(&new_user("gone@example.com")).unwrap();
        db.insert_transaction(user.id, &expense("Movie", 15.0, Category::Entertainment, 4))
            .unwrap();
        let token = db.create_session(user.id, Duration::hours(1)).unwrap();

        assert!(db.delete_user(user.id).unwrap());

        let conn = db.conn().unwrap();
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
        drop(conn);
        assert!(db.get_session_user(&token).unwrap().is_none());
    }

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();

        db.log_audit("a@example.com", "create", Some("transaction"), Some(1), None)
            .unwrap();
        db.log_audit("b@example.com", "login", None, None, Some("from cli"))
            .unwrap();
        db.log_audit("a@example.com", "delete", Some("transaction"), Some(1), None)
            .unwrap();

        let all = db.list_audit_log(10).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].action, "delete");

        let mine = db.list_audit_log_for_user("a@example.com", 10).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|e| e.user_email == "a@example.com"));

        assert_eq!(db.list_audit_log(1).unwrap().len(), 1);
    }

    #[test]
    fn test_unencrypted_database_reports_plain() {
        let db = Database::in_memory().unwrap();
        assert!(!db.is_encrypted());
    }

    #[test]
    fn test_encrypted_database_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enc.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new_with_key(path, Some("correct horse")).unwrap();
            db.create_user(&new_user("enc@example.com")).unwrap();
        }

        let reopened = Database::new_with_key(path, Some("correct horse")).unwrap();
        assert!(reopened.is_encrypted());
        assert!(reopened
            .get_user_by_email("enc@example.com")
            .unwrap()
            .is_some());

        assert!(Database::new_with_key(path, Some("wrong passphrase")).is_err());
    }
}
