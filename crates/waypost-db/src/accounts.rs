use std::sync::OnceLock;

use rusqlite::Connection;
use tracing::info;

use waypost_crypto::{PasswordDigest, hash_password, verify_password};
use waypost_types::models::Account;

use crate::error::{Result, StoreError};
use crate::models::UserRow;
use crate::{Database, OptionalExt};

impl Database {
    /// Register a new account. Every field is required; usernames are unique
    /// and case-sensitive.
    pub fn register(&self, username: &str, password: &str, email: &str, nickname: &str) -> Result<()> {
        if username.is_empty() || password.is_empty() || email.is_empty() || nickname.is_empty() {
            return Err(StoreError::Validation(
                "username, password, email and nickname are required".into(),
            ));
        }

        // Hash before taking the connection lock.
        let digest = hash_password(password).map_err(|e| StoreError::Hashing(e.to_string()))?;

        self.with_conn(|conn| {
            if query_user(conn, username)?.is_some() {
                return Err(StoreError::Duplicate(username.to_string()));
            }

            // The primary key on username is the authoritative duplicate guard.
            conn.execute(
                "INSERT INTO users (username, password, salt, email, nickname) VALUES (?1, ?2, ?3, ?4, ?5)",
                (username, &digest.hash, &digest.salt, email, nickname),
            )
            .map_err(|e| {
                if StoreError::is_constraint_violation(&e) {
                    StoreError::Duplicate(username.to_string())
                } else {
                    e.into()
                }
            })?;

            info!("Registered account {}", username);
            Ok(())
        })
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// both yield `false`, after the same amount of hashing work.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let Some(user) = self.with_conn(|conn| query_user(conn, username))? else {
            if let Some(decoy) = decoy_digest() {
                verify_password(password, &decoy.hash, &decoy.salt);
            }
            return Ok(false);
        };

        Ok(verify_password(password, &user.password, &user.salt))
    }

    pub fn find_account(&self, username: &str) -> Result<Option<Account>> {
        Ok(self
            .with_conn(|conn| query_user(conn, username))?
            .map(Account::from))
    }

    pub fn account_exists(&self, username: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM users WHERE username = ?1", [username], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }
}

/// Digest verified against when the username is unknown, so both failure
/// paths run one Argon2 derivation.
static DECOY: OnceLock<Option<PasswordDigest>> = OnceLock::new();

fn decoy_digest() -> Option<&'static PasswordDigest> {
    DECOY.get_or_init(|| hash_password("waypost-decoy").ok()).as_ref()
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {} FROM users WHERE username = ?1", UserRow::COLUMNS);
    let mut stmt = conn.prepare(&sql)?;

    stmt.query_row([username], UserRow::from_row).optional()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn register_and_authenticate() {
        let db = Database::open_in_memory().unwrap();
        db.register("alice", "pw1", "a@x.com", "Al").unwrap();

        assert!(db.authenticate("alice", "pw1").unwrap());
        assert!(!db.authenticate("alice", "wrong").unwrap());
        assert!(!db.authenticate("bob", "pw1").unwrap());
    }

    #[test]
    fn unknown_user_runs_a_full_verification() {
        let db = Database::open_in_memory().unwrap();

        assert!(!db.authenticate("ghost", "pw1").unwrap());

        let decoy = DECOY.get().unwrap().as_ref().unwrap();
        assert!(verify_password("waypost-decoy", &decoy.hash, &decoy.salt));
        // The decoy password itself never authenticates an unknown user.
        assert!(!db.authenticate("ghost", "waypost-decoy").unwrap());
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let db = Database::open_in_memory().unwrap();
        db.register("alice", "pw1", "a@x.com", "Al").unwrap();

        assert!(!db.authenticate("Alice", "pw1").unwrap());
        db.register("Alice", "pw2", "b@x.com", "Big Al").unwrap();
        assert!(db.authenticate("Alice", "pw2").unwrap());
    }

    #[test]
    fn empty_fields_are_rejected() {
        let db = Database::open_in_memory().unwrap();

        for (u, p, e, n) in [
            ("", "pw", "a@x.com", "Al"),
            ("alice", "", "a@x.com", "Al"),
            ("alice", "pw", "", "Al"),
            ("alice", "pw", "a@x.com", ""),
        ] {
            let err = db.register(u, p, e, n).unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)), "{:?}", err);
        }
        assert!(!db.account_exists("alice").unwrap());
    }

    #[test]
    fn duplicate_registration_keeps_original_account() {
        let db = Database::open_in_memory().unwrap();
        db.register("alice", "pw1", "a@x.com", "Al").unwrap();
        let before = db.find_account("alice").unwrap().unwrap();

        let err = db.register("alice", "pw2", "other@x.com", "Other").unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref name) if name == "alice"));

        let after = db.find_account("alice").unwrap().unwrap();
        assert_eq!(before, after);
        assert_eq!(after.email, "a@x.com");
        assert!(db.authenticate("alice", "pw1").unwrap());
        assert!(!db.authenticate("alice", "pw2").unwrap());
    }

    #[test]
    fn find_account_projects_stored_fields() {
        let db = Database::open_in_memory().unwrap();
        db.register("alice", "pw1", "a@x.com", "Al").unwrap();

        let account = db.find_account("alice").unwrap().unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.email, "a@x.com");
        assert_eq!(account.nickname, "Al");
        assert_ne!(account.password_hash, "pw1");
        assert!(!account.password_hash.is_empty());

        assert!(db.find_account("bob").unwrap().is_none());
    }

    #[test]
    fn constraint_maps_to_duplicate_without_app_check() {
        let db = Database::open_in_memory().unwrap();
        db.register("alice", "pw1", "a@x.com", "Al").unwrap();

        let err = db
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO users (username, password, salt, email, nickname) VALUES ('alice', 'h', 's', 'e', 'n')",
                    [],
                )?;
                Ok(())
            })
            .unwrap_err();
        match err {
            StoreError::Storage(ref e) => assert!(StoreError::is_constraint_violation(e)),
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[test]
    fn concurrent_registration_creates_one_account() {
        let db = Arc::new(Database::open_in_memory().unwrap());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let db = db.clone();
                thread::spawn(move || db.register("alice", &format!("pw{}", i), "a@x.com", "Al"))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let created = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::Duplicate(_))))
            .count();

        assert_eq!(created, 1);
        assert_eq!(duplicates, 3);

        let count: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(count, 1);
    }
}
