//! Account service.
//!
//! Registration, sign-in and sign-out on top of the account store.
//!
//! Sign-in is a placeholder: any password of four or more characters is
//! accepted for an existing email. It is demo behavior, not security, and is
//! kept that way on purpose so clients and load scripts written against it
//! keep working.

mod error;

pub use error::AuthError;

use tracing::{debug, info, instrument};

use shopfast_core::{Email, UserId};

use crate::db::Database;
use crate::models::User;

/// Account service.
pub struct AuthService<'a> {
    db: &'a Database,
}

impl<'a> AuthService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, name))]
    pub fn register(&self, name: String, email: &str, age: u32) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        // Uniqueness check and insert under the same guard
        let mut stores = self.db.write();
        if stores.accounts.get_by_email(email.as_str()).is_some() {
            return Err(AuthError::UserAlreadyExists);
        }
        let user = stores.accounts.create(name, email, age);

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the placeholder check fails.
    #[instrument(skip(self, password))]
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .db
            .write()
            .accounts
            .authenticate(email, password)
            .ok_or(AuthError::InvalidCredentials)?;

        debug!(user_id = %user.id, "User authenticated");
        Ok(user)
    }

    /// Clear a user's authenticated flag.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user does not exist.
    #[instrument(skip(self))]
    pub fn logout(&self, user_id: &UserId) -> Result<User, AuthError> {
        self.db
            .write()
            .accounts
            .set_authenticated(user_id, false)
            .ok_or(AuthError::UserNotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_duplicate_email() {
        let db = Database::seeded();
        let auth = AuthService::new(&db);

        let err = auth
            .register("Dup".to_string(), "daniel@example.com", 30)
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));

        let user = auth
            .register("Bia".to_string(), "bia@example.com", 30)
            .unwrap();
        assert_eq!(user.id.as_str(), "6");
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let db = Database::seeded();
        let err = AuthService::new(&db)
            .register("X".to_string(), "not-an-email", 30)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }

    #[test]
    fn test_authenticate_and_logout() {
        let db = Database::seeded();
        let auth = AuthService::new(&db);

        let user = auth.authenticate("maria@example.com", "1234").unwrap();
        assert_eq!(user.id.as_str(), "3");
        assert!(user.is_authenticated);

        let user = auth.logout(&UserId::new("3")).unwrap();
        assert!(!user.is_authenticated);

        assert!(matches!(
            auth.authenticate("maria@example.com", "123"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.logout(&UserId::new("77")),
            Err(AuthError::UserNotFound)
        ));
    }
}
