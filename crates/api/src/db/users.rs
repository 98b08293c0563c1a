//! Account store.

use shopfast_core::{Email, UserId};

use super::Table;
use crate::models::User;

/// Minimum password length, in UTF-16 code units, accepted by
/// [`Accounts::authenticate`].
const MIN_PASSWORD_LENGTH: usize = 4;

/// In-memory user accounts.
#[derive(Debug, Default)]
pub struct Accounts {
    users: Table<UserId, User>,
    last_id: u64,
}

impl Accounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an existing record (seeding). Keeps the id counter ahead of any
    /// numeric id inserted this way.
    pub fn insert(&mut self, user: User) {
        if let Ok(seq) = user.id.as_str().parse::<u64>() {
            self.last_id = self.last_id.max(seq);
        }
        self.users.insert(user.id.clone(), user);
    }

    #[must_use]
    pub fn get_by_id(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// Exact, case-sensitive email match.
    #[must_use]
    pub fn get_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email.as_str() == email)
    }

    /// All users in creation order.
    #[must_use]
    pub fn all(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    /// Create an account with the next sequential id.
    ///
    /// Email uniqueness is the caller's job; this store does not check it.
    pub fn create(&mut self, name: String, email: Email, age: u32) -> User {
        self.last_id += 1;
        let user = User::new(UserId::from_seq(self.last_id), name, email, age);
        self.users.insert(user.id.clone(), user.clone());
        user
    }

    /// Replace a user's name and age.
    pub fn update(&mut self, id: &UserId, name: String, age: u32) -> Option<User> {
        let user = self.users.get_mut(id)?;
        user.name = name;
        user.age = age;
        Some(user.clone())
    }

    /// Delete an account. Ids are never handed out again.
    pub fn delete(&mut self, id: &UserId) -> bool {
        self.users.remove(id).is_some()
    }

    /// The placeholder credential check used by sign-in and checkout.
    ///
    /// Succeeds when `email` contains `@`, `password` is at least
    /// [`MIN_PASSWORD_LENGTH`] UTF-16 code units long, and an account with that
    /// email exists. The password itself is never compared against anything. On
    /// success the stored record is flagged as authenticated.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Option<User> {
        if !Email::looks_like_login(email)
            || password.encode_utf16().count() < MIN_PASSWORD_LENGTH
        {
            return None;
        }
        let id = self.get_by_email(email)?.id.clone();
        self.set_authenticated(&id, true)
    }

    /// Flip the transient authenticated flag.
    pub fn set_authenticated(&mut self, id: &UserId, authenticated: bool) -> Option<User> {
        let user = self.users.get_mut(id)?;
        user.is_authenticated = authenticated;
        Some(user.clone())
    }
}
