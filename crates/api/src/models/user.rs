//! User domain types.

use serde::Serialize;

use shopfast_core::{Email, UserId};

/// A shop account.
///
/// `is_authenticated` is a transient flag flipped by sign-in and sign-out.
/// It is not a session: any caller holding the same record sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub age: u32,
    pub is_authenticated: bool,
}

impl User {
    /// Create a signed-out user.
    #[must_use]
    pub const fn new(id: UserId, name: String, email: Email, age: u32) -> Self {
        Self {
            id,
            name,
            email,
            age,
            is_authenticated: false,
        }
    }
}
