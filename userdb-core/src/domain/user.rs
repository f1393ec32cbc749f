//! User domain model

use std::fmt;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Username of the record created by `initialize`
pub const SEED_USERNAME: &str = "bob";
/// Email of the record created by `initialize`
pub const SEED_EMAIL: &str = "bob@mail.com";
/// Password of the record created by `initialize`
pub const SEED_PASSWORD: &str = "bobpass";

/// A stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate key assigned by the database sequence
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Stored exactly as given
    pub password: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={} username='{}' email='{}' password='{}'",
            self.id, self.username, self.email, self.password
        )
    }
}

/// Insert payload for a user that does not have an id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// The fixed record inserted when the store is initialized
    pub fn seed() -> Self {
        Self::new(SEED_USERNAME, SEED_EMAIL, SEED_PASSWORD)
    }

    /// Check the fields the schema requires to be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::validation("username must not be empty"));
        }
        validate_email(&self.email)
    }

    /// Attach the id assigned by the store
    pub fn with_id(self, id: i64) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password: self.password,
        }
    }
}

/// Emails are only required to be non-empty
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(Error::validation("email must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_creation() {
        let user = NewUser::new("alice", "a@x.com", "secret");
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.password, "secret");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_seed_user() {
        let seed = NewUser::seed();
        assert_eq!(seed.username, "bob");
        assert_eq!(seed.email, "bob@mail.com");
        assert_eq!(seed.password, "bobpass");
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let err = NewUser::new("", "a@x.com", "pw").validate().unwrap_err();
        assert!(err.to_string().contains("username"));

        let err = NewUser::new("alice", "", "pw").validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_empty_password_is_allowed() {
        assert!(NewUser::new("alice", "a@x.com", "").validate().is_ok());
    }

    #[test]
    fn test_with_id_and_display() {
        let user = NewUser::new("alice", "a@x.com", "pw").with_id(7);
        assert_eq!(user.id, 7);
        assert_eq!(
            user.to_string(),
            "id=7 username='alice' email='a@x.com' password='pw'"
        );
    }
}
