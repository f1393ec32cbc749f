//! User service - the user store access layer
//!
//! One method per command. Absent users and taken usernames come back as
//! values; only unexpected storage failures are errors.

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{validate_email, NewUser, Page, User};
use crate::ports::{InsertOutcome, UpdateOutcome, UserRepository};

/// User service over any repository implementation
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Destroy all data, recreate the schema and insert the seed user
    pub fn initialize(&self) -> Result<User> {
        self.repository.reset_with_seed(&NewUser::seed())
    }

    /// Exact lookup by username
    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        self.repository.find_by_username(username)
    }

    pub fn get_all_users(&self) -> Result<Vec<User>> {
        self.repository.find_all()
    }

    /// Replace a user's email
    ///
    /// The new email must be non-empty and must not belong to another user.
    pub fn change_email(&self, username: &str, new_email: &str) -> Result<UpdateOutcome> {
        validate_email(new_email)?;
        self.repository.update_email(username, new_email)
    }

    /// Insert a user; a taken username or email yields `InsertOutcome::Conflict`
    pub fn create_user(&self, user: &NewUser) -> Result<InsertOutcome> {
        user.validate()?;
        self.repository.insert(user)
    }

    /// Returns false when no user has this username
    pub fn delete_user(&self, username: &str) -> Result<bool> {
        self.repository.delete_by_username(username)
    }

    /// Users whose username or email contains `query`
    pub fn search_users(&self, query: &str) -> Result<Vec<User>> {
        self.repository.search(query)
    }

    pub fn list_users(&self, page: Page) -> Result<Vec<User>> {
        self.repository.list(page)
    }

    pub fn count(&self) -> Result<i64> {
        self.repository.count()
    }
}
