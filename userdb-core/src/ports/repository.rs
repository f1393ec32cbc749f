//! Repository port - user store abstraction

use crate::domain::result::Result;
use crate::domain::{NewUser, Page, User};

/// Outcome of inserting a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(User),
    /// Username or email collided with an existing record; nothing was written
    Conflict,
}

/// Outcome of changing a user's email
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(User),
    NotFound,
    /// The new email belongs to another record; nothing was written
    Conflict,
}

/// User store abstraction
///
/// Every method runs as one scoped transaction: it commits on success and
/// rolls back on every other exit path.
pub trait UserRepository: Send + Sync {
    // === Schema ===

    /// Run any pending migrations
    fn ensure_schema(&self) -> Result<()>;

    /// Drop every table, recreate the schema and insert `seed`
    fn reset_with_seed(&self, seed: &NewUser) -> Result<User>;

    // === Reads ===

    /// Exact match on username
    fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Every record, in id order
    fn find_all(&self) -> Result<Vec<User>>;

    /// Records whose username or email contains `query`
    fn search(&self, query: &str) -> Result<Vec<User>>;

    /// One page of records, in id order
    fn list(&self, page: Page) -> Result<Vec<User>>;

    /// Total number of records
    fn count(&self) -> Result<i64>;

    // === Writes ===

    fn insert(&self, user: &NewUser) -> Result<InsertOutcome>;

    fn update_email(&self, username: &str, email: &str) -> Result<UpdateOutcome>;

    /// Returns false when no record has this username
    fn delete_by_username(&self, username: &str) -> Result<bool>;
}
