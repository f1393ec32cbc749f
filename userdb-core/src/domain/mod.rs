//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O.

mod page;
pub mod result;
mod user;

pub use page::{Page, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use user::{validate_email, NewUser, User, SEED_EMAIL, SEED_PASSWORD, SEED_USERNAME};
