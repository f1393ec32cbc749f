//! Port definitions (hexagonal architecture)
//!
//! The user service depends only on these traits, not on a concrete database.

mod repository;

pub use repository::{InsertOutcome, UpdateOutcome, UserRepository};
