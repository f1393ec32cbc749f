//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions.

pub mod logging;
pub mod migration;
mod user;

pub use logging::{LogEntry, LogStats, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use user::UserService;
