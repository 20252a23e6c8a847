//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for database access (in-memory arena store or SQLite).

mod error;
mod repos;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CatalogRepo, CharacterRepo, ItemRepo, UserRepo};

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockCatalogRepo, MockCharacterRepo, MockItemRepo, MockUserRepo};

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
