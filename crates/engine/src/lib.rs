//! Armory engine library.
//!
//! Server-side code for the inventory backend.
//!
//! ## Structure
//!
//! - `use_cases/` - Inventory rules orchestrated over the repository ports
//! - `infrastructure/` - Ports, storage adapters, configuration and seeding
//! - `api/` - Controllers and HTTP routes
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
