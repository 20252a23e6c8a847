//! API layer - HTTP entry points.

pub mod controllers;
pub mod http;

pub use controllers::Controllers;
