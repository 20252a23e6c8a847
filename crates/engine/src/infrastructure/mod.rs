//! Infrastructure implementations.
//!
//! Contains the repository ports and their storage adapters, plus process
//! configuration and the seed loader.

pub mod config;
pub mod memory;
pub mod ports;
pub mod seed;
pub mod sqlite;
