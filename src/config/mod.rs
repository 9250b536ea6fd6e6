//! Configuration module for pixelmatch
//!
//! Provides types and loading for `pixelmatch.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
