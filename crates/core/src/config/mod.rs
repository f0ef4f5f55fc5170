//! Configuration loading and schema definitions
//!
//! Project configuration for the Adati build tools.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
