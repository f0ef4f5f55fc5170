//! Core utilities for Adati development tools
//!
//! This crate provides shared functionality used across the Adati build tools:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based project configuration with defaults
//! - **Process execution**: Safe command execution with captured output
//!
//! # Example
//!
//! ```rust,no_run
//! use adati_core::config::Config;
//! use adati_core::process::command_exists;
//!
//! let config = Config::load(None).expect("Failed to load config");
//! println!("Building {}", config.schema.project.application_id);
//!
//! if !command_exists("keytool") {
//!     eprintln!("keytool not available");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;

pub use error::{Error, ErrorCode, Result, ResultExt};
