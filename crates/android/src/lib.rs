//! Android-specific tools for Adati
//!
//! This crate provides the Android build-configuration functionality:
//! - Signing identity resolution (environment vs. key.properties)
//! - Build-variant parameter resolution
//! - key.properties parsing and generation
//! - Keystore inspection
//! - Gradle build system integration

#![warn(missing_docs)]

pub mod gradle;
pub mod keystore;
pub mod project;
pub mod properties;
pub mod signing;
pub mod variant;
