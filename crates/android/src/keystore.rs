//! Keystore inspection
//!
//! Validates that a resolved identity actually opens its keystore, using
//! the JDK `keytool`. Used by the `signing --validate` and `doctor`
//! commands; the resolver itself never touches the keystore.

use crate::signing::SigningIdentity;
use adati_core::error::{Error, ErrorCode, Result};
use adati_core::process::{command_exists, run_command};

/// Keystore container format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystoreType {
    /// Legacy Java keystore
    Jks,
    /// PKCS#12 container
    Pkcs12,
}

impl KeystoreType {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Pkcs12 => "pkcs12",
        }
    }
}

impl std::fmt::Display for KeystoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a keystore validation
#[derive(Debug, Clone)]
pub struct KeystoreCheck {
    /// Detected container format
    pub keystore_type: KeystoreType,
    /// Whether the configured alias exists in the keystore
    pub alias_exists: bool,
}

/// Detect the keystore type from its magic bytes.
///
/// JKS files start with `FE ED FE ED`; anything else is treated as
/// PKCS#12.
pub fn detect_keystore_type(data: &[u8]) -> KeystoreType {
    if data.len() >= 4 && data[0] == 0xFE && data[1] == 0xED && data[2] == 0xFE && data[3] == 0xED {
        return KeystoreType::Jks;
    }

    KeystoreType::Pkcs12
}

/// Validate that the identity's keystore opens and its alias exists
pub fn validate_keystore(identity: &SigningIdentity) -> Result<KeystoreCheck> {
    if !command_exists("keytool") {
        return Err(Error::command_not_found("keytool"));
    }

    if !identity.store_file.exists() {
        return Err(Error::new(
            ErrorCode::KeystoreNotFound,
            format!("Keystore not found: {}", identity.store_file.display()),
        )
        .with_suggestion("Check the storeFile path in key.properties or KEYSTORE_FILE"));
    }

    let data = std::fs::read(&identity.store_file)?;
    let keystore_type = detect_keystore_type(&data);

    let store_file = identity.store_file.display().to_string();
    let result = run_command(
        "keytool",
        &[
            "-list",
            "-keystore",
            &store_file,
            "-storepass",
            &identity.store_password,
            "-alias",
            &identity.key_alias,
        ],
    )?;

    if !result.success {
        return Err(classify_keytool_failure(&result.stderr, &identity.key_alias));
    }

    Ok(KeystoreCheck {
        keystore_type,
        alias_exists: true,
    })
}

/// Map keytool stderr to a domain error
fn classify_keytool_failure(stderr: &str, alias: &str) -> Error {
    if stderr.contains("keystore password was incorrect") {
        return Error::new(
            ErrorCode::InvalidKeystorePassword,
            "Invalid keystore password",
        )
        .with_suggestion("Check storePassword in key.properties or KEYSTORE_PASSWORD");
    }

    if stderr.contains("does not exist") {
        return Error::new(
            ErrorCode::AliasNotFound,
            format!("Alias '{}' not found in keystore", alias),
        )
        .with_suggestion("List aliases with: keytool -list -keystore <store>");
    }

    if stderr.contains("Invalid keystore format") {
        return Error::new(ErrorCode::InvalidKeystoreFormat, "Invalid keystore format");
    }

    Error::signing(format!("Failed to validate keystore: {}", stderr.trim()))
}
