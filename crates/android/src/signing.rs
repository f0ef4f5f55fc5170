//! Release signing resolution
//!
//! The release build signs with an identity sourced from exactly one of
//! two providers, probed in priority order:
//!
//! 1. Environment variables (CI builds; `KEYSTORE_FILE` is the trigger)
//! 2. A local `key.properties` file (developer machines)
//!
//! When neither is available the release build falls back to the debug
//! identity. Resolution happens once per invocation, at configuration
//! time; the probed state is injected through [`SigningEnv`] so the
//! resolver itself reads no globals.

use crate::properties;
use adati_core::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the keystore path; its presence selects
/// the environment provider
pub const ENV_KEYSTORE_FILE: &str = "KEYSTORE_FILE";
/// Environment variable holding the keystore password
pub const ENV_KEYSTORE_PASSWORD: &str = "KEYSTORE_PASSWORD";
/// Environment variable holding the key alias
pub const ENV_KEY_ALIAS: &str = "KEY_ALIAS";
/// Environment variable holding the key password
pub const ENV_KEY_PASSWORD: &str = "KEY_PASSWORD";

/// Where a signing identity was sourced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningSource {
    /// CI-style configuration through `KEYSTORE_*` variables
    EnvironmentVariables,
    /// Local `key.properties` file
    LocalPropertiesFile,
    /// No release identity available
    None,
}

impl SigningSource {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningSource::EnvironmentVariables => "environment",
            SigningSource::LocalPropertiesFile => "key.properties",
            SigningSource::None => "none",
        }
    }
}

impl std::fmt::Display for SigningSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cryptographic signing identity for an artifact.
///
/// Immutable once resolved; there is no mutating API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningIdentity {
    /// Path to the keystore file
    pub store_file: PathBuf,
    /// Keystore password
    pub store_password: String,
    /// Alias of the signing key inside the keystore
    pub key_alias: String,
    /// Password of the signing key
    pub key_password: String,
}

impl SigningIdentity {
    /// Whether all four fields are non-empty.
    ///
    /// Environment-sourced identities may carry empty passwords; callers
    /// surface that as a warning before the identity reaches the
    /// packaging step.
    pub fn is_complete(&self) -> bool {
        !self.store_file.as_os_str().is_empty()
            && !self.store_password.is_empty()
            && !self.key_alias.is_empty()
            && !self.key_password.is_empty()
    }

    /// The Android SDK debug identity (`~/.android/debug.keystore`).
    ///
    /// This is what Gradle's implicit debug signing config uses, and the
    /// documented release fallback when no release identity resolves.
    pub fn debug_default() -> Self {
        let store_file = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".android")
            .join("debug.keystore");

        Self {
            store_file,
            store_password: "android".to_string(),
            key_alias: "androiddebugkey".to_string(),
            key_password: "android".to_string(),
        }
    }
}

/// Probed state the resolver runs against.
///
/// Built from the process environment in `main`, or constructed literally
/// in tests.
#[derive(Debug, Clone, Default)]
pub struct SigningEnv {
    /// Value of `KEYSTORE_FILE`, if set
    pub keystore_file: Option<String>,
    /// Value of `KEYSTORE_PASSWORD`, if set
    pub keystore_password: Option<String>,
    /// Value of `KEY_ALIAS`, if set
    pub key_alias: Option<String>,
    /// Value of `KEY_PASSWORD`, if set
    pub key_password: Option<String>,
    /// Candidate path of the local secrets file
    pub properties_path: PathBuf,
}

impl SigningEnv {
    /// Capture the current process environment
    pub fn from_process_env(properties_path: impl Into<PathBuf>) -> Self {
        Self {
            keystore_file: std::env::var(ENV_KEYSTORE_FILE).ok(),
            keystore_password: std::env::var(ENV_KEYSTORE_PASSWORD).ok(),
            key_alias: std::env::var(ENV_KEY_ALIAS).ok(),
            key_password: std::env::var(ENV_KEY_PASSWORD).ok(),
            properties_path: properties_path.into(),
        }
    }
}

/// A resolved identity together with the provider it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSigning {
    /// The identity to sign with
    pub identity: SigningIdentity,
    /// The provider that produced it
    pub source: SigningSource,
}

/// Resolve the release signing identity.
///
/// Probes the providers in priority order. Returns `Ok(None)` when no
/// provider is available; a present-but-malformed `key.properties` is a
/// hard failure naming the missing key.
pub fn resolve_signing_identity(env: &SigningEnv) -> Result<Option<ResolvedSigning>> {
    if let Some(store_file) = &env.keystore_file {
        // CI path: unset passwords become empty strings rather than
        // failing here. Completeness is reported, not enforced.
        let identity = SigningIdentity {
            store_file: PathBuf::from(store_file),
            store_password: env.keystore_password.clone().unwrap_or_default(),
            key_alias: env.key_alias.clone().unwrap_or_default(),
            key_password: env.key_password.clone().unwrap_or_default(),
        };

        return Ok(Some(ResolvedSigning {
            identity,
            source: SigningSource::EnvironmentVariables,
        }));
    }

    if env.properties_path.exists() {
        let identity = identity_from_properties(&env.properties_path)?;
        return Ok(Some(ResolvedSigning {
            identity,
            source: SigningSource::LocalPropertiesFile,
        }));
    }

    Ok(None)
}

/// Parse an identity out of a key.properties file.
///
/// All four recognized keys are required; a missing key is a
/// developer-environment misconfiguration and fails fast.
fn identity_from_properties(path: &Path) -> Result<SigningIdentity> {
    let map = properties::load_properties(path)?;

    let require = |key: &str| -> Result<String> {
        map.get(key)
            .cloned()
            .ok_or_else(|| Error::missing_property(key, path))
    };

    let store_file = require(properties::KEY_STORE_FILE)?;
    let store_password = require(properties::KEY_STORE_PASSWORD)?;
    let key_alias = require(properties::KEY_ALIAS)?;
    let key_password = require(properties::KEY_PASSWORD)?;

    Ok(SigningIdentity {
        store_file: PathBuf::from(shellexpand::tilde(&store_file).into_owned()),
        store_password,
        key_alias,
        key_password,
    })
}

/// Secret-free view of a resolution result, for display and JSON output
#[derive(Debug, Clone, Serialize)]
pub struct SigningReport {
    /// Provider the identity came from
    pub source: SigningSource,
    /// Keystore path, if an identity resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,
    /// Key alias, if an identity resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
    /// Whether the store password is non-empty
    pub store_password_set: bool,
    /// Whether the key password is non-empty
    pub key_password_set: bool,
    /// Whether all four identity fields are non-empty
    pub complete: bool,
}

impl SigningReport {
    /// Build a report from a resolution result
    pub fn from_resolution(resolved: Option<&ResolvedSigning>) -> Self {
        match resolved {
            Some(r) => Self {
                source: r.source,
                store_file: Some(r.identity.store_file.display().to_string()),
                key_alias: Some(r.identity.key_alias.clone()),
                store_password_set: !r.identity.store_password.is_empty(),
                key_password_set: !r.identity.key_password.is_empty(),
                complete: r.identity.is_complete(),
            },
            None => Self {
                source: SigningSource::None,
                store_file: None,
                key_alias: None,
                store_password_set: false,
                key_password_set: false,
                complete: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_properties(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_env_source_wins_over_present_file() {
        let file = write_properties(
            "storeFile=/file/keystore.jks\nstorePassword=filepass\nkeyAlias=filealias\nkeyPassword=filekey\n",
        );

        let env = SigningEnv {
            keystore_file: Some("/ci/release.keystore".to_string()),
            keystore_password: Some("cipass".to_string()),
            key_alias: Some("cialias".to_string()),
            key_password: Some("cikey".to_string()),
            properties_path: file.path().to_path_buf(),
        };

        let resolved = resolve_signing_identity(&env).unwrap().unwrap();
        assert_eq!(resolved.source, SigningSource::EnvironmentVariables);
        assert_eq!(resolved.identity.store_file, PathBuf::from("/ci/release.keystore"));
        assert_eq!(resolved.identity.key_alias, "cialias");
    }

    #[test]
    fn test_env_source_defaults_unset_passwords_to_empty() {
        let env = SigningEnv {
            keystore_file: Some("/ci/release.keystore".to_string()),
            ..Default::default()
        };

        let resolved = resolve_signing_identity(&env).unwrap().unwrap();
        assert_eq!(resolved.identity.store_password, "");
        assert_eq!(resolved.identity.key_password, "");
        assert!(!resolved.identity.is_complete());
    }

    #[test]
    fn test_file_source_matches_pairs_exactly() {
        let file = write_properties(
            "storePassword=sp\nkeyPassword=kp\nkeyAlias=upload\nstoreFile=/keys/release.jks\n",
        );

        let env = SigningEnv {
            properties_path: file.path().to_path_buf(),
            ..Default::default()
        };

        let resolved = resolve_signing_identity(&env).unwrap().unwrap();
        assert_eq!(resolved.source, SigningSource::LocalPropertiesFile);
        assert_eq!(resolved.identity.store_file, PathBuf::from("/keys/release.jks"));
        assert_eq!(resolved.identity.store_password, "sp");
        assert_eq!(resolved.identity.key_alias, "upload");
        assert_eq!(resolved.identity.key_password, "kp");
        assert!(resolved.identity.is_complete());
    }

    #[test]
    fn test_file_source_expands_tilde_in_store_file() {
        let file = write_properties(
            "storePassword=sp\nkeyPassword=kp\nkeyAlias=upload\nstoreFile=~/keys/release.jks\n",
        );

        let env = SigningEnv {
            properties_path: file.path().to_path_buf(),
            ..Default::default()
        };

        let resolved = resolve_signing_identity(&env).unwrap().unwrap();
        assert!(!resolved.identity.store_file.starts_with("~"));
    }

    #[test]
    fn test_missing_key_alias_fails_fast() {
        let file =
            write_properties("storePassword=sp\nkeyPassword=kp\nstoreFile=/keys/release.jks\n");

        let env = SigningEnv {
            properties_path: file.path().to_path_buf(),
            ..Default::default()
        };

        let err = resolve_signing_identity(&env).unwrap_err();
        assert_eq!(err.code, adati_core::ErrorCode::MissingProperty);
        assert!(err.message.contains("keyAlias"));
    }

    #[test]
    fn test_no_provider_resolves_to_none() {
        let env = SigningEnv {
            properties_path: PathBuf::from("/nonexistent/key.properties"),
            ..Default::default()
        };

        assert!(resolve_signing_identity(&env).unwrap().is_none());
    }

    #[test]
    fn test_debug_identity_is_complete() {
        let identity = SigningIdentity::debug_default();
        assert!(identity.is_complete());
        assert_eq!(identity.key_alias, "androiddebugkey");
        assert!(identity.store_file.ends_with(".android/debug.keystore"));
    }

    #[test]
    fn test_report_masks_secrets() {
        let resolved = ResolvedSigning {
            identity: SigningIdentity {
                store_file: "/keys/release.jks".into(),
                store_password: "verysecret".to_string(),
                key_alias: "upload".to_string(),
                key_password: "alsosecret".to_string(),
            },
            source: SigningSource::LocalPropertiesFile,
        };

        let report = SigningReport::from_resolution(Some(&resolved));
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("verysecret"));
        assert!(!json.contains("alsosecret"));
        assert!(json.contains("upload"));
        assert!(report.complete);
    }

    #[test]
    fn test_report_for_absent_resolution() {
        let report = SigningReport::from_resolution(None);
        assert_eq!(report.source, SigningSource::None);
        assert!(report.store_file.is_none());
        assert!(!report.complete);
    }
}
