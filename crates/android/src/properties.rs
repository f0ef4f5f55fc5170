//! key.properties parsing and generation
//!
//! The Gradle build reads release signing configuration from a
//! line-oriented `key=value` file at `android/key.properties`. This module
//! parses the subset of the Java properties format that file uses, and
//! renders the canonical file for CI flows that materialize secrets from
//! the environment.

use crate::signing::SigningIdentity;
use adati_core::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Recognized key for the keystore path
pub const KEY_STORE_FILE: &str = "storeFile";
/// Recognized key for the keystore password
pub const KEY_STORE_PASSWORD: &str = "storePassword";
/// Recognized key for the key alias
pub const KEY_ALIAS: &str = "keyAlias";
/// Recognized key for the key password
pub const KEY_PASSWORD: &str = "keyPassword";

/// Parse line-oriented `key=value` content.
///
/// Blank lines and `#`/`!` comment lines are skipped, keys and values are
/// trimmed, and later duplicates override earlier ones. Lines without a
/// `=` separator carry no usable value and are ignored.
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    map
}

/// Read and parse a properties file
pub fn load_properties(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::io(format!("Failed to read {}: {}", path.display(), e)).with_source(e)
    })?;
    Ok(parse_properties(&content))
}

/// Render the canonical key.properties content for an identity.
///
/// Field order matches what the release pipeline writes, so generated and
/// hand-maintained files diff cleanly.
pub fn render_key_properties(identity: &SigningIdentity) -> String {
    format!(
        "storePassword={}\n\
         keyPassword={}\n\
         keyAlias={}\n\
         storeFile={}\n",
        identity.store_password,
        identity.key_password,
        identity.key_alias,
        identity.store_file.display()
    )
}

/// Write key.properties into the Android project directory
pub fn write_key_properties(android_dir: &Path, identity: &SigningIdentity) -> Result<PathBuf> {
    if !android_dir.is_dir() {
        return Err(Error::project_layout(format!(
            "Android directory not found: {}",
            android_dir.display()
        )));
    }

    let path = android_dir.join("key.properties");
    std::fs::write(&path, render_key_properties(identity)).map_err(|e| {
        Error::io(format!("Failed to write {}: {}", path.display(), e)).with_source(e)
    })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_basic_pairs() {
        let map = parse_properties("storeFile=/keys/release.jks\nkeyAlias=upload\n");
        assert_eq!(map.get("storeFile").unwrap(), "/keys/release.jks");
        assert_eq!(map.get("keyAlias").unwrap(), "upload");
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let map = parse_properties("# release signing\n\n! legacy comment\nkeyAlias=upload\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("keyAlias").unwrap(), "upload");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let map = parse_properties("  keyAlias =  upload  \n");
        assert_eq!(map.get("keyAlias").unwrap(), "upload");
    }

    #[test]
    fn test_parse_later_duplicate_wins() {
        let map = parse_properties("keyAlias=old\nkeyAlias=new\n");
        assert_eq!(map.get("keyAlias").unwrap(), "new");
    }

    #[test]
    fn test_parse_value_may_contain_equals() {
        let map = parse_properties("storePassword=a=b=c\n");
        assert_eq!(map.get("storePassword").unwrap(), "a=b=c");
    }

    #[test]
    fn test_parse_ignores_lines_without_separator() {
        let map = parse_properties("justakey\nkeyAlias=upload\n");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_render_key_properties() {
        let identity = SigningIdentity {
            store_file: "/path/to/keystore.jks".into(),
            store_password: "storepass".to_string(),
            key_alias: "myalias".to_string(),
            key_password: "keypass".to_string(),
        };

        let content = render_key_properties(&identity);
        assert!(content.contains("storePassword=storepass"));
        assert!(content.contains("keyPassword=keypass"));
        assert!(content.contains("keyAlias=myalias"));
        assert!(content.contains("storeFile=/path/to/keystore.jks"));
    }

    #[test]
    fn test_rendered_file_parses_back() {
        let identity = SigningIdentity {
            store_file: "/keys/release.jks".into(),
            store_password: "sp".to_string(),
            key_alias: "upload".to_string(),
            key_password: "kp".to_string(),
        };

        let map = parse_properties(&render_key_properties(&identity));
        assert_eq!(map.get(KEY_STORE_FILE).unwrap(), "/keys/release.jks");
        assert_eq!(map.get(KEY_ALIAS).unwrap(), "upload");
    }

    #[test]
    fn test_write_key_properties_requires_android_dir() {
        let identity = SigningIdentity::debug_default();
        let missing = Path::new("/nonexistent/android");
        assert!(write_key_properties(missing, &identity).is_err());
    }

    #[test]
    fn test_write_key_properties_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let identity = SigningIdentity {
            store_file: "/keys/release.jks".into(),
            store_password: "sp".to_string(),
            key_alias: "upload".to_string(),
            key_password: "kp".to_string(),
        };

        let path = write_key_properties(dir.path(), &identity).unwrap();
        assert!(path.ends_with("key.properties"));
        let map = load_properties(&path).unwrap();
        assert_eq!(map.get(KEY_ALIAS).unwrap(), "upload");
    }

    proptest! {
        #[test]
        fn prop_parsed_keys_are_trimmed(key in "[a-zA-Z][a-zA-Z0-9]{0,15}", value in "[^=\\n#!]{0,20}") {
            let content = format!("  {} = {}  \n", key, value);
            let map = parse_properties(&content);
            prop_assert!(map.contains_key(&key));
            prop_assert_eq!(map.get(&key).unwrap(), &value.trim().to_string());
        }

        #[test]
        fn prop_parse_never_panics(content in "\\PC{0,200}") {
            let _ = parse_properties(&content);
        }
    }
}
