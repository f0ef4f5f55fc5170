//! Configuration schema definitions
//!
//! Defaults mirror the Adati Android build so the tools work without a
//! config file in a standard checkout.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Project identity and SDK levels
    #[serde(default)]
    pub project: ProjectConfig,

    /// Signing-related paths
    #[serde(default)]
    pub signing: SigningConfig,
}

/// Project identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Base application identifier
    #[serde(default = "default_application_id")]
    pub application_id: String,

    /// Display name of the application
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Minimum supported Android API level
    #[serde(default = "default_min_sdk")]
    pub min_sdk: u32,

    /// Target Android API level
    #[serde(default = "default_target_sdk")]
    pub target_sdk: u32,

    /// Compile-time Android API level
    #[serde(default = "default_compile_sdk")]
    pub compile_sdk: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            application_id: default_application_id(),
            app_name: default_app_name(),
            min_sdk: default_min_sdk(),
            target_sdk: default_target_sdk(),
            compile_sdk: default_compile_sdk(),
        }
    }
}

fn default_application_id() -> String {
    "com.shenepoy.adati".to_string()
}

fn default_app_name() -> String {
    "Adati".to_string()
}

fn default_min_sdk() -> u32 {
    29
}

fn default_target_sdk() -> u32 {
    36
}

fn default_compile_sdk() -> u32 {
    36
}

/// Signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Path to the local secrets file, relative to the project root
    #[serde(default = "default_properties_file")]
    pub properties_file: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            properties_file: default_properties_file(),
        }
    }
}

fn default_properties_file() -> String {
    "android/key.properties".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults() {
        let project = ProjectConfig::default();
        assert_eq!(project.application_id, "com.shenepoy.adati");
        assert_eq!(project.min_sdk, 29);
        assert_eq!(project.target_sdk, 36);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [project]
            app_name = "Adati Dev"
            "#,
        )
        .unwrap();

        assert_eq!(schema.project.app_name, "Adati Dev");
        assert_eq!(schema.project.application_id, "com.shenepoy.adati");
        assert_eq!(schema.signing.properties_file, "android/key.properties");
    }
}
