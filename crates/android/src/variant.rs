//! Build-variant parameter resolution
//!
//! Each variant owns a fixed set of packaging parameters: application-id
//! suffix, display name, debuggability, code minification, resource
//! shrinking, and native debug-symbol detail. Debug and Release are the
//! only recognized variants.

use crate::signing::{ResolvedSigning, SigningIdentity, SigningSource};
use adati_core::config::ProjectConfig;
use adati_core::error::Error;
use serde::Serialize;

/// A named build configuration producing a distinct artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    /// Development build, side-installable next to the release app
    Debug,
    /// Optimized, signed distribution build
    Release,
}

impl BuildVariant {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }
}

impl std::str::FromStr for BuildVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildVariant::Debug),
            "release" => Ok(BuildVariant::Release),
            _ => Err(Error::invalid_variant(s)),
        }
    }
}

impl std::fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Native debug-symbol detail level (Gradle NDK `debugSymbolLevel`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebugSymbolLevel {
    /// No native debug symbols
    None,
    /// Symbol table only
    SymbolTable,
    /// Full debug info, for crash diagnosability despite minification
    Full,
}

impl DebugSymbolLevel {
    /// The Gradle-facing value
    pub fn as_str(&self) -> &'static str {
        match self {
            DebugSymbolLevel::None => "NONE",
            DebugSymbolLevel::SymbolTable => "SYMBOL_TABLE",
            DebugSymbolLevel::Full => "FULL",
        }
    }
}

impl std::fmt::Display for DebugSymbolLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved packaging parameters for one variant
#[derive(Debug, Clone)]
pub struct VariantParameters {
    /// The variant these parameters belong to
    pub variant: BuildVariant,
    /// Base application identifier
    pub application_id: String,
    /// Suffix appended to the base identifier, if any
    pub application_id_suffix: Option<String>,
    /// Display name override for this variant
    pub app_name: String,
    /// Whether the artifact is debuggable
    pub debuggable: bool,
    /// Whether code minification is enabled
    pub minify_enabled: bool,
    /// Whether unused resources are stripped
    pub shrink_resources: bool,
    /// Native debug-symbol detail
    pub debug_symbol_level: DebugSymbolLevel,
    /// Identity the artifact is signed with
    pub signing: SigningIdentity,
    /// Provider the identity came from (`None` for the debug fallback)
    pub signing_source: SigningSource,
}

impl VariantParameters {
    /// The effective application identifier, suffix applied
    pub fn full_application_id(&self) -> String {
        match &self.application_id_suffix {
            Some(suffix) => format!("{}{}", self.application_id, suffix),
            None => self.application_id.clone(),
        }
    }
}

/// Resolve the packaging parameters for a variant.
///
/// `release_signing` is the (already cached) result of the signing probe;
/// Release substitutes the debug identity when it is absent. That fallback
/// is documented behavior, not a failure.
pub fn resolve_variant_parameters(
    variant: BuildVariant,
    project: &ProjectConfig,
    release_signing: Option<&ResolvedSigning>,
) -> VariantParameters {
    match variant {
        BuildVariant::Debug => VariantParameters {
            variant,
            application_id: project.application_id.clone(),
            application_id_suffix: Some(".debug".to_string()),
            app_name: format!("{} Debug", project.app_name),
            debuggable: true,
            minify_enabled: false,
            shrink_resources: false,
            debug_symbol_level: DebugSymbolLevel::None,
            signing: SigningIdentity::debug_default(),
            signing_source: SigningSource::None,
        },
        BuildVariant::Release => {
            let (signing, signing_source) = match release_signing {
                Some(resolved) => (resolved.identity.clone(), resolved.source),
                None => (SigningIdentity::debug_default(), SigningSource::None),
            };

            VariantParameters {
                variant,
                application_id: project.application_id.clone(),
                application_id_suffix: None,
                app_name: project.app_name.clone(),
                debuggable: false,
                minify_enabled: true,
                shrink_resources: true,
                debug_symbol_level: DebugSymbolLevel::Full,
                signing,
                signing_source,
            }
        }
    }
}
