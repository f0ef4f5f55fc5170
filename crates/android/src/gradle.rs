//! Gradle build system integration
//!
//! Provides wrappers for Gradle commands. Release invocations receive the
//! resolved signing identity through the `KEYSTORE_*` environment of the
//! child process, the same channel the CI pipeline uses.

use crate::signing::{
    SigningIdentity, ENV_KEYSTORE_FILE, ENV_KEYSTORE_PASSWORD, ENV_KEY_ALIAS, ENV_KEY_PASSWORD,
};
use crate::variant::BuildVariant;
use adati_core::error::Result;
use adati_core::process::{run_command_in_dir, run_command_in_dir_with_env, CommandResult};
use std::path::Path;

/// The platform's Gradle wrapper invocation
fn gradle_wrapper() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "./gradlew"
    }
}

/// Derive the Gradle task name for a variant
pub fn task_name(variant: BuildVariant, bundle: bool) -> &'static str {
    match (variant, bundle) {
        (BuildVariant::Debug, false) => "assembleDebug",
        (BuildVariant::Release, false) => "assembleRelease",
        (BuildVariant::Debug, true) => "bundleDebug",
        (BuildVariant::Release, true) => "bundleRelease",
    }
}

/// The environment a signing identity travels through to Gradle
pub fn signing_env(identity: &SigningIdentity) -> Vec<(String, String)> {
    vec![
        (
            ENV_KEYSTORE_FILE.to_string(),
            identity.store_file.display().to_string(),
        ),
        (
            ENV_KEYSTORE_PASSWORD.to_string(),
            identity.store_password.clone(),
        ),
        (ENV_KEY_ALIAS.to_string(), identity.key_alias.clone()),
        (ENV_KEY_PASSWORD.to_string(), identity.key_password.clone()),
    ]
}

/// Run a Gradle task
pub fn run_task(project_dir: &Path, task: &str) -> Result<CommandResult> {
    run_command_in_dir(gradle_wrapper(), &[task], project_dir)
}

/// Run a Gradle task with a signing identity in the environment
pub fn run_task_with_signing(
    project_dir: &Path,
    task: &str,
    identity: &SigningIdentity,
) -> Result<CommandResult> {
    run_command_in_dir_with_env(gradle_wrapper(), &[task], project_dir, &signing_env(identity))
}

/// Build an APK or AAB for a variant
pub fn build(
    project_dir: &Path,
    variant: BuildVariant,
    bundle: bool,
    signing: Option<&SigningIdentity>,
) -> Result<CommandResult> {
    let task = task_name(variant, bundle);
    match signing {
        Some(identity) => run_task_with_signing(project_dir, task, identity),
        None => run_task(project_dir, task),
    }
}

/// Clean build artifacts
pub fn clean(project_dir: &Path) -> Result<CommandResult> {
    run_task(project_dir, "clean")
}

/// Run unit tests
pub fn test(project_dir: &Path) -> Result<CommandResult> {
    run_task(project_dir, "test")
}
