//! Adati Android CLI
//!
//! Build-variant and signing configuration tools for Adati Android.

use adati_android::gradle;
use adati_android::keystore;
use adati_android::project;
use adati_android::properties;
use adati_android::signing::{
    resolve_signing_identity, SigningEnv, SigningReport, SigningSource,
};
use adati_android::variant::{resolve_variant_parameters, BuildVariant};
use adati_cli::output::{format_duration, Status};
use adati_cli::progress;
use adati_core::config::Config;
use adati_core::error::{exit_codes, Error, ErrorCode};
use adati_core::process::command_exists;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "adati-android")]
#[command(about = "Build-variant and signing tools for Adati Android")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved release signing configuration
    Signing {
        /// Open the keystore with keytool and check the alias
        #[arg(long)]
        validate: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved parameters for a build variant
    Variant {
        /// Variant name: debug, release
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the local key.properties file
    #[command(name = "key-properties")]
    KeyProperties {
        #[command(subcommand)]
        action: KeyPropertiesAction,
    },

    /// Build the project
    Build {
        /// Build variant: debug, release
        #[arg(long, default_value = "debug")]
        variant: String,
        /// Build bundle (AAB) instead of APK
        #[arg(long)]
        bundle: bool,
        /// Clean before building
        #[arg(long)]
        clean: bool,
    },

    /// Diagnose environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum KeyPropertiesAction {
    /// Write key.properties from KEYSTORE_* environment variables
    Generate,
    /// Parse key.properties and report completeness
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = Config::load(cli.config.as_deref().and_then(|p| p.to_str()))?;
    let project_dir = Path::new(".");

    let exit_code = match cli.command {
        Commands::Signing { validate, json } => run_signing(project_dir, &config, validate, json),
        Commands::Variant { name, json } => run_variant(project_dir, &config, &name, json),
        Commands::KeyProperties { action } => match action {
            KeyPropertiesAction::Generate => run_key_properties_generate(project_dir),
            KeyPropertiesAction::Check => run_key_properties_check(project_dir, &config),
        },
        Commands::Build {
            variant,
            bundle,
            clean,
        } => run_build(project_dir, &config, &variant, bundle, clean),
        Commands::Doctor { json } => run_doctor(project_dir, &config, json),
    };

    std::process::exit(exit_code);
}

/// Map an error to its CLI exit code
fn exit_code_for(err: &Error) -> i32 {
    if err.code == ErrorCode::CommandNotFound {
        return exit_codes::COMMAND_NOT_FOUND;
    }
    match err.code.category() {
        "Configuration" => exit_codes::CONFIG_ERROR,
        "Signing" => exit_codes::SIGNING_ERROR,
        _ => exit_codes::FAILURE,
    }
}

fn report_error(err: &Error) -> i32 {
    Status::error(&err.to_string());
    exit_code_for(err)
}

/// The signing probe state for this invocation, built once
fn signing_env(project_dir: &Path, config: &Config) -> SigningEnv {
    let properties_path = project_dir.join(&config.schema.signing.properties_file);
    SigningEnv::from_process_env(properties_path)
}

fn run_signing(project_dir: &Path, config: &Config, validate: bool, json: bool) -> i32 {
    let env = signing_env(project_dir, config);

    let resolved = match resolve_signing_identity(&env) {
        Ok(r) => r,
        Err(e) => return report_error(&e),
    };

    let report = SigningReport::from_resolution(resolved.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
    } else {
        match &resolved {
            Some(r) => {
                Status::success(&format!("Release signing source: {}", r.source));
                println!("  store file: {}", r.identity.store_file.display());
                println!("  key alias:  {}", r.identity.key_alias);
                println!(
                    "  passwords:  store {}, key {}",
                    if report.store_password_set { "set" } else { "empty" },
                    if report.key_password_set { "set" } else { "empty" },
                );
            }
            None => {
                Status::info("No release signing configured");
                Status::info("Release builds fall back to the debug identity");
            }
        }
    }

    if let Some(r) = &resolved {
        if !r.identity.is_complete() {
            Status::warning("Signing identity has empty fields; release signing will fail");
        }

        if validate {
            match keystore::validate_keystore(&r.identity) {
                Ok(check) => {
                    Status::success(&format!(
                        "Keystore opens ({}), alias '{}' found",
                        check.keystore_type, r.identity.key_alias
                    ));
                }
                Err(e) => return report_error(&e),
            }
        }
    } else if validate {
        Status::warning("No release identity to validate");
    }

    exit_codes::SUCCESS
}

fn run_variant(project_dir: &Path, config: &Config, name: &str, json: bool) -> i32 {
    let variant = match BuildVariant::from_str(name) {
        Ok(v) => v,
        Err(e) => return report_error(&e),
    };

    let env = signing_env(project_dir, config);
    let resolved = match resolve_signing_identity(&env) {
        Ok(r) => r,
        Err(e) => return report_error(&e),
    };

    let params = resolve_variant_parameters(variant, &config.schema.project, resolved.as_ref());

    if json {
        let value = serde_json::json!({
            "variant": params.variant,
            "application_id": params.full_application_id(),
            "app_name": params.app_name,
            "debuggable": params.debuggable,
            "minify_enabled": params.minify_enabled,
            "shrink_resources": params.shrink_resources,
            "debug_symbol_level": params.debug_symbol_level,
            "signing": SigningReport::from_resolution(resolved.as_ref()),
        });
        println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        return exit_codes::SUCCESS;
    }

    Status::header(&format!("Variant: {}", params.variant));
    println!("application id:     {}", params.full_application_id());
    println!("app name:           {}", params.app_name);
    println!("debuggable:         {}", params.debuggable);
    println!("minify enabled:     {}", params.minify_enabled);
    println!("shrink resources:   {}", params.shrink_resources);
    println!("debug symbols:      {}", params.debug_symbol_level);
    println!("signing source:     {}", params.signing_source);
    println!("signing key alias:  {}", params.signing.key_alias);

    if variant == BuildVariant::Release && params.signing_source == SigningSource::None {
        Status::warning("No release identity available; using the debug identity");
    }

    exit_codes::SUCCESS
}

fn run_key_properties_generate(project_dir: &Path) -> i32 {
    // Deliberately probes only the environment: generate exists to
    // materialize CI secrets into the file the Gradle build reads.
    let env = SigningEnv::from_process_env(project_dir.join("android").join("key.properties"));

    let resolved = match resolve_signing_identity(&env) {
        Ok(Some(r)) if r.source == SigningSource::EnvironmentVariables => r,
        Ok(_) => {
            let err = Error::config("KEYSTORE_FILE is not set").with_suggestion(
                "Export KEYSTORE_FILE, KEYSTORE_PASSWORD, KEY_ALIAS and KEY_PASSWORD",
            );
            return report_error(&err);
        }
        Err(e) => return report_error(&e),
    };

    if !resolved.identity.is_complete() {
        Status::warning("Some KEYSTORE_* variables are empty; writing them as-is");
    }

    let android_dir = match project::android_dir(project_dir) {
        Ok(d) => d,
        Err(e) => return report_error(&e),
    };

    match properties::write_key_properties(&android_dir, &resolved.identity) {
        Ok(path) => {
            Status::success(&format!("Wrote {}", path.display()));
            exit_codes::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn run_key_properties_check(project_dir: &Path, config: &Config) -> i32 {
    let path = project_dir.join(&config.schema.signing.properties_file);

    if !path.exists() {
        return report_error(&Error::file_not_found(&path));
    }

    // Probe the file only, ignoring any KEYSTORE_* variables in the
    // session: check answers "is this file usable", not "what would a
    // build resolve".
    let env = SigningEnv {
        properties_path: path.clone(),
        ..Default::default()
    };

    match resolve_signing_identity(&env) {
        Ok(Some(r)) => {
            Status::success(&format!("{} is well-formed", path.display()));
            println!("  store file: {}", r.identity.store_file.display());
            println!("  key alias:  {}", r.identity.key_alias);
            if !r.identity.is_complete() {
                Status::warning("Identity has empty fields");
            }
            exit_codes::SUCCESS
        }
        Ok(None) => report_error(&Error::file_not_found(&path)),
        Err(e) => report_error(&e),
    }
}

fn run_build(project_dir: &Path, config: &Config, variant: &str, bundle: bool, clean: bool) -> i32 {
    let variant = match BuildVariant::from_str(variant) {
        Ok(v) => v,
        Err(e) => return report_error(&e),
    };

    let android_dir = match project::android_dir(project_dir) {
        Ok(d) => d,
        Err(e) => return report_error(&e),
    };

    let env = signing_env(project_dir, config);
    let resolved = match resolve_signing_identity(&env) {
        Ok(r) => r,
        Err(e) => return report_error(&e),
    };

    let params = resolve_variant_parameters(variant, &config.schema.project, resolved.as_ref());

    if variant == BuildVariant::Release {
        if params.signing_source == SigningSource::None {
            Status::warning("No release identity available; signing with the debug identity");
        } else if !params.signing.is_complete() {
            Status::warning("Signing identity has empty fields; the build may fail to sign");
        }
    }

    if clean {
        Status::info("Cleaning...");
        if let Err(e) = gradle::clean(&android_dir) {
            return report_error(&e);
        }
    }

    let task = gradle::task_name(variant, bundle);
    let spinner = progress::spinner(&format!("Running {}...", task));
    let started = std::time::Instant::now();

    let signing = (variant == BuildVariant::Release).then_some(&params.signing);
    let result = gradle::build(&android_dir, variant, bundle, signing);

    spinner.finish_and_clear();

    match result {
        Ok(r) => {
            if r.success {
                Status::success(&format!(
                    "Build succeeded in {}",
                    format_duration(started.elapsed())
                ));
                exit_codes::SUCCESS
            } else {
                Status::error("Build failed");
                eprintln!("{}", r.stderr);
                exit_codes::FAILURE
            }
        }
        Err(e) => report_error(&e),
    }
}

fn run_doctor(project_dir: &Path, config: &Config, json: bool) -> i32 {
    let flutter_project = project::is_flutter_project(project_dir);
    let android = project::android_dir(project_dir).ok();
    let gradle_wrapper = android
        .as_deref()
        .is_some_and(project::has_gradle_wrapper);
    let java = command_exists("java");
    let keytool = command_exists("keytool");

    let env = signing_env(project_dir, config);
    let signing_source = match resolve_signing_identity(&env) {
        Ok(Some(r)) => r.source,
        Ok(None) => SigningSource::None,
        Err(e) => return report_error(&e),
    };

    if json {
        let value = serde_json::json!({
            "flutter_project": flutter_project,
            "android_dir": android.is_some(),
            "gradle_wrapper": gradle_wrapper,
            "java": java,
            "keytool": keytool,
            "signing_source": signing_source,
        });
        println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        return exit_codes::SUCCESS;
    }

    Status::header("Environment Check");

    let check = |ok: bool, name: &str| {
        if ok {
            Status::success(name);
        } else {
            Status::warning(&format!("{}: not found", name));
        }
    };

    check(flutter_project, "pubspec.yaml (Flutter project)");
    check(android.is_some(), "android/ directory");
    check(gradle_wrapper, "Gradle wrapper");
    check(java, "java");
    check(keytool, "keytool");

    match signing_source {
        SigningSource::None => {
            Status::warning("release signing: not configured (debug fallback)");
        }
        source => Status::success(&format!("release signing: {}", source)),
    }

    exit_codes::SUCCESS
}
