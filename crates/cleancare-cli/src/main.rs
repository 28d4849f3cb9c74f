//! Clean Care CLI: check, fix and audit admin permission sets.

mod render;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use cleancare_config::{CliOverrides, OutputFormat, Settings};
use cleancare_permissions::{PermissionSet, auto_fix, diff, structure, validate_before_save};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "cleancare",
    version,
    about = "Check, fix and audit admin permission sets"
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the save gate on a permission set; exits 1 when it would be rejected
    Check {
        file: PathBuf,
        /// Auto-fix before checking
        #[arg(long)]
        fix: bool,
    },
    /// Auto-fix a permission set and print or write the result
    Fix {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Describe what changed between two permission sets
    Diff { old: PathBuf, new: PathBuf },
    /// Print a starting permission set
    Template {
        #[arg(value_enum)]
        kind: TemplateKind,
    },
    /// List every feature flag by group
    Features,
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateKind {
    None,
    ViewOnly,
    Full,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::load(CliOverrides {
        output: cli.json.then_some(OutputFormat::Json),
        auto_fix: match &cli.command {
            Command::Check { fix: true, .. } => Some(true),
            _ => None,
        },
    })
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    for diagnostic in &settings.diagnostics {
        tracing::warn!("{diagnostic}; using defaults");
    }
    tracing::debug!(config_dir = %settings.config_dir.display(), "loaded settings");

    match cli.command {
        Command::Check { file, .. } => Ok(if check(&file, &settings)? {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }),
        Command::Fix { file, output } => {
            fix(&file, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Diff { old, new } => {
            audit_diff(&old, &new, settings.output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Template { kind } => {
            let set = match kind {
                TemplateKind::None => PermissionSet::none(),
                TemplateKind::ViewOnly => PermissionSet::view_only(),
                TemplateKind::Full => PermissionSet::full_access(),
            };
            print_json(&set)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Features => {
            let entries = render::feature_catalogue();
            match settings.output {
                OutputFormat::Json => print_json(&entries)?,
                OutputFormat::Text => print!("{}", render::catalogue_text(&entries)),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Returns whether the save gate accepted the file.
fn check(path: &Path, settings: &Settings) -> Result<bool> {
    let mut candidate = read_json(path)?;
    if settings.auto_fix {
        // Malformed input goes to the gate untouched so it reports the structure error
        if let Some(set) = structure::parse(&candidate) {
            candidate = serde_json::to_value(auto_fix(&set))?;
        }
    }

    let report = validate_before_save(&candidate);
    match settings.output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print!("{}", render::report_text(&report)),
    }

    Ok(report.valid)
}

fn fix(path: &Path, output: Option<&Path>) -> Result<()> {
    let set = load_permission_set(path)?;
    let fixed = auto_fix(&set);
    let json = serde_json::to_string_pretty(&fixed)?;
    match output {
        Some(out) => std::fs::write(out, format!("{json}\n"))
            .with_context(|| format!("Failed to write {}", out.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn audit_diff(old: &Path, new: &Path, format: OutputFormat) -> Result<()> {
    let old = load_permission_set(old)?;
    let new = load_permission_set(new)?;
    let changes = diff(&old, &new);
    match format {
        OutputFormat::Json => print_json(&render::AuditRecord {
            generated_at: Utc::now(),
            changes,
        }),
        OutputFormat::Text => {
            print!("{}", render::changes_text(&changes));
            Ok(())
        }
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Read and structurally validate a permission set file.
fn load_permission_set(path: &Path) -> Result<PermissionSet> {
    let value = read_json(path)?;
    structure::check(&value).with_context(|| format!("Malformed permission set in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleancare_permissions::Feature;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_permission_set_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::to_string(&PermissionSet::view_only()).unwrap();
        let path = write(&dir, "admin.json", &json);
        let set = load_permission_set(&path).unwrap();
        assert_eq!(set, PermissionSet::view_only());
    }

    #[test]
    fn test_load_permission_set_reports_structure_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "admin.json", r#"{"zones": [], "wards": []}"#);
        let err = load_permission_set(&path).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("Malformed permission set"));
        assert!(chain.contains("'categories' must be an array"));
    }

    #[test]
    fn test_read_json_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "broken.json", "{ nope");
        assert!(read_json(&path).is_err());
        assert!(read_json(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_fix_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = PermissionSet::none()
            .with_features([Feature::ExportData].into_iter().collect());
        let path = write(&dir, "in.json", &serde_json::to_string(&input).unwrap());
        let out = dir.path().join("out.json");

        fix(&path, Some(&out)).unwrap();

        let fixed = load_permission_set(&out).unwrap();
        assert!(fixed.features.get(Feature::ViewAnalytics));
        assert!(fixed.features.get(Feature::ExportData));
    }

    #[test]
    fn test_check_with_and_without_fix() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            output: OutputFormat::Json,
            auto_fix: false,
            log_level: "warn".into(),
            config_dir: dir.path().to_path_buf(),
            diagnostics: Vec::new(),
        };
        let conflicted = PermissionSet::none()
            .with_features([Feature::SendMessagesToUsers].into_iter().collect());
        let path = write(&dir, "c.json", &serde_json::to_string(&conflicted).unwrap());

        assert!(!check(&path, &settings).unwrap());

        let fixing = Settings {
            auto_fix: true,
            ..settings
        };
        assert!(check(&path, &fixing).unwrap());
    }
}
