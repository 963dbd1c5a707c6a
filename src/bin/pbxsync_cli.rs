//! pbxsync CLI - Resource Manifest Patcher
//!
//! Commands: status, apply, identify
//! Prints a human summary to stdout, or JSON with --json
//! Returns 1 on configuration or I/O errors, 2 when `status` finds missing files

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use pbxsync_core::{logging, PatchReport, Patcher, PatcherConfig, VERSION};

#[derive(Parser)]
#[command(name = "pbxsync-cli")]
#[command(version = VERSION)]
#[command(about = "pbxsync CLI - register resource files in an Xcode project manifest")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resource directory to scan
    #[arg(short, long, global = true)]
    resources: Option<PathBuf>,

    /// Project manifest (project.pbxproj) to patch
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// File extension to register, without the dot
    #[arg(short, long, global = true)]
    extension: Option<String>,

    /// Regex matching the target group's `children = (` opener
    #[arg(long, global = true)]
    group_pattern: Option<String>,

    /// Regex matching the resources phase `files = (` opener
    #[arg(long, global = true)]
    build_phase_pattern: Option<String>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which resource files are missing from the manifest
    Status,

    /// Add missing resource files to the manifest
    Apply {
        /// Compute the patch but do not write it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the identifiers a file would be registered under
    Identify {
        /// Resource file name, e.g. narration_intro.mp3
        filename: String,
    },
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn resolve_config(&self) -> Result<PatcherConfig, pbxsync_core::PatchError> {
        let mut config = match &self.config {
            Some(path) => PatcherConfig::load(path)?,
            None => PatcherConfig::default(),
        };
        if let Some(dir) = &self.resources {
            config.resource_directory = dir.clone();
        }
        if let Some(path) = &self.manifest {
            config.manifest_path = path.clone();
        }
        if let Some(ext) = &self.extension {
            config.file_extension = ext.clone();
        }
        if let Some(pattern) = &self.group_pattern {
            config.markers.group_header_pattern = pattern.clone();
        }
        if let Some(pattern) = &self.build_phase_pattern {
            config.markers.build_phase_pattern = Some(pattern.clone());
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_tracing(cli.verbose);

    let patcher = match cli.resolve_config().and_then(Patcher::new) {
        Ok(p) => p,
        Err(e) => return fail(cli.json, &e),
    };

    match &cli.command {
        Commands::Status => match patcher.dry_run() {
            Ok(report) => {
                print_report(cli.json, &report);
                if report.in_sync() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2) // Out of sync
                }
            }
            Err(e) => fail(cli.json, &e),
        },

        Commands::Apply { dry_run } => {
            let result = if *dry_run { patcher.dry_run() } else { patcher.apply() };
            match result {
                Ok(report) => {
                    print_report(cli.json, &report);
                    ExitCode::SUCCESS
                }
                Err(e) => fail(cli.json, &e),
            }
        }

        Commands::Identify { filename } => {
            let ids = patcher.identifiers(filename);
            if cli.json {
                let output = serde_json::json!({
                    "filename": filename,
                    "fileRef": ids.file_ref,
                    "buildFile": ids.build_file,
                });
                println!("{}", output);
            } else {
                println!("{}", filename);
                println!("  fileRef   {}", ids.file_ref);
                println!("  buildFile {}", ids.build_file);
            }
            ExitCode::SUCCESS
        }
    }
}

fn print_report(json: bool, report: &PatchReport) {
    if !json {
        println!("{}", report.summary());
        return;
    }
    match serde_json::to_string_pretty(report) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("error: could not serialize report: {}", e),
    }
}

fn fail(json: bool, error: &pbxsync_core::PatchError) -> ExitCode {
    if json {
        let output = serde_json::json!({
            "success": false,
            "error": error.to_string(),
        });
        println!("{}", output);
    } else {
        eprintln!("error: {}", error);
    }
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pbxsync-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_config_or_flags() {
        let config = parse(&["status"]).resolve_config().unwrap();
        assert_eq!(config, PatcherConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pbxsync.json");
        fs::write(
            &path,
            r#"{
                "resourceDirectory": "from-file/Audio",
                "manifestPath": "from-file/project.pbxproj",
                "fileExtension": "wav",
                "seedSuffix": "_v3",
                "markers": { "buildPhasePattern": null }
            }"#,
        )
        .unwrap();
        let config_path = path.to_str().unwrap();

        let from_file = parse(&["-c", config_path, "status"]).resolve_config().unwrap();
        assert_eq!(from_file.resource_directory, PathBuf::from("from-file/Audio"));
        assert_eq!(from_file.file_extension, "wav");
        assert_eq!(from_file.seed_suffix, "_v3");
        assert_eq!(from_file.markers.build_phase_pattern, None);

        let overridden = parse(&[
            "apply",
            "--config",
            config_path,
            "-r",
            "cli/Audio",
            "-e",
            "mp3",
            "--build-phase-pattern",
            r"files = \(",
        ])
        .resolve_config()
        .unwrap();
        assert_eq!(overridden.resource_directory, PathBuf::from("cli/Audio"));
        assert_eq!(overridden.manifest_path, PathBuf::from("from-file/project.pbxproj"));
        assert_eq!(overridden.file_extension, "mp3");
        assert_eq!(overridden.seed_suffix, "_v3");
        assert_eq!(overridden.markers.build_phase_pattern.as_deref(), Some(r"files = \("));
    }

    #[test]
    fn test_bad_config_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pbxsync.json");
        fs::write(&path, "{").unwrap();
        let cli = parse(&["-c", path.to_str().unwrap(), "status"]);
        assert!(matches!(cli.resolve_config(), Err(pbxsync_core::PatchError::Config(_))));
    }
}
