//! Manifest Patcher - Single Entry Point
//!
//! `apply` is the only path that writes the manifest. It never writes when
//! nothing is missing, so a second run against a synced project leaves the
//! file's bytes and mtime alone.

use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::PatcherConfig;
use crate::identifier::{sha256_hex, Identifiers};
use crate::manifest::{insert_before_marker, insert_into_region, region_pattern, scan_registered};
use crate::records::{build_records, RecordSet};
use crate::report::{PatchReport, Region, SkippedRegion};
use crate::resources::{file_type_for_extension, scan_available, ResourceFile};

#[cfg(feature = "test-hooks")]
thread_local! {
    static MANIFEST_WRITE_COUNT: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

/// Manifest writes made on the current thread
#[cfg(feature = "test-hooks")]
pub fn get_manifest_write_count() -> u32 {
    MANIFEST_WRITE_COUNT.with(|c| c.get())
}

#[cfg(feature = "test-hooks")]
pub fn reset_manifest_write_count() {
    MANIFEST_WRITE_COUNT.with(|c| c.set(0));
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Resource directory not found: {0}")]
    ResourceDirNotFound(PathBuf),

    #[error("Manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid region pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid config file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Everything `apply` would do, computed without touching the manifest
#[derive(Debug, Clone)]
pub struct PatchPlan {
    pub manifest_text: String,
    pub available: Vec<String>,
    pub registered: BTreeSet<String>,
    pub records: Vec<RecordSet>,
}

impl PatchPlan {
    pub fn missing(&self) -> Vec<String> {
        self.records.iter().map(|r| r.filename.clone()).collect()
    }

    /// How many discovered files the manifest already knows about
    pub fn registered_count(&self) -> usize {
        self.available.iter().filter(|f| self.registered.contains(*f)).count()
    }
}

/// available minus registered, in the order of `available`
pub fn diff(available: &[String], registered: &BTreeSet<String>) -> Vec<String> {
    available
        .iter()
        .filter(|f| !registered.contains(*f))
        .cloned()
        .collect()
}

pub struct Patcher {
    config: PatcherConfig,
    group_header: Regex,
    build_phase_header: Option<Regex>,
}

impl Patcher {
    /// Validate the config and compile its patterns. No I/O happens here.
    pub fn new(config: PatcherConfig) -> Result<Self, PatchError> {
        config.check()?;
        let group_header = region_header(&config.markers.group_header_pattern)?;
        let build_phase_header = config
            .markers
            .build_phase_pattern
            .as_deref()
            .map(region_header)
            .transpose()?;
        Ok(Self {
            config,
            group_header,
            build_phase_header,
        })
    }

    /// Identifiers this patcher issues for `filename`
    pub fn identifiers(&self, filename: &str) -> Identifiers {
        Identifiers::for_file(filename, &self.config.seed_suffix)
    }

    fn file_type(&self) -> String {
        self.config
            .file_type
            .clone()
            .unwrap_or_else(|| file_type_for_extension(self.config.extension()).to_string())
    }

    fn check_paths(&self) -> Result<(), PatchError> {
        if !self.config.resource_directory.is_dir() {
            return Err(PatchError::ResourceDirNotFound(self.config.resource_directory.clone()));
        }
        if !self.config.manifest_path.is_file() {
            return Err(PatchError::ManifestNotFound(self.config.manifest_path.clone()));
        }
        Ok(())
    }

    /// Load, scan, diff and build records. Nothing is written.
    pub fn plan(&self) -> Result<PatchPlan, PatchError> {
        self.check_paths()?;

        let path = &self.config.manifest_path;
        let manifest_text = fs::read_to_string(path).map_err(|source| PatchError::Io {
            path: path.clone(),
            source,
        })?;

        let extension = self.config.extension();
        let registered = scan_registered(&manifest_text, extension)?;
        let available = scan_available(&self.config.resource_directory, extension)?;

        let kind = self.file_type();
        let records = diff(&available, &registered)
            .into_iter()
            .map(|filename| {
                let ids = self.identifiers(&filename);
                tracing::debug!(
                    file = %filename,
                    file_ref = %ids.file_ref,
                    build_file = %ids.build_file,
                    "derived identifiers"
                );
                build_records(&ResourceFile::new(filename, kind.clone()), &ids)
            })
            .collect();

        Ok(PatchPlan {
            manifest_text,
            available,
            registered,
            records,
        })
    }

    /// Bring the manifest in line with the resource directory
    pub fn apply(&self) -> Result<PatchReport, PatchError> {
        self.run(false)
    }

    /// Same as `apply` but the manifest is left untouched
    pub fn dry_run(&self) -> Result<PatchReport, PatchError> {
        self.run(true)
    }

    fn run(&self, dry_run: bool) -> Result<PatchReport, PatchError> {
        let plan = self.plan()?;
        let before_sha256 = sha256_hex(plan.manifest_text.as_bytes());

        let mut report = PatchReport {
            manifest_path: self.config.manifest_path.clone(),
            extension: self.config.extension().to_string(),
            discovered: plan.available.len(),
            registered: plan.registered_count(),
            missing: plan.missing(),
            added: 0,
            skipped: vec![],
            written: false,
            dry_run,
            after_sha256: before_sha256.clone(),
            before_sha256,
        };

        if plan.records.is_empty() {
            tracing::info!("manifest already lists every resource file");
            return Ok(report);
        }

        let (patched, skipped) = self.splice(&plan.manifest_text, &plan.records);
        let attempted = if self.build_phase_header.is_some() { 4 } else { 3 };
        if skipped.len() < attempted {
            report.added = plan.records.len();
        }
        report.skipped = skipped;

        if patched == plan.manifest_text || dry_run {
            return Ok(report);
        }

        let path = &self.config.manifest_path;
        fs::write(path, &patched).map_err(|source| PatchError::Io {
            path: path.clone(),
            source,
        })?;

        #[cfg(feature = "test-hooks")]
        MANIFEST_WRITE_COUNT.with(|c| c.set(c.get() + 1));

        tracing::info!(path = %path.display(), added = report.added, "manifest updated");
        report.written = true;
        report.after_sha256 = sha256_hex(patched.as_bytes());
        Ok(report)
    }

    /// Insert every record into its region. Regions that cannot be found
    /// are skipped and returned.
    fn splice(&self, original: &str, records: &[RecordSet]) -> (String, Vec<SkippedRegion>) {
        let markers = &self.config.markers;
        let mut text = original.to_string();
        let mut skipped = vec![];

        let lines: Vec<String> = records.iter().map(|r| r.reference.clone()).collect();
        let result = insert_before_marker(&text, &markers.reference_section, &lines);
        settle(&mut text, &mut skipped, Region::References, &markers.reference_section, result);

        let lines: Vec<String> = records.iter().map(|r| r.build.clone()).collect();
        let result = insert_before_marker(&text, &markers.build_section, &lines);
        settle(&mut text, &mut skipped, Region::BuildFiles, &markers.build_section, result);

        let lines: Vec<String> = records.iter().map(|r| r.group_line.clone()).collect();
        let result = insert_into_region(&text, &self.group_header, &lines);
        settle(&mut text, &mut skipped, Region::Group, self.group_header.as_str(), result);

        if let Some(header) = &self.build_phase_header {
            let lines: Vec<String> = records.iter().map(|r| r.build_phase_line.clone()).collect();
            let result = insert_into_region(&text, header, &lines);
            settle(&mut text, &mut skipped, Region::BuildPhase, header.as_str(), result);
        }

        (text, skipped)
    }
}

/// Compile a region header. A header that can match empty text would splice
/// lines in at offset 0, ahead of the file's encoding line.
fn region_header(pattern: &str) -> Result<Regex, PatchError> {
    let header = region_pattern(pattern)?;
    if header.is_match("") {
        return Err(PatchError::InvalidConfig(format!(
            "region pattern {:?} matches empty text",
            pattern
        )));
    }
    Ok(header)
}

fn settle(
    text: &mut String,
    skipped: &mut Vec<SkippedRegion>,
    region: Region,
    marker: &str,
    result: Option<String>,
) {
    match result {
        Some(patched) => *text = patched,
        None => {
            tracing::warn!(%region, marker, "region not found in manifest, skipping insertion");
            skipped.push(SkippedRegion::new(region, marker));
        }
    }
}
