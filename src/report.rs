//! Patch Report - What Happened, What Was Skipped
//!
//! A missing region never aborts a patch. It becomes a `SkippedRegion` here
//! and the rest of the insertions go ahead.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The manifest regions the patcher writes into
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    References,
    BuildFiles,
    Group,
    BuildPhase,
}

impl Region {
    pub fn name(&self) -> &'static str {
        match self {
            Region::References => "file reference section",
            Region::BuildFiles => "build file section",
            Region::Group => "group children",
            Region::BuildPhase => "resources build phase",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRegion {
    pub region: Region,
    /// The marker or pattern that was looked for
    pub marker: String,
    pub remediation: String,
}

impl SkippedRegion {
    pub fn new(region: Region, marker: &str) -> Self {
        let remediation = match region {
            Region::References | Region::BuildFiles => {
                "Check the section marker matches this project file version".to_string()
            }
            Region::Group => "Set markers.groupHeaderPattern to match the target group".to_string(),
            Region::BuildPhase => {
                "Set markers.buildPhasePattern to match the target's resources phase".to_string()
            }
        };
        Self {
            region,
            marker: marker.to_string(),
            remediation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchReport {
    pub manifest_path: PathBuf,
    pub extension: String,
    /// Files found in the resource directory
    pub discovered: usize,
    /// Of those, already present in the manifest
    pub registered: usize,
    /// Files that were missing, in insertion order
    pub missing: Vec<String>,
    /// Files whose records went into at least one region
    pub added: usize,
    pub skipped: Vec<SkippedRegion>,
    pub written: bool,
    pub dry_run: bool,
    /// SHA-256 of the manifest as read
    pub before_sha256: String,
    /// SHA-256 of the manifest as written, equal to `before_sha256` if untouched
    pub after_sha256: String,
}

impl PatchReport {
    pub fn in_sync(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Operator facing summary, one line per fact
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Discovered {} .{} {} in resource directory, {} already registered",
            self.discovered,
            self.extension,
            plural(self.discovered, "file", "files"),
            self.registered,
        )];

        if self.in_sync() {
            lines.push("0 missing files, manifest is up to date".to_string());
            return lines.join("\n");
        }

        lines.push(format!(
            "Found {} missing {}:",
            self.missing.len(),
            plural(self.missing.len(), "file", "files")
        ));
        lines.extend(self.missing.iter().map(|f| format!("  - {}", f)));

        for skip in &self.skipped {
            lines.push(format!(
                "warning: skipped {} insertion, marker not found: {}",
                skip.region, skip.marker
            ));
        }

        let verb = if self.dry_run { "would be added" } else { "added" };
        lines.push(format!(
            "{} missing {} {}",
            self.added,
            plural(self.added, "file", "files"),
            verb
        ));
        if self.written {
            lines.push(format!("Updated {}", self.manifest_path.display()));
        }
        lines.join("\n")
    }
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(missing: &[&str], skipped: Vec<SkippedRegion>) -> PatchReport {
        PatchReport {
            manifest_path: PathBuf::from("project.pbxproj"),
            extension: "mp3".into(),
            discovered: 2,
            registered: 2 - missing.len(),
            missing: missing.iter().map(|s| s.to_string()).collect(),
            added: missing.len(),
            skipped,
            written: !missing.is_empty(),
            dry_run: false,
            before_sha256: String::new(),
            after_sha256: String::new(),
        }
    }

    #[test]
    fn test_summary_in_sync() {
        let summary = report(&[], vec![]).summary();
        assert!(summary.contains("0 missing files"));
        assert!(!summary.contains("Updated"));
    }

    #[test]
    fn test_summary_singular() {
        let summary = report(&["b.mp3"], vec![]).summary();
        assert!(summary.contains("1 missing file added"));
        assert!(summary.contains("  - b.mp3"));
    }

    #[test]
    fn test_summary_warns_on_skip() {
        let r = report(&["b.mp3"], vec![SkippedRegion::new(Region::Group, "pattern")]);
        assert!(r.has_warnings());
        assert!(r.summary().contains("warning: skipped group children insertion"));
    }

    #[test]
    fn test_report_json_uses_camel_case() {
        let r = report(&["b.mp3"], vec![SkippedRegion::new(Region::BuildPhase, "files = (")]);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["manifestPath"], "project.pbxproj");
        assert_eq!(json["dryRun"], false);
        assert_eq!(json["beforeSha256"], "");
        assert_eq!(json["skipped"][0]["region"], "build_phase");
        assert!(json["skipped"][0]["remediation"].is_string());
        assert!(json.get("dry_run").is_none());
    }

    #[test]
    fn test_region_serializes_snake_case() {
        let json = serde_json::to_string(&Region::BuildPhase).unwrap();
        assert_eq!(json, "\"build_phase\"");
    }
}
