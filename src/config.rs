//! Patcher Configuration - Explicit, Not Global
//!
//! Everything the patcher needs to know about paths, extensions and manifest
//! layout lives here and is handed to `Patcher::new`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::patcher::PatchError;

pub const DEFAULT_EXTENSION: &str = "mp3";
pub const DEFAULT_SEED_SUFFIX: &str = "_v2";
pub const REFERENCE_SECTION_END: &str = "/* End PBXFileReference section */";
pub const BUILD_SECTION_END: &str = "/* End PBXBuildFile section */";
pub const AUDIO_GROUP_HEADER: &str =
    r"[0-9A-F]{24} /\* Audio \*/ = \{\s*isa = PBXGroup;\s*children = \(";
pub const RESOURCES_PHASE_HEADER: &str =
    r"[0-9A-F]{24} /\* Resources \*/ = \{\s*isa = PBXResourcesBuildPhase;\s*buildActionMask = \d+;\s*files = \(";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatcherConfig {
    #[serde(default)]
    pub resource_directory: PathBuf,
    #[serde(default)]
    pub manifest_path: PathBuf,
    #[serde(default = "default_extension")]
    pub file_extension: String,
    /// Overrides the `lastKnownFileType` derived from the extension
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default = "default_seed_suffix")]
    pub seed_suffix: String,
    #[serde(default)]
    pub markers: Markers,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_seed_suffix() -> String {
    DEFAULT_SEED_SUFFIX.to_string()
}

/// Where each kind of record goes in the manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Markers {
    /// Literal end-of-section marker for file references
    #[serde(default = "default_reference_section")]
    pub reference_section: String,
    /// Literal end-of-section marker for build files
    #[serde(default = "default_build_section")]
    pub build_section: String,
    /// Regex matching the opening of the group's `children = (` list
    #[serde(default = "default_group_header")]
    pub group_header_pattern: String,
    /// Regex matching the opening of a resources phase `files = (` list.
    /// `null` turns build phase insertion off.
    #[serde(default = "default_build_phase_header")]
    pub build_phase_pattern: Option<String>,
}

fn default_reference_section() -> String {
    REFERENCE_SECTION_END.to_string()
}

fn default_build_section() -> String {
    BUILD_SECTION_END.to_string()
}

fn default_group_header() -> String {
    AUDIO_GROUP_HEADER.to_string()
}

fn default_build_phase_header() -> Option<String> {
    Some(RESOURCES_PHASE_HEADER.to_string())
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            reference_section: default_reference_section(),
            build_section: default_build_section(),
            group_header_pattern: default_group_header(),
            build_phase_pattern: default_build_phase_header(),
        }
    }
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            resource_directory: PathBuf::new(),
            manifest_path: PathBuf::new(),
            file_extension: default_extension(),
            file_type: None,
            seed_suffix: default_seed_suffix(),
            markers: Markers::default(),
        }
    }
}

impl PatcherConfig {
    pub fn new(resource_directory: impl Into<PathBuf>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            resource_directory: resource_directory.into(),
            manifest_path: manifest_path.into(),
            ..Self::default()
        }
    }

    /// Load a JSON config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, PatchError> {
        let content = fs::read_to_string(path).map_err(|source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Extension without a leading dot
    pub fn extension(&self) -> &str {
        self.file_extension.trim_start_matches('.')
    }

    /// Reject configs that could never produce a sane patch
    pub fn check(&self) -> Result<(), PatchError> {
        if self.extension().is_empty() {
            return Err(PatchError::InvalidConfig("file extension is empty".into()));
        }
        if self.extension().contains('/') {
            return Err(PatchError::InvalidConfig(format!(
                "file extension contains a path separator: {}",
                self.file_extension
            )));
        }
        if self.markers.reference_section.is_empty() {
            return Err(PatchError::InvalidConfig("reference section marker is empty".into()));
        }
        if self.markers.build_section.is_empty() {
            return Err(PatchError::InvalidConfig("build section marker is empty".into()));
        }
        if self.markers.group_header_pattern.is_empty() {
            return Err(PatchError::InvalidConfig("group header pattern is empty".into()));
        }
        if self.markers.build_phase_pattern.as_deref() == Some("") {
            return Err(PatchError::InvalidConfig(
                "build phase pattern is empty, use null to turn it off".into(),
            ));
        }
        Ok(())
    }
}
