//! pbxsync Core - Resource Manifest Patcher
//!
//! Keeps an Xcode project manifest in step with a directory of resource
//! files. Each run:
//! 1. Reads the manifest and finds which files it already lists
//! 2. Lists the resource directory
//! 3. Derives stable identifiers for whatever is missing
//! 4. Splices file reference, build file, group and build phase lines in
//!    next to their markers
//! 5. Writes the manifest back, or leaves it alone if nothing was missing

pub mod config;
pub mod identifier;
pub mod logging;
pub mod manifest;
pub mod patcher;
pub mod records;
pub mod report;
pub mod resources;

pub use config::{Markers, PatcherConfig};
pub use identifier::{derive_identifier, Identifiers, RoleTag};
pub use manifest::{insert_before_marker, insert_into_region, scan_registered};
pub use patcher::{diff, PatchError, PatchPlan, Patcher};
pub use records::{build_records, RecordSet};
pub use report::{PatchReport, Region, SkippedRegion};
pub use resources::{scan_available, ResourceFile};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
