//! Record Formatting
//!
//! Produces the exact line syntax the project file uses. Xcode rewrites the
//! file in its own format on the next save, but until then these lines must
//! parse, so the layout here is fixed.

use serde::Serialize;

use crate::identifier::Identifiers;
use crate::resources::ResourceFile;

const SECTION_INDENT: &str = "\t\t";
const LIST_INDENT: &str = "\t\t\t\t";

/// Every line needed to register one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSet {
    pub filename: String,
    pub identifiers: Identifiers,
    /// PBXFileReference section entry
    pub reference: String,
    /// PBXBuildFile section entry
    pub build: String,
    /// Line in the group's `children` list
    pub group_line: String,
    /// Line in the resources phase `files` list
    pub build_phase_line: String,
}

pub fn build_records(resource: &ResourceFile, ids: &Identifiers) -> RecordSet {
    let name = &resource.filename;
    let path = quote_path(name);

    let reference = format!(
        "{SECTION_INDENT}{} /* {name} */ = {{isa = PBXFileReference; lastKnownFileType = {}; path = {path}; sourceTree = \"<group>\"; }};",
        ids.file_ref, resource.kind,
    );
    let build = format!(
        "{SECTION_INDENT}{} /* {name} in Resources */ = {{isa = PBXBuildFile; fileRef = {} /* {name} */; }};",
        ids.build_file, ids.file_ref,
    );
    let group_line = format!("{LIST_INDENT}{} /* {name} */,", ids.file_ref);
    let build_phase_line = format!("{LIST_INDENT}{} /* {name} in Resources */,", ids.build_file);

    RecordSet {
        filename: name.clone(),
        identifiers: ids.clone(),
        reference,
        build,
        group_line,
        build_phase_line,
    }
}

/// Quote a value the way the project file format requires.
///
/// Bare words are limited to `[A-Za-z0-9_$./:-]`; anything else is wrapped in
/// double quotes with `"` and `\` escaped.
pub fn quote_path(value: &str) -> String {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '/' | ':' | '-'));
    if bare {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
