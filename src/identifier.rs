//! Identifier System - MD5-derived Object IDs
//!
//! Provides deterministic, reproducible identifiers for manifest records.
//! Same seed in, same token out, on every run and every machine. Also home
//! to the SHA-256 fingerprint used to tell whether a manifest changed.

use md5::Md5;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Length of a manifest object identifier, in hex digits
pub const IDENTIFIER_LEN: usize = 24;

/// Role tag mixed into the seed so that two roles for one file never share an ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTag {
    FileRef,
    BuildFile,
}

impl RoleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleTag::FileRef => "fileref",
            RoleTag::BuildFile => "buildfile",
        }
    }
}

/// Identifiers issued for one resource file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifiers {
    pub file_ref: String,
    pub build_file: String,
}

impl Identifiers {
    /// Derive both identifiers for `filename`
    pub fn for_file(filename: &str, seed_suffix: &str) -> Self {
        let file_ref = role_seed(RoleTag::FileRef, filename, seed_suffix);
        let build_file = role_seed(RoleTag::BuildFile, filename, seed_suffix);
        Self {
            file_ref: derive_identifier(&file_ref),
            build_file: derive_identifier(&build_file),
        }
    }
}

/// seed = role + "_" + filename + suffix
pub fn role_seed(role: RoleTag, filename: &str, seed_suffix: &str) -> String {
    format!("{}_{}{}", role.as_str(), filename, seed_suffix)
}

/// Compute a 24-digit uppercase hex token from a seed string.
///
/// The MD5 digest is truncated, so two different seeds can in principle land
/// on the same token. Nothing here detects that.
pub fn derive_identifier(seed: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(seed.as_bytes());
    let digest = hasher.finalize();
    let mut token = hex::encode(digest).to_ascii_uppercase();
    token.truncate(IDENTIFIER_LEN);
    token
}

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// True when `token` has the shape of a manifest object identifier
pub fn is_identifier(token: &str) -> bool {
    token.len() == IDENTIFIER_LEN
        && token.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
