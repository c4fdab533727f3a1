//! Supported digest algorithms and their manifest conventions.

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::Error;

/// Digest used for a manifest. `Md5` is the legacy format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Md5,
    Sha256,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Md5, Algorithm::Sha256];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha256 => "sha256",
        }
    }

    /// Length of the lowercase hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            Algorithm::Md5 => 32,
            Algorithm::Sha256 => 64,
        }
    }

    /// File extension (without the dot) of manifests using this digest.
    pub fn extension(self) -> &'static str {
        self.name()
    }

    /// Picks the algorithm from a manifest file extension, if it names one.
    pub fn from_manifest_path(path: &Path) -> Option<Algorithm> {
        let ext = path.extension()?.to_str()?;
        Algorithm::ALL
            .into_iter()
            .find(|a| a.extension().eq_ignore_ascii_case(ext))
    }

    /// Pattern a manifest line must match: hash, space, `*`, non-empty path.
    /// The path part is matched byte-wise so names that are not UTF-8 survive.
    pub(crate) fn line_pattern(self) -> &'static Regex {
        static MD5: OnceLock<Regex> = OnceLock::new();
        static SHA256: OnceLock<Regex> = OnceLock::new();
        let cell = match self {
            Algorithm::Md5 => &MD5,
            Algorithm::Sha256 => &SHA256,
        };
        cell.get_or_init(|| {
            Regex::new(&format!(r"^([0-9a-fA-F]{{{}}}) \*((?-u:.)+)$", self.hex_len()))
                .expect("valid manifest line pattern")
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}
