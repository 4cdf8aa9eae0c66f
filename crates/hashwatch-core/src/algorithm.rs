//! Digest algorithm selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Content digest algorithm, identified by name.
///
/// Both supported algorithms produce 256-bit digests, so every hex digest in
/// a snapshot is 64 characters regardless of which one was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3 (default).
    #[default]
    Blake3,
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Canonical lowercase name, as stored in the baseline file.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    /// Digest length in hex characters.
    pub fn hex_len(&self) -> usize {
        64
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(ScanError::InvalidConfig {
                message: format!("unknown hash algorithm: {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("blake3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
        assert_eq!("SHA256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("sha-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn test_default_is_blake3() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Blake3);
    }

    #[test]
    fn test_display_round_trips() {
        for algo in [HashAlgorithm::Blake3, HashAlgorithm::Sha256] {
            assert_eq!(algo.to_string().parse::<HashAlgorithm>().unwrap(), algo);
        }
    }
}
