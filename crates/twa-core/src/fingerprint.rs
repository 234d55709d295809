//! SHA-256 certificate fingerprints.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

use crate::error::{Result, TwaError};

/// Matches the `SHA256: AA:BB:...` line of `keytool -list -v`.
static SHA256_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)SHA256:\s*([A-F0-9:]+)").expect("SHA256 pattern is valid")
});

/// Number of bytes in a SHA-256 digest.
const SHA256_LEN: usize = 32;

/// Uppercase, colon-separated hex digest of a signing certificate.
///
/// Always obtained from keytool output or from the user; never computed here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Extracts the SHA-256 fingerprint from `keytool -list -v` output.
    ///
    /// The label and the hex digits are matched case-insensitively and the
    /// captured value is uppercased.
    pub fn from_keytool_output(output: &str) -> Result<Self> {
        let captures = SHA256_LINE
            .captures(output)
            .ok_or(TwaError::FingerprintNotFound)?;
        let value = captures
            .get(1)
            .map(|m| m.as_str())
            .ok_or(TwaError::FingerprintNotFound)?;

        Ok(Self(value.to_ascii_uppercase()))
    }

    /// Normalizes a fingerprint supplied on the command line.
    ///
    /// Accepts an optional `SHA256:` prefix, as copied from keytool.
    pub fn normalize(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let value = match trimmed.get(..7) {
            Some(prefix) if prefix.eq_ignore_ascii_case("sha256:") => trimmed[7..].trim(),
            _ => trimmed,
        };

        if value.is_empty() {
            return Err(TwaError::MissingFingerprint);
        }

        let fingerprint = Self(value.to_ascii_uppercase());
        if !fingerprint.is_sha256() {
            tracing::warn!(
                "Fingerprint {} is not 32 colon-separated hex bytes; using it as given",
                fingerprint
            );
        }

        Ok(fingerprint)
    }

    /// Whether the value decodes to exactly 32 bytes.
    pub fn is_sha256(&self) -> bool {
        let pairs: Vec<&str> = self.0.split(':').collect();
        pairs.len() == SHA256_LEN
            && pairs.iter().all(|pair| pair.len() == 2)
            && hex::decode(pairs.concat()).is_ok_and(|bytes| bytes.len() == SHA256_LEN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = TwaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::normalize(s)
    }
}
