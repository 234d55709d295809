//! The `signing-key-info.txt` summary written after key generation.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::config::KEY_INFO_FILE;
use crate::error::Result;
use crate::fingerprint::Fingerprint;

/// Shown when the fingerprint could not be read back.
pub const FINGERPRINT_PLACEHOLDER: &str = "[Get from keystore]";

const RULE: &str =
    "# ============================================================================";

/// Human-readable record of a generated key, including its passwords.
#[derive(Debug)]
pub struct KeyInfoReport<'a> {
    pub generated_at: DateTime<Utc>,
    /// Absolute keystore path.
    pub keystore: &'a Path,
    pub alias: &'a str,
    pub key_algorithm: &'a str,
    pub key_size: u32,
    pub signature_algorithm: &'a str,
    pub validity_years: u32,
    pub store_password: &'a SecretString,
    pub key_password: &'a SecretString,
    pub fingerprint: Option<&'a Fingerprint>,
}

impl fmt::Display for KeyInfoReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fingerprint = self
            .fingerprint
            .map(Fingerprint::as_str)
            .unwrap_or(FINGERPRINT_PLACEHOLDER);
        let keystore = self.keystore.display();
        let generated = self.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        writeln!(f, "{RULE}")?;
        writeln!(f, "# TWA App - Signing Key Information")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "# Generated: {generated}")?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "IMPORTANT: Keep this file safe and private!")?;
        writeln!(f)?;
        writeln!(f, "## Keystore Information")?;
        writeln!(f, "- File: {keystore}")?;
        writeln!(f, "- Alias: {}", self.alias)?;
        writeln!(f, "- Algorithm: {} {}-bit", self.key_algorithm, self.key_size)?;
        writeln!(f, "- Signature: {}", self.signature_algorithm)?;
        writeln!(f, "- Validity: {} years", self.validity_years)?;
        writeln!(f)?;
        writeln!(f, "## Passwords")?;
        writeln!(f, "⚠️  RECORD YOUR PASSWORDS BELOW:")?;
        writeln!(f, "- Keystore Password: {}", self.store_password.expose_secret())?;
        writeln!(f, "- Key Password: {}", self.key_password.expose_secret())?;
        writeln!(f)?;
        writeln!(f, "## SHA-256 Fingerprint (for assetlinks.json)")?;
        writeln!(f, "{fingerprint}")?;
        writeln!(f)?;
        writeln!(f, "## Usage Examples")?;
        writeln!(f)?;
        writeln!(f, "Generate assetlinks.json:")?;
        writeln!(
            f,
            "  generate-assetlinks --keystore=\"{keystore}\" --alias=\"{}\"",
            self.alias
        )?;
        writeln!(f)?;
        writeln!(f, "Show the certificate:")?;
        writeln!(
            f,
            "  keytool -list -v -keystore \"{keystore}\" -alias \"{}\"",
            self.alias
        )?;
        writeln!(f)?;
        writeln!(f, "Sign a new build:")?;
        writeln!(f, "  # Bubblewrap handles this automatically during build")?;
        writeln!(f)?;
        f.write_str(GUIDANCE)?;
        writeln!(f, "{RULE}")
    }
}

impl KeyInfoReport<'_> {
    /// Writes the report into `dir` and returns the file path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(KEY_INFO_FILE);
        std::fs::write(&path, self.to_string())?;
        tracing::debug!("Wrote key info report to {}", path.display());
        Ok(path)
    }
}

const GUIDANCE: &str = "\
## Security Recommendations

1. BACKUP THIS KEYSTORE FILE!
   Copy to secure, offline storage (USB drive, encrypted cloud)

2. Use a password manager for passwords

3. Never commit this file to version control

4. Use the same key for all app updates

## If You Lose This Key

⚠️  WARNING: If you lose the keystore or passwords:
- You CANNOT publish updates to Google Play Store
- You CANNOT install over existing app installations
- You MUST create a new app with a new package name

## Next Steps

1. Store this file securely
2. Record passwords in password manager
3. Use \"bubblewrap build\" to create your TWA app
4. When prompted, use this keystore

";
