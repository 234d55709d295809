//! Key generation settings.
//!
//! Values are resolved once by the binaries (flag > environment > default)
//! and passed around as an immutable [`KeyConfig`].

use std::path::PathBuf;

use secrecy::SecretString;

use crate::dname::DistinguishedName;

pub const DEFAULT_KEYSTORE: &str = "breboteam-release.keystore";
pub const DEFAULT_ALIAS: &str = "breboteam_key";
pub const DEFAULT_VALIDITY_YEARS: u32 = 25;
pub const DEFAULT_KEY_ALGORITHM: &str = "RSA";
pub const DEFAULT_KEY_SIZE: u32 = 2048;
pub const DEFAULT_SIGNATURE_ALGORITHM: &str = "SHA256withRSA";

pub const DEFAULT_COMMON_NAME: &str = "BreboTeam Developer";
pub const DEFAULT_ORG_UNIT: &str = "Development";
pub const DEFAULT_ORG: &str = "BreboTeam";
pub const DEFAULT_CITY: &str = "Warsaw";
pub const DEFAULT_STATE: &str = "Mazovia";
pub const DEFAULT_COUNTRY: &str = "PL";

/// Report file written next to the invocation.
pub const KEY_INFO_FILE: &str = "signing-key-info.txt";

/// keytool rejects shorter store and key passwords.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Everything needed to create one signing key.
#[derive(Debug)]
pub struct KeyConfig {
    /// Keystore file to create.
    pub keystore: PathBuf,
    /// Alias of the key entry inside the keystore.
    pub alias: String,
    /// Store password; prompted for when `None`.
    pub store_password: Option<SecretString>,
    /// Key password; prompted for when `None`, falling back to the store password.
    pub key_password: Option<SecretString>,
    pub dname: DistinguishedName,
    pub validity_years: u32,
    pub key_algorithm: String,
    pub key_size: u32,
    pub signature_algorithm: String,
}

impl KeyConfig {
    /// Certificate validity in days, as keytool expects it.
    pub fn validity_days(&self) -> u64 {
        u64::from(self.validity_years) * 365
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            keystore: PathBuf::from(DEFAULT_KEYSTORE),
            alias: DEFAULT_ALIAS.to_string(),
            store_password: None,
            key_password: None,
            dname: DistinguishedName {
                common_name: Some(DEFAULT_COMMON_NAME.to_string()),
                organizational_unit: Some(DEFAULT_ORG_UNIT.to_string()),
                organization: Some(DEFAULT_ORG.to_string()),
                locality: Some(DEFAULT_CITY.to_string()),
                state: Some(DEFAULT_STATE.to_string()),
                country: Some(DEFAULT_COUNTRY.to_string()),
            },
            validity_years: DEFAULT_VALIDITY_YEARS,
            key_algorithm: DEFAULT_KEY_ALGORITHM.to_string(),
            key_size: DEFAULT_KEY_SIZE,
            signature_algorithm: DEFAULT_SIGNATURE_ALGORITHM.to_string(),
        }
    }
}
