//! Digital Asset Links statements for TWA domain verification.
//!
//! The rendered document is served from `/.well-known/assetlinks.json` on the
//! web origin and lets Android verify that the app may open its URLs.

use std::path::Path;

use secrecy::SecretString;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Result, TwaError};
use crate::fingerprint::Fingerprint;
use crate::keytool::{self, KeyTool};

/// Relation granting the app permission to handle all of the site's URLs.
pub const HANDLE_ALL_URLS: &str = "delegate_permission/common.handle_all_urls";

/// Target namespace for Android applications.
pub const ANDROID_APP_NAMESPACE: &str = "android_app";

/// Package name used when none is given.
pub const DEFAULT_PACKAGE: &str = "io.minimax.breboteam";

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "assetlinks.json";

/// keytool's conventional store password, tried when none is configured.
pub const DEFAULT_STORE_PASSWORD: &str = "changeit";

/// An existing keystore to read the fingerprint from.
#[derive(Debug)]
pub struct KeystoreRef<'a> {
    pub path: &'a Path,
    pub alias: &'a str,
    pub store_password: &'a SecretString,
}

/// A single asset-links statement.
///
/// Field order here is the serialized field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetLinkStatement {
    pub relation: Vec<String>,
    pub target: AssetLinkTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetLinkTarget {
    pub namespace: String,
    pub package_name: String,
    pub sha256_fingerprint: Fingerprint,
}

impl AssetLinkStatement {
    /// Statement delegating URL handling to `package_name`.
    pub fn handle_all_urls(fingerprint: &Fingerprint, package_name: &str) -> Self {
        Self {
            relation: vec![HANDLE_ALL_URLS.to_string()],
            target: AssetLinkTarget {
                namespace: ANDROID_APP_NAMESPACE.to_string(),
                package_name: package_name.to_string(),
                sha256_fingerprint: fingerprint.clone(),
            },
        }
    }
}

/// Renders the `assetlinks.json` document with 4-space indentation.
///
/// The output has no trailing newline and is byte-identical for identical
/// inputs.
pub fn render_asset_links(fingerprint: &Fingerprint, package_name: &str) -> Result<String> {
    let statements = [AssetLinkStatement::handle_all_urls(fingerprint, package_name)];

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    statements.serialize(&mut serializer)?;

    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Picks the fingerprint for the statement.
///
/// A non-empty `direct` value wins; otherwise the keystore is queried. With
/// neither, fails with [`TwaError::MissingFingerprint`].
pub async fn resolve_fingerprint(
    direct: Option<&str>,
    keystore: Option<KeystoreRef<'_>>,
    tool: &dyn KeyTool,
) -> Result<Fingerprint> {
    if let Some(raw) = direct.filter(|raw| !raw.trim().is_empty()) {
        return Fingerprint::normalize(raw);
    }

    match keystore {
        Some(keystore) => {
            keytool::read_fingerprint(tool, keystore.path, keystore.alias, keystore.store_password)
                .await
        }
        None => Err(TwaError::MissingFingerprint),
    }
}

/// Public location of the document for `domain`.
pub fn well_known_url(domain: &str) -> String {
    let host = domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!("https://{}/.well-known/{}", host, DEFAULT_OUTPUT)
}
