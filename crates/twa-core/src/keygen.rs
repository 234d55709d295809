//! Signing key generation.
//!
//! Generation runs in two phases so the caller can report progress between
//! them:
//!
//! 1. [`prepare`] asks the interactive questions (overwrite, passwords) and
//!    validates the answers without touching the disk.
//! 2. [`generate`] creates the keystore with keytool, reads the certificate
//!    fingerprint back and writes the key info report.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::config::{KeyConfig, MIN_PASSWORD_LEN};
use crate::dname::DistinguishedName;
use crate::error::{Result, TwaError};
use crate::fingerprint::Fingerprint;
use crate::keytool::{self, KeyTool, Operation};
use crate::prompt::Prompter;
use crate::report::KeyInfoReport;

pub const EXISTING_KEYSTORE_WARNING: &str = "Warning: Keystore already exists!\n\
Continuing will overwrite it and make previous installs invalid.";
pub const OVERWRITE_QUESTION: &str = "Do you want to overwrite? (y/N): ";
pub const STORE_PASSWORD_QUESTION: &str = "Enter keystore password: ";
pub const KEY_PASSWORD_QUESTION: &str = "Enter key password (same as keystore or Enter): ";

/// A confirmed generation request with resolved passwords.
#[derive(Debug)]
pub struct KeyRequest {
    pub keystore: PathBuf,
    pub alias: String,
    pub store_password: SecretString,
    pub key_password: SecretString,
    pub dname: DistinguishedName,
    pub validity_years: u32,
    pub validity_days: u64,
    pub key_algorithm: String,
    pub key_size: u32,
    pub signature_algorithm: String,
    /// The keystore exists and the operator agreed to replace it.
    pub replace_existing: bool,
}

/// Outcome of a successful generation.
#[derive(Debug)]
pub struct GeneratedKey {
    /// Absolute path of the new keystore.
    pub keystore: PathBuf,
    /// `None` when the read-back after generation failed.
    pub fingerprint: Option<Fingerprint>,
    pub report: PathBuf,
}

/// Confirms overwrites and resolves passwords.
///
/// Returns [`TwaError::OverwriteDeclined`] when the keystore exists and the
/// operator does not answer `y`; nothing is modified in that case.
pub fn prepare(config: KeyConfig, prompter: &dyn Prompter) -> Result<KeyRequest> {
    let validity_days = config.validity_days();
    let KeyConfig {
        keystore,
        alias,
        store_password,
        key_password,
        dname,
        validity_years,
        key_algorithm,
        key_size,
        signature_algorithm,
    } = config;

    validate(&alias, &dname, validity_years)?;

    let replace_existing = keystore.exists();
    if replace_existing {
        tracing::debug!("Keystore {} already exists", keystore.display());
        prompter.warn(EXISTING_KEYSTORE_WARNING);
        if !prompter.confirm(OVERWRITE_QUESTION)? {
            return Err(TwaError::OverwriteDeclined);
        }
    }

    let store_password = match store_password {
        Some(password) => password,
        None => prompter.password(STORE_PASSWORD_QUESTION)?,
    };
    check_password("Keystore", &store_password)?;

    let key_password = match key_password {
        Some(password) => password,
        None => {
            let answer = prompter.password(KEY_PASSWORD_QUESTION)?;
            if answer.expose_secret().is_empty() {
                SecretString::from(store_password.expose_secret().to_string())
            } else {
                answer
            }
        }
    };
    check_password("Key", &key_password)?;

    Ok(KeyRequest {
        keystore,
        alias,
        store_password,
        key_password,
        dname,
        validity_years,
        validity_days,
        key_algorithm,
        key_size,
        signature_algorithm,
        replace_existing,
    })
}

fn validate(alias: &str, dname: &DistinguishedName, validity_years: u32) -> Result<()> {
    if alias.trim().is_empty() {
        return Err(TwaError::Configuration("Key alias must not be empty".to_string()));
    }
    if dname.is_empty() {
        return Err(TwaError::Configuration(
            "At least one distinguished name field must be set".to_string(),
        ));
    }
    if validity_years == 0 {
        return Err(TwaError::Configuration(
            "Validity must be at least 1 year".to_string(),
        ));
    }
    Ok(())
}

fn check_password(label: &str, password: &SecretString) -> Result<()> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(TwaError::Configuration(format!(
            "{} password must be at least {} characters",
            label, MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Trailing arguments for `keytool -genkeypair -v` writing into `keystore`.
pub fn generate_key_pair_args(request: &KeyRequest, keystore: &Path) -> Vec<String> {
    vec![
        "-keystore".to_string(),
        keystore.display().to_string(),
        "-alias".to_string(),
        request.alias.clone(),
        "-keyalg".to_string(),
        request.key_algorithm.clone(),
        "-keysize".to_string(),
        request.key_size.to_string(),
        "-sigalg".to_string(),
        request.signature_algorithm.clone(),
        "-validity".to_string(),
        request.validity_days.to_string(),
        "-storepass".to_string(),
        request.store_password.expose_secret().to_string(),
        "-keypass".to_string(),
        request.key_password.expose_secret().to_string(),
        "-dname".to_string(),
        request.dname.to_string(),
    ]
}

/// Sibling path keytool writes the new keystore to before it replaces the
/// target.
pub fn staging_path(keystore: &Path) -> PathBuf {
    let mut path = keystore.as_os_str().to_owned();
    path.push(".tmp");
    PathBuf::from(path)
}

/// Runs `keytool -genkeypair` into a staging file and moves it over the
/// keystore path once keytool succeeds.
///
/// The target is untouched when keytool fails.
async fn create_keystore(request: &KeyRequest, tool: &dyn KeyTool) -> Result<()> {
    let staging = staging_path(&request.keystore);
    remove_if_present(&staging)?;

    let args = generate_key_pair_args(request, &staging);
    if let Err(e) = tool.invoke(Operation::GenerateKeyPair, &args).await {
        if let Err(cleanup) = remove_if_present(&staging) {
            tracing::warn!("Could not remove {}: {}", staging.display(), cleanup);
        }
        return Err(e);
    }

    std::fs::rename(&staging, &request.keystore)?;
    if request.replace_existing {
        tracing::debug!("Replaced existing keystore {}", request.keystore.display());
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Creates the keystore and writes the key info report into `report_dir`.
///
/// A failed fingerprint read-back is logged and leaves the keystore in place;
/// the report then carries a placeholder instead of the fingerprint.
pub async fn generate(
    request: &KeyRequest,
    tool: &dyn KeyTool,
    report_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<GeneratedKey> {
    create_keystore(request, tool).await?;
    tracing::info!("Generated key '{}' in {}", request.alias, request.keystore.display());

    let keystore = std::path::absolute(&request.keystore)?;

    let fingerprint = match keytool::read_fingerprint(
        tool,
        &request.keystore,
        &request.alias,
        &request.store_password,
    )
    .await
    {
        Ok(fingerprint) => Some(fingerprint),
        Err(e) => {
            tracing::warn!("Could not read fingerprint from new keystore: {}", e);
            None
        }
    };

    let report = KeyInfoReport {
        generated_at,
        keystore: &keystore,
        alias: &request.alias,
        key_algorithm: &request.key_algorithm,
        key_size: request.key_size,
        signature_algorithm: &request.signature_algorithm,
        validity_years: request.validity_years,
        store_password: &request.store_password,
        key_password: &request.key_password,
        fingerprint: fingerprint.as_ref(),
    }
    .write_to(report_dir)?;

    Ok(GeneratedKey {
        keystore,
        fingerprint,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keytool::testing::{FakeKeyTool, Reply, SAMPLE_FINGERPRINT};
    use crate::prompt::ScriptedPrompter;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn config_in(dir: &Path) -> KeyConfig {
        KeyConfig {
            keystore: dir.join("release.keystore"),
            store_password: Some(secret("store-pass")),
            key_password: Some(secret("key-pass")),
            ..Default::default()
        }
    }

    /// Prompter for runs that must not ask anything.
    fn silent() -> ScriptedPrompter {
        ScriptedPrompter::new(Vec::<String>::new())
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-16T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_prepare_with_configured_passwords_asks_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let prompter = silent();

        let request = prepare(config_in(dir.path()), &prompter).unwrap();

        assert!(prompter.questions().is_empty());
        assert!(prompter.warnings().is_empty());
        assert!(!request.replace_existing);
        assert_eq!(request.validity_days, 9125);
        assert_eq!(request.key_password.expose_secret(), "key-pass");
    }

    #[test]
    fn test_prepare_prompts_for_missing_passwords() {
        let dir = tempfile::tempdir().unwrap();
        let config = KeyConfig {
            store_password: None,
            key_password: None,
            ..config_in(dir.path())
        };
        let prompter = ScriptedPrompter::new(["prompted-store", ""]);

        let request = prepare(config, &prompter).unwrap();

        assert_eq!(
            prompter.questions(),
            [STORE_PASSWORD_QUESTION, KEY_PASSWORD_QUESTION]
        );
        assert_eq!(request.store_password.expose_secret(), "prompted-store");
        // Empty key password answer falls back to the store password
        assert_eq!(request.key_password.expose_secret(), "prompted-store");
    }

    #[test]
    fn test_prepare_declined_overwrite_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.keystore, b"original keystore bytes").unwrap();
        let keystore = config.keystore.clone();

        for answer in ["", "n", "yes", "N"] {
            let prompter = ScriptedPrompter::new([answer]);
            let result = prepare(
                KeyConfig {
                    keystore: keystore.clone(),
                    store_password: Some(secret("store-pass")),
                    key_password: Some(secret("key-pass")),
                    ..Default::default()
                },
                &prompter,
            );
            assert!(matches!(result, Err(TwaError::OverwriteDeclined)));
            assert_eq!(prompter.warnings(), [EXISTING_KEYSTORE_WARNING]);
            assert_eq!(prompter.questions(), [OVERWRITE_QUESTION]);
        }

        assert_eq!(std::fs::read(&keystore).unwrap(), b"original keystore bytes");
    }

    #[test]
    fn test_prepare_confirmed_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.keystore, b"old").unwrap();

        let request = prepare(config, &ScriptedPrompter::new(["Y"])).unwrap();
        assert!(request.replace_existing);

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.keystore, b"old").unwrap();
        assert!(prepare(config, &ScriptedPrompter::new(["y"])).unwrap().replace_existing);
    }

    #[test]
    fn test_prepare_rejects_short_password() {
        let dir = tempfile::tempdir().unwrap();
        let config = KeyConfig {
            store_password: Some(secret("12345")),
            ..config_in(dir.path())
        };
        let err = prepare(config, &silent()).unwrap_err();
        assert!(matches!(err, TwaError::Configuration(_)));
        assert!(err.to_string().contains("at least 6 characters"));
    }

    #[test]
    fn test_prepare_rejects_zero_validity() {
        let dir = tempfile::tempdir().unwrap();
        let config = KeyConfig {
            validity_years: 0,
            ..config_in(dir.path())
        };
        assert!(matches!(
            prepare(config, &silent()),
            Err(TwaError::Configuration(_))
        ));
    }

    #[test]
    fn test_generate_key_pair_args() {
        let dir = tempfile::tempdir().unwrap();
        let request = prepare(config_in(dir.path()), &silent()).unwrap();
        let args = generate_key_pair_args(&request, &request.keystore);

        let value_of = |flag: &str| {
            let i = args.iter().position(|a| a == flag).unwrap();
            args[i + 1].clone()
        };
        assert_eq!(value_of("-alias"), "breboteam_key");
        assert_eq!(value_of("-keyalg"), "RSA");
        assert_eq!(value_of("-keysize"), "2048");
        assert_eq!(value_of("-sigalg"), "SHA256withRSA");
        assert_eq!(value_of("-validity"), "9125");
        assert_eq!(value_of("-storepass"), "store-pass");
        assert_eq!(value_of("-keypass"), "key-pass");
        assert_eq!(
            value_of("-dname"),
            "CN=BreboTeam Developer, OU=Development, O=BreboTeam, L=Warsaw, ST=Mazovia, C=PL"
        );
    }

    #[tokio::test]
    async fn test_generate_writes_report_with_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let request = prepare(config_in(dir.path()), &silent()).unwrap();
        let tool = FakeKeyTool::working();

        let generated = generate(&request, &tool, dir.path(), now()).await.unwrap();

        assert_eq!(
            generated.fingerprint.as_ref().map(|f| f.as_str()),
            Some(SAMPLE_FINGERPRINT)
        );
        assert_eq!(generated.report, dir.path().join("signing-key-info.txt"));
        assert!(generated.keystore.is_absolute());

        let report = std::fs::read_to_string(&generated.report).unwrap();
        assert!(report.contains(SAMPLE_FINGERPRINT));
        assert!(report.contains("- Keystore Password: store-pass"));
        assert!(report.contains("# Generated: 2026-10-16T12:00:00.000Z"));

        let operations: Vec<Operation> = tool.calls().into_iter().map(|(op, _)| op).collect();
        assert_eq!(operations, [Operation::GenerateKeyPair, Operation::ListVerbose]);
    }

    #[tokio::test]
    async fn test_generate_tolerates_failed_fingerprint_read() {
        let dir = tempfile::tempdir().unwrap();
        let request = prepare(config_in(dir.path()), &silent()).unwrap();
        let mut tool = FakeKeyTool::working();
        tool.list = Reply::Ok("no fingerprints here".to_string());

        let generated = generate(&request, &tool, dir.path(), now()).await.unwrap();

        assert!(generated.fingerprint.is_none());
        let report = std::fs::read_to_string(&generated.report).unwrap();
        assert!(report.contains("[Get from keystore]"));
    }

    #[tokio::test]
    async fn test_generate_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let request = prepare(config_in(dir.path()), &silent()).unwrap();
        let mut tool = FakeKeyTool::working();
        tool.generate = Reply::Fail("keytool error: java.lang.Exception: Key pair not generated".to_string());

        let result = generate(&request, &tool, dir.path(), now()).await;

        assert!(matches!(result, Err(TwaError::ToolInvocation { .. })));
        assert!(!dir.path().join("signing-key-info.txt").exists());
    }

    #[tokio::test]
    async fn test_generate_replaces_confirmed_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.keystore, b"old keystore").unwrap();
        let request = prepare(config, &ScriptedPrompter::new(["y"])).unwrap();

        let tool = FakeKeyTool::working();

        generate(&request, &tool, dir.path(), now()).await.unwrap();

        assert_eq!(std::fs::read(&request.keystore).unwrap(), b"fresh keystore");
        assert!(!staging_path(&request.keystore).exists());
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_confirmed_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.keystore, b"original keystore bytes").unwrap();
        let request = prepare(config, &ScriptedPrompter::new(["y"])).unwrap();

        let mut tool = FakeKeyTool::working();
        tool.generate = Reply::Fail("keytool error: java.lang.Exception: Key pair not generated".to_string());

        let result = generate(&request, &tool, dir.path(), now()).await;

        assert!(matches!(result, Err(TwaError::ToolInvocation { .. })));
        assert_eq!(std::fs::read(&request.keystore).unwrap(), b"original keystore bytes");
        assert!(!staging_path(&request.keystore).exists());
        assert!(!dir.path().join("signing-key-info.txt").exists());
    }

    #[tokio::test]
    async fn test_generate_targets_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let request = prepare(config_in(dir.path()), &silent()).unwrap();
        let tool = FakeKeyTool::working();

        generate(&request, &tool, dir.path(), now()).await.unwrap();

        let calls = tool.calls();
        let (operation, args) = &calls[0];
        assert_eq!(*operation, Operation::GenerateKeyPair);
        let i = args.iter().position(|a| a == "-keystore").unwrap();
        assert_eq!(args[i + 1], staging_path(&request.keystore).display().to_string());
        // The fingerprint is read from the final location
        let (_, list_args) = &calls[1];
        assert!(list_args.contains(&request.keystore.display().to_string()));
    }

    #[test]
    fn test_staging_path_is_a_sibling() {
        let staging = staging_path(Path::new("keys/release.keystore"));
        assert_eq!(staging, PathBuf::from("keys/release.keystore.tmp"));
    }
}
