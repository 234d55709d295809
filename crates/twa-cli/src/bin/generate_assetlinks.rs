//! `generate-assetlinks`: write the Digital Asset Links file for TWA domain
//! verification.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use twa_cli::output;
use twa_core::assetlinks::{self, KeystoreRef};
use twa_core::config::DEFAULT_ALIAS;
use twa_core::keytool::{DEFAULT_KEYTOOL, ProcessKeyTool};

/// Generate assetlinks.json for TWA domain verification
#[derive(Parser, Debug)]
#[command(name = "generate-assetlinks")]
#[command(version = twa_core::VERSION)]
#[command(about = "Generate assetlinks.json for TWA domain verification", long_about = None)]
struct Cli {
    /// Keystore to read the fingerprint from
    #[arg(long)]
    keystore: Option<PathBuf>,

    /// Alias of the key entry in the keystore
    #[arg(long, default_value = DEFAULT_ALIAS)]
    alias: String,

    /// SHA-256 fingerprint (XX:XX:...), used instead of the keystore
    #[arg(long)]
    fingerprint: Option<String>,

    /// Android package name
    #[arg(long = "package", default_value = assetlinks::DEFAULT_PACKAGE)]
    package: String,

    /// Output file
    #[arg(long, default_value = assetlinks::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Web domain that will serve the file, used in the printed next steps
    #[arg(long)]
    domain: Option<String>,

    /// keytool executable
    #[arg(long, env = "KEYTOOL", default_value = DEFAULT_KEYTOOL)]
    keytool: PathBuf,

    /// Keystore password
    #[arg(long, env = "KEYSTORE_PASSWORD", hide_env_values = true)]
    store_password: Option<String>,

    /// Key password, tried when no keystore password is set
    #[arg(long, env = "KEY_PASSWORD", hide_env_values = true)]
    key_password: Option<String>,
}

impl Cli {
    /// Keystore password, then key password, then keytool's default.
    fn store_password(&self) -> SecretString {
        let password = [&self.store_password, &self.key_password]
            .into_iter()
            .flatten()
            .find(|p| !p.is_empty())
            .cloned()
            .unwrap_or_else(|| assetlinks::DEFAULT_STORE_PASSWORD.to_string());
        SecretString::from(password)
    }
}

async fn run(cli: Cli) -> Result<()> {
    output::print_banner("Asset Links Generator for TWA Domain Verification");

    let tool = ProcessKeyTool::new(&cli.keytool);
    let store_password = cli.store_password();
    let use_keystore = cli
        .fingerprint
        .as_deref()
        .is_none_or(|f| f.trim().is_empty());

    let keystore = cli.keystore.as_deref().map(|path| KeystoreRef {
        path,
        alias: &cli.alias,
        store_password: &store_password,
    });

    if use_keystore && keystore.is_some() {
        output::print_step("🔐 Getting SHA-256 fingerprint from keystore...");
    }

    let resolved =
        assetlinks::resolve_fingerprint(cli.fingerprint.as_deref(), keystore, &tool).await;
    let fingerprint = match resolved {
        Ok(fingerprint) => fingerprint,
        Err(e @ twa_core::TwaError::MissingFingerprint) => return Err(e.into()),
        Err(e) => return Err(e).context("Failed to get fingerprint from keystore"),
    };
    if use_keystore {
        println!("   Fingerprint: {}", fingerprint);
    }

    println!();
    output::print_step("📝 Generating assetlinks.json...");
    let content = assetlinks::render_asset_links(&fingerprint, &cli.package)?;

    std::fs::write(&cli.output, &content)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    let written = std::path::absolute(&cli.output).unwrap_or_else(|_| cli.output.clone());
    tracing::debug!("Wrote {} bytes to {}", content.len(), written.display());
    println!("   Written to: {}", written.display());
    println!();
    output::print_success("Success! Asset links generated.");

    let url = match &cli.domain {
        Some(domain) => assetlinks::well_known_url(domain),
        None => "https://<your-domain>/.well-known/assetlinks.json".to_string(),
    };

    output::print_section("📋 Next Steps:");
    println!("   1. Upload this file to your server at:");
    println!("      {}", url);
    println!();
    println!("   2. Verify it's accessible:");
    println!("      curl {}", url);
    println!();
    println!("   3. Wait a few minutes, then test your TWA app");
    println!();

    println!("📄 Generated content:");
    output::print_rule();
    println!("{}", content);
    output::print_rule();
    println!();

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    twa_cli::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return twa_cli::exit_code_for_usage(e),
    };

    twa_cli::finish(run(cli).await)
}
