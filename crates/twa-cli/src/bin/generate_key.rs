//! `generate-key`: create the signing keystore for a TWA app.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use twa_cli::output;
use twa_cli::prompt::StdinPrompter;
use twa_core::config::{self, KEY_INFO_FILE, KeyConfig};
use twa_core::dname::DistinguishedName;
use twa_core::keygen;
use twa_core::keytool::{self, DEFAULT_KEYTOOL, ProcessKeyTool};

/// Generate a signing key (keystore) for a TWA app
#[derive(Parser, Debug)]
#[command(name = "generate-key")]
#[command(version = twa_core::VERSION)]
#[command(about = "Generate a signing key (keystore) for a TWA app", long_about = None)]
struct Cli {
    /// Keystore file to create
    #[arg(long, env = "KEYSTORE_PATH", default_value = config::DEFAULT_KEYSTORE)]
    keystore: PathBuf,

    /// Alias of the key entry
    #[arg(long, env = "KEY_ALIAS", default_value = config::DEFAULT_ALIAS)]
    alias: String,

    /// Keystore password (prompted for when unset)
    #[arg(long, env = "KEYSTORE_PASSWORD", hide_env_values = true)]
    store_password: Option<String>,

    /// Key password (prompted for when unset)
    #[arg(long, env = "KEY_PASSWORD", hide_env_values = true)]
    key_password: Option<String>,

    /// Certificate owner name (CN)
    #[arg(long, env = "KEYSTORE_NAME", default_value = config::DEFAULT_COMMON_NAME)]
    name: String,

    /// Organizational unit (OU)
    #[arg(long, env = "KEYSTORE_ORG_UNIT", default_value = config::DEFAULT_ORG_UNIT)]
    org_unit: String,

    /// Organization (O)
    #[arg(long, env = "KEYSTORE_ORG", default_value = config::DEFAULT_ORG)]
    org: String,

    /// City or locality (L)
    #[arg(long, env = "KEYSTORE_CITY", default_value = config::DEFAULT_CITY)]
    city: String,

    /// State or province (ST)
    #[arg(long, env = "KEYSTORE_STATE", default_value = config::DEFAULT_STATE)]
    state: String,

    /// Two-letter country code (C)
    #[arg(long, env = "KEYSTORE_COUNTRY", default_value = config::DEFAULT_COUNTRY)]
    country: String,

    /// Certificate validity in years
    #[arg(
        long,
        env = "KEYSTORE_VALIDITY",
        default_value_t = config::DEFAULT_VALIDITY_YEARS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    validity: u32,

    /// keytool executable
    #[arg(long, env = "KEYTOOL", default_value = DEFAULT_KEYTOOL)]
    keytool: PathBuf,

    /// Overwrite an existing keystore without asking
    #[arg(long, short)]
    yes: bool,
}

impl Cli {
    fn key_config(&self) -> KeyConfig {
        let field = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());
        let secret = |value: &Option<String>| {
            value
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(|v| SecretString::from(v.clone()))
        };

        KeyConfig {
            keystore: self.keystore.clone(),
            alias: self.alias.clone(),
            store_password: secret(&self.store_password),
            key_password: secret(&self.key_password),
            dname: DistinguishedName {
                common_name: field(&self.name),
                organizational_unit: field(&self.org_unit),
                organization: field(&self.org),
                locality: field(&self.city),
                state: field(&self.state),
                country: field(&self.country),
            },
            validity_years: self.validity,
            ..Default::default()
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    output::print_banner("Signing Key Generator for TWA App");

    let tool = ProcessKeyTool::new(&cli.keytool);
    keytool::ensure_available(&tool).await?;
    tracing::debug!("Using keytool at {}", tool.program().display());

    let config = cli.key_config();

    output::print_section("📋 Configuration:");
    output::print_key_value("Keystore", &config.keystore.display().to_string());
    output::print_key_value("Key Alias", &config.alias);
    output::print_key_value("Validity", &format!("{} years", config.validity_years));
    output::print_key_value("DName", &config.dname.to_string());
    println!();

    let request = keygen::prepare(config, &StdinPrompter::new(cli.yes))?;

    println!();
    output::print_step("🔐 Generating signing key...");

    let report_dir = std::env::current_dir().context("Failed to determine working directory")?;
    let generated = keygen::generate(&request, &tool, &report_dir, chrono::Utc::now())
        .await
        .context("Error generating key")?;

    output::print_success("Key generated successfully!");
    println!();
    output::print_info(&format!("📁 File created: {}", generated.keystore.display()));
    println!();

    match &generated.fingerprint {
        Some(fingerprint) => {
            println!("🔑 SHA-256 Fingerprint:");
            println!("   {}", fingerprint);
        }
        None => {
            output::print_warning("Could not read the SHA-256 fingerprint from the new keystore.");
            output::print_warning(&format!(
                "Run: generate-assetlinks --keystore=\"{}\" --alias=\"{}\"",
                request.keystore.display(),
                request.alias
            ));
        }
    }
    println!();

    output::print_info(&format!("📄 Info file created: {}", KEY_INFO_FILE));
    println!();

    println!("═══════════════════════════════════════════════════════════════════");
    println!("  NEXT STEPS");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();
    println!("1. ✅ Key generated successfully");
    println!("2. 📄 Review {}", KEY_INFO_FILE);
    println!("3. 🔐 Store keystore file securely");
    println!("4. 📝 Record passwords in password manager");
    println!("5. 🚀 Run: bubblewrap build");
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
