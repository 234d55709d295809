//! Narrow interface over the JDK `keytool` executable.
//!
//! Everything that shells out goes through [`KeyTool::invoke`], so parsing and
//! orchestration can be tested against recorded output instead of a real JDK.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::process::Command;

use crate::error::{Result, TwaError};
use crate::fingerprint::Fingerprint;

/// Default executable name, resolved through `PATH`.
pub const DEFAULT_KEYTOOL: &str = "keytool";

/// Operations this crate performs with keytool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `keytool -version`, used as an availability probe.
    Version,
    /// `keytool -genkeypair -v`
    GenerateKeyPair,
    /// `keytool -list -v`
    ListVerbose,
}

impl Operation {
    /// Leading arguments that select the operation.
    pub fn command_args(&self) -> &'static [&'static str] {
        match self {
            Operation::Version => &["-version"],
            Operation::GenerateKeyPair => &["-genkeypair", "-v"],
            Operation::ListVerbose => &["-list", "-v"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Version => "version",
            Operation::GenerateKeyPair => "genkeypair",
            Operation::ListVerbose => "list",
        }
    }
}

/// Runs a keytool operation and returns its standard output as text.
#[async_trait]
pub trait KeyTool: Send + Sync {
    /// Invokes `operation` with the given trailing arguments.
    ///
    /// # Errors
    /// * [`TwaError::ToolNotFound`] if the executable cannot be located
    /// * [`TwaError::ToolInvocation`] if it exits non-zero
    async fn invoke(&self, operation: Operation, args: &[String]) -> Result<String>;
}

/// keytool backed by a real child process.
#[derive(Debug, Clone)]
pub struct ProcessKeyTool {
    program: PathBuf,
}

impl ProcessKeyTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for ProcessKeyTool {
    fn default() -> Self {
        Self::new(DEFAULT_KEYTOOL)
    }
}

#[async_trait]
impl KeyTool for ProcessKeyTool {
    async fn invoke(&self, operation: Operation, args: &[String]) -> Result<String> {
        // Arguments carry passwords, so only the operation is logged
        tracing::debug!(
            "Running {} {}",
            self.program.display(),
            operation.command_args().join(" ")
        );

        let output = Command::new(&self.program)
            .args(operation.command_args())
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => TwaError::ToolNotFound {
                    program: self.program.display().to_string(),
                },
                _ => TwaError::ToolInvocation {
                    operation: operation.name(),
                    message: format!("Failed to run {}: {}", self.program.display(), e),
                },
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            // keytool reports most errors on stdout ("keytool error: ...")
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            let message = if message.is_empty() {
                format!("exited with {}", output.status)
            } else {
                message
            };
            return Err(TwaError::ToolInvocation {
                operation: operation.name(),
                message,
            });
        }

        Ok(stdout)
    }
}

/// Checks that keytool can be executed at all.
pub async fn ensure_available(tool: &dyn KeyTool) -> Result<()> {
    tool.invoke(Operation::Version, &[]).await?;
    Ok(())
}

/// Builds the trailing arguments for `keytool -list -v`.
pub fn list_verbose_args(keystore: &Path, alias: &str, store_password: &SecretString) -> Vec<String> {
    vec![
        "-keystore".to_string(),
        keystore.display().to_string(),
        "-alias".to_string(),
        alias.to_string(),
        "-storepass".to_string(),
        store_password.expose_secret().to_string(),
    ]
}

/// Reads the certificate fingerprint of `alias` from an existing keystore.
pub async fn read_fingerprint(
    tool: &dyn KeyTool,
    keystore: &Path,
    alias: &str,
    store_password: &SecretString,
) -> Result<Fingerprint> {
    let args = list_verbose_args(keystore, alias, store_password);
    let output = tool.invoke(Operation::ListVerbose, &args).await?;
    Fingerprint::from_keytool_output(&output)
}
