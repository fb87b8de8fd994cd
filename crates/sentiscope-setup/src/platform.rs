//! Deploy-platform client seam
//!
//! The bootstrap flow drives the platform through this trait; the concrete
//! implementation shells out to the platform's own CLI. Everything past the
//! process boundary (account creation, token storage, remote validation) is
//! the platform's business.

use sentiscope_core::{Error, FunctionSpec, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Client binary override key.
pub const CLIENT_BIN_VAR: &str = "DEPLOY_CLIENT_BIN";

/// Install command override key.
pub const CLIENT_INSTALL_VAR: &str = "DEPLOY_CLIENT_INSTALL";

const DEFAULT_CLIENT_BIN: &str = "modal";
const DEFAULT_INSTALL_COMMAND: &str = "pip install modal";

/// Operations the bootstrap flow needs from the deployment client.
#[async_trait::async_trait]
pub trait DeployClient: Send + Sync {
    /// Whether the client is already present on this machine.
    async fn is_installed(&self) -> bool;

    /// Install the client. Errors here are fatal to the bootstrap flow.
    async fn install(&self) -> Result<()>;

    /// Launch the client's interactive authorization flow.
    async fn authenticate(&self) -> Result<()>;

    /// Submit a minimal function spec to confirm the remote service accepts
    /// it. Nothing is deployed.
    async fn verify(&self, probe: &FunctionSpec) -> Result<()>;

    /// Client binary name, for user-facing guidance.
    fn binary(&self) -> &str;
}

/// Client driven through the platform's CLI.
pub struct CliDeployClient {
    binary: String,
    install_command: Vec<String>,
}

impl CliDeployClient {
    /// Build the client from environment overrides, falling back to the
    /// default binary and install command.
    pub fn from_env() -> Self {
        let binary =
            std::env::var(CLIENT_BIN_VAR).unwrap_or_else(|_| DEFAULT_CLIENT_BIN.to_string());
        let install_command = std::env::var(CLIENT_INSTALL_VAR)
            .unwrap_or_else(|_| DEFAULT_INSTALL_COMMAND.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Self {
            binary,
            install_command,
        }
    }
}

#[async_trait::async_trait]
impl DeployClient for CliDeployClient {
    async fn is_installed(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    async fn install(&self) -> Result<()> {
        let Some((program, args)) = self.install_command.split_first() else {
            return Err(Error::setup("install command is empty"));
        };

        tracing::debug!(command = ?self.install_command, "installing deploy client");
        let status = Command::new(program).args(args).status().await?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::setup(format!(
                "install command exited with {status}"
            )))
        }
    }

    async fn authenticate(&self) -> Result<()> {
        // Interactive: the client opens a browser and waits for the user to
        // authorize this machine. Stdio stays attached.
        let status = Command::new(&self.binary).arg("setup").status().await?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::setup(format!(
                "authorization flow exited with {status}"
            )))
        }
    }

    async fn verify(&self, probe: &FunctionSpec) -> Result<()> {
        let payload = serde_json::to_vec(probe)?;

        let mut child = Command::new(&self.binary)
            .args(["function", "validate", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await?;
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::setup(stderr.trim().to_string()))
        }
    }

    fn binary(&self) -> &str {
        &self.binary
    }
}
