//! The four bootstrap steps
//!
//! Each step prints guidance for the person running it and returns a result;
//! the driver runs them in order and stops at the first failure. Every step
//! can be retried by re-running the binary.

use crate::platform::DeployClient;
use sentiscope_core::{config, FunctionSpec, Result};
use std::path::Path;

/// Step 1: ensure the deploy client is present, installing it if missing.
/// Fails only if installation itself errors.
pub async fn ensure_client(client: &dyn DeployClient) -> Result<()> {
    if client.is_installed().await {
        println!("Deploy client is already installed - ready to proceed");
        return Ok(());
    }

    println!("Deploy client not found on your system - installing now...");
    println!("This may take a minute to download and install...");
    client.install().await?;
    println!("Deploy client installed successfully");
    Ok(())
}

/// Step 2: apply optional local settings. Absence activates defaults and is
/// not an error.
pub fn load_settings(path: &Path) -> Result<()> {
    if config::apply_env_file(path)? {
        println!("Custom settings loaded from {}", path.display());
        println!("You can edit this file to customize app names and limits");
    } else {
        println!("No {} file found - using default settings", path.display());
        println!("You can create it later to customize your deployments");
    }
    Ok(())
}

/// Step 3: interactive authentication against the platform.
pub async fn authenticate(client: &dyn DeployClient) -> Result<()> {
    println!("This will open a browser window where you can:");
    println!("1. Create a free account (if you don't have one)");
    println!("2. Authorize this computer to deploy");
    println!("3. Get your authentication tokens");

    match client.authenticate().await {
        Ok(()) => {
            println!("Authentication successful - you can now deploy models");
            Ok(())
        }
        Err(e) => {
            println!("Authentication failed with error: {e}");
            println!(
                "Please run '{} setup' manually in your terminal and try again",
                client.binary()
            );
            Err(e)
        }
    }
}

/// Step 4: connectivity check. Builds the minimal no-op function spec and
/// asks the platform to accept it; any error is reported as failure.
pub async fn verify_connection(client: &dyn DeployClient) -> Result<()> {
    let probe = FunctionSpec::noop();

    match client.verify(&probe).await {
        Ok(()) => {
            println!("Connection verified - ready to deploy real models");
            Ok(())
        }
        Err(e) => {
            println!("Connection test failed: {e}");
            println!(
                "Try running '{} setup' again or check your internet connection",
                client.binary()
            );
            Err(e)
        }
    }
}

/// Run the full flow in order, short-circuiting on the first failure.
pub async fn run(client: &dyn DeployClient, settings: &Path) -> Result<()> {
    println!("Step 1: Checking client installation...");
    ensure_client(client).await?;

    println!("\nStep 2: Loading settings...");
    load_settings(settings)?;

    println!("\nStep 3: Setting up authentication...");
    authenticate(client).await?;

    println!("\nStep 4: Verifying connection...");
    verify_connection(client).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiscope_core::Error;
    use std::sync::Mutex;

    /// Mock client recording which operations ran.
    struct MockClient {
        installed: bool,
        install_ok: bool,
        auth_ok: bool,
        verify_ok: bool,
        log: Mutex<Vec<&'static str>>,
    }

    impl MockClient {
        fn new() -> Self {
            Self {
                installed: true,
                install_ok: true,
                auth_ok: true,
                verify_ok: true,
                log: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, op: &'static str) {
            self.log.lock().unwrap().push(op);
        }

        fn log(&self) -> Vec<&'static str> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl DeployClient for MockClient {
        async fn is_installed(&self) -> bool {
            self.record("probe");
            self.installed
        }

        async fn install(&self) -> Result<()> {
            self.record("install");
            self.install_ok
                .then_some(())
                .ok_or_else(|| Error::setup("install failed"))
        }

        async fn authenticate(&self) -> Result<()> {
            self.record("auth");
            self.auth_ok
                .then_some(())
                .ok_or_else(|| Error::setup("auth failed"))
        }

        async fn verify(&self, probe: &FunctionSpec) -> Result<()> {
            assert!(probe.environment.packages.is_empty());
            self.record("verify");
            self.verify_ok
                .then_some(())
                .ok_or_else(|| Error::setup("verify failed"))
        }

        fn binary(&self) -> &str {
            "mock-client"
        }
    }

    fn settings_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[tokio::test]
    async fn test_full_flow_runs_all_steps_in_order() {
        let client = MockClient::new();
        let dir = settings_dir();

        run(&client, &dir.path().join(".env.local")).await.unwrap();
        assert_eq!(client.log(), vec!["probe", "auth", "verify"]);
    }

    #[tokio::test]
    async fn test_missing_client_triggers_install() {
        let client = MockClient {
            installed: false,
            ..MockClient::new()
        };
        let dir = settings_dir();

        run(&client, &dir.path().join(".env.local")).await.unwrap();
        assert_eq!(client.log(), vec!["probe", "install", "auth", "verify"]);
    }

    #[tokio::test]
    async fn test_install_failure_is_fatal() {
        let client = MockClient {
            installed: false,
            install_ok: false,
            ..MockClient::new()
        };
        let dir = settings_dir();

        let err = run(&client, &dir.path().join(".env.local"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Setup(_)));
        assert_eq!(client.log(), vec!["probe", "install"]);
    }

    #[tokio::test]
    async fn test_auth_failure_short_circuits_before_verify() {
        let client = MockClient {
            auth_ok: false,
            ..MockClient::new()
        };
        let dir = settings_dir();

        let err = run(&client, &dir.path().join(".env.local"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Setup(_)));
        assert_eq!(client.log(), vec!["probe", "auth"]);
    }

    #[tokio::test]
    async fn test_verify_failure_is_reported_not_propagated_as_panic() {
        let client = MockClient {
            verify_ok: false,
            ..MockClient::new()
        };
        let dir = settings_dir();

        assert!(run(&client, &dir.path().join(".env.local")).await.is_err());
        assert_eq!(client.log(), vec!["probe", "auth", "verify"]);
    }

    #[tokio::test]
    async fn test_settings_step_tolerates_missing_file() {
        let dir = settings_dir();
        load_settings(&dir.path().join("does-not-exist")).unwrap();
    }
}
