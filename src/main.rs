// src/main.rs

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod prompt;
mod provision;
mod render;
mod request;
mod sys;

use crate::config::ProvisionerConfig;
use crate::error::Result;
use crate::prompt::Prompter;
use crate::provision::{Provisioner, RunOutcome};
use crate::sys::preflight;
use crate::sys::runner::{HostProbe, SystemCommandRunner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // ==============================================================================
    // 1. Configuration & Environment
    // ==============================================================================

    // Diagnostics go to stderr and stay quiet unless RUST_LOG asks for more,
    // so they never interleave with the interactive dialogue on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = ProvisionerConfig::load();
    info!(nginx_dir = %config.nginx_dir.display(), root = config.running_as_root, "configuration loaded");

    let result = run(config).await;
    match &result {
        Ok(RunOutcome::Provisioned { domain }) => info!(%domain, "done"),
        Ok(RunOutcome::Declined) => println!("[INFO] Aborted. No changes were made."),
        Err(e) => {
            debug!(error = ?e, "provisioning failed");
            eprintln!("[ERROR] {}", e);
        }
    }
    ExitCode::from(exit_status(&result))
}

/// Declining is a clean exit; every fatal error maps to 1.
fn exit_status(result: &Result<RunOutcome>) -> u8 {
    match result {
        Ok(RunOutcome::Provisioned { .. }) | Ok(RunOutcome::Declined) => 0,
        Err(_) => 1,
    }
}

async fn run(config: ProvisionerConfig) -> Result<RunOutcome> {
    // ==============================================================================
    // 2. Pre-flight: nothing is asked until every collaborator is installed
    // ==============================================================================
    let probe = Arc::new(HostProbe);
    preflight::check_dependencies(&config, probe.as_ref())?;

    // ==============================================================================
    // 3. Interactive Collection
    // ==============================================================================
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    let Some(request) = prompter.collect_request()? else {
        return Ok(RunOutcome::Declined);
    };

    // ==============================================================================
    // 4. Dependency Injection & Orchestration
    // ==============================================================================
    let provisioner = Provisioner::new(config, Arc::new(SystemCommandRunner), probe);
    provisioner.run(&request, &mut prompter).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProvisionError;
    use std::path::PathBuf;

    #[test]
    fn completed_and_declined_runs_exit_cleanly() {
        let provisioned = Ok(RunOutcome::Provisioned { domain: "example.com".into() });
        assert_eq!(exit_status(&provisioned), 0);
        assert_eq!(exit_status(&Ok(RunOutcome::Declined)), 0);
    }

    #[test]
    fn fatal_errors_exit_with_one() {
        for err in [
            ProvisionError::MissingDependency("certbot".into()),
            ProvisionError::DirectoryNotFound(PathBuf::from("/srv/missing")),
            ProvisionError::InvalidProxyConfig("emerg: unknown directive".into()),
            ProvisionError::CertificateFailed {
                domain: "example.com".into(),
                stderr: "rate limited".into(),
            },
            ProvisionError::InputClosed,
        ] {
            let label = err.to_string();
            assert_eq!(exit_status(&Err(err)), 1, "{}", label);
        }
    }
}
