use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{ProvisionError, Result};
use crate::sys::traits::{CommandOutput, CommandRunner, Invocation, SystemProbe};

// ==============================================================================
// 1. Real Process Runner
// ==============================================================================

pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!(command = %invocation.command_line(), "spawning");

        let spawn_err = |source| ProvisionError::Spawn {
            program: invocation.program.clone(),
            source,
        };

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(if invocation.stdin.is_some() { Stdio::piped() } else { Stdio::inherit() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // Feed stdin from its own task: `tee` echoes to stdout, and a large
        // payload would otherwise fill both pipes and stall.
        // Dropping the handle at the end closes the pipe so the child sees EOF.
        let feeder = match (child.stdin.take(), invocation.stdin.clone()) {
            (Some(mut pipe), Some(input)) => Some(tokio::spawn(async move {
                pipe.write_all(input.as_bytes()).await
            })),
            _ => None,
        };

        let output = child.wait_with_output().await.map_err(spawn_err)?;

        if let Some(feeder) = feeder {
            if let Ok(Err(e)) = feeder.await {
                warn!(command = %invocation.command_line(), error = %e, "stdin was not fully delivered");
            }
        }

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(command = %invocation.command_line(), exit_code, "finished");

        Ok(CommandOutput {
            success: output.status.success(),
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

// ==============================================================================
// 2. Real Filesystem / PATH Probe
// ==============================================================================

pub struct HostProbe;

impl SystemProbe for HostProbe {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}
