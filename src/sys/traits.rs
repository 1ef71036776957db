use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;

// ==============================================================================
// 1. Process Execution (Injectable)
// ==============================================================================

/// One external command: discrete argv, never a shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Fed to the child's stdin when present.
    pub stdin: Option<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// `program arg1 arg2`, for logs and assertions.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stderr if the command wrote any, otherwise stdout, otherwise the exit code.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        format!("exited with code {}", self.exit_code)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs to completion. `Err` only when the process could not be started;
    /// a non-zero exit comes back as `CommandOutput { success: false, .. }`.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

// ==============================================================================
// 2. Host Inspection (Read-Only)
// ==============================================================================

pub trait SystemProbe: Send + Sync {
    /// True for files, directories and symlinks, including dangling ones.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn find_executable(&self, name: &str) -> Option<PathBuf>;
}

// ==============================================================================
// 3. Proxy Abstraction (Platform-Agnostic Ingress)
// ==============================================================================

#[async_trait]
pub trait ProxyManager: Send + Sync {
    /// Whether a site configuration for `domain` is already on disk.
    fn site_exists(&self, domain: &str) -> bool;

    async fn write_site(&self, domain: &str, content: &str) -> Result<PathBuf>;

    /// Links the site into the enabled set. Does nothing if already linked.
    async fn enable_site(&self, domain: &str) -> Result<()>;

    async fn test_config(&self) -> Result<()>;

    async fn reload(&self) -> Result<()>;
}

// ==============================================================================
// 4. Certificate Issuance Abstraction
// ==============================================================================

#[async_trait]
pub trait CertificateIssuer: Send + Sync {
    /// Requests and installs a certificate covering every name in `domains`,
    /// the first one being the primary name.
    async fn request_certificate(&self, domains: &[String], email: &str) -> Result<()>;
}
