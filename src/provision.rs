// src/provision.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::ProvisionerConfig;
use crate::error::{ProvisionError, Result};
use crate::prompt::Operator;
use crate::render::render_site;
use crate::request::{ServiceRequest, check_directory};
use crate::sys::privilege::Escalation;
use crate::sys::proxy::NginxManager;
use crate::sys::ssl::CertbotIssuer;
use crate::sys::traits::{CertificateIssuer, CommandRunner, Invocation, ProxyManager, SystemProbe};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Provisioned { domain: String },
    /// The operator said no. Not an error; exit status stays 0.
    Declined,
}

pub struct Provisioner {
    config: ProvisionerConfig,
    escalation: Escalation,
    runner: Arc<dyn CommandRunner>,
    probe: Arc<dyn SystemProbe>,
    proxy: Box<dyn ProxyManager>,
    issuer: Box<dyn CertificateIssuer>,
}

impl Provisioner {
    pub fn new(
        config: ProvisionerConfig,
        runner: Arc<dyn CommandRunner>,
        probe: Arc<dyn SystemProbe>,
    ) -> Self {
        Self {
            escalation: Escalation::from_config(&config),
            proxy: Box::new(NginxManager::new(&config, runner.clone(), probe.clone())),
            issuer: Box::new(CertbotIssuer::new(&config, runner.clone())),
            runner,
            probe,
            config,
        }
    }

    /// Publishes `request` and secures it. Stops at the first failing step and
    /// leaves whatever was already written in place.
    pub async fn run(&self, request: &ServiceRequest, operator: &mut dyn Operator) -> Result<RunOutcome> {
        let domain = request.domain.as_str();

        if self.proxy.site_exists(domain) {
            let question = format!(
                "A configuration for {} already exists at {}. Overwrite it?",
                domain,
                self.config.site_available_path(domain).display()
            );
            if !operator.confirm(&question)? {
                info!(domain, "overwrite declined");
                return Ok(RunOutcome::Declined);
            }
        }

        let root = self.resolve_directory(request, operator).await?;

        let content = render_site(request, &root)?;
        let path = self.proxy.write_site(domain, &content).await?;
        operator.status(&format!("[OK] Configuration written to {}", path.display()))?;

        self.proxy.enable_site(domain).await?;
        operator.status("[OK] Site enabled")?;

        self.proxy.test_config().await?;
        operator.status("[OK] Nginx configuration test passed")?;

        self.proxy.reload().await?;
        operator.status("[OK] Nginx reloaded")?;

        operator.status(&format!("[INFO] Requesting certificate for {} and www.{}...", domain, domain))?;
        self.issuer
            .request_certificate(&request.certificate_domains(), &request.email)
            .await?;

        operator.status(&format!("[OK] HTTPS is live for https://{}", domain))?;
        info!(domain, "provisioning complete");
        Ok(RunOutcome::Provisioned {
            domain: domain.to_string(),
        })
    }

    /// Static sites must point at an existing document root. Proxied services
    /// fall back to the ACME challenge root, which is created when missing.
    async fn resolve_directory(&self, request: &ServiceRequest, operator: &mut dyn Operator) -> Result<PathBuf> {
        if !request.service_type.is_proxied() {
            let dir = request.directory.clone().unwrap_or_default();
            usable_root(&dir)?;
            if !self.probe.is_dir(&dir) {
                return Err(ProvisionError::DirectoryNotFound(dir));
            }
            return Ok(dir);
        }

        let dir = request
            .directory
            .clone()
            .unwrap_or_else(|| self.config.acme_root.clone());
        usable_root(&dir)?;

        if !self.probe.is_dir(&dir) {
            let path = dir.display().to_string();
            let invocation = self.escalation.wrap(Invocation::new("mkdir").args(["-p", path.as_str()]));
            let output = self.runner.run(&invocation).await?;
            if !output.success {
                return Err(ProvisionError::CommandFailed {
                    step: "Creating ACME challenge directory",
                    stderr: output.diagnostic(),
                });
            }
            operator.status(&format!("[OK] Created {}", path))?;
        }
        Ok(dir)
    }
}

/// The directory lands in a `root` directive, so it must be absolute and free
/// of characters nginx would parse. Covers requests built outside the prompt and
/// `KARI_ACME_ROOT`.
fn usable_root(dir: &Path) -> Result<()> {
    check_directory(dir).map_err(|rejection| ProvisionError::InvalidDirectory {
        path: dir.to_path_buf(),
        reason: rejection.to_string(),
    })
}
