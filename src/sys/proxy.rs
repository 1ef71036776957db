use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::ProvisionerConfig;
use crate::error::{ProvisionError, Result};
use crate::sys::privilege::Escalation;
use crate::sys::traits::{CommandRunner, Invocation, ProxyManager, SystemProbe};

// ==============================================================================
// Nginx Implementation (Debian sites-available / sites-enabled layout)
// ==============================================================================

pub struct NginxManager {
    config: ProvisionerConfig,
    nginx_bin: String,
    systemctl_bin: String,
    service_name: String,
    escalation: Escalation,
    runner: Arc<dyn CommandRunner>,
    probe: Arc<dyn SystemProbe>,
}

impl NginxManager {
    pub fn new(
        config: &ProvisionerConfig,
        runner: Arc<dyn CommandRunner>,
        probe: Arc<dyn SystemProbe>,
    ) -> Self {
        Self {
            config: config.clone(),
            nginx_bin: config.nginx_bin.clone(),
            systemctl_bin: config.systemctl_bin.clone(),
            service_name: config.nginx_service.clone(),
            escalation: Escalation::from_config(config),
            runner,
            probe,
        }
    }

    fn config_path(&self, domain: &str) -> PathBuf {
        self.config.site_available_path(domain)
    }

    fn enabled_link(&self, domain: &str) -> PathBuf {
        self.config.site_enabled_path(domain)
    }

    async fn run_privileged(&self, step: &'static str, invocation: Invocation) -> Result<String> {
        let output = self.runner.run(&self.escalation.wrap(invocation)).await?;
        if !output.success {
            return Err(ProvisionError::CommandFailed {
                step,
                stderr: output.diagnostic(),
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl ProxyManager for NginxManager {
    fn site_exists(&self, domain: &str) -> bool {
        self.probe.exists(&self.config_path(domain))
    }

    async fn write_site(&self, domain: &str, content: &str) -> Result<PathBuf> {
        let config_path = self.config_path(domain);
        let path = config_path.display().to_string();

        // tee writes as root; its echo of the content is discarded with stdout.
        self.run_privileged("Writing site configuration", Invocation::new("tee").arg(&path).stdin(content))
            .await?;

        info!(path = %path, "site configuration written");
        Ok(config_path)
    }

    async fn enable_site(&self, domain: &str) -> Result<()> {
        let enabled_link = self.enabled_link(domain);
        if self.probe.exists(&enabled_link) {
            info!(link = %enabled_link.display(), "site already enabled");
            return Ok(());
        }

        let target = self.config_path(domain).display().to_string();
        let link = enabled_link.display().to_string();
        self.run_privileged("Enabling site", Invocation::new("ln").args(["-s", target.as_str(), link.as_str()]))
            .await?;
        Ok(())
    }

    async fn test_config(&self) -> Result<()> {
        let invocation = self.escalation.wrap(Invocation::new(&self.nginx_bin).arg("-t"));
        let check = self.runner.run(&invocation).await?;

        if !check.success {
            return Err(ProvisionError::InvalidProxyConfig(check.diagnostic()));
        }
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        self.run_privileged(
            "Reloading nginx",
            Invocation::new(&self.systemctl_bin).args(["reload", self.service_name.as_str()]),
        )
        .await?;
        Ok(())
    }
}
