use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::ProvisionerConfig;
use crate::error::{ProvisionError, Result};
use crate::sys::privilege::Escalation;
use crate::sys::traits::{CertificateIssuer, CommandRunner, Invocation};

// ==============================================================================
// Certbot Implementation (nginx installer plugin)
// ==============================================================================

pub struct CertbotIssuer {
    certbot_bin: String,
    staging: bool,
    escalation: Escalation,
    runner: Arc<dyn CommandRunner>,
}

impl CertbotIssuer {
    pub fn new(config: &ProvisionerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            certbot_bin: config.certbot_bin.clone(),
            staging: config.certbot_staging,
            escalation: Escalation::from_config(config),
            runner,
        }
    }

    /// `certbot --nginx -d a -d b ... --non-interactive --agree-tos --redirect --email e`
    fn invocation(&self, domains: &[String], email: &str) -> Invocation {
        let mut invocation = Invocation::new(&self.certbot_bin).arg("--nginx");
        for domain in domains {
            invocation = invocation.arg("-d").arg(domain);
        }
        invocation = invocation.args(["--non-interactive", "--agree-tos", "--redirect", "--email", email]);
        if self.staging {
            invocation = invocation.arg("--staging");
        }
        self.escalation.wrap(invocation)
    }
}

#[async_trait]
impl CertificateIssuer for CertbotIssuer {
    async fn request_certificate(&self, domains: &[String], email: &str) -> Result<()> {
        let primary = domains.first().cloned().unwrap_or_default();
        info!(domain = %primary, names = domains.len(), staging = self.staging, "requesting certificate");

        let output = self.runner.run(&self.invocation(domains, email)).await?;
        if !output.success {
            return Err(ProvisionError::CertificateFailed {
                domain: primary,
                stderr: output.diagnostic(),
            });
        }
        Ok(())
    }
}
