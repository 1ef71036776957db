use tracing::debug;

use crate::config::ProvisionerConfig;
use crate::error::{ProvisionError, Result};
use crate::sys::traits::SystemProbe;

/// Reverse proxy, certificate client and escalation CLI, in that order.
pub fn required_commands(config: &ProvisionerConfig) -> [&str; 3] {
    [
        config.nginx_bin.as_str(),
        config.certbot_bin.as_str(),
        config.sudo_bin.as_str(),
    ]
}

/// Fails on the first command that cannot be found. Runs before any prompting.
pub fn check_dependencies(config: &ProvisionerConfig, probe: &dyn SystemProbe) -> Result<()> {
    for name in required_commands(config) {
        match probe.find_executable(name) {
            Some(path) => debug!(command = name, path = %path.display(), "dependency found"),
            None => return Err(ProvisionError::MissingDependency(name.to_string())),
        }
    }
    Ok(())
}
