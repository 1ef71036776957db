use crate::config::ProvisionerConfig;
use crate::sys::traits::Invocation;

/// Wraps commands that touch root-owned state in the escalation CLI.
#[derive(Debug, Clone)]
pub struct Escalation {
    // None when the process is already root
    sudo_bin: Option<String>,
}

impl Escalation {
    pub fn new(sudo_bin: impl Into<String>, running_as_root: bool) -> Self {
        Self {
            sudo_bin: (!running_as_root).then(|| sudo_bin.into()),
        }
    }

    pub fn from_config(config: &ProvisionerConfig) -> Self {
        Self::new(config.sudo_bin.clone(), config.running_as_root)
    }

    pub fn wrap(&self, invocation: Invocation) -> Invocation {
        match &self.sudo_bin {
            None => invocation,
            Some(sudo) => Invocation {
                program: sudo.clone(),
                args: std::iter::once(invocation.program).chain(invocation.args).collect(),
                stdin: invocation.stdin,
            },
        }
    }
}
