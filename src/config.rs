// src/config.rs

use std::env;
use std::path::PathBuf;

use nix::unistd::Uid;

#[derive(Clone, Debug)]
pub struct ProvisionerConfig {
    // 📂 Platform Agnostic Paths
    pub nginx_dir: PathBuf,
    pub acme_root: PathBuf,

    // ⚙️ Collaborator binaries
    pub nginx_bin: String,
    pub certbot_bin: String,
    pub sudo_bin: String,
    pub systemctl_bin: String,
    pub nginx_service: String,

    pub certbot_staging: bool,

    // 🛡️ Privilege boundary: when already root, nothing is wrapped in sudo
    pub running_as_root: bool,
}

impl ProvisionerConfig {
    pub fn load() -> Self {
        let mut config = Self::from_lookup(|key| env::var(key).ok());
        config.running_as_root = Uid::effective().is_root();
        config
    }

    /// Builds the configuration from any key lookup. `load()` feeds it the
    /// process environment; tests feed it a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let certbot_staging = lookup("KARI_CERTBOT_STAGING")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            nginx_dir: PathBuf::from(get("KARI_NGINX_DIR", "/etc/nginx")),
            acme_root: PathBuf::from(get("KARI_ACME_ROOT", "/var/www/acme-challenge")),
            nginx_bin: get("KARI_NGINX_BIN", "nginx"),
            certbot_bin: get("KARI_CERTBOT_BIN", "certbot"),
            sudo_bin: get("KARI_SUDO_BIN", "sudo"),
            systemctl_bin: get("KARI_SYSTEMCTL_BIN", "systemctl"),
            nginx_service: get("KARI_NGINX_SERVICE", "nginx"),
            certbot_staging,
            running_as_root: false,
        }
    }

    pub fn site_available_path(&self, domain: &str) -> PathBuf {
        self.nginx_dir.join("sites-available").join(domain)
    }

    pub fn site_enabled_path(&self, domain: &str) -> PathBuf {
        self.nginx_dir.join("sites-enabled").join(domain)
    }
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
