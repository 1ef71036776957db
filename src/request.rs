// src/request.rs
//
// Pure validation. Nothing here touches the terminal or the filesystem, so the
// prompt loop can retry on a `Rejection` and tests can drive it directly.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Labels of 1-63 alphanumeric/hyphen characters, no leading or trailing
/// hyphen, ending in an alphabetic TLD of at least two characters.
static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$")
        .expect("hostname pattern is a valid regex")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Why a piece of operator input was refused. Shown verbatim before re-prompting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection(pub String);

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Docker,
    Node,
    Static,
}

impl ServiceType {
    /// Proxied services need a backend port; static sites need a document root.
    pub fn is_proxied(self) -> bool {
        matches!(self, ServiceType::Docker | ServiceType::Node)
    }

    pub fn label(self) -> &'static str {
        match self {
            ServiceType::Docker => "Docker container",
            ServiceType::Node => "Node.js app",
            ServiceType::Static => "Static site",
        }
    }
}

/// One run's worth of answers. Immutable once the operator confirms it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub domain: String,
    pub service_type: ServiceType,
    pub port: Option<u16>,
    pub directory: Option<PathBuf>,
    pub email: String,
}

impl ServiceRequest {
    /// Hostnames the configuration listens on and the certificate covers.
    pub fn certificate_domains(&self) -> [String; 2] {
        [self.domain.clone(), format!("www.{}", self.domain)]
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("  Domain:    {} (+ www.{})\n", self.domain, self.domain));
        out.push_str(&format!("  Service:   {}\n", self.service_type.label()));
        if let Some(port) = self.port {
            out.push_str(&format!("  Port:      {}\n", port));
        }
        match &self.directory {
            Some(dir) => out.push_str(&format!("  Directory: {}\n", dir.display())),
            None => out.push_str("  Directory: (default ACME challenge root)\n"),
        }
        out.push_str(&format!("  Email:     {}\n", self.email));
        out
    }
}

pub fn normalize_domain(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    match lowered.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

pub fn validate_domain(raw: &str) -> Result<String, Rejection> {
    let domain = normalize_domain(raw);
    if domain.is_empty() {
        return Err(Rejection("Domain cannot be empty".into()));
    }
    if !HOSTNAME.is_match(&domain) {
        return Err(Rejection(format!("'{}' is not a valid domain name", raw.trim())));
    }
    Ok(domain)
}

pub fn parse_service_type(raw: &str) -> Result<ServiceType, Rejection> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "docker" => Ok(ServiceType::Docker),
        "2" | "node" => Ok(ServiceType::Node),
        "3" | "static" => Ok(ServiceType::Static),
        other => Err(Rejection(format!("'{}' is not one of 1, 2 or 3", other))),
    }
}

pub fn parse_port(raw: &str) -> Result<u16, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(Rejection("Port must be a number".into()));
    }
    match trimmed.parse::<u16>() {
        Ok(0) | Err(_) => Err(Rejection("Port must be between 1 and 65535".into())),
        Ok(port) => Ok(port),
    }
}

/// Directories end up verbatim in a `root` directive, which nginx resolves
/// against its own prefix and splits on whitespace, `;` and braces.
pub fn check_directory(path: &Path) -> Result<(), Rejection> {
    if !path.is_absolute() {
        return Err(Rejection(format!("'{}' must be an absolute path", path.display())));
    }
    let text = path.to_string_lossy();
    if let Some(bad) = text
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, ';' | '{' | '}' | '"' | '\'' | '#' | '$'))
    {
        return Err(Rejection(format!(
            "'{}' contains '{}', which nginx cannot take in a root directive",
            text, bad
        )));
    }
    Ok(())
}

/// Parses a directory answer. Blank is `None`, and only allowed when not `required`.
pub fn parse_directory(raw: &str, required: bool) -> Result<Option<PathBuf>, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        if required {
            return Err(Rejection("A directory is required for static sites".into()));
        }
        return Ok(None);
    }
    let path = PathBuf::from(trimmed);
    check_directory(&path)?;
    Ok(Some(path))
}

/// A blank answer means the registration goes to `admin@<domain>`.
pub fn validate_email(raw: &str, domain: &str) -> Result<String, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(format!("admin@{}", domain));
    }
    if !EMAIL.is_match(trimmed) {
        return Err(Rejection(format!("'{}' is not a valid email address", trimmed)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn www_prefix_is_stripped_before_validation() {
        assert_eq!(validate_domain("www.example.com").unwrap(), "example.com");
        assert_eq!(validate_domain("  WWW.MySite.org ").unwrap(), "mysite.org");
        assert_eq!(normalize_domain("www.www.example.com"), "www.example.com");
    }

    #[test]
    fn valid_hostnames_are_accepted() {
        for domain in ["example.com", "sub.example.com", "my-site.io", "123.example.net", "a.co"] {
            assert_eq!(validate_domain(domain).unwrap(), domain);
        }
        let longest_label = format!("{}.com", "a".repeat(63));
        assert!(validate_domain(&longest_label).is_ok());
    }

    #[test]
    fn malformed_hostnames_are_rejected() {
        for bad in [
            "",
            "not a domain",
            "localhost",
            "example",
            "example.c",
            "example.c0m",
            "-example.com",
            "example-.com",
            "exa_mple.com",
            "example..com",
            ".example.com",
            "example.com;",
            "example.com/evil",
            "www.",
        ] {
            assert!(validate_domain(bad).is_err(), "accepted {:?}", bad);
        }
        let oversized_label = format!("{}.com", "a".repeat(64));
        assert!(validate_domain(&oversized_label).is_err());
        let oversized_tld = format!("example.{}", "a".repeat(64));
        assert!(validate_domain(&oversized_tld).is_err());
        let longest_tld = format!("example.{}", "a".repeat(63));
        assert!(validate_domain(&longest_tld).is_ok());
    }

    #[test]
    fn service_type_accepts_numbers_and_names() {
        assert_eq!(parse_service_type("1").unwrap(), ServiceType::Docker);
        assert_eq!(parse_service_type(" node ").unwrap(), ServiceType::Node);
        assert_eq!(parse_service_type("STATIC").unwrap(), ServiceType::Static);
        assert!(parse_service_type("4").is_err());
        assert!(parse_service_type("").is_err());
    }

    #[test]
    fn port_must_be_a_usable_tcp_port() {
        assert_eq!(parse_port("3000").unwrap(), 3000);
        assert_eq!(parse_port(" 65535 ").unwrap(), 65535);
        assert!(parse_port("0").is_err());
        assert!(parse_port("65536").is_err());
        assert!(parse_port("-1").is_err());
        assert!(parse_port("80a").is_err());
        assert!(parse_port("").is_err());
    }

    #[test]
    fn email_defaults_to_admin_at_domain() {
        assert_eq!(validate_email("", "example.com").unwrap(), "admin@example.com");
        assert_eq!(validate_email("ops@corp.net", "example.com").unwrap(), "ops@corp.net");
        assert!(validate_email("nobody", "example.com").is_err());
        assert!(validate_email("a b@c.de", "example.com").is_err());
    }

    #[test]
    fn directories_must_be_absolute_and_directive_safe() {
        assert_eq!(
            parse_directory("/var/www/html", true).unwrap(),
            Some(PathBuf::from("/var/www/html"))
        );
        assert_eq!(parse_directory("  ", false).unwrap(), None);
        assert!(parse_directory("", true).is_err());

        for bad in ["src", "./site", "www/html", "/var/www/my site", "/srv/a;b", "/srv/{x}", "/srv/\"x\""] {
            assert!(parse_directory(bad, true).is_err(), "accepted {:?}", bad);
            assert!(parse_directory(bad, false).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn proxied_types_need_ports() {
        assert!(ServiceType::Docker.is_proxied());
        assert!(ServiceType::Node.is_proxied());
        assert!(!ServiceType::Static.is_proxied());
    }

    #[test]
    fn summary_lists_every_answer() {
        let request = ServiceRequest {
            domain: "example.com".into(),
            service_type: ServiceType::Node,
            port: Some(3000),
            directory: None,
            email: "admin@example.com".into(),
        };
        let summary = request.summary();
        assert!(summary.contains("example.com (+ www.example.com)"));
        assert!(summary.contains("Node.js app"));
        assert!(summary.contains("3000"));
        assert!(summary.contains("default ACME challenge root"));
        assert!(summary.contains("admin@example.com"));
        assert_eq!(
            request.certificate_domains(),
            ["example.com".to_string(), "www.example.com".to_string()]
        );
    }
}
