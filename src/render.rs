// src/render.rs

use std::path::Path;

use crate::error::{ProvisionError, Result};
use crate::request::{ServiceRequest, ServiceType};

/// Produces the Nginx server block for a confirmed request.
///
/// `root` is the already-resolved directory: the document root for static
/// sites, the ACME challenge root for proxied services.
pub fn render_site(request: &ServiceRequest, root: &Path) -> Result<String> {
    match request.service_type {
        ServiceType::Docker | ServiceType::Node => {
            let port = request
                .port
                .ok_or_else(|| ProvisionError::MissingPort(request.domain.clone()))?;
            Ok(render_proxy(&request.domain, request.service_type, port, root))
        }
        ServiceType::Static => Ok(render_static(&request.domain, root)),
    }
}

fn acme_location(root: &Path) -> String {
    format!(
        r#"    location /.well-known/acme-challenge {{
        root {root};
        allow all;
    }}"#,
        root = root.display()
    )
}

fn render_proxy(domain: &str, service_type: ServiceType, port: u16, acme_root: &Path) -> String {
    format!(
        r#"# Managed by kari-provision: {label} on localhost:{port}
server {{
    listen 80;
    listen [::]:80;
    server_name {domain} www.{domain};

{acme}

    location / {{
        proxy_pass http://localhost:{port};
        proxy_http_version 1.1;
        proxy_set_header Upgrade $http_upgrade;
        proxy_set_header Connection "upgrade";
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
        proxy_cache_bypass $http_upgrade;
    }}
}}
"#,
        label = service_type.label(),
        domain = domain,
        port = port,
        acme = acme_location(acme_root),
    )
}

fn render_static(domain: &str, root: &Path) -> String {
    // No fallback to index.html: unknown paths must stay 404.
    format!(
        r#"# Managed by kari-provision: static site served from {root}
server {{
    listen 80;
    listen [::]:80;
    server_name {domain} www.{domain};

    root {root};
    index index.html;

{acme}

    location / {{
        try_files $uri $uri/ =404;
    }}
}}
"#,
        domain = domain,
        root = root.display(),
        acme = acme_location(root),
    )
}
