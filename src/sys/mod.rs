// 🛡️ Every external process goes through these collaborators, so tests can swap them.

pub mod traits;     // Global contracts
pub mod runner;     // Real process execution + host probing
pub mod privilege;  // sudo wrapping
pub mod preflight;  // Dependency check
pub mod proxy;      // Ingress (Nginx)
pub mod ssl;        // Certificate issuance (Certbot)

#[cfg(test)]
pub mod fakes;
