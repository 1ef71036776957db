// src/prompt.rs

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{ProvisionError, Result};
use crate::request::{
    self, Rejection, ServiceRequest, parse_directory, parse_port, parse_service_type,
    validate_domain,
};

/// The human on the other end of the run. The orchestrator only needs to ask
/// yes/no questions and report progress.
pub trait Operator {
    fn confirm(&mut self, question: &str) -> Result<bool>;
    fn status(&mut self, message: &str) -> Result<()>;
}

/// Line-oriented terminal dialogue over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ProvisionError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Asks until `parse` accepts the answer.
    fn ask<T, F>(&mut self, question: &str, parse: F) -> Result<T>
    where
        F: Fn(&str) -> std::result::Result<T, Rejection>,
    {
        loop {
            let answer = self.read_answer(question)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(rejection) => {
                    debug!(%rejection, "input rejected");
                    writeln!(self.output, "[WARN] {}", rejection)?;
                }
            }
        }
    }

    /// Collects every field, then shows the summary. `None` means the operator
    /// did not confirm it.
    pub fn collect_request(&mut self) -> Result<Option<ServiceRequest>> {
        let domain = self.ask("Domain name (e.g. example.com):", validate_domain)?;

        writeln!(self.output, "Service type:")?;
        writeln!(self.output, "  1) Docker container (reverse proxy)")?;
        writeln!(self.output, "  2) Node.js app on a local port (reverse proxy)")?;
        writeln!(self.output, "  3) Static site")?;
        let service_type = self.ask("Choose [1-3]:", parse_service_type)?;

        let (port, directory) = if service_type.is_proxied() {
            let port = self.ask("Local port the service listens on:", parse_port)?;
            let dir = self.ask("ACME challenge directory (blank for default):", |raw: &str| {
                parse_directory(raw, false)
            })?;
            (Some(port), dir)
        } else {
            let dir = self.ask("Directory containing the site files:", |raw: &str| {
                parse_directory(raw, true)
            })?;
            (None, dir)
        };

        let email_question = format!("Email for certificate notices (blank for admin@{}):", domain);
        let email = self.ask(&email_question, |raw: &str| request::validate_email(raw, &domain))?;

        let request = ServiceRequest {
            domain,
            service_type,
            port,
            directory,
            email,
        };

        writeln!(self.output)?;
        writeln!(self.output, "Summary:")?;
        write!(self.output, "{}", request.summary())?;

        if self.confirm("Proceed?")? {
            Ok(Some(request))
        } else {
            Ok(None)
        }
    }
}

impl<R: BufRead, W: Write> Operator for Prompter<R, W> {
    /// Only an explicit `y`/`Y` counts as yes.
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.read_answer(&format!("{} (y/N):", question))?;
        Ok(answer == "y" || answer == "Y")
    }

    fn status(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}
