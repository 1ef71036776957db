// Recording doubles for the collaborator traits. Test-only.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::sys::traits::{CommandOutput, CommandRunner, Invocation, SystemProbe};

/// Records every invocation; fails any whose command line contains one of the
/// configured fragments.
#[derive(Clone, Default)]
pub struct FakeRunner {
    calls: Arc<Mutex<Vec<Invocation>>>,
    failing: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(self, fragment: &str, stderr: &str) -> Self {
        self.failing
            .lock()
            .unwrap()
            .push((fragment.to_string(), stderr.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        let line = invocation.command_line();
        let failure = self
            .failing
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| line.contains(fragment.as_str()))
            .map(|(_, stderr)| stderr.clone());

        Ok(match failure {
            Some(stderr) => CommandOutput {
                success: false,
                exit_code: 1,
                stdout: String::new(),
                stderr,
            },
            None => CommandOutput {
                success: true,
                ..CommandOutput::default()
            },
        })
    }
}

#[derive(Default)]
pub struct FakeProbe {
    paths: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
    executables: HashSet<String>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.paths.insert(PathBuf::from(path));
        self
    }

    pub fn with_dir(mut self, path: &str) -> Self {
        self.paths.insert(PathBuf::from(path));
        self.dirs.insert(PathBuf::from(path));
        self
    }

    pub fn with_executables<const N: usize>(mut self, names: [&str; N]) -> Self {
        self.executables.extend(names.iter().map(|n| n.to_string()));
        self
    }
}

impl SystemProbe for FakeProbe {
    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.executables
            .contains(name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }
}
