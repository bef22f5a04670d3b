//! Type checking with the host compiler

use super::snippet::CLASS_NAME;
use super::{SourceSnippet, TypeCheck, TypeChecker};
use docguard_core::config::GateConfig;
use docguard_core::error::{Error, Result, ResultExt};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Compiles each snippet with `javac` in a scratch directory
#[derive(Debug, Clone)]
pub struct JavacChecker {
    javac: PathBuf,
    classpath: Vec<PathBuf>,
}

impl JavacChecker {
    pub fn new(javac: PathBuf, classpath: Vec<PathBuf>) -> Self {
        Self { javac, classpath }
    }

    /// Uses the configured compiler, or the first `javac` on `PATH`
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        let javac = match &config.javac_path {
            Some(path) => path.clone(),
            None => which::which("javac")
                .map_err(|e| Error::config(format!("javac not found on PATH: {e}")))?,
        };
        Ok(Self::new(javac, config.classpath.clone()))
    }

    pub fn javac(&self) -> &PathBuf {
        &self.javac
    }
}

impl TypeChecker for JavacChecker {
    fn name(&self) -> &str {
        "javac"
    }

    fn typecheck(&self, snippet: &SourceSnippet<'_>) -> Result<TypeCheck> {
        let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;
        let source = scratch.path().join(format!("{CLASS_NAME}.java"));
        std::fs::write(&source, snippet.render())?;

        let mut command = Command::new(&self.javac);
        command
            .arg("-proc:none")
            .arg("-nowarn")
            .arg("-d")
            .arg(scratch.path());
        if !self.classpath.is_empty() {
            let classpath = std::env::join_paths(&self.classpath)
                .map_err(|e| Error::type_check(format!("Invalid classpath: {e}")))?;
            command.arg("-cp").arg(classpath);
        }
        command.arg(&source);

        debug!("Running {:?}", command);
        let output = command
            .output()
            .map_err(|e| Error::type_check(format!("Failed to run {}: {e}", self.javac.display())))?;

        if output.status.success() {
            return Ok(TypeCheck::Ok);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics: Vec<String> = stderr
            .lines()
            .filter_map(|line| line.split_once("error: ").map(|(_, message)| message.trim().to_string()))
            .collect();
        if diagnostics.is_empty() {
            // javac failed without reporting a compile error
            return Err(Error::type_check(format!(
                "javac exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(TypeCheck::Diagnostics(diagnostics))
    }
}
