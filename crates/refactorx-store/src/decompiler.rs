//! Decompiler adapter that runs an external program.
//!
//! Invocation: `<program> <artifact> -t <type> [signatures-only flag]`.
//! The type name arrives already in metadata form (``Ns.Dictionary`2``).
//! The child is killed when the decompile future is dropped, so a timed-out
//! or cancelled recovery leaves no process behind.

use crate::errors::{io_error, Result};
use async_trait::async_trait;
use refactorx_core::config::DecompilerConfig;
use refactorx_core::decompile::Decompiler;
use refactorx_core::errors::{ExError, ExErrorKind};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Name of the directory reference-only artifacts are shipped in
const REFERENCE_ASSEMBLY_DIR: &str = "ref";

#[derive(Debug, Clone)]
pub struct CommandDecompiler {
    program: PathBuf,
    signatures_only_flag: Option<String>,
}

impl CommandDecompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            signatures_only_flag: None,
        }
    }

    pub fn with_signatures_only_flag(mut self, flag: impl Into<String>) -> Self {
        self.signatures_only_flag = Some(flag.into());
        self
    }

    /// `None` when no program is configured
    pub fn from_config(config: &DecompilerConfig) -> Option<Self> {
        let program = config.program.as_ref()?;
        let decompiler = Self::new(program);
        Some(match &config.signatures_only_flag {
            Some(flag) => decompiler.with_signatures_only_flag(flag),
            None => decompiler,
        })
    }

    fn command(&self, artifact: &Path, type_name: &str, include_implementation: bool) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(artifact)
            .arg("-t")
            .arg(type_name)
            .kill_on_drop(true);
        if !include_implementation {
            if let Some(flag) = &self.signatures_only_flag {
                command.arg(flag);
            }
        }
        command
    }
}

#[async_trait]
impl Decompiler for CommandDecompiler {
    async fn decompile(
        &self,
        artifact: &Path,
        type_name: &str,
        include_implementation: bool,
    ) -> Result<String> {
        tracing::debug!(
            program = %self.program.display(),
            artifact = %artifact.display(),
            type_name = type_name,
            "running decompiler"
        );
        let output = self
            .command(artifact, type_name, include_implementation)
            .output()
            .await
            .map_err(|e| io_error("run_decompiler", &self.program, e))?;

        if !output.status.success() {
            return Err(ExError::new(ExErrorKind::DecompilationUnavailable)
                .with_op("run_decompiler")
                .with_path(artifact)
                .with_message(format!(
                    "decompiler exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn is_signature_only(&self, artifact: &Path) -> bool {
        artifact
            .parent()
            .map(|dir| {
                dir.components().any(|c| {
                    c.as_os_str()
                        .to_str()
                        .map(|s| s.eq_ignore_ascii_case(REFERENCE_ASSEMBLY_DIR))
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        assert!(CommandDecompiler::from_config(&DecompilerConfig::default()).is_none());

        let config = DecompilerConfig {
            program: Some("ilspycmd".into()),
            signatures_only_flag: Some("--no-bodies".into()),
        };
        let decompiler = CommandDecompiler::from_config(&config).unwrap();
        assert_eq!(decompiler.signatures_only_flag.as_deref(), Some("--no-bodies"));
    }

    #[test]
    fn test_signature_only_detection() {
        let decompiler = CommandDecompiler::new("ilspycmd");
        assert!(decompiler.is_signature_only(Path::new(
            "/packs/Microsoft.NETCore.App.Ref/8.0.0/ref/net8.0/System.Runtime.dll"
        )));
        assert!(!decompiler.is_signature_only(Path::new("/w/packages/Newtonsoft.Json.dll")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invocation_arguments() {
        let decompiler = CommandDecompiler::new("echo").with_signatures_only_flag("--no-bodies");

        let with_bodies = decompiler
            .decompile(Path::new("/w/lib/Vendor.dll"), "Vendor.Map`2", true)
            .await
            .unwrap();
        assert_eq!(with_bodies.trim_end(), "/w/lib/Vendor.dll -t Vendor.Map`2");

        let signatures = decompiler
            .decompile(Path::new("/w/lib/Vendor.dll"), "Vendor.Map`2", false)
            .await
            .unwrap();
        assert_eq!(
            signatures.trim_end(),
            "/w/lib/Vendor.dll -t Vendor.Map`2 --no-bodies"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_program() {
        let err = CommandDecompiler::new("false")
            .decompile(Path::new("/w/lib/Vendor.dll"), "Vendor.Type", true)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DecompilationUnavailable);

        let err = CommandDecompiler::new("/nonexistent/decompiler")
            .decompile(Path::new("/w/lib/Vendor.dll"), "Vendor.Type", true)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dropped_call_kills_the_program() {
        // Given: a "decompiler" that only finishes after a second
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let script = dir.path().join("slow.sh");
        std::fs::write(
            &script,
            format!("sleep 1\ntouch '{}'\n", marker.display()),
        )
        .unwrap();
        let decompiler = CommandDecompiler::new("sh");

        // When: the caller gives up long before that
        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            decompiler.decompile(&script, "Vendor.Type", true),
        )
        .await;
        assert!(outcome.is_err());

        // Then: the child was killed and never got to finish
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
