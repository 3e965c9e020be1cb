//! Source recovery for types defined outside the workspace.
//!
//! Resolution runs symbol table → owning reference → decompiler. Every
//! failure along the way (including a panicking decompiler) ends as
//! `DecompilationUnavailable`; [`DecompilationFallback::recover`] flattens
//! that to `None` for callers that only want best-effort text.

pub mod heuristics;
pub mod naming;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{Module, Reference, Snapshot};
use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

pub const WARNING_SIGNATURES_ONLY: &str =
    "artifact is a reference assembly; method bodies are not available";
pub const WARNING_OBFUSCATED: &str = "decompiled output appears to be obfuscated";

/// A type visible to a module through its external references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalType {
    /// Namespace-qualified name, possibly with generic parameters
    pub qualified_name: String,
    /// Identity of the assembly defining the type
    pub assembly: String,
}

impl ExternalType {
    pub fn new(qualified_name: impl Into<String>, assembly: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            assembly: assembly.into(),
        }
    }
}

/// External symbol metadata provided by the analysis engine
pub trait SymbolTable: Send + Sync {
    fn external_types(&self, module: &Module) -> Vec<ExternalType>;
}

/// Symbol table for engines without a metadata reader
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySymbolTable;

impl SymbolTable for EmptySymbolTable {
    fn external_types(&self, _module: &Module) -> Vec<ExternalType> {
        Vec::new()
    }
}

/// Boundary to an external decompiler
///
/// Dropping a `decompile` future abandons the call; implementations must not
/// leave work running behind it.
#[async_trait]
pub trait Decompiler: Send + Sync {
    /// # Errors
    ///
    /// Any error becomes `DecompilationUnavailable`.
    async fn decompile(
        &self,
        artifact: &Path,
        type_name: &str,
        include_implementation: bool,
    ) -> Result<String>;

    /// Artifact carries signatures but no method bodies
    fn is_signature_only(&self, _artifact: &Path) -> bool {
        false
    }
}

/// Decompiler used when none is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDecompiler;

#[async_trait]
impl Decompiler for NoDecompiler {
    async fn decompile(&self, artifact: &Path, type_name: &str, _include: bool) -> Result<String> {
        Err(unavailable(format!("no decompiler configured for {type_name}")).with_path(artifact))
    }
}

/// Recovered source for an external type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecompiledText {
    pub symbol_name: String,
    pub assembly_name: String,
    pub artifact_path: PathBuf,
    pub source: String,
    pub warnings: Vec<String>,
}

pub struct DecompilationFallback<'a> {
    symbols: &'a dyn SymbolTable,
    decompiler: &'a dyn Decompiler,
}

impl<'a> DecompilationFallback<'a> {
    pub fn new(symbols: &'a dyn SymbolTable, decompiler: &'a dyn Decompiler) -> Self {
        Self {
            symbols,
            decompiler,
        }
    }

    /// Best-effort recovery; failures are logged and become `None`
    pub async fn recover(
        &self,
        snapshot: &Snapshot,
        symbol: &str,
        include_implementation: bool,
    ) -> Option<DecompiledText> {
        match self.try_recover(snapshot, symbol, include_implementation).await {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::warn!(
                    symbol = symbol,
                    err_code = err.code(),
                    err_message = err.message(),
                    "source recovery unavailable"
                );
                None
            }
        }
    }

    /// # Errors
    ///
    /// `DecompilationUnavailable` when the symbol is unknown, its artifact
    /// cannot be located, or the decompiler fails.
    pub async fn try_recover(
        &self,
        snapshot: &Snapshot,
        symbol: &str,
        include_implementation: bool,
    ) -> Result<DecompiledText> {
        let (ty, reference) = self.locate(snapshot, symbol)?;
        let artifact = reference.path.as_path();
        let metadata_name = naming::to_metadata_name(&ty.qualified_name);

        let outcome = AssertUnwindSafe(self.decompiler.decompile(
            artifact,
            &metadata_name,
            include_implementation,
        ))
        .catch_unwind()
        .await;
        let source = match outcome {
            Ok(Ok(source)) => source,
            Ok(Err(err)) => {
                return Err(unavailable(err.message().to_string()).with_path(artifact))
            }
            Err(_) => return Err(unavailable("decompiler panicked").with_path(artifact)),
        };

        let mut warnings = Vec::new();
        if include_implementation && self.decompiler.is_signature_only(artifact) {
            warnings.push(WARNING_SIGNATURES_ONLY.to_string());
        }
        if heuristics::looks_obfuscated(&source) {
            warnings.push(WARNING_OBFUSCATED.to_string());
        }

        Ok(DecompiledText {
            symbol_name: ty.qualified_name,
            assembly_name: ty.assembly,
            artifact_path: artifact.to_path_buf(),
            source,
            warnings,
        })
    }

    fn locate<'s>(&self, snapshot: &'s Snapshot, symbol: &str) -> Result<(ExternalType, &'s Reference)> {
        let mut unresolved_assembly = None;

        for module in snapshot.modules() {
            for ty in self.symbols.external_types(module) {
                if !naming::names_match(symbol, &ty.qualified_name) {
                    continue;
                }
                match module.reference_for(&ty.assembly) {
                    Some(reference) => return Ok((ty, reference)),
                    None => unresolved_assembly = Some(ty.assembly),
                }
            }
        }

        Err(match unresolved_assembly {
            Some(assembly) => unavailable(format!(
                "no referenced artifact found for assembly '{assembly}'"
            )),
            None => unavailable(format!("symbol '{symbol}' not found in external metadata")),
        })
    }
}

fn unavailable(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::DecompilationUnavailable)
        .with_op("recover_external_source")
        .with_message(message)
}
