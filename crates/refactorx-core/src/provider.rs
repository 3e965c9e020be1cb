//! Provider catalog.
//!
//! Providers are registered once, at construction time, in a static table of
//! `(capability, factory)` pairs. Discovery walks the table in registration
//! order and instantiates each relevant provider for the duration of a single
//! call. A provider that errors or panics is logged and skipped.

use crate::errors::Result;
use crate::model::{CandidateAction, Diagnostic, Snapshot, SourceLocation};
use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// What a registered provider can be asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Fixes for the listed diagnostic ids
    Fixes(BTreeSet<String>),
    /// Context refactorings at a source location
    Refactors,
}

impl Capability {
    pub fn fixes<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Capability::Fixes(ids.into_iter().map(Into::into).collect())
    }

    /// True when this capability fixes diagnostics with `diagnostic_id`
    pub fn covers(&self, diagnostic_id: &str) -> bool {
        match self {
            Capability::Fixes(ids) => ids.contains(diagnostic_id),
            Capability::Refactors => false,
        }
    }
}

/// Input to a fix provider: only the diagnostics its capability covers
pub struct FixContext<'a> {
    pub snapshot: &'a Snapshot,
    pub diagnostics: &'a [Diagnostic],
}

/// Input to a refactor provider
pub struct RefactorContext<'a> {
    pub snapshot: &'a Snapshot,
    pub location: &'a SourceLocation,
}

/// A source of candidate actions
///
/// Instances are created per discovery call and must not keep state between
/// calls.
pub trait ActionProvider {
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Errors are logged by the registry and the provider is skipped.
    fn provide_fixes(&self, _context: &FixContext<'_>) -> Result<Vec<CandidateAction>> {
        Ok(Vec::new())
    }

    /// # Errors
    ///
    /// Errors are logged by the registry and the provider is skipped.
    fn provide_refactors(&self, _context: &RefactorContext<'_>) -> Result<Vec<CandidateAction>> {
        Ok(Vec::new())
    }
}

pub type ProviderFactory = Arc<dyn Fn() -> Box<dyn ActionProvider> + Send + Sync>;

struct Registration {
    capability: Capability,
    factory: ProviderFactory,
}

/// What discovery is asked about
pub struct DiscoveryRequest<'a> {
    pub snapshot: &'a Snapshot,
    /// Diagnostics in scope for fix providers
    pub diagnostics: &'a [Diagnostic],
    /// When set, refactor providers are queried at this location
    pub location: Option<&'a SourceLocation>,
}

/// Static registration table of providers
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    registrations: Vec<Arc<Registration>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F, P>(mut self, capability: Capability, factory: F) -> Self
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: ActionProvider + 'static,
    {
        let factory: ProviderFactory = Arc::new(move || Box::new(factory()));
        self.registrations
            .push(Arc::new(Registration { capability, factory }));
        self
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// True when any registered provider can fix `diagnostic_id`
    pub fn covers_diagnostic(&self, diagnostic_id: &str) -> bool {
        self.registrations
            .iter()
            .any(|r| r.capability.covers(diagnostic_id))
    }

    /// Collect raw candidates from every relevant provider.
    ///
    /// Order is registration order, then each provider's own result order.
    /// Failing providers contribute nothing.
    pub fn discover(&self, request: &DiscoveryRequest<'_>) -> Vec<CandidateAction> {
        let mut raw = Vec::new();
        for registration in &self.registrations {
            let produced = match &registration.capability {
                Capability::Fixes(ids) => {
                    let relevant: Vec<Diagnostic> = request
                        .diagnostics
                        .iter()
                        .filter(|d| ids.contains(&d.id))
                        .cloned()
                        .collect();
                    if relevant.is_empty() {
                        continue;
                    }
                    let context = FixContext {
                        snapshot: request.snapshot,
                        diagnostics: &relevant,
                    };
                    invoke(&registration.factory, |p| p.provide_fixes(&context))
                }
                Capability::Refactors => {
                    let Some(location) = request.location else {
                        continue;
                    };
                    let context = RefactorContext {
                        snapshot: request.snapshot,
                        location,
                    };
                    invoke(&registration.factory, |p| p.provide_refactors(&context))
                }
            };
            raw.extend(produced);
        }
        raw
    }
}

fn invoke<F>(factory: &ProviderFactory, call: F) -> Vec<CandidateAction>
where
    F: FnOnce(&dyn ActionProvider) -> Result<Vec<CandidateAction>>,
{
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let provider = factory();
        let name = provider.name().to_string();
        (name, call(provider.as_ref()))
    }));

    match outcome {
        Ok((name, Ok(actions))) => actions
            .into_iter()
            .map(|action| {
                if action.provider.is_empty() {
                    action.with_provider(name.clone())
                } else {
                    action
                }
            })
            .collect(),
        Ok((name, Err(err))) => {
            tracing::warn!(
                provider = %name,
                err_code = err.code(),
                err_message = err.message(),
                "provider failed; skipping"
            );
            Vec::new()
        }
        Err(_) => {
            tracing::warn!("provider panicked; skipping");
            Vec::new()
        }
    }
}
