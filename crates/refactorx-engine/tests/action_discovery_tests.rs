#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{
    default_registry, workspace, AppendComment, FakeEngine, Fixture, PanickingProvider,
    ReplaceBadWord, TitledFixes, BAD_WORD, NO_NEWLINE,
};
use refactorx_core::errors::ExErrorKind;
use refactorx_core::model::{ActionKind, Severity, SourceLocation};
use refactorx_core::provider::{Capability, ProviderRegistry};
use refactorx_core::RefactorxConfig;
use refactorx_engine::ActionQuery;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_diagnostics_sorted_and_flagged() {
    // Given two documents, one with a problem line and one without a final newline
    let (fixture, modules) = Fixture::new(&[("A.cs", "ok\nbad\n"), ("B.cs", "class B {}")]);
    let registry = ProviderRegistry::new().register(Capability::fixes([BAD_WORD]), || ReplaceBadWord);
    let ws = workspace(FakeEngine::new(modules), registry, RefactorxConfig::default());
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    // When listing every diagnostic
    let diagnostics = ws.list_diagnostics(None, &cancel).await.unwrap();

    // Then they come back in file order with has_fix set by provider coverage
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].id, BAD_WORD);
    assert_eq!(diagnostics[0].file.as_deref(), Some(fixture.doc("A.cs").as_path()));
    assert!(diagnostics[0].has_fix);
    assert_eq!(diagnostics[1].id, NO_NEWLINE);
    assert!(!diagnostics[1].has_fix);
}

#[tokio::test]
async fn test_severity_filter() {
    let (fixture, modules) = Fixture::new(&[("A.cs", "bad\n"), ("B.cs", "class B {}")]);
    let ws = workspace(FakeEngine::new(modules), default_registry(), RefactorxConfig::default());
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    let warnings = ws.list_diagnostics(Some("warning"), &cancel).await.unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings.iter().all(|d| d.severity >= Severity::Warning));

    let errors = ws.list_diagnostics(Some("Error"), &cancel).await.unwrap();
    assert!(errors.is_empty());

    let err = ws.list_diagnostics(Some("loud"), &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_priority_fix_survives_exclusion() {
    // Given a diagnostic id that is both excluded and prioritized
    let (fixture, modules) = Fixture::new(&[("A.cs", "bad\n")]);
    let mut config = RefactorxConfig::default();
    config.curation.excluded_diagnostic_ids.insert(BAD_WORD.to_string());
    config.curation.priority_diagnostic_ids.insert(BAD_WORD.to_string());
    let ws = workspace(FakeEngine::new(modules), default_registry(), config);
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    // When discovering fixes
    let actions = ws.list_actions(ActionQuery::all(), &cancel).await.unwrap();

    // Then the priority fix is still offered
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].diagnostic_ids, vec![BAD_WORD.to_string()]);
}

#[tokio::test]
async fn test_excluded_fix_is_dropped() {
    let (fixture, modules) = Fixture::new(&[("A.cs", "bad\n")]);
    let mut config = RefactorxConfig::default();
    config.curation.excluded_diagnostic_ids.insert(BAD_WORD.to_string());
    let ws = workspace(FakeEngine::new(modules), default_registry(), config);
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    let actions = ws.list_actions(ActionQuery::all(), &cancel).await.unwrap();
    assert!(actions.is_empty());
}

#[tokio::test]
async fn test_duplicate_titles_and_truncation() {
    // Given two providers offering overlapping titles and a cap of three
    let (fixture, modules) = Fixture::new(&[("A.cs", "bad\n")]);
    let registry = ProviderRegistry::new()
        .register(Capability::fixes([BAD_WORD]), || TitledFixes {
            name: "first",
            titles: vec!["Alpha", "Beta"],
        })
        .register(Capability::fixes([BAD_WORD]), || TitledFixes {
            name: "second",
            titles: vec!["Beta", "Gamma", "Delta"],
        });
    let mut config = RefactorxConfig::default();
    config.curation.max_results = 3;
    let ws = workspace(FakeEngine::new(modules), registry, config);
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    // When discovering
    let actions = ws.list_actions(ActionQuery::all(), &cancel).await.unwrap();

    // Then duplicates collapse to the first occurrence and the list is capped
    let titles: Vec<&str> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
    let ids: std::collections::BTreeSet<&str> = actions.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids.len(), 3, "ids are unique");
}

#[tokio::test]
async fn test_query_by_diagnostic_id() {
    let (fixture, modules) = Fixture::new(&[("A.cs", "bad\n"), ("B.cs", "class B {}")]);
    let ws = workspace(FakeEngine::new(modules), default_registry(), RefactorxConfig::default());
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    let actions = ws
        .list_actions(ActionQuery::for_diagnostics([NO_NEWLINE]), &cancel)
        .await
        .unwrap();

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].title, "Broken fix");
}

#[tokio::test]
async fn test_location_query_returns_fixes_then_refactorings() {
    // Given a problem on line 2 of A.cs
    let (fixture, modules) = Fixture::new(&[("A.cs", "ok\nbad\n")]);
    let ws = workspace(FakeEngine::new(modules), default_registry(), RefactorxConfig::default());
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    // When asking for actions at that line
    let at_problem = SourceLocation::new(fixture.doc("A.cs"), 2, 1);
    let actions = ws.list_actions(ActionQuery::at(at_problem), &cancel).await.unwrap();

    // Then the covering fix comes first, followed by the refactoring
    let kinds: Vec<ActionKind> = actions.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Fix, ActionKind::Refactor]);

    // And a clean line only offers the refactoring
    let clean = SourceLocation::new(fixture.doc("A.cs"), 1, 1);
    let actions = ws.list_actions(ActionQuery::at(clean), &cancel).await.unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].title, "Append comment");
}

#[tokio::test]
async fn test_refactorings_can_be_disabled() {
    let (fixture, modules) = Fixture::new(&[("A.cs", "ok\n")]);
    let mut config = RefactorxConfig::default();
    config.curation.include_refactorings = false;
    let ws = workspace(FakeEngine::new(modules), default_registry(), config);
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    let location = SourceLocation::new(fixture.doc("A.cs"), 1, 1);
    let actions = ws.list_actions(ActionQuery::at(location), &cancel).await.unwrap();
    assert!(actions.is_empty());
}

#[tokio::test]
async fn test_panicking_provider_is_skipped() {
    let (fixture, modules) = Fixture::new(&[("A.cs", "bad\n")]);
    let registry = ProviderRegistry::new()
        .register(Capability::fixes([BAD_WORD]), || PanickingProvider)
        .register(Capability::fixes([BAD_WORD]), || ReplaceBadWord)
        .register(Capability::Refactors, || AppendComment);
    let ws = workspace(FakeEngine::new(modules), registry, RefactorxConfig::default());
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    let actions = ws.list_actions(ActionQuery::all(), &cancel).await.unwrap();

    assert_eq!(actions.len(), 1);
    assert!(actions[0].title.starts_with("Replace 'bad'"));
}

#[tokio::test]
async fn test_discovery_is_repeatable() {
    let (fixture, modules) = Fixture::new(&[("A.cs", "bad\n"), ("B.cs", "bad\n")]);
    let ws = workspace(FakeEngine::new(modules), default_registry(), RefactorxConfig::default());
    let cancel = CancellationToken::new();
    assert!(ws.initialize(fixture.root(), &cancel).await.success);

    let first = ws.list_actions(ActionQuery::all(), &cancel).await.unwrap();
    let second = ws.list_actions(ActionQuery::all(), &cancel).await.unwrap();

    let titles = |actions: &[refactorx_core::model::ActionSummary]| -> Vec<String> {
        actions.iter().map(|a| a.title.clone()).collect()
    };
    assert_eq!(titles(&first), titles(&second));
    // Each call registers fresh ids; earlier ids stay valid for this snapshot
    assert_ne!(first[0].id, second[0].id);
}

#[tokio::test]
async fn test_cancelled_query() {
    let (fixture, modules) = Fixture::new(&[("A.cs", "bad\n")]);
    let ws = workspace(FakeEngine::new(modules), default_registry(), RefactorxConfig::default());
    assert!(ws.initialize(fixture.root(), &CancellationToken::new()).await.success);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = ws.list_actions(ActionQuery::all(), &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Cancelled);
}
