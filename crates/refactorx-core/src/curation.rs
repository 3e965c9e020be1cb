//! Deterministic curation of raw candidate actions.
//!
//! ## Pipeline (in order):
//! 1. Exclusion by diagnostic id (priority ids always survive)
//! 2. Refactoring gate and title-pattern exclusion
//! 3. Title deduplication (first occurrence wins)
//! 4. Truncation to `max_results`, priority-tagged actions first
//!
//! Identical input and config always produce identical output, and running
//! the pipeline on its own output changes nothing.

use crate::config::CurationConfig;
use crate::model::{ActionKind, CandidateAction};
use std::collections::HashSet;

/// Apply the full curation pipeline
pub fn curate(raw: Vec<CandidateAction>, config: &CurationConfig) -> Vec<CandidateAction> {
    let filtered = drop_excluded_fixes(raw, config);
    let filtered = gate_refactorings(filtered, config);
    let deduped = if config.deduplicate_by_title {
        dedup_by_title(filtered)
    } else {
        filtered
    };
    truncate_preferring_priority(deduped, config)
}

fn drop_excluded_fixes(raw: Vec<CandidateAction>, config: &CurationConfig) -> Vec<CandidateAction> {
    raw.into_iter()
        .filter(|action| {
            if action.kind != ActionKind::Fix || action.is_priority(&config.priority_diagnostic_ids)
            {
                return true;
            }
            !action
                .diagnostic_ids
                .iter()
                .any(|id| config.excluded_diagnostic_ids.contains(id))
        })
        .collect()
}

fn gate_refactorings(actions: Vec<CandidateAction>, config: &CurationConfig) -> Vec<CandidateAction> {
    actions
        .into_iter()
        .filter(|action| {
            if action.kind != ActionKind::Refactor {
                return true;
            }
            config.include_refactorings
                && !config
                    .excluded_refactor_title_patterns
                    .iter()
                    .any(|pattern| title_matches(&action.title, pattern))
        })
        .collect()
}

fn dedup_by_title(actions: Vec<CandidateAction>) -> Vec<CandidateAction> {
    let mut seen: HashSet<String> = HashSet::new();
    actions
        .into_iter()
        .filter(|action| seen.insert(action.title.clone()))
        .collect()
}

fn truncate_preferring_priority(
    actions: Vec<CandidateAction>,
    config: &CurationConfig,
) -> Vec<CandidateAction> {
    let max = config.max_results;
    if actions.len() <= max {
        return actions;
    }

    let priority: Vec<bool> = actions
        .iter()
        .map(|a| a.is_priority(&config.priority_diagnostic_ids))
        .collect();
    let priority_count = priority.iter().filter(|p| **p).count();
    let mut priority_slots = priority_count.min(max);
    let mut other_slots = max - priority_slots;

    actions
        .into_iter()
        .zip(priority)
        .filter(|(_, is_priority)| {
            let slots = if *is_priority {
                &mut priority_slots
            } else {
                &mut other_slots
            };
            if *slots == 0 {
                return false;
            }
            *slots -= 1;
            true
        })
        .map(|(action, _)| action)
        .collect()
}

/// Case-insensitive title match. A pattern containing `*` must match the
/// whole title with `*` standing for any run of characters; otherwise the
/// pattern matches as a substring.
pub fn title_matches(title: &str, pattern: &str) -> bool {
    let title = title.to_lowercase();
    let pattern = pattern.to_lowercase();
    if pattern.contains('*') {
        wildcard_match(&title, &pattern)
    } else {
        title.contains(&pattern)
    }
}

fn wildcard_match(text: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return text.is_empty(),
    };
    let Some(mut remaining) = text.strip_prefix(first) else {
        return false;
    };
    let Some((last, middle)) = rest.split_last() else {
        return remaining.is_empty();
    };
    for part in middle {
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }
    remaining.len() >= last.len() && remaining.ends_with(last)
}
