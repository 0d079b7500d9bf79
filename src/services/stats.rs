use std::collections::HashSet;

use crate::model::catalog::{Catalog, RecordState};
use serde::Serialize;

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    pub reviewed: usize,
    pub needs_review: usize,
    pub untranslated: usize,
    pub obsolete: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StatsIssue {
    pub context: String,
    pub code: String,
    pub message: String,
}

/// Counts record states and lists issues. `keys` holds the entry keys of the
/// document category the catalog belongs to.
pub fn run(catalog: &Catalog, keys: &HashSet<&str>) -> (CatalogStats, Vec<StatsIssue>) {
    let mut stats = CatalogStats::default();
    let mut issues: Vec<StatsIssue> = Vec::new();

    for r in &catalog.records {
        stats.total += 1;
        match r.state() {
            RecordState::Reviewed => stats.reviewed += 1,
            RecordState::NeedsReview => stats.needs_review += 1,
            RecordState::Untranslated => stats.untranslated += 1,
            RecordState::Obsolete => stats.obsolete += 1,
        }

        // Obsolete records never reach the document.
        if r.obsolete {
            continue;
        }

        let source_trim = r.source.trim();
        let target_trim = r.target.trim();

        match r.context.as_deref() {
            None => issues.push(StatsIssue {
                context: String::new(),
                code: "MISSING_CONTEXT".to_string(),
                message: format!("record {:?} has no context and cannot be packed", r.source),
            }),
            Some(ctx) if !keys.contains(ctx) => issues.push(StatsIssue {
                context: ctx.to_string(),
                code: "MISSING_CONTEXT".to_string(),
                message: "no document entry has this key".to_string(),
            }),
            Some(_) => {}
        }

        if !target_trim.is_empty() && target_trim == source_trim {
            issues.push(StatsIssue {
                context: r.context().to_string(),
                code: "SAME_AS_SOURCE".to_string(),
                message: "translation is identical to the source text".to_string(),
            });
        }

        if source_trim.is_empty() && !target_trim.is_empty() {
            issues.push(StatsIssue {
                context: r.context().to_string(),
                code: "TARGET_WITHOUT_SOURCE".to_string(),
                message: "translation present but source text is empty".to_string(),
            });
        }
    }

    (stats, issues)
}
