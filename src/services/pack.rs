use std::collections::HashMap;

use serde::Serialize;

use super::storage::{self, CatalogLayout};
use crate::error::{L10nError, Result};
use crate::model::catalog::{Catalog, RecordState};
use crate::model::document::{Category, LocalizationDocument};
use crate::model::language::Language;

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct PackSummary {
    pub applied: usize,
    pub unchanged: usize,
    pub needs_review: usize,
    pub untranslated: usize,
    pub obsolete: usize,
    /// Contexts with no matching document entry; the catalog is stale.
    pub unknown_keys: Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PackOutcome {
    MissingCatalog,
    EmptyCategory,
    Applied(PackSummary),
}

/// Copies reviewed translations from `catalog` into the document.
///
/// Only live, translated records without the needs-review flag are applied.
/// Everything else leaves the document value as it was.
pub fn apply_catalog(
    doc: &mut LocalizationDocument,
    category: Category,
    lang: Language,
    catalog: &Catalog,
) -> PackSummary {
    let mut summary = PackSummary::default();

    let entries = doc.entries_mut(category);
    let index: HashMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.key().to_string(), i))
        .collect();

    for record in &catalog.records {
        match record.state() {
            RecordState::Obsolete => summary.obsolete += 1,
            RecordState::Untranslated => summary.untranslated += 1,
            RecordState::NeedsReview => summary.needs_review += 1,
            RecordState::Reviewed => {
                let Some(&i) = index.get(record.context()) else {
                    let err = L10nError::UnknownKey {
                        category: category.to_string(),
                        key: record.context().to_string(),
                    };
                    tracing::warn!(language = lang.code(), "{err}, skipping");
                    summary.unknown_keys.push(record.context().to_string());
                    continue;
                };

                let entry = &mut entries[i];
                if entry.text(lang) == record.target {
                    summary.unchanged += 1;
                } else {
                    tracing::debug!(%category, key = record.context(), language = lang.code(), "applying translation");
                    entry.set_text(lang, record.target.clone());
                    summary.applied += 1;
                }
            }
        }
    }

    summary
}

/// Reads the catalog for one (category, language) pair into the document.
pub fn pack(
    doc: &mut LocalizationDocument,
    category: Category,
    lang: Language,
    layout: &CatalogLayout,
) -> Result<PackOutcome> {
    let path = layout.catalog_path(category, lang);

    if !path.exists() {
        tracing::warn!(path = %path.display(), "catalog not found, category left untouched");
        return Ok(PackOutcome::MissingCatalog);
    }

    if doc.entries(category).is_empty() {
        tracing::error!(%category, "document category is empty, nothing to update");
        return Ok(PackOutcome::EmptyCategory);
    }

    let catalog = storage::load_catalog(&path)?;
    let summary = apply_catalog(doc, category, lang, &catalog);

    tracing::info!(
        path = %path.display(),
        applied = summary.applied,
        needs_review = summary.needs_review,
        unknown = summary.unknown_keys.len(),
        "packed catalog"
    );

    Ok(PackOutcome::Applied(summary))
}
