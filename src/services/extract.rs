use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;

use super::merge::{self, MergeSummary};
use super::storage::{self, CatalogLayout};
use crate::error::Result;
use crate::model::catalog::{Catalog, CatalogRecord};
use crate::model::config::HeaderTemplate;
use crate::model::document::{Category, LocalizationDocument};
use crate::model::language::Language;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ExtractOutcome {
    Created {
        path: PathBuf,
        records: usize,
        seeded: usize,
    },
    Merged {
        path: PathBuf,
        summary: MergeSummary,
    },
}

/// Builds a catalog from one document category.
///
/// Entries without source text are left out. With `lang` set, targets
/// carry the entry's current text in that language; without it the catalog
/// is a template and every target is empty.
pub fn build_catalog(
    doc: &LocalizationDocument,
    category: Category,
    lang: Option<Language>,
    header: &HeaderTemplate,
) -> Catalog {
    let mut catalog = Catalog::with_metadata(header.metadata());
    let mut seen: HashSet<&str> = HashSet::new();

    for entry in doc.entries(category) {
        if !entry.is_translatable() {
            continue;
        }

        if !seen.insert(entry.key()) {
            tracing::warn!(%category, key = entry.key(), "entry already exists in catalog, skipping");
            continue;
        }

        let target = lang.map(|l| entry.text(l)).unwrap_or("");
        catalog
            .records
            .push(CatalogRecord::new(entry.key(), entry.source(), target));
    }

    catalog
}

/// Writes or updates the catalog for one (category, language) pair.
pub fn extract(
    doc: &LocalizationDocument,
    category: Category,
    lang: Language,
    layout: &CatalogLayout,
    header: &HeaderTemplate,
) -> Result<ExtractOutcome> {
    let path = layout.catalog_path(category, lang);
    let fresh = build_catalog(doc, category, Some(lang), header);

    if path.exists() {
        let existing = storage::load_catalog(&path)?;
        let (merged, summary) = merge::merge(existing, &fresh, header);
        storage::save_catalog(&path, &merged)?;

        tracing::info!(
            path = %path.display(),
            added = summary.added,
            obsoleted = summary.obsoleted,
            "merged catalog"
        );
        return Ok(ExtractOutcome::Merged { path, summary });
    }

    let (catalog, seeded) = seed_new(fresh);
    storage::save_catalog(&path, &catalog)?;

    tracing::info!(path = %path.display(), records = catalog.records.len(), seeded, "created catalog");
    Ok(ExtractOutcome::Created {
        path,
        records: catalog.records.len(),
        seeded,
    })
}

/// Targets copied from the document were never reviewed in a catalog, so
/// they start out as needs-review.
fn seed_new(mut catalog: Catalog) -> (Catalog, usize) {
    let mut seeded = 0usize;
    for r in catalog.records.iter_mut().filter(|r| r.is_translated()) {
        r.set_fuzzy(true);
        seeded += 1;
    }
    (catalog, seeded)
}

/// Writes `<root>/<category>.pot`, replacing any previous template.
pub fn write_template(
    doc: &LocalizationDocument,
    category: Category,
    layout: &CatalogLayout,
    header: &HeaderTemplate,
) -> Result<PathBuf> {
    let path = layout.template_path(category);
    let mut catalog = build_catalog(doc, category, None, header);
    catalog.header.fuzzy = true;

    storage::save_catalog(&path, &catalog)?;
    tracing::info!(path = %path.display(), records = catalog.records.len(), "wrote template");
    Ok(path)
}
