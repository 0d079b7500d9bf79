use std::collections::HashMap;

use serde::Serialize;

use crate::model::catalog::{Catalog, CatalogRecord};
use crate::model::config::{HeaderTemplate, CREATION_DATE_KEY};

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub kept: usize,
    pub source_changed: usize,
    pub added: usize,
    pub revived: usize,
    pub obsoleted: usize,
}

/// Merges a freshly built catalog into an existing one.
///
/// Records are matched by context. A kept record retains its target, flags
/// and comments. A changed source keeps the old target as needs-review.
/// New contexts arrive untranslated. Contexts missing from `fresh` become
/// obsolete and move to the end; nothing is deleted.
pub fn merge(existing: Catalog, fresh: &Catalog, header: &HeaderTemplate) -> (Catalog, MergeSummary) {
    let mut summary = MergeSummary::default();

    let mut live: HashMap<&str, usize> = HashMap::new();
    let mut obsolete: HashMap<&str, usize> = HashMap::new();
    for (i, r) in existing.records.iter().enumerate() {
        let index = if r.obsolete { &mut obsolete } else { &mut live };
        index.entry(r.context()).or_insert(i);
    }

    let mut taken = vec![false; existing.records.len()];
    let mut records: Vec<CatalogRecord> = Vec::with_capacity(fresh.records.len());

    for f in &fresh.records {
        if let Some(&i) = live.get(f.context()) {
            taken[i] = true;
            let mut r = existing.records[i].clone();
            if r.source == f.source {
                summary.kept += 1;
            } else {
                update_source(&mut r, &f.source);
                summary.source_changed += 1;
            }
            records.push(r);
        } else if let Some(&i) = obsolete.get(f.context()) {
            taken[i] = true;
            let mut r = existing.records[i].clone();
            r.obsolete = false;
            update_source(&mut r, &f.source);
            if r.is_translated() {
                r.set_fuzzy(true);
            }
            summary.revived += 1;
            records.push(r);
        } else {
            records.push(CatalogRecord {
                context: f.context.clone(),
                source: f.source.clone(),
                ..Default::default()
            });
            summary.added += 1;
        }
    }

    let Catalog {
        header: mut merged_header,
        records: old_records,
    } = existing;

    for (r, taken) in old_records.into_iter().zip(taken) {
        if taken {
            continue;
        }
        let mut r = r;
        if !r.obsolete {
            r.obsolete = true;
            summary.obsoleted += 1;
        }
        records.push(r);
    }

    let template = header.metadata();
    if merged_header.metadata.is_empty() {
        merged_header.metadata = template;
    } else {
        for (k, v) in &template {
            if k == CREATION_DATE_KEY || merged_header.get(k).is_none() {
                merged_header.set(k, v);
            }
        }
    }

    (
        Catalog {
            header: merged_header,
            records,
        },
        summary,
    )
}

/// A translation of different source text cannot be trusted as is.
fn update_source(r: &mut CatalogRecord, source: &str) {
    if r.source == source {
        return;
    }
    let old = std::mem::replace(&mut r.source, source.to_string());
    if r.is_translated() {
        r.previous_source = Some(old);
        r.set_fuzzy(true);
    }
}
