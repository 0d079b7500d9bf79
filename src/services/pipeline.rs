use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{L10nError, Result};
use crate::model::config::HeaderTemplate;
use crate::model::document::{Category, LocalizationDocument};
use crate::model::language::Language;
use crate::services::{
    document,
    extract::{self, ExtractOutcome},
    pack::{self, PackOutcome},
    stats::{self, CatalogStats, StatsIssue},
    storage::{self, CatalogLayout},
};

/// Result for one (category, language) pair. A failed pair carries the
/// error message and never aborts the run.
#[derive(Debug, Serialize)]
pub struct PairResult<T> {
    pub category: Category,
    pub language: Language,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> PairResult<T> {
    fn new(category: Category, language: Language, result: Result<T>) -> Self {
        match result {
            Ok(outcome) => PairResult {
                category,
                language,
                ok: true,
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => {
                tracing::error!(%category, language = language.code(), "{e}");
                PairResult {
                    category,
                    language,
                    ok: false,
                    outcome: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractReport {
    pub items: Vec<PairResult<ExtractOutcome>>,
    pub templates: Vec<PathBuf>,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct PackReport {
    pub output: PathBuf,
    pub items: Vec<PairResult<PackOutcome>>,
    pub applied: usize,
    pub unknown_keys: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsItem {
    pub path: PathBuf,
    pub stats: CatalogStats,
    pub issues: Vec<StatsIssue>,
}

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub items: Vec<PairResult<StatsItem>>,
    pub totals: CatalogStats,
}

/// Writes catalogs for every category × language, optionally with templates.
pub fn run_extract(
    doc: &LocalizationDocument,
    layout: &CatalogLayout,
    header: &HeaderTemplate,
    languages: &[Language],
    templates: bool,
) -> ExtractReport {
    let mut report = ExtractReport {
        items: Vec::new(),
        templates: Vec::new(),
        failed: 0,
    };

    for category in Category::ALL {
        if templates {
            match extract::write_template(doc, category, layout, header) {
                Ok(path) => report.templates.push(path),
                Err(e) => {
                    tracing::error!(%category, "{e}");
                    report.failed += 1;
                }
            }
        }

        for &lang in languages {
            let item = PairResult::new(
                category,
                lang,
                extract::extract(doc, category, lang, layout, header),
            );
            if !item.ok {
                report.failed += 1;
            }
            report.items.push(item);
        }
    }

    report
}

/// Applies every category × language catalog to the document.
pub fn run_pack(
    doc: &mut LocalizationDocument,
    layout: &CatalogLayout,
    languages: &[Language],
) -> PackReport {
    let mut report = PackReport {
        output: PathBuf::new(),
        items: Vec::new(),
        applied: 0,
        unknown_keys: 0,
        failed: 0,
    };

    for category in Category::ALL {
        for &lang in languages {
            let item = PairResult::new(category, lang, pack::pack(doc, category, lang, layout));

            match &item.outcome {
                Some(PackOutcome::Applied(s)) => {
                    report.applied += s.applied;
                    report.unknown_keys += s.unknown_keys.len();
                }
                Some(_) => {}
                None => report.failed += 1,
            }
            report.items.push(item);
        }
    }

    report
}

/// Counts record states in every existing catalog and checks each context
/// against the document.
pub fn run_stats(
    doc: &LocalizationDocument,
    layout: &CatalogLayout,
    languages: &[Language],
) -> StatsReport {
    let mut report = StatsReport {
        items: Vec::new(),
        totals: CatalogStats::default(),
    };

    for category in Category::ALL {
        let keys: HashSet<&str> = doc.entries(category).iter().map(|e| e.key()).collect();

        for &lang in languages {
            let path = layout.catalog_path(category, lang);
            if !path.exists() {
                continue;
            }

            let result = storage::load_catalog(&path).map(|catalog| {
                let (stats, issues) = stats::run(&catalog, &keys);
                StatsItem {
                    path,
                    stats,
                    issues,
                }
            });

            if let Ok(item) = &result {
                let t = &mut report.totals;
                t.total += item.stats.total;
                t.reviewed += item.stats.reviewed;
                t.needs_review += item.stats.needs_review;
                t.untranslated += item.stats.untranslated;
                t.obsolete += item.stats.obsolete;
            }

            report.items.push(PairResult::new(category, lang, result));
        }
    }

    report
}

/// Loads the source document. A missing file aborts the run before
/// anything is written.
pub fn open_document(path: &Path) -> Result<LocalizationDocument> {
    if !path.is_file() {
        return Err(L10nError::io(
            path,
            io::Error::new(io::ErrorKind::NotFound, "input document not found"),
        ));
    }
    document::load(path)
}

/// `extract` over a document file.
pub fn extract_document(
    source: &Path,
    layout: &CatalogLayout,
    header: &HeaderTemplate,
    languages: &[Language],
    templates: bool,
) -> Result<ExtractReport> {
    let doc = open_document(source)?;
    Ok(run_extract(&doc, layout, header, languages, templates))
}

/// `pack` over a document file. The result goes to `output`, or to
/// `translation.json` beside the source.
pub fn pack_document(
    source: &Path,
    output: Option<&Path>,
    layout: &CatalogLayout,
    languages: &[Language],
) -> Result<PackReport> {
    let mut doc = open_document(source)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| document::default_output_path(source));

    let mut report = run_pack(&mut doc, layout, languages);
    document::save(&doc, &output)?;
    report.output = output;
    Ok(report)
}

/// `stats` over a document file and its catalogs.
pub fn stats_document(
    source: &Path,
    layout: &CatalogLayout,
    languages: &[Language],
) -> Result<StatsReport> {
    let doc = open_document(source)?;
    Ok(run_stats(&doc, layout, languages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::ProjectConfig;
    use crate::services::document;
    use chrono::{FixedOffset, TimeZone};
    use std::fs;

    const DOC: &str = r#"{
  "Non_Dialog_Keys": [ { "Key": "N1", "English": "Start", "French": "Démarrer" } ],
  "Useables_Keys": [],
  "Move_Keys": [],
  "Quest_Keys": [
    { "Key": "Q1", "English": "Go north", "French": "" },
    { "Key": "Q2", "English": "", "French": "ignored" }
  ],
  "QuestItem_Keys": [],
  "Equip_Keys": [],
  "Store_Keys": [],
  "Dialog_Keys": [],
  "Tutorial_Keys": [],
  "MetaData_Keys": []
}"#;

    fn header() -> HeaderTemplate {
        let ts = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2020, 1, 2, 3, 4, 0)
            .unwrap();
        HeaderTemplate::new(&ProjectConfig::default(), ts)
    }

    #[test]
    fn full_cycle_over_every_pair() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("RCG_LocalizationData.json");
        fs::write(&src, format!("\u{feff}{DOC}")).unwrap();

        let mut doc = document::load(&src).unwrap();
        let before = doc.clone();
        let layout = CatalogLayout::new(dir.path().join("translation"), "po");
        let langs = [Language::French, Language::Russian];

        let report = run_extract(&doc, &layout, &header(), &langs, true);
        assert_eq!(report.failed, 0);
        assert_eq!(report.items.len(), Category::ALL.len() * langs.len());
        assert_eq!(report.templates.len(), Category::ALL.len());
        assert!(layout.catalog_path(Category::Dialog, Language::Russian).exists());

        // Nothing reviewed yet: the seeded French text stays needs-review.
        let report = run_pack(&mut doc, &layout, &langs);
        assert_eq!(report.failed, 0);
        assert_eq!(report.applied, 0);
        assert_eq!(doc, before);

        let stats = run_stats(&doc, &layout, &langs);
        assert_eq!(stats.items.len(), Category::ALL.len() * langs.len());
        assert_eq!(stats.totals.total, 4);
        assert_eq!(stats.totals.needs_review, 1);
        assert_eq!(stats.totals.untranslated, 3);
    }

    #[test]
    fn broken_catalog_fails_only_its_pair() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = document::parse(DOC, std::path::Path::new("doc.json")).unwrap();
        let layout = CatalogLayout::new(dir.path(), "po");
        let langs = [Language::French];

        run_extract(&doc, &layout, &header(), &langs, false);
        let broken = layout.catalog_path(Category::Quest, Language::French);
        fs::write(&broken, "garbage\n").unwrap();

        let report = run_pack(&mut doc, &layout, &langs);
        assert_eq!(report.failed, 1);
        let failed: Vec<Category> = report
            .items
            .iter()
            .filter(|i| !i.ok)
            .map(|i| i.category)
            .collect();
        assert_eq!(failed, vec![Category::Quest]);
        assert!(report.items.iter().filter(|i| i.ok).count() == Category::ALL.len() - 1);
    }

    #[test]
    fn pack_document_writes_beside_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("RCG_LocalizationData.json");
        fs::write(&src, DOC).unwrap();
        let layout = CatalogLayout::new(dir.path().join("translation"), "po");
        let langs = [Language::French];

        let report = extract_document(&src, &layout, &header(), &langs, false).unwrap();
        assert_eq!(report.failed, 0);

        let report = pack_document(&src, None, &layout, &langs).unwrap();
        assert_eq!(report.output, dir.path().join("translation.json"));
        assert!(report.output.exists());
    }

    #[test]
    fn missing_document_is_fatal_for_every_command() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("missing.json");
        let layout = CatalogLayout::new(dir.path().join("translation"), "po");
        let langs = [Language::French];

        assert!(matches!(
            extract_document(&src, &layout, &header(), &langs, false),
            Err(L10nError::Io { .. })
        ));
        assert!(matches!(pack_document(&src, None, &layout, &langs), Err(L10nError::Io { .. })));
        assert!(matches!(stats_document(&src, &layout, &langs), Err(L10nError::Io { .. })));
        assert!(!layout.root.exists());
    }
}
