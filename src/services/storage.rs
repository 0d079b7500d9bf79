use std::fs;
use std::path::{Path, PathBuf};

use rspolib::{pofile, POEntry, POFile};

use crate::error::{L10nError, Result};
use crate::model::catalog::{Catalog, CatalogHeader, CatalogRecord};
use crate::model::config::HEADER_KEYS;
use crate::model::document::Category;
use crate::model::language::Language;

/// Catalog locations under a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLayout {
    pub root: PathBuf,
    pub extension: String,
}

impl CatalogLayout {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        CatalogLayout {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// `<root>/<language-code>/<category>.<ext>`
    pub fn catalog_path(&self, category: Category, lang: Language) -> PathBuf {
        self.root
            .join(lang.code())
            .join(format!("{}.{}", category.id(), self.extension))
    }

    /// `<root>/<category>.pot`
    pub fn template_path(&self, category: Category) -> PathBuf {
        self.root.join(format!("{}.pot", category.id()))
    }
}

/// Reads a PO catalog. Plural messages are rejected.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let name = utf8_path(path)?;
    let po = pofile(name).map_err(|e| catalog_error(path, e.to_string()))?;
    catalog_from_po(po).map_err(|message| catalog_error(path, message))
}

pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let po = catalog_to_po(catalog, utf8_path(path)?);
    write_atomic(path, po.to_string().as_bytes())
}

fn utf8_path(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| catalog_error(path, "path is not valid UTF-8".to_string()))
}

fn catalog_error(path: &Path, message: String) -> L10nError {
    L10nError::Catalog {
        path: path.to_path_buf(),
        message,
    }
}

fn catalog_from_po(po: POFile) -> std::result::Result<Catalog, String> {
    let mut metadata: Vec<(String, String)> = po
        .metadata
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    metadata.sort_by(|(a, _), (b, _)| header_rank(a).cmp(&header_rank(b)).then_with(|| a.cmp(b)));

    let header = CatalogHeader {
        comments: comment_lines(po.header.as_deref()),
        fuzzy: po.metadata_is_fuzzy,
        metadata,
    };

    let records = po
        .entries
        .into_iter()
        .map(record_from_entry)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Catalog { header, records })
}

fn record_from_entry(entry: POEntry) -> std::result::Result<CatalogRecord, String> {
    if entry.msgid_plural.is_some() {
        return Err(format!(
            "line {}: plural forms are not supported",
            entry.linenum
        ));
    }

    Ok(CatalogRecord {
        context: entry.msgctxt,
        source: entry.msgid,
        target: entry.msgstr.unwrap_or_default(),
        flags: entry.flags,
        obsolete: entry.obsolete,
        translator_comments: comment_lines(entry.tcomment.as_deref()),
        extracted_comments: comment_lines(entry.comment.as_deref()),
        references: entry
            .occurrences
            .into_iter()
            .map(|(file, line)| if line.is_empty() { file } else { format!("{file}:{line}") })
            .collect(),
        previous_source: entry.previous_msgid,
    })
}

fn catalog_to_po(catalog: &Catalog, path: &str) -> POFile {
    let mut po = POFile::new(path.into());
    po.header = joined(&catalog.header.comments);
    po.metadata_is_fuzzy = catalog.header.fuzzy;
    for (k, v) in &catalog.header.metadata {
        po.metadata.insert(k.clone(), v.clone());
    }
    po.entries = catalog.records.iter().map(entry_from_record).collect();
    po
}

fn entry_from_record(record: &CatalogRecord) -> POEntry {
    let mut entry = POEntry::new(0);
    entry.msgctxt = record.context.clone();
    entry.msgid = record.source.clone();
    entry.msgstr = Some(record.target.clone());
    entry.flags = record.flags.clone();
    entry.obsolete = record.obsolete;
    entry.tcomment = joined(&record.translator_comments);
    entry.comment = joined(&record.extracted_comments);
    entry.occurrences = record
        .references
        .iter()
        .map(|r| match r.rsplit_once(':') {
            Some((file, line)) => (file.to_string(), line.to_string()),
            None => (r.clone(), String::new()),
        })
        .collect();
    entry.previous_msgid = record.previous_source.clone();
    entry
}

/// Known header keys first, in writing order, then the rest by name.
fn header_rank(key: &str) -> usize {
    HEADER_KEYS
        .iter()
        .position(|k| *k == key)
        .unwrap_or(HEADER_KEYS.len())
}

fn comment_lines(text: Option<&str>) -> Vec<String> {
    text.map(|t| t.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

fn joined(lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Writes to a sibling temp file, then renames over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent).map_err(|e| L10nError::io(parent, e))?;
    }

    fs::write(&tmp, bytes).map_err(|e| L10nError::io(&tmp, e))?;

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(L10nError::io(path, e));
    }

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "rcg-l10n".to_string(),
    };
    p.set_file_name(format!(".{file_name}.tmp"));
    p
}
