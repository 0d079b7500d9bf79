use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{encoding, storage};
use crate::error::{L10nError, Result};
use crate::model::document::{Category, Entry, LocalizationDocument};
use crate::model::language::{Language, KEY_FIELD};

/// Loads the aggregated document.
///
/// Every category must be present as a list of objects carrying string
/// `Key` and `English` fields. Within a category only the last occurrence
/// of a key survives.
pub fn load(path: &Path) -> Result<LocalizationDocument> {
    let text = encoding::read_utf8(path)?;
    let doc = parse(&text, path)?;

    tracing::info!(
        path = %path.display(),
        entries = Category::ALL.iter().map(|c| doc.entries(*c).len()).sum::<usize>(),
        "loaded localization document"
    );

    Ok(doc)
}

pub fn parse(text: &str, path: &Path) -> Result<LocalizationDocument> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| L10nError::parse(path, e.to_string()))?;

    let Value::Object(mut root) = value else {
        return Err(L10nError::parse(path, "top level is not an object"));
    };

    let mut categories = BTreeMap::new();

    for category in Category::ALL {
        let slot = root
            .get_mut(category.id())
            .ok_or_else(|| L10nError::parse(path, format!("missing category {category}")))?;

        let Value::Array(items) = std::mem::take(slot) else {
            return Err(L10nError::parse(path, format!("{category} is not a list")));
        };

        let mut entries = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            entries.push(entry_from_value(item, category, i, path)?);
        }

        let (entries, removed) = dedup(entries);
        if removed > 0 {
            tracing::warn!(%category, removed, "duplicate keys collapsed to last occurrence");
        }

        categories.insert(category, entries);
    }

    Ok(LocalizationDocument { root, categories })
}

fn entry_from_value(item: Value, category: Category, index: usize, path: &Path) -> Result<Entry> {
    let Value::Object(fields) = item else {
        return Err(L10nError::parse(
            path,
            format!("{category}[{index}] is not an object"),
        ));
    };

    for required in [KEY_FIELD, Language::SOURCE.field()] {
        if !fields.get(required).is_some_and(Value::is_string) {
            return Err(L10nError::parse(
                path,
                format!("{category}[{index}] has no string field {required}"),
            ));
        }
    }

    Ok(Entry::from(fields))
}

/// Keeps the last occurrence of every key, in the order those occurrences appear.
fn dedup(entries: Vec<Entry>) -> (Vec<Entry>, usize) {
    let mut last_seen: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    for (i, e) in entries.iter().enumerate() {
        last_seen.insert(e.key().to_string(), i);
    }

    let removed = entries.len() - last_seen.len();
    let kept = entries
        .into_iter()
        .enumerate()
        .filter(|(i, e)| last_seen.get(e.key()) == Some(i))
        .map(|(_, e)| e)
        .collect();

    (kept, removed)
}

/// `translation.json` beside the source document.
pub fn default_output_path(source: &Path) -> PathBuf {
    source.with_file_name("translation.json")
}

/// Renders the document as pretty JSON (two-space indent, non-ASCII kept as is).
pub fn to_text(doc: &LocalizationDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(&doc.to_value())?)
}

/// Saves the document as BOM-marked UTF-8 with CRLF line endings.
pub fn save(doc: &LocalizationDocument, path: &Path) -> Result<()> {
    let text = to_text(doc)?;
    storage::write_atomic(path, &encoding::encode_bom_crlf(&text))?;

    tracing::info!(path = %path.display(), "saved localization document");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// A document with every category; `Quest_Keys` filled from `quest`.
    pub(crate) fn document_json(quest: Value) -> String {
        let mut root = serde_json::Map::new();
        for c in Category::ALL {
            let v = if c == Category::Quest { quest.clone() } else { json!([]) };
            root.insert(c.id().to_string(), v);
        }
        Value::Object(root).to_string()
    }

    fn parse_str(text: &str) -> Result<LocalizationDocument> {
        parse(text, Path::new("test.json"))
    }

    #[test]
    fn duplicates_collapse_to_last_occurrence() {
        let text = document_json(json!([
            { "Key": "A", "English": "first A" },
            { "Key": "B", "English": "only B" },
            { "Key": "A", "English": "second A" },
            { "Key": "C", "English": "first C" },
            { "Key": "A", "English": "third A" },
        ]));
        let doc = parse_str(&text).unwrap();

        let keys: Vec<(&str, &str)> = doc
            .entries(Category::Quest)
            .iter()
            .map(|e| (e.key(), e.source()))
            .collect();
        assert_eq!(keys, vec![("B", "only B"), ("C", "first C"), ("A", "third A")]);
    }

    #[test]
    fn missing_category_is_a_parse_error() {
        let err = parse_str(r#"{ "Quest_Keys": [] }"#).unwrap_err();
        assert!(matches!(err, L10nError::Parse { ref message, .. } if message.contains("missing category")));
    }

    #[test]
    fn entry_without_english_is_rejected() {
        let text = document_json(json!([{ "Key": "Q1", "French": "x" }]));
        let err = parse_str(&text).unwrap_err();
        assert!(matches!(err, L10nError::Parse { ref message, .. } if message.contains("English")));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(parse_str("{ nope"), Err(L10nError::Parse { .. })));
    }

    #[test]
    fn save_writes_bom_crlf_and_keeps_order() {
        let mut root = serde_json::Map::new();
        root.insert("Version".into(), json!("1.2"));
        for c in Category::ALL.iter().rev() {
            root.insert(c.id().to_string(), json!([]));
        }
        root.insert(
            Category::Quest.id().into(),
            json!([{ "Key": "Q1", "French": "", "English": "Go north", "Extra": 3 }]),
        );
        let text = Value::Object(root).to_string();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("translation.json");
        let doc = parse_str(&text).unwrap();
        save(&doc, &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        let written = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(written.contains("\r\n  \"Version\": \"1.2\",\r\n"));
        assert!(!written.replace("\r\n", "").contains('\n'));

        let first_keys: Vec<&str> = written.lines().take(3).map(str::trim).collect();
        assert_eq!(first_keys, vec!["{", "\"Version\": \"1.2\",", "\"MetaData_Keys\": [],"]);

        let field_order = written.find("\"Key\"").unwrap() < written.find("\"French\"").unwrap()
            && written.find("\"French\"").unwrap() < written.find("\"English\"").unwrap();
        assert!(field_order);

        let reloaded = load(&out).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn non_ascii_is_written_unescaped() {
        let text = document_json(json!([{ "Key": "Q1", "English": "Go", "Japanese": "北へ行け" }]));
        let doc = parse_str(&text).unwrap();
        assert!(to_text(&doc).unwrap().contains("北へ行け"));
    }
}
