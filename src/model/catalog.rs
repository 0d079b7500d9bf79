pub const FUZZY_FLAG: &str = "fuzzy";

/// Where a record stands in the translation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Untranslated,
    NeedsReview,
    Reviewed,
    Obsolete,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogRecord {
    /// Mirrors the document entry key.
    pub context: Option<String>,

    /// Mirrors the document entry source text.
    pub source: String,

    pub target: String,
    pub flags: Vec<String>,
    pub obsolete: bool,
    pub translator_comments: Vec<String>,
    pub extracted_comments: Vec<String>,
    pub references: Vec<String>,

    /// Source text before the last merge changed it (`#| msgid`).
    pub previous_source: Option<String>,
}

impl CatalogRecord {
    pub fn new(context: &str, source: &str, target: &str) -> Self {
        CatalogRecord {
            context: Some(context.to_string()),
            source: source.to_string(),
            target: target.to_string(),
            ..Default::default()
        }
    }

    pub fn context(&self) -> &str {
        self.context.as_deref().unwrap_or("")
    }

    pub fn is_translated(&self) -> bool {
        !self.target.is_empty()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|f| f == FUZZY_FLAG)
    }

    pub fn set_fuzzy(&mut self, fuzzy: bool) {
        if fuzzy {
            if !self.is_fuzzy() {
                self.flags.push(FUZZY_FLAG.to_string());
            }
        } else {
            self.flags.retain(|f| f != FUZZY_FLAG);
        }
    }

    pub fn state(&self) -> RecordState {
        if self.obsolete {
            RecordState::Obsolete
        } else if !self.is_translated() {
            RecordState::Untranslated
        } else if self.is_fuzzy() {
            RecordState::NeedsReview
        } else {
            RecordState::Reviewed
        }
    }

    /// Whether pack may copy the target into the document.
    pub fn is_applicable(&self) -> bool {
        self.state() == RecordState::Reviewed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogHeader {
    pub comments: Vec<String>,
    pub fuzzy: bool,
    pub metadata: Vec<(String, String)>,
}

impl CatalogHeader {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the value of `key`, appending it when absent.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.metadata.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.metadata.push((key.to_string(), value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub header: CatalogHeader,
    pub records: Vec<CatalogRecord>,
}

impl Catalog {
    pub fn with_metadata(metadata: Vec<(String, String)>) -> Self {
        Catalog {
            header: CatalogHeader {
                metadata,
                ..Default::default()
            },
            records: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_follows_flags_and_target() {
        let mut r = CatalogRecord::new("Q1", "Go north", "");
        assert_eq!(r.state(), RecordState::Untranslated);

        r.target = "Va vers le nord".into();
        r.set_fuzzy(true);
        r.set_fuzzy(true);
        assert_eq!(r.flags, vec![FUZZY_FLAG.to_string()]);
        assert_eq!(r.state(), RecordState::NeedsReview);
        assert!(!r.is_applicable());

        r.set_fuzzy(false);
        assert_eq!(r.state(), RecordState::Reviewed);
        assert!(r.is_applicable());

        r.obsolete = true;
        assert_eq!(r.state(), RecordState::Obsolete);
        assert!(!r.is_applicable());
    }

    #[test]
    fn header_set_replaces_in_place() {
        let mut h = CatalogHeader::default();
        h.set("A", "1");
        h.set("B", "2");
        h.set("A", "3");
        assert_eq!(h.metadata, vec![("A".into(), "3".into()), ("B".into(), "2".into())]);
        assert_eq!(h.get("B"), Some("2"));
    }
}
