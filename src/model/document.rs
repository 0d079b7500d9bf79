use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::L10nError;
use crate::model::language::{Language, KEY_FIELD};

/// Top-level sections of the localization document.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Non_Dialog_Keys")]
    NonDialog,
    #[serde(rename = "Useables_Keys")]
    Useables,
    #[serde(rename = "Move_Keys")]
    Move,
    #[serde(rename = "Quest_Keys")]
    Quest,
    #[serde(rename = "QuestItem_Keys")]
    QuestItem,
    #[serde(rename = "Equip_Keys")]
    Equip,
    #[serde(rename = "Store_Keys")]
    Store,
    #[serde(rename = "Dialog_Keys")]
    Dialog,
    #[serde(rename = "Tutorial_Keys")]
    Tutorial,
    #[serde(rename = "MetaData_Keys")]
    MetaData,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::NonDialog,
        Category::Useables,
        Category::Move,
        Category::Quest,
        Category::QuestItem,
        Category::Equip,
        Category::Store,
        Category::Dialog,
        Category::Tutorial,
        Category::MetaData,
    ];

    /// Identifier used both as the document field and the catalog file stem.
    pub fn id(self) -> &'static str {
        match self {
            Category::NonDialog => "Non_Dialog_Keys",
            Category::Useables => "Useables_Keys",
            Category::Move => "Move_Keys",
            Category::Quest => "Quest_Keys",
            Category::QuestItem => "QuestItem_Keys",
            Category::Equip => "Equip_Keys",
            Category::Store => "Store_Keys",
            Category::Dialog => "Dialog_Keys",
            Category::Tutorial => "Tutorial_Keys",
            Category::MetaData => "MetaData_Keys",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = L10nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| L10nError::UnknownCategory(s.to_string()))
    }
}

/// One keyed text record: `Key`, `English` and any number of language fields.
///
/// Kept as an ordered JSON object so that saving reproduces the field
/// order and any field this tool does not know about.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entry(Map<String, Value>);

impl Entry {
    pub fn new(key: &str, english: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(KEY_FIELD.to_string(), Value::String(key.to_string()));
        fields.insert(
            Language::SOURCE.field().to_string(),
            Value::String(english.to_string()),
        );
        Entry(fields)
    }

    pub fn with_text(mut self, lang: Language, text: &str) -> Self {
        self.set_text(lang, text.to_string());
        self
    }

    pub fn key(&self) -> &str {
        self.str_field(KEY_FIELD)
    }

    pub fn source(&self) -> &str {
        self.text(Language::SOURCE)
    }

    /// Text for `lang`; absent and non-string fields read as empty.
    pub fn text(&self, lang: Language) -> &str {
        self.str_field(lang.field())
    }

    pub fn set_text(&mut self, lang: Language, text: String) {
        self.0.insert(lang.field().to_string(), Value::String(text));
    }

    /// Only entries with source text are offered for translation.
    pub fn is_translatable(&self) -> bool {
        !self.source().is_empty()
    }

    pub(crate) fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn str_field(&self, name: &str) -> &str {
        self.0.get(name).and_then(|v| v.as_str()).unwrap_or("")
    }
}

impl From<Map<String, Value>> for Entry {
    fn from(fields: Map<String, Value>) -> Self {
        Entry(fields)
    }
}

/// The aggregated document the game consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocalizationDocument {
    /// Top-level fields in file order. Category fields hold a placeholder;
    /// their content lives in `categories`.
    pub(crate) root: Map<String, Value>,
    pub(crate) categories: BTreeMap<Category, Vec<Entry>>,
}

impl LocalizationDocument {
    /// Builds a document with every category present, in declaration order.
    pub fn from_categories(mut categories: BTreeMap<Category, Vec<Entry>>) -> Self {
        let mut root = Map::new();
        for category in Category::ALL {
            root.insert(category.id().to_string(), Value::Null);
            categories.entry(category).or_default();
        }
        LocalizationDocument { root, categories }
    }

    pub fn entries(&self, category: Category) -> &[Entry] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn entries_mut(&mut self, category: Category) -> &mut Vec<Entry> {
        self.categories.entry(category).or_default()
    }

    pub fn entry(&self, category: Category, key: &str) -> Option<&Entry> {
        self.entries(category).iter().find(|e| e.key() == key)
    }

    /// Full document as a JSON value, categories back in their original slots.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();

        for (name, value) in &self.root {
            let value = match name.parse::<Category>() {
                Ok(category) => Value::Array(
                    self.entries(category)
                        .iter()
                        .map(|e| Value::Object(e.fields().clone()))
                        .collect(),
                ),
                Err(_) => value.clone(),
            };
            out.insert(name.clone(), value);
        }

        Value::Object(out)
    }
}
