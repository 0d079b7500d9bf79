use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::L10nError;

/// Document field holding the stable entry identifier.
pub const KEY_FIELD: &str = "Key";

/// Languages present as fields of a document entry.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    English,
    French,
    German,
    Italian,
    Spanish,
    Japanese,
    Korean,
    ChineseSimplified,
    ChineseTraditional,
    Russian,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Spanish,
        Language::Japanese,
        Language::Korean,
        Language::ChineseSimplified,
        Language::ChineseTraditional,
        Language::Russian,
    ];

    /// The pivot language. Catalog sources come from it and it is never a target.
    pub const SOURCE: Language = Language::English;

    /// Field name used for this language inside a document entry.
    pub fn field(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Spanish => "Spanish",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::ChineseSimplified => "ChineseSimplified",
            Language::ChineseTraditional => "ChineseTraditional",
            Language::Russian => "Russian",
        }
    }

    /// Code used for catalog directories.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Spanish => "es",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::ChineseSimplified => "zh-cn",
            Language::ChineseTraditional => "zh-tw",
            Language::Russian => "ru",
        }
    }

    pub fn is_source(self) -> bool {
        self == Language::SOURCE
    }

    pub fn targets() -> impl Iterator<Item = Language> {
        Language::ALL.into_iter().filter(|l| !l.is_source())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

impl FromStr for Language {
    type Err = L10nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::English),
            "fr" => Ok(Language::French),
            "de" => Ok(Language::German),
            "it" => Ok(Language::Italian),
            "es" => Ok(Language::Spanish),
            "ja" => Ok(Language::Japanese),
            "ko" => Ok(Language::Korean),
            "zh-cn" => Ok(Language::ChineseSimplified),
            "zh-tw" => Ok(Language::ChineseTraditional),
            "ru" => Ok(Language::Russian),
            _ => Err(L10nError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Resolves operator-supplied codes into target languages.
///
/// Unknown codes and the source language are dropped with a warning.
/// Duplicates are removed. An empty result means every target language.
pub fn resolve_targets<S: AsRef<str>>(codes: &[S]) -> Vec<Language> {
    let mut out: Vec<Language> = Vec::new();

    for code in codes {
        let code = code.as_ref();
        match code.parse::<Language>() {
            Ok(lang) if lang.is_source() => {
                tracing::warn!(code, "source language cannot be a translation target, skipping");
            }
            Ok(lang) => {
                if !out.contains(&lang) {
                    out.push(lang);
                }
            }
            Err(e) => tracing::warn!("{e}, skipping"),
        }
    }

    if out.is_empty() {
        out = Language::targets().collect();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_str() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn unknown_code_is_not_found() {
        let err = "xx".parse::<Language>().unwrap_err();
        assert!(matches!(err, L10nError::UnknownLanguage(ref c) if c == "xx"));
    }

    #[test]
    fn resolve_filters_unknown_and_source() {
        let langs = resolve_targets(&["fr", "xx", "en", "FR", "zh-tw"]);
        assert_eq!(langs, vec![Language::French, Language::ChineseTraditional]);
    }

    #[test]
    fn resolve_falls_back_to_every_target() {
        let langs = resolve_targets(&["en", "klingon"]);
        assert_eq!(langs.len(), Language::ALL.len() - 1);
        assert!(!langs.contains(&Language::English));

        let none: [&str; 0] = [];
        assert_eq!(resolve_targets(&none), langs);
    }
}
