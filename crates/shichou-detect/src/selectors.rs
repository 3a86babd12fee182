use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DetectError;

/// Embedded selector database.
const EMBEDDED_DB: &str = include_str!("../data/selectors.toml");

/// An ordered selector list for one metadata field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDef {
    /// CSS selectors, highest priority first.
    #[serde(default)]
    pub selectors: Vec<String>,
}

/// Title sources: selectors, then the document title, then structured data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleDef {
    #[serde(default)]
    pub selectors: Vec<String>,
    /// Regex with capture group 1 extracting the title from the document title.
    #[serde(default)]
    pub document_pattern: Option<String>,
    /// Selector of the JSON-LD block carrying a `name` field.
    #[serde(default)]
    pub structured_data: Option<String>,
}

/// Signals that the page shows an episode of a series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesDef {
    /// Element holding the player's displayed title.
    #[serde(default)]
    pub video_title: Option<String>,
    /// Any match marks the page as a series.
    #[serde(default)]
    pub indicators: Vec<String>,
    /// Case-insensitive patterns matched against the document title.
    #[serde(default)]
    pub title_keywords: Vec<String>,
}

/// Raw selector definitions, as written in TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorDefs {
    #[serde(default)]
    pub title: TitleDef,
    #[serde(default)]
    pub year: FieldDef,
    #[serde(default)]
    pub genres: FieldDef,
    #[serde(default)]
    pub duration: FieldDef,
    #[serde(default)]
    pub description: FieldDef,
    #[serde(default)]
    pub image: FieldDef,
    #[serde(default)]
    pub series: SeriesDef,
}

/// Selector definitions with their regexes compiled.
#[derive(Debug, Clone)]
pub struct SelectorDatabase {
    defs: SelectorDefs,
    compiled_document: Option<Regex>,
    compiled_keywords: Option<Regex>,
}

impl SelectorDatabase {
    /// Load the embedded selector database.
    pub fn embedded() -> Self {
        Self::from_toml(EMBEDDED_DB).expect("embedded selectors.toml should be valid")
    }

    /// Load a selector database from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let defs: SelectorDefs = toml::from_str(toml_str)?;
        Ok(Self::from_defs(defs))
    }

    /// Load a selector database from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DetectError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    fn from_defs(defs: SelectorDefs) -> Self {
        let compiled_document = defs
            .title
            .document_pattern
            .as_deref()
            .and_then(compile_pattern);
        let compiled_keywords = if defs.series.title_keywords.is_empty() {
            None
        } else {
            compile_pattern(&format!(
                "(?i)(?:{})",
                defs.series.title_keywords.join("|")
            ))
        };
        Self {
            defs,
            compiled_document,
            compiled_keywords,
        }
    }

    /// Merge a user database into this one.
    /// Non-empty lists and present patterns replace the embedded ones.
    pub fn merge_user(&mut self, user_db: &SelectorDatabase) {
        let user = &user_db.defs;
        let mut defs = self.defs.clone();

        replace_list(&mut defs.title.selectors, &user.title.selectors);
        if user.title.document_pattern.is_some() {
            defs.title.document_pattern = user.title.document_pattern.clone();
        }
        if user.title.structured_data.is_some() {
            defs.title.structured_data = user.title.structured_data.clone();
        }
        replace_list(&mut defs.year.selectors, &user.year.selectors);
        replace_list(&mut defs.genres.selectors, &user.genres.selectors);
        replace_list(&mut defs.duration.selectors, &user.duration.selectors);
        replace_list(&mut defs.description.selectors, &user.description.selectors);
        replace_list(&mut defs.image.selectors, &user.image.selectors);
        if user.series.video_title.is_some() {
            defs.series.video_title = user.series.video_title.clone();
        }
        replace_list(&mut defs.series.indicators, &user.series.indicators);
        replace_list(&mut defs.series.title_keywords, &user.series.title_keywords);

        *self = Self::from_defs(defs);
    }

    /// The raw definitions.
    pub fn defs(&self) -> &SelectorDefs {
        &self.defs
    }

    /// Extract the title from a document title using `title.document_pattern`.
    pub fn title_from_document(&self, document_title: &str) -> Option<String> {
        let re = self.compiled_document.as_ref()?;
        let caps = re.captures(document_title)?;
        let extracted = caps.get(1)?.as_str().trim().to_string();
        if extracted.is_empty() {
            None
        } else {
            Some(extracted)
        }
    }

    /// Whether a document title contains any series keyword.
    pub fn has_series_keyword(&self, document_title: &str) -> bool {
        self.compiled_keywords
            .as_ref()
            .is_some_and(|re| re.is_match(document_title))
    }
}

impl Default for SelectorDatabase {
    fn default() -> Self {
        Self::embedded()
    }
}

fn compile_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "Ignoring invalid selector database pattern");
            None
        }
    }
}

fn replace_list(target: &mut Vec<String>, user: &[String]) {
    if !user.is_empty() {
        *target = user.to_vec();
    }
}
