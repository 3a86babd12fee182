//! Field extractors.
//!
//! Each extractor walks its selector list in priority order and stops at the
//! first source that yields a usable value. Values from different selectors
//! are never merged.

use serde_json::Value;

use crate::selectors::SelectorDatabase;
use crate::PageSource;

/// Secondary metadata fields gathered in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
    pub year: Option<u32>,
    pub genres: Vec<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Run every secondary field extractor.
pub fn extract_fields(page: &dyn PageSource, db: &SelectorDatabase) -> PageFields {
    PageFields {
        year: extract_year(page, db),
        genres: extract_genres(page, db),
        duration: extract_duration(page, db),
        description: extract_description(page, db),
        image_url: extract_image_url(page, db),
    }
}

/// Extract the raw (unsplit) title.
///
/// Sources: title selectors → document title → JSON-LD `name`.
pub fn extract_title(page: &dyn PageSource, db: &SelectorDatabase) -> Option<String> {
    if let Some(title) = first_text(page, &db.defs().title.selectors) {
        tracing::debug!(source = "selector", title = %title, "Title found");
        return Some(title);
    }

    let document_title = page.document_title();
    if let Some(title) = db.title_from_document(&document_title) {
        tracing::debug!(source = "document_title", title = %title, "Title found");
        return Some(title);
    }

    let title = title_from_structured_data(page, db)?;
    tracing::debug!(source = "structured_data", title = %title, "Title found");
    Some(title)
}

/// Read `name` (or `@graph[0].name`) from the page's JSON-LD block.
fn title_from_structured_data(page: &dyn PageSource, db: &SelectorDatabase) -> Option<String> {
    let selector = db.defs().title.structured_data.as_deref()?;
    let block = page.query_selector(selector)?;
    let data: Value = match serde_json::from_str(block.trimmed_text()?) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(error = %e, "Unparseable structured data block");
            return None;
        }
    };

    let name = data
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| data.pointer("/@graph/0/name").and_then(Value::as_str))?;
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// First four-digit year found under the year selectors.
pub fn extract_year(page: &dyn PageSource, db: &SelectorDatabase) -> Option<u32> {
    db.defs().year.selectors.iter().find_map(|selector| {
        let el = page.query_selector(selector)?;
        shichou_parse::parse_year(el.trimmed_text()?)
    })
}

/// Genres from the first selector that yields any.
pub fn extract_genres(page: &dyn PageSource, db: &SelectorDatabase) -> Vec<String> {
    let mut genres = Vec::new();
    for selector in &db.defs().genres.selectors {
        for el in page.query_selector_all(selector) {
            if let Some(text) = el.trimmed_text() {
                shichou_parse::push_genres(text, &mut genres);
            }
        }
        if !genres.is_empty() {
            break;
        }
    }
    genres
}

/// First label under the duration selectors that reads like a runtime.
pub fn extract_duration(page: &dyn PageSource, db: &SelectorDatabase) -> Option<String> {
    db.defs().duration.selectors.iter().find_map(|selector| {
        let el = page.query_selector(selector)?;
        let text = el.trimmed_text()?;
        shichou_parse::is_duration_text(text).then(|| text.to_string())
    })
}

pub fn extract_description(page: &dyn PageSource, db: &SelectorDatabase) -> Option<String> {
    first_text(page, &db.defs().description.selectors)
}

/// `src` of the first matching image.
pub fn extract_image_url(page: &dyn PageSource, db: &SelectorDatabase) -> Option<String> {
    db.defs().image.selectors.iter().find_map(|selector| {
        let el = page.query_selector(selector)?;
        el.attr("src")
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .map(str::to_string)
    })
}

/// Text of the player's displayed title element.
pub fn video_title_text(page: &dyn PageSource, db: &SelectorDatabase) -> Option<String> {
    let selector = db.defs().series.video_title.as_deref()?;
    page.query_selector(selector)
        .and_then(|el| el.trimmed_text().map(str::to_string))
}

/// Whether any series indicator selector matches.
pub fn has_series_indicator(page: &dyn PageSource, db: &SelectorDatabase) -> bool {
    db.defs()
        .series
        .indicators
        .iter()
        .any(|selector| page.query_selector(selector).is_some())
}

fn first_text(page: &dyn PageSource, selectors: &[String]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        page.query_selector(selector)
            .and_then(|el| el.trimmed_text().map(str::to_string))
    })
}
