use phf::phf_set;

/// Leading words that mark a colon as part of the natural title rather than
/// a show/episode separator ("Narcos: La historia ..."). Lowercase.
pub static TITLE_ARTICLES: phf::Set<&'static str> = phf_set! {
    "la",
    "el",
    "las",
    "los",
    "una",
    "un",
};

/// Substrings a runtime label must contain to be accepted as a duration
/// ("1 h 52 min", "45 min", "3 temporadas").
pub const DURATION_MARKERS: &[&str] = &["min", "h", "temporada"];

/// Characters separating genres inside a single metadata element.
pub const GENRE_SEPARATORS: &[char] = &[',', '•', '·'];

/// Whether `word` is one of the title-guard articles (case-insensitive).
pub fn is_title_article(word: &str) -> bool {
    TITLE_ARTICLES.contains(word.to_lowercase().as_str())
}
