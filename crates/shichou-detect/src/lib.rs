pub mod error;
pub mod extract;
pub mod location;
pub mod page;
pub mod selectors;

pub use error::DetectError;
pub use extract::PageFields;
pub use page::HtmlPage;
pub use selectors::{SelectorDatabase, SelectorDefs};

/// A matched DOM element, detached from the document it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Concatenated text content of the element and its descendants.
    pub text: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
}

impl Element {
    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed text content, or `None` when it is blank.
    pub fn trimmed_text(&self) -> Option<&str> {
        let text = self.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Playback position of the page's active media element, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    pub duration: f64,
}

impl PlaybackState {
    /// Completion ratio, or `None` when the duration is unknown or non-finite.
    pub fn progress(&self) -> Option<f64> {
        if !self.duration.is_finite() || self.duration <= 0.0 || !self.current_time.is_finite() {
            return None;
        }
        Some(self.current_time / self.duration)
    }
}

/// Read-only view of the page the pipeline extracts from.
///
/// Every DOM and location access in the pipeline goes through this trait,
/// so extraction can run against a live page binding or a saved document.
pub trait PageSource {
    /// First element matching a CSS selector.
    fn query_selector(&self, selector: &str) -> Option<Element>;

    /// All elements matching a CSS selector, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Element>;

    /// Full URL of the page, including query and fragment.
    fn current_url(&self) -> String;

    /// The document title (`<title>`), trimmed.
    fn document_title(&self) -> String;

    /// State of the active media element, if the page has one.
    fn playback(&self) -> Option<PlaybackState> {
        None
    }
}
