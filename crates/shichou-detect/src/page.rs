use scraper::{ElementRef, Html, Selector};

use crate::{Element, PageSource, PlaybackState};

/// A [`PageSource`] backed by a parsed HTML document.
///
/// Used for saved pages and test fixtures. Playback state is not part of the
/// markup, so it is supplied separately with [`HtmlPage::with_playback`].
#[derive(Debug)]
pub struct HtmlPage {
    document: Html,
    url: String,
    playback: Option<PlaybackState>,
}

impl HtmlPage {
    /// Parse a full HTML document served at `url`.
    pub fn parse(html: &str, url: impl Into<String>) -> Self {
        Self {
            document: Html::parse_document(html),
            url: url.into(),
            playback: None,
        }
    }

    /// Attach the state of the page's media element.
    pub fn with_playback(mut self, playback: PlaybackState) -> Self {
        self.playback = Some(playback);
        self
    }

    /// Point the page at a new location (in-page navigation).
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }
}

impl PageSource for HtmlPage {
    fn query_selector(&self, selector: &str) -> Option<Element> {
        let selector = compile(selector)?;
        self.document.select(&selector).next().map(to_element)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        match compile(selector) {
            Some(selector) => self.document.select(&selector).map(to_element).collect(),
            None => Vec::new(),
        }
    }

    fn current_url(&self) -> String {
        self.url.clone()
    }

    fn document_title(&self) -> String {
        self.query_selector("title")
            .map(|el| el.text.trim().to_string())
            .unwrap_or_default()
    }

    fn playback(&self) -> Option<PlaybackState> {
        self.playback
    }
}

/// Compile a selector; an invalid one matches nothing.
fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!(selector, error = ?e, "Invalid CSS selector");
            None
        }
    }
}

fn to_element(el: ElementRef<'_>) -> Element {
    Element {
        text: el.text().collect(),
        attributes: el
            .value()
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html>
          <head><title> Dark | Netflix </title></head>
          <body>
            <h1 class="title-title">Dark <span>T1:E1</span></h1>
            <div class="genre">Drama</div>
            <div class="genre">Thriller</div>
            <img class="boxart-image" src="https://img.example/dark.jpg">
          </body>
        </html>
    "#;

    #[test]
    fn test_query_selector_text_includes_descendants() {
        let page = HtmlPage::parse(HTML, "https://www.netflix.com/watch/1");
        let el = page.query_selector(".title-title").unwrap();
        assert_eq!(el.text, "Dark T1:E1");
    }

    #[test]
    fn test_query_selector_all() {
        let page = HtmlPage::parse(HTML, "https://www.netflix.com/watch/1");
        let genres: Vec<String> = page
            .query_selector_all(".genre")
            .into_iter()
            .map(|el| el.text)
            .collect();
        assert_eq!(genres, vec!["Drama", "Thriller"]);
    }

    #[test]
    fn test_attributes() {
        let page = HtmlPage::parse(HTML, "https://www.netflix.com/watch/1");
        let img = page.query_selector("img.boxart-image").unwrap();
        assert_eq!(img.attr("src"), Some("https://img.example/dark.jpg"));
    }

    #[test]
    fn test_document_title_trimmed() {
        let page = HtmlPage::parse(HTML, "https://www.netflix.com/watch/1");
        assert_eq!(page.document_title(), "Dark | Netflix");
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let page = HtmlPage::parse(HTML, "https://www.netflix.com/watch/1");
        assert!(page.query_selector("[[[").is_none());
        assert!(page.query_selector_all("[[[").is_empty());
    }

    #[test]
    fn test_playback_and_navigation() {
        let mut page = HtmlPage::parse(HTML, "https://www.netflix.com/watch/1").with_playback(
            PlaybackState {
                current_time: 1.0,
                duration: 2.0,
            },
        );
        assert_eq!(page.playback().unwrap().progress(), Some(0.5));
        page.set_url("https://www.netflix.com/watch/2");
        assert_eq!(page.current_url(), "https://www.netflix.com/watch/2");
    }
}
