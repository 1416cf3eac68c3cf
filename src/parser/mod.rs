//! HTML extraction for the three kinds of pages the site serves.
//!
//! Every function here is synchronous and owns its parsed document, so no
//! `scraper::Html` ever lives across an `.await`.

pub mod contact;
pub mod detail;
pub mod listing;

pub use contact::parse_phone_numbers;
pub use detail::parse_detail;
pub use listing::{parse_listing, ListingParseError};

use scraper::{ElementRef, Selector};
use url::Url;

/// Compile a selector literal.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

/// Element text with runs of whitespace collapsed to single spaces.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Non-empty collapsed text, or `None`.
pub(crate) fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    Some(element_text(element)).filter(|t| !t.is_empty())
}

/// Resolve `href` against `base`; unresolvable links are returned unchanged.
pub(crate) fn absolutize(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  051\n 605-04-44\t "), "051 605-04-44");
        assert_eq!(collapse_whitespace("\n\t"), "");
    }

    #[test]
    fn test_absolutize() {
        let base = Url::parse("https://avtotemir.az").unwrap();
        assert_eq!(absolutize(&base, "/usta/12"), "https://avtotemir.az/usta/12");
        assert_eq!(
            absolutize(&base, "https://cdn.avtotemir.az/a.jpg"),
            "https://cdn.avtotemir.az/a.jpg"
        );
    }
}
