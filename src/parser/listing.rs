use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::domain::ListingRef;
use crate::parser::{absolutize, non_empty_text, selector};

static ARTICLE: LazyLock<Selector> = LazyLock::new(|| selector("article"));
static PROFILE_LINK: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[href*="/usta/"]"#));
static INFO_LINK: LazyLock<Selector> = LazyLock::new(|| selector("[data-link]"));
static MAP_MARKER: LazyLock<Selector> = LazyLock::new(|| selector(r#"i[class*="fa-map-marker"]"#));

pub(crate) static INFO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/usta/(\d+)/info").expect("valid regex"));

/// The listing page could not be read as a page of listings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingParseError {
    #[error("listing payload has no `html` field")]
    MissingHtml,

    #[error("{0} listing cards found but none links to a profile")]
    NoProfileLinks(usize),
}

/// Extract listing references from a listing page body.
///
/// The body is normally the JSON envelope `{"html": "..."}`; anything that
/// is not JSON is read as HTML directly. `Ok(vec![])` means the page has no
/// listings, which is how the end of the directory looks.
pub fn parse_listing(body: &str, base: &Url) -> Result<Vec<ListingRef>, ListingParseError> {
    let markup = listing_markup(body)?;
    let document = Html::parse_fragment(&markup);

    let mut cards = 0;
    let mut listings = Vec::new();

    for article in document.select(&ARTICLE) {
        cards += 1;
        if let Some(listing) = listing_from_card(article, base) {
            listings.push(listing);
        }
    }

    if cards > 0 && listings.is_empty() {
        return Err(ListingParseError::NoProfileLinks(cards));
    }

    Ok(listings)
}

fn listing_markup(body: &str) -> Result<String, ListingParseError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("html") {
            Some(Value::String(html)) => Ok(html.clone()),
            Some(Value::Null) => Ok(String::new()),
            _ => Err(ListingParseError::MissingHtml),
        },
        Ok(Value::String(html)) => Ok(html),
        Ok(_) => Err(ListingParseError::MissingHtml),
        Err(_) => Ok(body.to_string()),
    }
}

fn listing_from_card(article: ElementRef<'_>, base: &Url) -> Option<ListingRef> {
    let href = article
        .select(&PROFILE_LINK)
        .find_map(|a| a.value().attr("href"))?;

    let id = article
        .select(&INFO_LINK)
        .filter_map(|el| el.value().attr("data-link"))
        .find_map(|link| INFO_ID.captures(link))
        .map(|caps| caps[1].to_string());

    let location = article
        .select(&MAP_MARKER)
        .next()
        .and_then(|icon| icon.parent())
        .and_then(ElementRef::wrap)
        .and_then(non_empty_text)
        .unwrap_or_default();

    Some(ListingRef {
        id,
        url: absolutize(base, href),
        location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://avtotemir.az").unwrap()
    }

    const CARDS: &str = r#"
<article>
  <a href="/usta/elvin-mammadov"><img src="/img/1.jpg"></a>
  <a class="position open-modal-dialog" href="javascript:void(0)" data-link="/usta/101/info">Mühərrik ustası</a>
  <ul><li><i class="fas fa-map-marker-alt"></i> Bakı, Nəsimi r.</li></ul>
</article>
<article>
  <a href="https://avtotemir.az/usta/rashad">Rəşad</a>
  <a class="position open-modal-dialog" data-link="/usta/102/info">Elektrik</a>
</article>
<article>
  <a href="/usta/no-id">Anonim</a>
</article>"#;

    fn envelope(html: &str) -> String {
        serde_json::json!({ "html": html }).to_string()
    }

    #[test]
    fn test_parse_json_envelope() {
        let listings = parse_listing(&envelope(CARDS), &base()).unwrap();

        assert_eq!(listings.len(), 3);
        assert_eq!(
            listings[0],
            ListingRef {
                id: Some("101".into()),
                url: "https://avtotemir.az/usta/elvin-mammadov".into(),
                location: "Bakı, Nəsimi r.".into(),
            }
        );
        assert_eq!(listings[1].id, Some("102".into()));
        assert_eq!(listings[1].url, "https://avtotemir.az/usta/rashad");
        assert_eq!(listings[1].location, "");
        assert_eq!(listings[2].id, None);
    }

    #[test]
    fn test_raw_html_body_is_accepted() {
        let listings = parse_listing(CARDS, &base()).unwrap();
        assert_eq!(listings.len(), 3);
    }

    #[test]
    fn test_empty_envelope_is_an_empty_page() {
        assert_eq!(parse_listing(&envelope(""), &base()), Ok(vec![]));
        assert_eq!(parse_listing(r#"{"html": null}"#, &base()), Ok(vec![]));
        assert_eq!(parse_listing("", &base()), Ok(vec![]));
    }

    #[test]
    fn test_markup_without_articles_is_an_empty_page() {
        let body = envelope("<div class=\"no-results\">Heç nə tapılmadı</div>");
        assert_eq!(parse_listing(&body, &base()), Ok(vec![]));
    }

    #[test]
    fn test_envelope_without_html_field_is_an_error() {
        assert_eq!(
            parse_listing(r#"{"status": "ok"}"#, &base()),
            Err(ListingParseError::MissingHtml)
        );
    }

    #[test]
    fn test_cards_without_profile_links_are_an_error() {
        let body = envelope("<article><p>reklam</p></article><article></article>");
        assert_eq!(
            parse_listing(&body, &base()),
            Err(ListingParseError::NoProfileLinks(2))
        );
    }

    #[test]
    fn test_page_order_is_preserved() {
        let listings = parse_listing(&envelope(CARDS), &base()).unwrap();
        let urls: Vec<_> = listings.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://avtotemir.az/usta/elvin-mammadov",
                "https://avtotemir.az/usta/rashad",
                "https://avtotemir.az/usta/no-id",
            ]
        );
    }
}
