use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::parser::{non_empty_text, selector};

static TEL_LINKS: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[href^="tel:"]"#));

/// Phone numbers from the contact fragment, in page order.
pub fn parse_phone_numbers(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    fragment.select(&TEL_LINKS).filter_map(non_empty_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phone_numbers() {
        let html = r#"
<div class="phones">
  <a href="tel:+994516050444"><i class="fa fa-phone"></i> 051 605-04-44</a>
  <a href="tel:+994706180444">
      070   618-04-44
  </a>
  <a href="https://wa.me/994516050444">WhatsApp</a>
</div>"#;

        assert_eq!(
            parse_phone_numbers(html),
            vec!["051 605-04-44", "070 618-04-44"]
        );
    }

    #[test]
    fn test_empty_tel_links_are_skipped() {
        let html = r#"<a href="tel:"><i class="fa fa-phone"></i></a>"#;
        assert!(parse_phone_numbers(html).is_empty());
    }

    #[test]
    fn test_no_phones() {
        assert!(parse_phone_numbers("").is_empty());
        assert!(parse_phone_numbers("<p>Nömrə gizlidir</p>").is_empty());
    }
}
