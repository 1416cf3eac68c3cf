use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{ListingRef, MalformedRecord, MasterRecord, MasterRecordBuilder, Service};
use crate::parser::listing::INFO_ID;
use crate::parser::{absolutize, element_text, non_empty_text, selector};

static NAME: LazyLock<Selector> = LazyLock::new(|| selector(".master_info .body h2"));
static WRENCH: LazyLock<Selector> =
    LazyLock::new(|| selector(".master_info .body ul li span i.fa-wrench"));
static CAR: LazyLock<Selector> = LazyLock::new(|| selector(".master_info .body ul li span i.fa-car"));
static MARKER: LazyLock<Selector> =
    LazyLock::new(|| selector(".master_info .body ul li span i.fa-map-marker-alt"));
static RESULT: LazyLock<Selector> = LazyLock::new(|| selector("#result"));
static DETAIL_SPANS: LazyLock<Selector> = LazyLock::new(|| selector(".master_details .main span"));
static ADDRESS: LazyLock<Selector> =
    LazyLock::new(|| selector(".master_address .marker-link span"));
static NOTE_PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| selector(".master_service .text p"));
static POSITION_ROWS: LazyLock<Selector> = LazyLock::new(|| selector("#positions tbody tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static GALLERY_IMAGES: LazyLock<Selector> = LazyLock::new(|| selector("#master_gallery img"));
static DATA_LINK: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-link*="/usta/"]"#));

/// `4.6 (9 səs)`
static RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)\s*\((\d+)").expect("valid regex"));
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d\s\u{a0}]*").expect("valid regex"));

const EXPERIENCE_LABEL: &str = "Təcrübə:";
const VIEWS_LABEL: &str = "Baxılıb:";
const ADDED_LABEL: &str = "Əlavə olundu:";

/// Parse a master's profile page.
///
/// Each field is extracted on its own; a missing section leaves that field
/// empty. The id comes from the listing card, or from the page's own info
/// link when the card had none. Phone numbers are resolved separately.
pub fn parse_detail(
    html: &str,
    listing: &ListingRef,
    base: &Url,
) -> Result<MasterRecord, MalformedRecord> {
    let doc = Html::parse_document(html);
    let facts = DetailFacts::extract(&doc);
    let rating = extract_rating(&doc);

    MasterRecordBuilder::new(&listing.url)
        .id(extract_id(&doc))
        .id(listing.id.clone())
        .name(first_text(&doc, &NAME))
        .position(icon_label(&doc, &WRENCH))
        .car_brands(icon_label(&doc, &CAR))
        .location(Some(listing.location.clone()))
        .location(icon_label(&doc, &MARKER))
        .rating(rating.map(|(rating, _)| rating))
        .votes(rating.map(|(_, votes)| votes))
        .experience_years(facts.experience.as_deref().and_then(leading_number))
        .views(facts.views.as_deref().and_then(leading_number))
        .date_added(facts.added)
        .address(first_text(&doc, &ADDRESS))
        .description(extract_description(&doc))
        .services(extract_services(&doc))
        .images(extract_images(&doc, base))
        .build()
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector).next().and_then(non_empty_text)
}

/// Text of the element wrapping an icon, e.g. `<span><i class="fa-car"></i> BMW</span>`.
fn icon_label(doc: &Html, icon: &Selector) -> Option<String> {
    doc.select(icon)
        .next()
        .and_then(|i| i.parent())
        .and_then(ElementRef::wrap)
        .and_then(non_empty_text)
}

fn extract_id(doc: &Html) -> Option<String> {
    doc.select(&DATA_LINK)
        .filter_map(|el| el.value().attr("data-link"))
        .find_map(|link| INFO_ID.captures(link))
        .map(|caps| caps[1].to_string())
}

fn extract_rating(doc: &Html) -> Option<(f32, u32)> {
    let text = first_text(doc, &RESULT)?;
    let caps = RATING.captures(&text)?;
    let rating = caps[1].replace(',', ".").parse().ok()?;
    let votes = caps[2].parse().ok()?;
    Some((rating, votes))
}

/// First integer in `text`, allowing thousands separated by spaces.
fn leading_number(text: &str) -> Option<u32> {
    let digits: String = LEADING_NUMBER
        .find(text)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Labelled values from the `.master_details` strip.
#[derive(Debug, Default, PartialEq)]
struct DetailFacts {
    experience: Option<String>,
    views: Option<String>,
    added: Option<String>,
}

impl DetailFacts {
    fn extract(doc: &Html) -> Self {
        let mut facts = Self::default();

        for span in doc.select(&DETAIL_SPANS) {
            let text = element_text(span);
            if let Some(value) = after_label(&text, EXPERIENCE_LABEL) {
                facts.experience = Some(value);
            } else if let Some(value) = after_label(&text, VIEWS_LABEL) {
                facts.views = Some(value);
            } else if let Some(value) = after_label(&text, ADDED_LABEL) {
                facts.added = Some(value);
            }
        }

        facts
    }
}

fn after_label(text: &str, label: &str) -> Option<String> {
    text.split_once(label)
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn extract_description(doc: &Html) -> Option<String> {
    let paragraphs: Vec<String> = doc.select(&NOTE_PARAGRAPHS).filter_map(non_empty_text).collect();
    Some(paragraphs.join(" ")).filter(|d| !d.is_empty())
}

fn extract_services(doc: &Html) -> Vec<Service> {
    doc.select(&POSITION_ROWS)
        .filter_map(|row| {
            let mut cells = row.select(&CELL).map(element_text);
            let position = cells.next()?;
            let car = cells.next()?;
            Some(Service { position, car })
        })
        .collect()
}

fn extract_images(doc: &Html, base: &Url) -> Vec<String> {
    doc.select(&GALLERY_IMAGES)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.trim().is_empty())
        .map(|src| absolutize(base, src.trim()))
        .collect()
}
