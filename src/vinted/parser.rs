//! HTML parser for Vinted catalog feed and item pages.

use scraper::Html;
use tracing::{debug, trace};

use crate::analysis::filters::is_lego_related;
use crate::analysis::{Condition, MarketListing};
use crate::catalog;
use crate::text::{parse_leading_u32, parse_price_value};
use crate::vinted::selectors::{item, search};

const BASE_URL: &str = "https://www.vinted.fr";

/// Parses a Vinted catalog feed page into marketplace listings.
///
/// The card's image alt text carries the title, brand, and condition
/// label ("Lego 42172, marque: Lego, état: Neuf avec étiquette").
/// Non-LEGO cards are dropped; when `search_set_number` is given, cards
/// whose alt text and link both miss the set number are dropped too.
pub fn parse_search(html: &str, search_set_number: Option<&str>) -> Vec<MarketListing> {
    let document = Html::parse_document(html);

    let mut listings = Vec::new();
    for card in document.select(&search::CARD) {
        let Some(image) = card.select(&search::IMAGE).next() else {
            continue;
        };
        let alt = image.value().attr("alt").unwrap_or_default();

        if !is_lego_related(alt) {
            trace!("Skipping non-LEGO card: {}", alt);
            continue;
        }

        let link = card
            .select(&search::LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default();
        let full_link = absolutize(link);

        if let Some(set_number) = search_set_number {
            let combined = format!("{} {}", alt, full_link).to_lowercase();
            if !combined.contains(&set_number.to_lowercase()) {
                trace!("Skipping card without set number {}: {}", set_number, alt);
                continue;
            }
        }

        let title = alt.split(',').next().unwrap_or_default().trim().to_string();
        let condition = condition_from_alt(alt);

        let price = card
            .select(&search::PRICE)
            .next()
            .and_then(|e| parse_price_value(&e.text().collect::<String>()));

        let favorites_count = card
            .select(&search::FAVORITES)
            .next()
            .map(|e| parse_leading_u32(&e.text().collect::<String>()))
            .unwrap_or(0);

        let set_number = search_set_number
            .map(String::from)
            .or_else(|| catalog::extract_set_number(alt, &full_link));

        listings.push(MarketListing {
            set_number,
            title,
            price,
            condition,
            favorites_count,
            link: full_link,
            image_url: image.value().attr("src").map(String::from),
        });
    }

    debug!("Parsed {} LEGO listings from catalog page", listings.len());
    listings
}

/// Parses a single Vinted item page. Returns None for non-LEGO items.
pub fn parse_item(html: &str, url: &str) -> Option<MarketListing> {
    let document = Html::parse_document(html);

    let title = document
        .select(&item::TITLE)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            document
                .select(&item::PAGE_TITLE)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
        })?;

    let description = document
        .select(&item::DESCRIPTION)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    if !is_lego_related(&title) && !is_lego_related(&description) {
        debug!("Item is not LEGO-related: {}", title);
        return None;
    }

    let price = document
        .select(&item::PRICE)
        .next()
        .and_then(|e| parse_price_value(&e.text().collect::<String>()));

    let condition = document
        .select(&item::CONDITION)
        .next()
        .map(|e| Condition::from_label(&e.text().collect::<String>()))
        .unwrap_or(Condition::Unknown);

    let set_number =
        catalog::extract_set_number(&format!("{} {}", title, description), url);

    let mut favorites_count = document
        .select(&item::FAVORITES)
        .next()
        .map(|e| parse_leading_u32(&e.text().collect::<String>()))
        .unwrap_or(0);
    if favorites_count == 0 {
        favorites_count = aria_label_favorites(&document).unwrap_or(0);
    }

    let image_url = document
        .select(&item::IMAGE)
        .next()
        .and_then(|e| e.value().attr("src").map(String::from));

    Some(MarketListing {
        set_number,
        title,
        price,
        condition,
        favorites_count,
        link: url.to_string(),
        image_url,
    })
}

fn absolutize(link: &str) -> String {
    if link.starts_with("http") {
        link.to_string()
    } else {
        format!("{}{}", BASE_URL, link)
    }
}

/// Condition label out of image alt text: the segment after "état:".
fn condition_from_alt(alt: &str) -> Condition {
    let lower = alt.to_lowercase();
    let Some(idx) = lower.find("état:") else {
        return Condition::Unknown;
    };
    let after = &lower[idx + "état:".len()..];
    let label = after.split(',').next().unwrap_or_default().trim();
    Condition::from_label(label)
}

/// Favorites from the favourite button's aria-label
/// ("Ajouté aux favoris par 12 utilisateurs").
fn aria_label_favorites(document: &Html) -> Option<u32> {
    let label = document
        .select(&item::FAVOURITE_BUTTON)
        .next()
        .and_then(|e| e.value().attr("aria-label"))?;

    let tokens: Vec<&str> = label.split_whitespace().collect();
    for i in 1..tokens.len() {
        if tokens[i].starts_with("utilisateur") {
            return tokens[i - 1].parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_HTML: &str = r#"
        <html><body>
        <div class="feed-grid__item">
            <img class="web_ui__Image__content" src="https://img.test/42172.jpg"
                 alt="Lego Technic 42172 McLaren P1, marque: Lego, état: Neuf avec étiquette">
            <a class="new-item-box__overlay--clickable" href="/items/1001-lego-42172"></a>
            <p data-testid="item-1001--price-text">120,00 €</p>
            <button data-testid="item-1001--favourite">
                <span class="web_ui__Text__caption">8</span>
            </button>
        </div>
        <div class="feed-grid__item">
            <img class="web_ui__Image__content" src="https://img.test/dress.jpg"
                 alt="Robe d'été, marque: Zara, état: Bon état">
            <a class="new-item-box__overlay--clickable" href="/items/1002-robe"></a>
            <p data-testid="item-1002--price-text">15,00 €</p>
        </div>
        <div class="feed-grid__item">
            <img class="web_ui__Image__content" src="https://img.test/10311.jpg"
                 alt="Lego Icons Orchidée 10311, état: Très bon état">
            <a class="new-item-box__overlay--clickable" href="/items/1003-lego-10311"></a>
            <p data-testid="item-1003--price-text">25,00 €</p>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_feed_page() {
        let listings = parse_search(FEED_HTML, None);
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.title, "Lego Technic 42172 McLaren P1");
        assert_eq!(first.set_number.as_deref(), Some("42172"));
        assert_eq!(first.price, Some(120.0));
        assert_eq!(first.condition, Condition::NewWithTag);
        assert_eq!(first.favorites_count, 8);
        assert_eq!(first.link, "https://www.vinted.fr/items/1001-lego-42172");
        assert_eq!(first.image_url.as_deref(), Some("https://img.test/42172.jpg"));
    }

    #[test]
    fn test_non_lego_cards_dropped() {
        let listings = parse_search(FEED_HTML, None);
        assert!(listings.iter().all(|l| l.title.to_lowercase().contains("lego")));
    }

    #[test]
    fn test_set_number_filter() {
        let listings = parse_search(FEED_HTML, Some("42172"));
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].set_number.as_deref(), Some("42172"));

        let other = parse_search(FEED_HTML, Some("10311"));
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].condition, Condition::VeryGood);
    }

    #[test]
    fn test_condition_from_alt() {
        assert_eq!(
            condition_from_alt("Lego 42172, état: Neuf avec étiquette"),
            Condition::NewWithTag
        );
        assert_eq!(
            condition_from_alt("Lego 42172, état: Neuf sans étiquette, taille: unique"),
            Condition::NewWithoutTag
        );
        assert_eq!(condition_from_alt("Lego 42172, état: Très bon état"), Condition::VeryGood);
        assert_eq!(condition_from_alt("Lego 42172, état: Bon état"), Condition::Good);
        assert_eq!(condition_from_alt("Lego 42172, état: Satisfaisant"), Condition::Satisfactory);
        assert_eq!(condition_from_alt("Lego 42172"), Condition::Unknown);
    }

    #[test]
    fn test_missing_price_kept_as_none() {
        let html = r#"
            <div class="feed-grid__item">
                <img class="web_ui__Image__content" alt="Lego 42172, état: Neuf avec étiquette">
                <a class="new-item-box__overlay--clickable" href="/items/1-lego-42172"></a>
            </div>
        "#;
        let listings = parse_search(html, None);
        assert_eq!(listings.len(), 1);
        assert!(listings[0].price.is_none());
    }

    #[test]
    fn test_parse_item_page() {
        let html = r#"
            <html><head><title>fallback</title></head><body>
            <h1 itemprop="name">Lego Technic 42172 McLaren P1</h1>
            <div itemprop="description">Set neuf, jamais ouvert. 3893 pièces.</div>
            <div class="item-price__current-price">119,99 €</div>
            <div data-testid="item-attributes-status">
                <span class="web_ui__Text__bold">Neuf avec étiquette</span>
            </div>
            <button data-testid="favourite-button" aria-label="Ajouté aux favoris par 12 utilisateurs">
            </button>
            </body></html>
        "#;
        let url = "https://www.vinted.fr/items/1001-lego-42172";
        let listing = parse_item(html, url).unwrap();

        assert_eq!(listing.title, "Lego Technic 42172 McLaren P1");
        assert_eq!(listing.set_number.as_deref(), Some("42172"));
        assert_eq!(listing.price, Some(119.99));
        assert_eq!(listing.condition, Condition::NewWithTag);
        assert_eq!(listing.favorites_count, 12);
        assert_eq!(listing.link, url);
    }

    #[test]
    fn test_parse_item_non_lego() {
        let html = r#"
            <h1 itemprop="name">Robe d'été Zara</h1>
            <div itemprop="description">Très bon état, taille M.</div>
        "#;
        assert!(parse_item(html, "https://www.vinted.fr/items/2").is_none());
    }

    #[test]
    fn test_parse_item_favorites_from_text() {
        let html = r#"
            <h1 itemprop="name">Lego 10311 Orchidée</h1>
            <button data-testid="favourite-button">
                <span class="web_ui__Text__text">5</span>
            </button>
        "#;
        let listing = parse_item(html, "https://www.vinted.fr/items/3").unwrap();
        assert_eq!(listing.favorites_count, 5);
    }

    #[test]
    fn test_parse_item_unknown_condition() {
        let html = r#"<h1 itemprop="name">Lego 10311</h1>"#;
        let listing = parse_item(html, "https://www.vinted.fr/items/4").unwrap();
        assert_eq!(listing.condition, Condition::Unknown);
        assert!(listing.price.is_none());
    }
}
