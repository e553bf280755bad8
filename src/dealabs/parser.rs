//! HTML parser for Dealabs listing and thread pages.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use scraper::{ElementRef, Html};
use tracing::{debug, trace, warn};

use crate::analysis::SourceDeal;
use crate::catalog;
use crate::dealabs::selectors::{search, shared, thread};
use crate::text::{parse_leading_u32, parse_price_value, parse_signed_i32};

const BASE_URL: &str = "https://www.dealabs.com";

/// Parses a Dealabs listing page into LEGO deals.
///
/// Cards without "lego" in the title or without a price are dropped.
/// Posting dates come from the JSON-LD block when the thread id matches,
/// otherwise from the relative time chip, approximated against `now`.
pub fn parse_search(html: &str, now: DateTime<Utc>) -> Vec<SourceDeal> {
    let document = Html::parse_document(html);
    let dates = thread_dates(&document);

    let mut deals = Vec::new();
    for card in document.select(&search::CARD) {
        let Some(title_link) = card.select(&search::TITLE_LINK).next() else {
            trace!("Skipping card without title link");
            continue;
        };
        let title = title_link.text().collect::<String>().trim().to_string();
        let Some(link) = title_link.value().attr("href") else {
            continue;
        };

        if !title.to_lowercase().contains("lego") {
            continue;
        }

        let price_text = card
            .select(&search::PRICE)
            .next()
            .map(|e| e.text().collect::<String>())
            .unwrap_or_default();
        let Some(mut price) = parse_price_value(&price_text).filter(|p| *p > 0.0) else {
            trace!("Skipping deal without price: {}", title);
            continue;
        };

        let temperature = card
            .select(&search::TEMPERATURE)
            .next()
            .map(|e| parse_signed_i32(&e.text().collect::<String>()))
            .unwrap_or(0);

        let posted_date = thread_id(link)
            .and_then(|id| dates.get(&id).copied())
            .or_else(|| {
                card.select(&search::POSTED_TIME)
                    .next()
                    .and_then(|e| parse_relative_time(&e.text().collect::<String>(), now))
            });

        let (free_shipping, shipping_cost) = shipping_details(card.select(&shared::TRUCK_ICON).next());
        if let Some(cost) = shipping_cost {
            // Dealabs shows shipping separately; fold it into the deal price
            price += cost;
        }

        let comments_count = card
            .select(&search::COMMENTS)
            .next()
            .map(|e| parse_leading_u32(&e.text().collect::<String>()))
            .unwrap_or(0);

        let image_url = card.select(&search::IMAGE).next().and_then(|img| {
            match img.value().attr("srcset") {
                Some(srcset) => best_srcset_url(srcset),
                None => img.value().attr("src").map(String::from),
            }
        });

        deals.push(SourceDeal {
            set_number: catalog::extract_set_number(&title, link),
            title,
            price: Some(price),
            temperature,
            comments_count,
            posted_date,
            free_shipping,
            link: absolutize(link),
            image_url,
        });
    }

    debug!("Parsed {} LEGO deals from listing page", deals.len());
    deals
}

/// Parses a single Dealabs thread page. Returns None for non-LEGO threads.
pub fn parse_thread(html: &str, url: &str) -> Option<SourceDeal> {
    let document = Html::parse_document(html);

    let title = document
        .select(&thread::TITLE)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            document
                .select(&thread::PAGE_TITLE)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
        })?;

    if !title.to_lowercase().contains("lego") {
        debug!("Thread is not a LEGO deal: {}", title);
        return None;
    }

    let mut price = document
        .select(&thread::PRICE)
        .next()
        .and_then(|e| parse_price_value(&e.text().collect::<String>()));

    let temperature = document
        .select(&thread::TEMPERATURE)
        .next()
        .map(|e| parse_signed_i32(&e.text().collect::<String>()))
        .unwrap_or(0);

    let posted_date = document
        .select(&thread::POSTED_TIME)
        .next()
        .and_then(|e| e.value().attr("title"))
        .and_then(parse_french_timestamp);

    let (free_shipping, shipping_cost) =
        shipping_details(document.select(&shared::TRUCK_ICON).next());
    if let Some(cost) = shipping_cost {
        price = Some(price.unwrap_or(0.0) + cost);
    }

    let mut comments_count = document
        .select(&thread::COMMENTS)
        .next()
        .map(|e| parse_leading_u32(&e.text().collect::<String>()))
        .unwrap_or(0);
    if comments_count == 0 {
        comments_count = json_ld_comment_count(&document).unwrap_or(0);
    }

    let image_url = document.select(&thread::IMAGE).next().and_then(|container| {
        container
            .select(&thread::IMAGE_SOURCE)
            .next()
            .and_then(|s| s.value().attr("srcset").map(String::from))
            .or_else(|| {
                container
                    .select(&thread::IMAGE_IMG)
                    .next()
                    .and_then(|img| img.value().attr("src").map(String::from))
            })
    });

    Some(SourceDeal {
        set_number: catalog::extract_set_number(&title, url),
        title,
        price,
        temperature,
        comments_count,
        posted_date,
        free_shipping,
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

/// Thread id is the trailing all-digit path segment of a thread URL.
fn thread_id(url: &str) -> Option<String> {
    let segment = url.rsplit('/').next()?;
    (!segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
        .then(|| segment.to_string())
}

/// Publication dates per thread id from the page's JSON-LD block.
fn thread_dates(document: &Html) -> HashMap<String, DateTime<Utc>> {
    let mut dates = HashMap::new();

    let Some(script) = document.select(&shared::JSON_LD).next() else {
        return dates;
    };
    let raw = script.text().collect::<String>();
    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse JSON-LD in listing page: {}", e);
            return dates;
        }
    };

    let Some(items) = value.get("@graph").and_then(|g| g.as_array()) else {
        return dates;
    };
    for item in items {
        if item.get("@type").and_then(|t| t.as_str()) != Some("DiscussionForumPosting") {
            continue;
        }
        let id = item.get("url").and_then(|u| u.as_str()).and_then(thread_id);
        let published = item
            .get("datePublished")
            .and_then(|d| d.as_str())
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc));
        if let (Some(id), Some(published)) = (id, published) {
            dates.insert(id, published);
        }
    }
    dates
}

/// Comment count from the thread page JSON-LD interaction statistics.
fn json_ld_comment_count(document: &Html) -> Option<u32> {
    let raw = document.select(&shared::JSON_LD).next()?.text().collect::<String>();
    let value: serde_json::Value = serde_json::from_str(&raw).ok()?;

    let posting = if value.get("@type").and_then(|t| t.as_str()) == Some("DiscussionForumPosting") {
        &value
    } else {
        value.get("@graph")?.as_array()?.iter().find(|item| {
            item.get("@type").and_then(|t| t.as_str()) == Some("DiscussionForumPosting")
        })?
    };

    let stats = posting.get("interactionStatistic")?.as_array()?;
    let comment_stat = stats.iter().find(|stat| {
        stat.get("interactionType").and_then(|t| t.get("@type")).and_then(|t| t.as_str())
            == Some("https://schema.org/CommentAction")
    })?;
    comment_stat.get("userInteractionCount").and_then(|c| c.as_u64()).map(|c| c as u32)
}

/// Shipping flags from the block next to the truck icon: free shipping,
/// or a shipping cost to fold into the deal price.
fn shipping_details(truck: Option<ElementRef>) -> (bool, Option<f64>) {
    let Some(parent) = truck.and_then(|t| t.parent()).and_then(ElementRef::wrap) else {
        return (false, None);
    };
    let text = parent
        .select(&shared::SHIPPING_TEXT)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        return (false, None);
    }
    if text.to_lowercase().contains("gratuit") {
        return (true, None);
    }
    (false, parse_price_value(&text))
}

/// Approximates a posting date from relative time text like "il y a 2 j"
/// or "il y a 3 h 45 min".
fn parse_relative_time(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let chars: Vec<char> = text.chars().collect();
    let mut days: i64 = 0;
    let mut hours: i64 = 0;
    let mut minutes: i64 = 0;

    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let value: i64 = chars[start..i].iter().collect::<String>().parse().ok()?;

        let mut j = i;
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }
        let unit: String = chars[j..].iter().take(3).collect();
        if unit.starts_with("min") {
            if minutes == 0 {
                minutes = value;
            }
        } else if unit.starts_with('j') {
            if days == 0 {
                days = value;
            }
        } else if unit.starts_with('h') && hours == 0 {
            hours = value;
        }
    }

    if days == 0 && hours == 0 && minutes == 0 {
        return None;
    }
    Some(now - Duration::days(days) - Duration::hours(hours) - Duration::minutes(minutes))
}

fn month_number(token: &str) -> Option<u32> {
    match token.to_lowercase().as_str() {
        "janvier" => Some(1),
        "février" => Some(2),
        "mars" => Some(3),
        "avril" => Some(4),
        "mai" => Some(5),
        "juin" => Some(6),
        "juillet" => Some(7),
        "août" => Some(8),
        "septembre" => Some(9),
        "octobre" => Some(10),
        "novembre" => Some(11),
        "décembre" => Some(12),
        _ => None,
    }
}

/// Parses an absolute French timestamp like "12 août 2024, 14:30:45",
/// interpreted as UTC.
fn parse_french_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let tokens: Vec<&str> = text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).collect();

    for i in 0..tokens.len() {
        let Ok(day) = tokens[i].parse::<u32>() else {
            continue;
        };
        let Some(month) = tokens.get(i + 1).and_then(|t| month_number(t)) else {
            continue;
        };
        let (Some(year), Some(hours), Some(minutes), Some(seconds)) = (
            tokens.get(i + 2).and_then(|t| t.parse::<i32>().ok()),
            tokens.get(i + 3).and_then(|t| t.parse::<u32>().ok()),
            tokens.get(i + 4).and_then(|t| t.parse::<u32>().ok()),
            tokens.get(i + 5).and_then(|t| t.parse::<u32>().ok()),
        ) else {
            continue;
        };
        return Utc.with_ymd_and_hms(year, month, day, hours, minutes, seconds).single();
    }
    None
}

/// Picks the highest-resolution URL out of a srcset attribute.
fn best_srcset_url(srcset: &str) -> Option<String> {
    let mut best: Option<(u32, &str)> = None;
    for option in srcset.split(',') {
        let option = option.trim();
        let mut parts = option.split_whitespace();
        let Some(url) = parts.next() else {
            continue;
        };
        let resolution = parts
            .next()
            .and_then(|d| d.split('x').next())
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(0);
        if best.map_or(true, |(r, _)| resolution > r) {
            best = Some((resolution, url));
        }
    }
    best.map(|(_, url)| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const LISTING_HTML: &str = r#"
        <html><body>
        <script type="application/ld+json">
        {"@graph": [
            {"@type": "DiscussionForumPosting",
             "url": "https://www.dealabs.com/bons-plans/2914911",
             "datePublished": "2024-08-10T08:30:00+02:00"}
        ]}
        </script>
        <article class="threadListCard">
            <a class="cept-tt thread-link" href="/bons-plans/2914911">LEGO Technic 42172 McLaren P1</a>
            <span class="thread-price">149,99 €</span>
            <span class="cept-vote-temp">354°</span>
            <div><span class="icon--truck"></span><span class="overflow--wrap-off">Gratuit</span></div>
            <a title="Commentaires">23</a>
            <div class="threadListCard-image">
                <img srcset="https://img.test/low.jpg 150x150, https://img.test/high.jpg 300x300" src="https://img.test/low.jpg">
            </div>
        </article>
        <article class="threadListCard">
            <a class="cept-tt thread-link" href="/bons-plans/playmobil-123">Playmobil château fort</a>
            <span class="thread-price">49,99 €</span>
        </article>
        <article class="threadListCard">
            <a class="cept-tt thread-link" href="/bons-plans/lego-gratuit-999">LEGO cadeau</a>
        </article>
        </body></html>
    "#;

    #[test]
    fn test_parse_listing_page() {
        let deals = parse_search(LISTING_HTML, Utc::now());
        assert_eq!(deals.len(), 1);

        let deal = &deals[0];
        assert_eq!(deal.title, "LEGO Technic 42172 McLaren P1");
        assert_eq!(deal.set_number.as_deref(), Some("42172"));
        assert_eq!(deal.price, Some(149.99));
        assert_eq!(deal.temperature, 354);
        assert!(deal.free_shipping);
        assert_eq!(deal.comments_count, 23);
        assert_eq!(deal.link, "https://www.dealabs.com/bons-plans/2914911");
        assert_eq!(deal.image_url.as_deref(), Some("https://img.test/high.jpg"));
    }

    #[test]
    fn test_posted_date_from_json_ld() {
        let deals = parse_search(LISTING_HTML, Utc::now());
        let posted = deals[0].posted_date.unwrap();
        // 2024-08-10T08:30:00+02:00 is 06:30 UTC
        assert_eq!(posted.year(), 2024);
        assert_eq!(posted.month(), 8);
        assert_eq!(posted.day(), 10);
        assert_eq!(posted.to_rfc3339(), "2024-08-10T06:30:00+00:00");
    }

    #[test]
    fn test_paid_shipping_folded_into_price() {
        let html = r#"
            <article class="threadListCard">
                <a class="cept-tt thread-link" href="/bons-plans/lego-42172-111">LEGO 42172</a>
                <span class="thread-price">100 €</span>
                <div><span class="icon--truck"></span><span class="overflow--wrap-off">4,99 €</span></div>
            </article>
        "#;
        let deals = parse_search(html, Utc::now());
        assert_eq!(deals.len(), 1);
        assert!(!deals[0].free_shipping);
        assert_eq!(deals[0].price, Some(104.99));
    }

    #[test]
    fn test_relative_time_fallback() {
        let now = Utc::now();
        let html = r#"
            <article class="threadListCard">
                <a class="cept-tt thread-link" href="/bons-plans/lego-42172-111">LEGO 42172</a>
                <span class="thread-price">100 €</span>
                <div class="chip--type-default"><span class="size--all-s">il y a 2 j</span></div>
            </article>
        "#;
        let deals = parse_search(html, now);
        let posted = deals[0].posted_date.unwrap();
        assert_eq!((now - posted).num_days(), 2);
    }

    #[test]
    fn test_parse_relative_time_units() {
        let now = Utc::now();

        let two_days = parse_relative_time("Posté il y a 2 j", now).unwrap();
        assert_eq!((now - two_days).num_days(), 2);

        let three_hours = parse_relative_time("il y a 3 h", now).unwrap();
        assert_eq!((now - three_hours).num_hours(), 3);

        let minutes = parse_relative_time("il y a 45 min", now).unwrap();
        assert_eq!((now - minutes).num_minutes(), 45);

        let mixed = parse_relative_time("il y a 3 h 45 min", now).unwrap();
        assert_eq!((now - mixed).num_minutes(), 3 * 60 + 45);

        assert!(parse_relative_time("", now).is_none());
        assert!(parse_relative_time("hier", now).is_none());
    }

    #[test]
    fn test_parse_french_timestamp() {
        let parsed = parse_french_timestamp("12 août 2024, 14:30:45").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-08-12T14:30:45+00:00");

        let with_prefix = parse_french_timestamp("le 3 février 2025, 09:05:00").unwrap();
        assert_eq!(with_prefix.to_rfc3339(), "2025-02-03T09:05:00+00:00");

        assert!(parse_french_timestamp("12 août 2024").is_none());
        assert!(parse_french_timestamp("").is_none());
    }

    #[test]
    fn test_parse_thread_page() {
        let html = r#"
            <html><head><title>fallback</title></head><body>
            <div class="thread-title"><span>LEGO Icons Orchidée (10311) - 26,99 €</span></div>
            <span class="thread-price">26,99 €</span>
            <span class="cept-vote-temp">120°</span>
            <span class="size--all-s color--text-TranslucentSecondary" title="12 août 2024, 14:30:45">il y a 3 j</span>
            <div><span class="icon--truck"></span><span class="overflow--wrap-off">Livraison gratuite</span></div>
            <h2 class="flex--inline boxAlign-ai--all-c"><span class="size--all-l">42 commentaires</span></h2>
            </body></html>
        "#;
        let url = "https://www.dealabs.com/bons-plans/lego-orchidee-2915000";
        let deal = parse_thread(html, url).unwrap();

        assert_eq!(deal.set_number.as_deref(), Some("10311"));
        assert_eq!(deal.price, Some(26.99));
        assert_eq!(deal.temperature, 120);
        assert!(deal.free_shipping);
        assert_eq!(deal.comments_count, 42);
        assert_eq!(deal.link, url);
        assert_eq!(deal.posted_date.unwrap().to_rfc3339(), "2024-08-12T14:30:45+00:00");
    }

    #[test]
    fn test_parse_thread_non_lego() {
        let html = r#"
            <div class="thread-title"><span>Playmobil pirates</span></div>
        "#;
        assert!(parse_thread(html, "https://www.dealabs.com/bons-plans/1").is_none());
    }

    #[test]
    fn test_parse_thread_comment_count_from_json_ld() {
        let html = r#"
            <html><body>
            <div class="thread-title"><span>LEGO 42172 promo</span></div>
            <span class="thread-price">100 €</span>
            <script type="application/ld+json">
            {"@type": "DiscussionForumPosting",
             "interactionStatistic": [
                {"interactionType": {"@type": "https://schema.org/CommentAction"},
                 "userInteractionCount": 17}
             ]}
            </script>
            </body></html>
        "#;
        let deal = parse_thread(html, "https://www.dealabs.com/bons-plans/2").unwrap();
        assert_eq!(deal.comments_count, 17);
    }

    #[test]
    fn test_thread_id() {
        assert_eq!(
            thread_id("https://www.dealabs.com/bons-plans/2914911"),
            Some("2914911".to_string())
        );
        assert_eq!(thread_id("/bons-plans/lego-42172-2914911"), None);
        assert_eq!(thread_id(""), None);
    }

    #[test]
    fn test_best_srcset_url() {
        assert_eq!(
            best_srcset_url("https://a/low.jpg 150x150, https://a/high.jpg 300x300"),
            Some("https://a/high.jpg".to_string())
        );
        assert_eq!(best_srcset_url("https://a/only.jpg"), Some("https://a/only.jpg".to_string()));
        assert_eq!(best_srcset_url(""), None);
    }
}
