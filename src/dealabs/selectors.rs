//! CSS selectors for Dealabs HTML parsing.
//!
//! This file contains all CSS selectors used for parsing Dealabs pages.
//! Update this file when Dealabs changes their HTML structure.
//!
//! **Update process**: When parsing fails, capture HTML sample,
//! update selectors, and add test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for search/listing pages.
pub mod search {
    use super::*;

    /// Deal card container on listing pages.
    pub static CARD: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".threadListCard").unwrap());

    /// Deal title link, carries both the title text and the thread URL.
    pub static TITLE_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".cept-tt.thread-link").unwrap());

    /// Deal price.
    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".thread-price").unwrap());

    /// Community temperature vote.
    pub static TEMPERATURE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".cept-vote-temp").unwrap());

    /// Relative posting time chip ("il y a 3 h").
    pub static POSTED_TIME: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".chip--type-default .size--all-s").unwrap());

    /// Comment count link.
    pub static COMMENTS: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a[title='Commentaires']").unwrap());

    /// Deal image inside the card.
    pub static IMAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".threadListCard-image img").unwrap());
}

/// Selectors for individual deal thread pages.
pub mod thread {
    use super::*;

    /// Thread title on the deal page.
    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".thread-title span").unwrap());

    /// Document title, fallback when the thread title is missing.
    pub static PAGE_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

    /// Deal price on the thread page.
    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".thread-price, .threadItemCard-price").unwrap());

    /// Community temperature vote.
    pub static TEMPERATURE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".cept-vote-temp").unwrap());

    /// Posting time element whose title attribute holds the absolute date.
    pub static POSTED_TIME: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(".size--all-s.color--text-TranslucentSecondary[title]").unwrap()
    });

    /// Comment count header ("42 commentaires").
    pub static COMMENTS: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "h2.flex--inline.boxAlign-ai--all-c span.size--all-l, \
             h2.flex--inline.boxAlign-ai--all-c span.size--fromW3-xl",
        )
        .unwrap()
    });

    /// Image container on the thread page.
    pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(".thread-image, .carousel-thumbnail-img, .threadItemCard-img picture")
            .unwrap()
    });

    /// High-resolution image source inside the container.
    pub static IMAGE_SOURCE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("source[media='(min-width: 768px)']").unwrap());

    /// Any image inside the container, fallback.
    pub static IMAGE_IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
}

/// Selectors shared between page kinds.
pub mod shared {
    use super::*;

    /// Truck icon marking the shipping information block.
    pub static TRUCK_ICON: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".icon--truck").unwrap());

    /// Shipping cost text next to the truck icon.
    pub static SHIPPING_TEXT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".overflow--wrap-off").unwrap());

    /// Structured data block with thread publication dates and comment stats.
    pub static JSON_LD: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("script[type='application/ld+json']").unwrap());
}
