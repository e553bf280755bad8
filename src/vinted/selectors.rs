//! CSS selectors for Vinted HTML parsing.
//!
//! Update this file when Vinted changes their HTML structure.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for catalog feed (search) pages.
pub mod search {
    use super::*;

    /// Item card container in the catalog feed.
    pub static CARD: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".feed-grid__item, .new-item-box__container").unwrap());

    /// Item image; its alt text carries title, brand, and condition.
    pub static IMAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("img.web_ui__Image__content").unwrap());

    /// Clickable overlay link to the item page.
    pub static LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a.new-item-box__overlay--clickable").unwrap());

    /// Item price text.
    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[data-testid$='--price-text']").unwrap());

    /// Favorites counter on the card.
    pub static FAVORITES: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("button[data-testid$='--favourite'] .web_ui__Text__caption").unwrap()
    });
}

/// Selectors for individual item pages.
pub mod item {
    use super::*;

    /// Item title.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "h1[itemprop='name'], \
             .web_ui__Text__title, \
             .item-details h1",
        )
        .unwrap()
    });

    /// Document title, fallback.
    pub static PAGE_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

    /// Item description.
    pub static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "[itemprop='description'], \
             [data-testid='item-description'] .web_ui__Text__body, \
             .item-description",
        )
        .unwrap()
    });

    /// Current price.
    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".item-price__current-price, \
             [data-testid='item-price'] .web_ui__Text__subtitle, \
             .item-details__price",
        )
        .unwrap()
    });

    /// Condition attribute value.
    pub static CONDITION: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "[data-testid='item-attributes-status'] .web_ui__Text__bold, \
             .item-attributes__value, \
             .details-list__value",
        )
        .unwrap()
    });

    /// Item photos.
    pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".item-photos__photo img, \
             .item-photos img, \
             .web_ui__Image__content",
        )
        .unwrap()
    });

    /// Favorites counter candidates.
    pub static FAVORITES: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "[data-testid='favourite-button'] .web_ui__Text__text, \
             .item-favourite-count, \
             .item-actions__favourites .web_ui__Text__body",
        )
        .unwrap()
    });

    /// Favourite button, for the aria-label fallback.
    pub static FAVOURITE_BUTTON: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[data-testid='favourite-button']").unwrap());
}
