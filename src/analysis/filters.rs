//! Relevance filtering of marketplace listings against a target set number.

/// Title keywords that mark a listing as an actual LEGO set.
const LEGO_KEYWORDS: &[&str] = &["lego", "technic", "set", "kit", "construction"];

/// Title keywords for accessories sold alongside sets (display stands,
/// wall mounts, vitrines) that mention the set number without being the set.
const ACCESSORY_KEYWORDS: &[&str] =
    &["support mural", "stand", "staffa", "supporto", "display", "vitrine", "étagère"];

/// Broader LEGO vocabulary used when pre-screening scraped pages.
const LEGO_RELATED_KEYWORDS: &[&str] =
    &["lego", "duplo", "technic", "ninjago", "minifig", "minifigurine", "brique", "briques"];

/// True if a marketplace listing title is relevant to the given set number.
///
/// The set number must appear in the case-folded title, the title must look
/// like a LEGO set, and known accessory listings are excluded. This is a
/// heuristic: occasional false positives and negatives are tolerated noise
/// that the downstream statistics absorb.
pub fn is_relevant(title: &str, set_number: &str) -> bool {
    if title.is_empty() || set_number.is_empty() {
        return false;
    }

    let title = title.to_lowercase();
    if !title.contains(&set_number.to_lowercase()) {
        return false;
    }

    let is_accessory = ACCESSORY_KEYWORDS.iter().any(|k| title.contains(k));
    let is_lego_set = LEGO_KEYWORDS.iter().any(|k| title.contains(k));

    is_lego_set && !is_accessory
}

/// True if the text mentions LEGO at all. Used by scrapers to drop
/// unrelated search hits before they enter the store.
pub fn is_lego_related(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    LEGO_RELATED_KEYWORDS.iter().any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_listing() {
        assert!(is_relevant("Lego Technic 42172 McLaren P1", "42172"));
        assert!(is_relevant("LEGO 42172 neuf", "42172"));
        assert!(is_relevant("Set 42172 complet", "42172"));
    }

    #[test]
    fn test_missing_set_number() {
        assert!(!is_relevant("Lego Technic McLaren P1", "42172"));
        assert!(!is_relevant("Lego Technic 42151", "42172"));
    }

    #[test]
    fn test_missing_lego_keyword() {
        assert!(!is_relevant("42172 voiture miniature", "42172"));
    }

    #[test]
    fn test_accessory_excluded() {
        assert!(!is_relevant("Support mural pour Lego 42172", "42172"));
        assert!(!is_relevant("Vitrine Lego 42172", "42172"));
        assert!(!is_relevant("Display stand for Lego set 42172", "42172"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(!is_relevant("", "42172"));
        assert!(!is_relevant("Lego 42172", ""));
    }

    #[test]
    fn test_case_folding() {
        assert!(is_relevant("LEGO TECHNIC 42172", "42172"));
    }

    #[test]
    fn test_lego_related() {
        assert!(is_lego_related("Lego Star Wars"));
        assert!(is_lego_related("Boîte de briques"));
        assert!(is_lego_related("DUPLO ferme"));
        assert!(!is_lego_related("Playmobil château"));
        assert!(!is_lego_related(""));
    }
}
