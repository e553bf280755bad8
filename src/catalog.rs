//! LEGO set number extraction from deal titles and URLs.
//!
//! Set numbers are 4 to 6 digit identifiers. Titles carry them either in
//! parentheses or as a standalone number, and piece counts ("2228 pièces")
//! look just like them, so extraction checks context before trusting a hit.

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Maximal digit runs of 4 to 6 characters with non-word neighbours.
fn standalone_numbers(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut numbers = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let len = i - start;
            let bounded = (start == 0 || !is_word_char(chars[start - 1]))
                && (i == chars.len() || !is_word_char(chars[i]));
            if (4..=6).contains(&len) && bounded {
                numbers.push(chars[start..i].iter().collect());
            }
        } else {
            i += 1;
        }
    }
    numbers
}

/// A 4 to 6 digit number wrapped in parentheses, the most reliable format.
fn parenthesized_number(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '(' {
            let start = i + 1;
            let mut j = start;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let len = j - start;
            if (4..=6).contains(&len) && chars.get(j) == Some(&')') {
                return Some(chars[start..j].iter().collect());
            }
        }
        i += 1;
    }
    None
}

/// Extracts a LEGO set number from a deal title, falling back to the URL.
///
/// Tries parenthesized numbers first, then standalone numbers in the title
/// (skipping piece counts), then any candidate number in the URL.
pub fn extract_set_number(text: &str, url: &str) -> Option<String> {
    if let Some(number) = parenthesized_number(text) {
        return Some(number);
    }

    let lowered = text.to_lowercase();
    for number in standalone_numbers(text) {
        if !lowered.contains(&format!("{} pièces", number)) {
            return Some(number);
        }
    }

    standalone_numbers(url).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesized_number_preferred() {
        assert_eq!(
            extract_set_number("Le Faucon Millenium (75192) - 849 pièces", ""),
            Some("75192".to_string())
        );
    }

    #[test]
    fn test_standalone_number_in_title() {
        assert_eq!(
            extract_set_number("LEGO Technic 42172 McLaren P1", ""),
            Some("42172".to_string())
        );
    }

    #[test]
    fn test_piece_count_skipped() {
        assert_eq!(
            extract_set_number("LEGO McLaren - 3893 pièces - set 42172", ""),
            Some("42172".to_string())
        );
    }

    #[test]
    fn test_url_fallback() {
        assert_eq!(
            extract_set_number(
                "LEGO Technic McLaren P1",
                "https://www.dealabs.com/bons-plans/lego-42172-mclaren"
            ),
            Some("42172".to_string())
        );
    }

    #[test]
    fn test_seven_digit_run_rejected() {
        // thread ids are longer than set numbers and must not match
        assert_eq!(extract_set_number("LEGO promo", "https://example.com/2914911x"), None);
        assert_eq!(extract_set_number("code 1234567", ""), None);
    }

    #[test]
    fn test_digits_glued_to_words_rejected() {
        assert_eq!(extract_set_number("ref42172 LEGO", ""), None);
    }

    #[test]
    fn test_short_numbers_rejected() {
        assert_eq!(extract_set_number("LEGO 123 promo -20%", ""), None);
    }

    #[test]
    fn test_no_number_anywhere() {
        assert_eq!(extract_set_number("LEGO Star Wars", "https://example.com/lego"), None);
    }

    #[test]
    fn test_six_digit_number() {
        assert_eq!(extract_set_number("LEGO (123456)", ""), Some("123456".to_string()));
    }
}
