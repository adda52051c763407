use tracing::debug;

use crate::config::ReaderConfig;
use crate::dom::{Document, Element};

/// Estimated rendered lines contributed by an element, not counting its children.
fn line_weight(el: &Element<'_>, chars_per_line: usize) -> usize {
    match el.tag().as_str() {
        "video" | "embed" => 5,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "li" => {
            el.text().chars().count().div_ceil(chars_per_line.max(1)) + 1
        }
        "tr" => 1,
        _ => 0,
    }
}

/// Estimated lines of content preceding the first `<img>`, in document order.
/// `None` when the document has no image.
pub fn lines_before_first_image(doc: &Document, chars_per_line: usize) -> Option<usize> {
    let mut lines = 0;
    let mut stack = vec![doc.root()];

    while let Some(el) = stack.pop() {
        if el.tag() == "img" {
            return Some(lines);
        }
        lines += line_weight(&el, chars_per_line);

        let children: Vec<Element<'_>> = el.children().collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Whether a separate lead image is worth showing above `content_html`.
///
/// Only when the first in-content image sits far enough down the page; a
/// fragment without images, or one that fails to parse, never gets one.
pub fn should_show_hero(content_html: &str, config: &ReaderConfig) -> bool {
    let doc = match Document::parse_with_limit(content_html, config.max_markup_bytes) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("Hero heuristic disabled: {}", e);
            return false;
        }
    };
    match lines_before_first_image(&doc, config.chars_per_line) {
        Some(lines) => lines >= config.hero_min_lines,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_paragraphs(n: usize) -> String {
        (0..n).map(|i| format!("<p>Short paragraph {i}.</p>")).collect()
    }

    fn lines(html: &str) -> Option<usize> {
        let doc = Document::parse(html).unwrap();
        lines_before_first_image(&doc, 60)
    }

    #[test]
    fn no_image_suppresses_hero() {
        let cfg = ReaderConfig::default();
        assert!(!should_show_hero(&short_paragraphs(40), &cfg));
        assert_eq!(lines(&short_paragraphs(3)), None);
    }

    #[test]
    fn image_far_down_shows_hero() {
        let html = format!("{}<img src=\"a.png\">", short_paragraphs(11));
        assert_eq!(lines(&html), Some(22));
        assert!(should_show_hero(&html, &ReaderConfig::default()));
    }

    #[test]
    fn image_near_top_suppresses_hero() {
        let html = format!("{}<img src=\"a.png\">", short_paragraphs(1));
        assert_eq!(lines(&html), Some(2));
        assert!(!should_show_hero(&html, &ReaderConfig::default()));
    }

    #[test]
    fn long_text_counts_multiple_lines() {
        let text = "x".repeat(121);
        assert_eq!(lines(&format!("<p>{text}</p><img src=a>")), Some(4));
        assert_eq!(lines("<p></p><img src=a>"), Some(1));
    }

    #[test]
    fn media_and_rows_weighted() {
        assert_eq!(lines("<video></video><embed><img src=a>"), Some(10));
        assert_eq!(
            lines("<table><tr><td>a</td></tr><tr><td>b</td></tr></table><img src=a>"),
            Some(2)
        );
    }

    #[test]
    fn only_first_image_counts() {
        let html = format!("<p>lead</p><img src=a>{}<img src=b>", short_paragraphs(20));
        assert_eq!(lines(&html), Some(2));
    }

    #[test]
    fn nested_text_is_counted_per_element() {
        // The <li> and its inner <p> both carry the text.
        assert_eq!(lines("<ul><li><p>item</p></li></ul><img src=a>"), Some(4));
    }

    #[test]
    fn threshold_is_configurable() {
        let html = format!("{}<img src=\"a.png\">", short_paragraphs(2));
        let cfg = ReaderConfig {
            hero_min_lines: 4,
            ..ReaderConfig::default()
        };
        assert!(should_show_hero(&html, &cfg));
        assert!(!should_show_hero(&html, &ReaderConfig::default()));
    }

    #[test]
    fn size_limit_comes_from_config() {
        let filler = "x".repeat(crate::config::DEFAULT_MAX_MARKUP_BYTES);
        let html = format!("<p>lead</p><img src=\"a.png\"><div>{filler}</div>");
        let cfg = ReaderConfig {
            hero_min_lines: 1,
            ..ReaderConfig::default()
        };
        assert!(!should_show_hero(&html, &cfg));
        let raised = ReaderConfig {
            max_markup_bytes: 2 * crate::config::DEFAULT_MAX_MARKUP_BYTES,
            ..cfg
        };
        assert!(should_show_hero(&html, &raised));
    }

    #[test]
    fn unparsable_disables_hero() {
        assert!(!should_show_hero("", &ReaderConfig::default()));
    }
}
