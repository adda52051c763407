use std::sync::LazyLock;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::Document;
use crate::error::ParseError;

static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("link").unwrap());

const ICON_RELS: &[&str] = &["icon", "shortcut icon"];
const FALLBACK_FAVICON: &str = "/favicon.ico";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub url: Url,
    pub title: Option<String>,
    pub description: Option<String>,
    pub hero_image: Option<Url>,
    pub favicon: Option<Url>,
}

impl SiteMetadata {
    /// A record with nothing but the page URL.
    pub fn bare(url: Url) -> Self {
        SiteMetadata {
            url,
            title: None,
            description: None,
            hero_image: None,
            favicon: None,
        }
    }
}

/// Extract page metadata, failing only when the markup cannot be parsed.
pub fn extract(html: &str, base_url: &Url) -> Result<SiteMetadata, ParseError> {
    let doc = Document::parse(html)?;
    Ok(extract_from_document(&doc, base_url))
}

pub fn extract_with_limit(
    html: &str,
    base_url: &Url,
    limit: usize,
) -> Result<SiteMetadata, ParseError> {
    let doc = Document::parse_with_limit(html, limit)?;
    Ok(extract_from_document(&doc, base_url))
}

pub fn extract_from_document(doc: &Document, base_url: &Url) -> SiteMetadata {
    let title = meta_content(doc, &OG_TITLE)
        .or_else(|| doc.select_first(&TITLE).and_then(|t| non_blank(&t.text())));
    let description = meta_content(doc, &META_DESCRIPTION);
    let hero_image = meta_content(doc, &OG_IMAGE).and_then(|src| resolve(base_url, &src));
    let favicon = declared_favicon(doc, base_url).or_else(|| resolve(base_url, FALLBACK_FAVICON));

    tracing::debug!(
        url = %base_url,
        has_title = title.is_some(),
        has_description = description.is_some(),
        has_hero = hero_image.is_some(),
        "Extracted site metadata"
    );

    SiteMetadata {
        url: base_url.clone(),
        title,
        description,
        hero_image,
        favicon,
    }
}

/// Resolve `reference` against `base`; anything unresolvable is `None`.
pub fn resolve(base: &Url, reference: &str) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    base.join(reference).ok()
}

fn meta_content(doc: &Document, selector: &Selector) -> Option<String> {
    doc.select_first(selector)
        .and_then(|m| m.attr("content"))
        .and_then(non_blank)
}

// First <link> with an icon rel wins, even if a later one would resolve.
fn declared_favicon(doc: &Document, base_url: &Url) -> Option<Url> {
    doc.select(&LINK).find_map(|link| {
        let rel = link.attr("rel")?;
        if !ICON_RELS.contains(&rel) {
            return None;
        }
        resolve(base_url, link.attr("href")?)
    })
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
