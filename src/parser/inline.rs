//! Best-effort inline tokenizer for paragraph, heading and list-item markup.
//!
//! Input is expected to be already-cleaned content. Only anchors with an
//! `href` and `<code>` spans are recognized; every other tag is stripped.
//! Unterminated or malformed tags never match and fall through as text.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use url::Url;

static P_WRAPPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^<p(?:\s[^>]*)?>(.*)</p>$").unwrap());
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s(?:[^>]*?\s)?href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#).unwrap()
});
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code(?:\s[^>]*)?>(.*?)</code\s*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InlineSpan {
    PlainText { text: String },
    Link { label: Vec<InlineSpan>, target: Option<Url> },
    InlineCode { text: String },
}

enum InlineMatch<'t> {
    Link(Captures<'t>),
    Code(Captures<'t>),
}

impl InlineMatch<'_> {
    fn bounds(&self) -> (usize, usize) {
        let caps = match self {
            InlineMatch::Link(c) | InlineMatch::Code(c) => c,
        };
        caps.get(0).map_or((0, 0), |m| (m.start(), m.end()))
    }
}

pub fn tokenize(markup: &str) -> Vec<InlineSpan> {
    tokenize_with_base(markup, None)
}

/// Tokenize `markup`, resolving relative link targets against `base` when given.
pub fn tokenize_with_base(markup: &str, base: Option<&Url>) -> Vec<InlineSpan> {
    let unwrapped = P_WRAPPER_RE
        .captures(markup)
        .and_then(|c| c.get(1))
        .map_or(markup, |m| m.as_str());
    let working = BR_RE.replace_all(unwrapped, "\n");

    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(found) = next_match(&working[cursor..]) {
        let (start, end) = found.bounds();
        let rest = &working[cursor..];
        push_plain(&mut spans, &rest[..start]);

        match found {
            InlineMatch::Link(caps) => {
                let href = decode_entities(caps.get(1).map_or("", |m| m.as_str()));
                let label = tokenize_with_base(caps.get(2).map_or("", |m| m.as_str()), base);
                if !label.is_empty() {
                    spans.push(InlineSpan::Link {
                        label,
                        target: parse_target(&href, base),
                    });
                }
            }
            InlineMatch::Code(caps) => {
                let text = to_plain(caps.get(1).map_or("", |m| m.as_str()));
                if !text.is_empty() {
                    spans.push(InlineSpan::InlineCode { text });
                }
            }
        }

        if end == 0 {
            break;
        }
        cursor += end;
    }

    push_plain(&mut spans, &working[cursor..]);
    spans
}

// Earliest match wins; on a tie the anchor does.
fn next_match(rest: &str) -> Option<InlineMatch<'_>> {
    let link = LINK_RE.captures(rest).map(InlineMatch::Link);
    let code = CODE_RE.captures(rest).map(InlineMatch::Code);
    match (link, code) {
        (Some(l), Some(c)) => {
            if c.bounds().0 < l.bounds().0 {
                Some(c)
            } else {
                Some(l)
            }
        }
        (l, c) => l.or(c),
    }
}

fn push_plain(spans: &mut Vec<InlineSpan>, raw: &str) {
    let text = to_plain(raw);
    if !text.is_empty() {
        spans.push(InlineSpan::PlainText { text });
    }
}

fn parse_target(href: &str, base: Option<&Url>) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match (Url::parse(href), base) {
        (Ok(url), _) => Some(url),
        (Err(url::ParseError::RelativeUrlWithoutBase), Some(base)) => base.join(href).ok(),
        _ => None,
    }
}

/// Strip residual tags, then decode entities, so escaped markup stays literal.
pub fn to_plain(raw: &str) -> String {
    decode_entities(&strip_tags(raw))
}

pub fn strip_tags(raw: &str) -> String {
    TAG_RE.replace_all(raw, "").into_owned()
}

/// Single-pass entity decoding: `&amp;lt;` becomes `&lt;`, not `<`.
/// Unknown entities are left as they are; `&#0;` becomes U+FFFD.
pub fn decode_entities(s: &str) -> String {
    decode_html_entities(s).replace('\0', "\u{fffd}")
}

/// Flatten spans back to their visible text.
pub fn plain_text(spans: &[InlineSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            InlineSpan::PlainText { text } | InlineSpan::InlineCode { text } => out.push_str(text),
            InlineSpan::Link { label, .. } => out.push_str(&plain_text(label)),
        }
    }
    out
}
