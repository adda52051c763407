//! Turn fetched web pages into a reader view: page metadata plus an ordered
//! list of typed content blocks with inline rich text.
//!
//! The crate does not fetch pages and does not pick the main content out of
//! a noisy page; a [`ContentExtractor`] supplies that. Metadata extraction is
//! the only async step and runs on an injected [`ExtractionContext`];
//! classification, inline tokenizing and the hero-image heuristic are plain
//! synchronous functions over strings.

pub mod config;
pub mod doc;
pub mod dom;
pub mod error;
pub mod metadata;
pub mod parser;
pub mod pipeline;
pub mod worker;

pub use config::ReaderConfig;
pub use doc::{ExtractedContent, ReadableDoc};
pub use error::{Error, ParseError, Result};
pub use metadata::SiteMetadata;
pub use parser::{ArticleBlock, InlineSpan};
pub use pipeline::{ContentExtractor, PageInput, Pipeline};
pub use worker::ExtractionContext;
