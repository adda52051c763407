use tracing::info;
use url::Url;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::ReaderConfig;
use crate::doc::{ExtractedContent, ReadableDoc};
use crate::error::Result;
use crate::parser::blocks::ArticleBlock;
use crate::worker::ExtractionContext;

/// Main-content extraction, supplied by the caller.
pub trait ContentExtractor {
    fn extract(&self, html: &str, url: &Url) -> Option<ExtractedContent>;
}

/// A fetched page: its URL and full markup.
#[derive(Debug, Clone)]
pub struct PageInput {
    pub url: Url,
    pub html: String,
}

/// Metadata → hero decision → `ReadableDoc`, with blocks derived on demand.
#[derive(Clone)]
pub struct Pipeline {
    config: ReaderConfig,
    context: ExtractionContext,
}

impl Pipeline {
    pub fn new(config: ReaderConfig, context: ExtractionContext) -> Self {
        Pipeline { config, context }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Build a document from content the caller already extracted.
    ///
    /// `Ok(None)` when `extracted` carries no content fragment.
    pub async fn build_from_extracted(
        &self,
        page: PageInput,
        extracted: ExtractedContent,
        show_hero_image: Option<bool>,
    ) -> Result<Option<ReadableDoc>> {
        if extracted.content.is_none() {
            info!(url = %page.url, "No content extracted, nothing to read");
            return Ok(None);
        }
        let url = page.url.clone();
        let metadata = self.context.extract_metadata(page.html, page.url).await?;
        let doc = ReadableDoc::with_config(extracted, show_hero_image, metadata, None, &self.config);
        if let Some(d) = &doc {
            info!(url = %url, hero = d.show_hero_image(), "Built readable document");
        }
        Ok(doc)
    }

    /// Run `extractor` over the page, then build the document.
    pub async fn build<E>(&self, page: PageInput, extractor: &E) -> Result<Option<ReadableDoc>>
    where
        E: ContentExtractor + ?Sized,
    {
        let Some(extracted) = extractor.extract(&page.html, &page.url) else {
            info!(url = %page.url, "Extractor found no article");
            return Ok(None);
        };
        self.build_from_extracted(page, extracted, None).await
    }

    /// Blocks for each document, in input order.
    #[cfg(feature = "rayon")]
    pub fn classify_all(&self, docs: &[ReadableDoc]) -> Vec<Vec<ArticleBlock>> {
        docs.par_iter()
            .map(|d| d.blocks_with_config(&self.config))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    pub fn classify_all(&self, docs: &[ReadableDoc]) -> Vec<Vec<ArticleBlock>> {
        docs.iter()
            .map(|d| d.blocks_with_config(&self.config))
            .collect()
    }
}
