use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::warn;
use url::Url;

use crate::config::ReaderConfig;
use crate::error::{Error, Result};
use crate::metadata::{self, SiteMetadata};

/// Execution context for metadata extraction.
///
/// Create one per process and clone it wherever extraction is needed; clones
/// share the runtime handle and the concurrency limit.
#[derive(Clone)]
pub struct ExtractionContext {
    handle: Handle,
    permits: Arc<Semaphore>,
    max_markup_bytes: usize,
}

impl ExtractionContext {
    pub fn new(handle: Handle, config: &ReaderConfig) -> Self {
        ExtractionContext {
            handle,
            permits: Arc::new(Semaphore::new(config.max_concurrent_extractions.max(1))),
            max_markup_bytes: config.max_markup_bytes,
        }
    }

    /// Context on the runtime this is called from. Panics outside a Tokio runtime.
    pub fn current(config: &ReaderConfig) -> Self {
        Self::new(Handle::current(), config)
    }

    /// Parse `html` on the blocking pool and extract its metadata.
    ///
    /// Single shot: the whole record or an error, never a partial result.
    pub async fn extract_metadata(&self, html: String, base_url: Url) -> Result<SiteMetadata> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| Error::Worker(e.to_string()))?;
        let limit = self.max_markup_bytes;

        let task = self.handle.spawn_blocking(move || {
            let _permit = permit;
            metadata::extract_with_limit(&html, &base_url, limit)
        });

        match task.await {
            Ok(result) => Ok(result?),
            Err(e) => {
                warn!("Metadata extraction task failed: {}", e);
                Err(Error::Worker(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    fn page(i: usize) -> String {
        format!("<html><head><title>Page {i}</title></head><body><p>text</p></body></html>")
    }

    #[tokio::test]
    async fn extracts_on_blocking_pool() {
        let ctx = ExtractionContext::current(&ReaderConfig::default());
        let base = Url::parse("https://example.com/post").unwrap();
        let md = ctx.extract_metadata(page(1), base.clone()).await.unwrap();
        assert_eq!(md.title.as_deref(), Some("Page 1"));
        assert_eq!(md.url, base);
    }

    #[tokio::test]
    async fn parse_failure_rejects() {
        let ctx = ExtractionContext::current(&ReaderConfig::default());
        let base = Url::parse("https://example.com/").unwrap();
        let err = ctx.extract_metadata("   ".into(), base).await.unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Empty)));
    }

    #[tokio::test]
    async fn size_limit_comes_from_config() {
        let cfg = ReaderConfig {
            max_markup_bytes: 8,
            ..ReaderConfig::default()
        };
        let ctx = ExtractionContext::current(&cfg);
        let base = Url::parse("https://example.com/").unwrap();
        let err = ctx.extract_metadata(page(2), base).await.unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::TooLarge { limit: 8, .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shared_context_serves_concurrent_calls() {
        let cfg = ReaderConfig {
            max_concurrent_extractions: 2,
            ..ReaderConfig::default()
        };
        let ctx = ExtractionContext::current(&cfg);
        let mut tasks = Vec::new();
        for i in 0..8 {
            let ctx = ctx.clone();
            tasks.push(tokio::spawn(async move {
                let base = Url::parse("https://example.com/").unwrap();
                ctx.extract_metadata(page(i), base).await
            }));
        }
        for (i, task) in tasks.into_iter().enumerate() {
            let md = task.await.unwrap().unwrap();
            assert_eq!(md.title, Some(format!("Page {i}")));
        }
    }
}
