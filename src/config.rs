use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Empirical: a lead image is only worth showing when about ten lines of text
/// precede the first in-content image.
pub const DEFAULT_HERO_MIN_LINES: usize = 10;
pub const DEFAULT_CHARS_PER_LINE: usize = 60;
pub const DEFAULT_MAX_DEPTH: usize = 256;
pub const DEFAULT_MAX_CONCURRENT_EXTRACTIONS: usize = 10;
pub const DEFAULT_MAX_MARKUP_BYTES: usize = 8 * 1024 * 1024;

const ENV_PREFIX: &str = "READER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Estimated lines that must precede the first image before a separate
    /// hero image is shown.
    pub hero_min_lines: usize,
    /// Characters per estimated line of text.
    pub chars_per_line: usize,
    /// Deepest element nesting the block classifier descends into.
    pub max_depth: usize,
    pub max_concurrent_extractions: usize,
    /// Page markup above this size is rejected as unparsable.
    pub max_markup_bytes: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            hero_min_lines: DEFAULT_HERO_MIN_LINES,
            chars_per_line: DEFAULT_CHARS_PER_LINE,
            max_depth: DEFAULT_MAX_DEPTH,
            max_concurrent_extractions: DEFAULT_MAX_CONCURRENT_EXTRACTIONS,
            max_markup_bytes: DEFAULT_MAX_MARKUP_BYTES,
        }
    }
}

impl ReaderConfig {
    /// Load overrides from `READER_*` environment variables, e.g.
    /// `READER_HERO_MIN_LINES=12`. Unset keys keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_env_prefix(ENV_PREFIX)
    }

    pub fn from_env_prefix(prefix: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?;
        let cfg: ReaderConfig = settings.try_deserialize()?;
        tracing::debug!(?cfg, prefix, "Loaded reader config");
        Ok(cfg)
    }
}
