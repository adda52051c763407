//! Content-fragment passes: fragment → blocks → inline spans, plus the
//! hero-image heuristic over the same fragment.

pub mod blocks;
pub mod hero;
pub mod inline;

pub use blocks::{classify_fragment, ArticleBlock};
pub use hero::should_show_hero;
pub use inline::{tokenize, InlineSpan};
