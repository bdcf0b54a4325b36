//! Episode metadata extraction from free-text Japanese video titles.
//!
//! ```
//! let meta = ncoverlay_parse::parse("『〇〇』第3話「もう一つの世界」");
//! assert_eq!(meta.title.as_deref(), Some("〇〇"));
//! assert_eq!(meta.episodes[0].number, 3);
//! assert_eq!(meta.episodes[0].title.as_deref(), Some("もう一つの世界"));
//! ```
//!
//! Input is expected to be normalized already (NFKC, `〜` folded to `~`).

pub mod ast;
pub mod cache;
pub mod config;
pub mod elements;
pub mod error;
pub mod evaluate;
pub mod extract;
pub mod keyword;
pub mod numeral;
pub mod query;
pub mod tokenizer;

pub use ast::{AstBlock, AstElement, AstNode, ElementKind};
pub use cache::{CacheStats, EvaluationCache};
pub use config::ParserConfig;
pub use elements::{EvaluatedEpisode, EvaluatedMeta};
pub use error::NumeralError;
pub use extract::ExtractResult;
pub use query::{parse_timecode, SearchQuery};

/// Title parser with explicit limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Tokenize and build the syntax tree for a title.
    pub fn ast(&self, input: &str) -> Vec<AstNode> {
        ast::build(&tokenizer::tokenize(input), &self.config)
    }

    /// Run the full pipeline on a title.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(&self, input: &str) -> EvaluatedMeta {
        let meta = evaluate::evaluate(&self.ast(input), &self.config);
        tracing::debug!(
            title = ?meta.title,
            season = ?meta.season,
            episodes = meta.episodes.len(),
            "title evaluated"
        );
        meta
    }
}

/// Parse a title with default limits.
pub fn parse(input: &str) -> EvaluatedMeta {
    Parser::default().parse(input)
}
