use serde::{Deserialize, Serialize};

/// Limits applied while parsing a single title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Bracket nesting depth at which blocks are flattened into a literal leaf.
    pub max_depth: usize,
    /// Largest number of episodes a single range declaration may emit.
    pub max_episode_span: u32,
}

impl ParserConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 32;
    pub const DEFAULT_MAX_EPISODE_SPAN: u32 = 500;
    /// Hard ceiling on `max_depth`, whatever a config file asks for.
    pub const MAX_DEPTH_CEILING: usize = 64;

    /// Nesting depth actually enforced by the tree builder.
    pub fn depth_limit(&self) -> usize {
        self.max_depth.min(Self::MAX_DEPTH_CEILING)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_episode_span(mut self, max_episode_span: u32) -> Self {
        self.max_episode_span = max_episode_span;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_episode_span: Self::DEFAULT_MAX_EPISODE_SPAN,
        }
    }
}
