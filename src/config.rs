// Parser configuration

use serde::{Deserialize, Serialize};

/// Knobs for behaviour the grammar leaves open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParseOptions {
    /// Fail on a string literal that runs to end of input.
    /// When false the partial string is emitted as-is.
    pub strict_strings: bool,
    /// Fail on a rule declaration that names the same parameter twice
    pub reject_duplicate_params: bool,
    /// How many discrete expressions may nest inside one another
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_strings: true,
            reject_duplicate_params: false,
            max_depth: 128,
        }
    }
}

impl ParseOptions {
    pub fn permissive_strings(mut self) -> Self {
        self.strict_strings = false;
        self
    }

    pub fn with_unique_params(mut self) -> Self {
        self.reject_duplicate_params = true;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
