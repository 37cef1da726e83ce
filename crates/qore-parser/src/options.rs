//! Per-parse configuration.

/// Default cap on expression and statement nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Options controlling a single parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Line number assigned to the first line of the source.
    pub start_line: u32,
    /// Name used for the source in log output.
    pub source_name: String,
    /// Nesting level beyond which the parser reports an error instead of
    /// descending further.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start_line: 1,
            source_name: "<string>".to_string(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn with_start_line(mut self, line: u32) -> Self {
        self.start_line = line.max(1);
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ParseOptions::default();
        assert_eq!(opts.start_line, 1);
        assert_eq!(opts.source_name, "<string>");
        assert_eq!(opts.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn test_builders_clamp_to_one() {
        let opts = ParseOptions::default()
            .with_start_line(0)
            .with_max_nesting_depth(0)
            .with_source_name("main.q");
        assert_eq!(opts.start_line, 1);
        assert_eq!(opts.max_nesting_depth, 1);
        assert_eq!(opts.source_name, "main.q");
    }
}
