//! Project configuration.

use crate::hir::{AnnotationAnalyzer, DEFAULT_MAX_DEPTH, DiagnosticsRunner, SyntaxAnalyzer};

/// Settings supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Config {
    /// Forward log messages to the client.
    pub verbose: bool,
    /// Bound on nested type inference; deeper queries yield `unknown`.
    pub max_inference_depth: u32,
    pub analyzers: AnalyzerToggles,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            max_inference_depth: DEFAULT_MAX_DEPTH,
            analyzers: AnalyzerToggles::default(),
        }
    }
}

impl Config {
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_inference_depth(mut self, depth: u32) -> Self {
        self.max_inference_depth = depth;
        self
    }

    pub fn with_analyzers(mut self, analyzers: AnalyzerToggles) -> Self {
        self.analyzers = analyzers;
        self
    }

    /// A runner with the enabled analyzers, in their fixed order.
    pub fn runner(&self) -> DiagnosticsRunner {
        let mut runner = DiagnosticsRunner::new();
        if self.analyzers.syntax {
            runner = runner.with(SyntaxAnalyzer);
        }
        if self.analyzers.annotation {
            runner = runner.with(AnnotationAnalyzer);
        }
        runner
    }
}

/// Which analyzers run on `analyze`. All are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct AnalyzerToggles {
    pub syntax: bool,
    pub annotation: bool,
}

impl Default for AnalyzerToggles {
    fn default() -> Self {
        Self {
            syntax: true,
            annotation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let config = Config::default();
        assert!(!config.verbose);
        assert_eq!(config.max_inference_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.runner().analyzer_names(), ["syntax", "annotation"]);
    }

    #[test]
    fn test_disabled_analyzer_is_not_registered() {
        let config = Config::default().with_analyzers(AnalyzerToggles {
            syntax: false,
            annotation: true,
        });
        assert_eq!(config.runner().analyzer_names(), ["annotation"]);
    }
}
