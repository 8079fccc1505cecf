//! Failure signature patterns
//!
//! The ordered, immutable set of regexes that mark a log line as a crash
//! event. Built-ins cover kernel, language-runtime and service-manager
//! vocabulary; callers may append their own signatures at construction
//! time. Matching is case-insensitive and first-match-wins.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in failure signatures, tried in declared order.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"segfault at",
    r"Segmentation fault",
    r"General Protection Fault",
    r"dumped core",
    r"kernel panic",
    r"Out of memory",
    r"oom-killer",
    r"Main process exited, code=exited",
    r"Process .* died",
    r"traceback \(most recent call last\)",
    r"Uncaught exception",
    r"fatal error",
];

/// A caller-supplied pattern, optionally labeled.
///
/// Without a label the regex source itself is used, which is how the
/// report quotes it back to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSpec {
    #[serde(default)]
    pub label: Option<String>,
    pub regex: String,
}

/// Rejected pattern at set construction time.
///
/// No partial set is ever produced: one bad pattern fails the whole
/// construction before any scanning starts.
#[derive(Debug, Error)]
#[error("invalid pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// One compiled crash signature.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Label quoted in the report; the regex source for unlabeled patterns.
    pub label: String,
    regex: Regex,
}

impl Pattern {
    fn compile(label: &str, source: &str) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .map_err(|err| PatternError {
                pattern: source.to_string(),
                source: err,
            })?;
        Ok(Self {
            label: label.to_string(),
            regex,
        })
    }

    /// Whether this signature occurs anywhere in the line.
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Ordered collection of crash signatures, immutable once built.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Set containing only the built-in signatures.
    pub fn with_defaults() -> Self {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .map(|p| Pattern::compile(p, p).unwrap())
            .collect();
        Self { patterns }
    }

    /// Built-ins plus caller-supplied regex strings, appended in order.
    ///
    /// Each extra pattern is labeled with its own source text.
    pub fn with_custom<S: AsRef<str>>(extra: &[S]) -> Result<Self, PatternError> {
        let specs: Vec<PatternSpec> = extra
            .iter()
            .map(|s| PatternSpec {
                label: None,
                regex: s.as_ref().to_string(),
            })
            .collect();
        Self::with_specs(&specs)
    }

    /// Built-ins plus caller-supplied specs, appended in order.
    pub fn with_specs(extra: &[PatternSpec]) -> Result<Self, PatternError> {
        let mut set = Self::with_defaults();
        for spec in extra {
            let label = spec.label.as_deref().unwrap_or(&spec.regex);
            set.patterns.push(Pattern::compile(label, &spec.regex)?);
        }
        Ok(set)
    }

    /// First signature matching the line, in declared order.
    ///
    /// Returns `None` when no signature matches. A line matching several
    /// signatures is attributed to the earliest one only.
    pub fn match_line(&self, line: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.is_match(line))
    }

    /// Number of signatures in the set.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Labels in declared order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.patterns.iter().map(|p| p.label.as_str())
    }
}
