//! Lazily compiled regular-expression facets.
//!
//! Schema nodes store regex facets as source text so they stay serializable
//! and cheap to clone; compilation happens once on first use via
//! [`std::sync::OnceLock`]. A source that fails to compile is remembered as
//! such — the owning check reports it as a facet failure instead of
//! panicking.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use regex::Regex;

/// A regex facet: source text plus optional ECMAScript-style flags,
/// compiled on demand.
pub struct LazyPattern {
    source: String,
    flags: String,
    compiled: OnceLock<Option<Regex>>,
}

impl LazyPattern {
    /// Creates a pattern with no flags.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_flags(source, "")
    }

    /// Creates a pattern with ECMAScript-style flags (`i`, `m`, `s`
    /// translate to inline regex flags; `g`, `u`, `y`, `d` have no
    /// matching semantics here and are ignored).
    #[must_use]
    pub fn with_flags(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
            compiled: OnceLock::new(),
        }
    }

    /// The original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The original flag string.
    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// The compiled regex, or `None` if the source does not compile.
    pub fn regex(&self) -> Option<&Regex> {
        self.compiled
            .get_or_init(|| Regex::new(&self.translated()).ok())
            .as_ref()
    }

    /// Whether `text` matches. `None` means the source does not compile,
    /// which callers report as a facet failure.
    #[must_use]
    pub fn is_match(&self, text: &str) -> Option<bool> {
        self.regex().map(|re| re.is_match(text))
    }

    fn translated(&self) -> String {
        let inline: String = self
            .flags
            .chars()
            .filter(|c| matches!(c, 'i' | 'm' | 's'))
            .collect();
        if inline.is_empty() {
            self.source.clone()
        } else {
            format!("(?{inline}){}", self.source)
        }
    }
}

impl Clone for LazyPattern {
    fn clone(&self) -> Self {
        // The compiled cell is intentionally not carried over; the clone
        // recompiles on first use.
        Self::with_flags(self.source.clone(), self.flags.clone())
    }
}

impl PartialEq for LazyPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for LazyPattern {}

impl Hash for LazyPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.flags.hash(state);
    }
}

impl fmt::Debug for LazyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyPattern")
            .field("source", &self.source)
            .field("flags", &self.flags)
            .field("compiled", &self.compiled.get().map(Option::is_some))
            .finish()
    }
}

impl From<&str> for LazyPattern {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for LazyPattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

// ============================================================================
// TESTS
// ============================================================================
