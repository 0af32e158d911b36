use std::sync::{Arc, OnceLock};

use super::formats::{PidDelimiter, PlainExtractor, SyslogExtractor};
use super::handle::Parser;
use super::metrics::{FormatStats, FormatStatsSnapshot};
use super::traits::{EventKind, FieldExtractor, Fields, ParseError};

/// A named wire format: canonical name, aliases, compiled extractor and its
/// parse counters. Immutable apart from the counters.
pub struct FormatSpec {
    name: &'static str,
    aliases: &'static [&'static str],
    extractor: Box<dyn FieldExtractor>,
    stats: FormatStats,
}

impl FormatSpec {
    pub fn new(
        name: &'static str,
        aliases: &'static [&'static str],
        extractor: impl FieldExtractor + 'static,
    ) -> Self {
        Self {
            name,
            aliases,
            extractor: Box::new(extractor),
            stats: FormatStats::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    pub fn kind(&self) -> EventKind {
        self.extractor.kind()
    }

    pub fn stats(&self) -> &FormatStats {
        &self.stats
    }

    /// Exact match against the canonical name or any alias.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    /// Run the extractor and count the outcome.
    pub fn extract(&self, raw: &[u8]) -> Result<Fields, ParseError> {
        let result = self.extractor.extract(raw);
        self.stats.record(result.is_ok());
        result
    }
}

impl std::fmt::Debug for FormatSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("kind", &self.kind())
            .finish()
    }
}

/// The set of formats a process can parse. Built once at start-up and only
/// read afterwards, so stream tasks share it without locking.
#[derive(Debug)]
pub struct FormatRegistry {
    specs: Vec<Arc<FormatSpec>>,
}

static GLOBAL: OnceLock<FormatRegistry> = OnceLock::new();

impl FormatRegistry {
    /// Registry with every built-in format.
    pub fn builtin() -> Result<Self, ParseError> {
        Ok(Self::from_specs(vec![
            FormatSpec::new(
                "rfc3164-pid",
                &["syslog", "bsd"],
                SyslogExtractor::new("rfc3164-pid", PidDelimiter::Brackets)?,
            ),
            FormatSpec::new(
                "rfc3164-paren",
                &["syslog-paren"],
                SyslogExtractor::new("rfc3164-paren", PidDelimiter::Parens)?,
            ),
            FormatSpec::new("plain", &["text", "raw"], PlainExtractor::new("plain")?),
        ]))
    }

    /// Earlier specs win when names collide.
    pub fn from_specs(specs: Vec<FormatSpec>) -> Self {
        Self {
            specs: specs.into_iter().map(Arc::new).collect(),
        }
    }

    /// Process-wide registry of built-in formats.
    pub fn global() -> &'static FormatRegistry {
        GLOBAL.get_or_init(|| Self::builtin().expect("built-in format patterns compile"))
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<FormatSpec>, ParseError> {
        self.specs
            .iter()
            .find(|spec| spec.answers_to(name))
            .cloned()
            .ok_or_else(|| ParseError::FormatUnknown(name.to_string()))
    }

    /// A fresh per-stream parser for `name`.
    pub fn parser(&self, name: &str) -> Result<Parser, ParseError> {
        self.resolve(name).map(Parser::from_spec)
    }

    /// Canonical names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|spec| spec.name())
    }

    pub fn snapshot(&self) -> Vec<FormatStatsSnapshot> {
        self.specs
            .iter()
            .map(|spec| spec.stats().snapshot(spec.name()))
            .collect()
    }
}
