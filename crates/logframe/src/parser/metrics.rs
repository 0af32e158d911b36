use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

/// Forces the wrapped counters onto their own 64-byte cache line so formats
/// parsed by different stream tasks do not contend on one line.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Parse outcome counters for one format.
///
/// Updated on every parse attempt by whichever stream task owns the parser;
/// all operations use `Ordering::Relaxed`. Snapshots are not transactional,
/// `parsed` and `unparsed` may be read a few increments apart.
#[derive(Debug, Default)]
pub struct FormatStats {
    parsed: CacheAligned<AtomicU64>,
    unparsed: CacheAligned<AtomicU64>,
}

impl FormatStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&self, success: bool) {
        if success {
            self.parsed.0.fetch_add(1, Ordering::Relaxed);
        } else {
            self.unparsed.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self, format: &str) -> FormatStatsSnapshot {
        let parsed = self.parsed.0.load(Ordering::Relaxed);
        let unparsed = self.unparsed.0.load(Ordering::Relaxed);
        let attempts = parsed + unparsed;

        FormatStatsSnapshot {
            format: format.to_string(),
            parsed,
            unparsed,
            success_rate: if attempts > 0 {
                parsed as f64 / attempts as f64
            } else {
                1.0
            },
        }
    }
}

/// Read-only view of a format's counters, cheap to clone and serialize.
#[derive(Debug, Clone, Serialize)]
pub struct FormatStatsSnapshot {
    pub format: String,
    pub parsed: u64,
    pub unparsed: u64,
    pub success_rate: f64,
}
