//! Dead-link detection for MarkWarden.
//!
//! Consults the validity cache per URL, probes misses in bounded-concurrency
//! waves with a pacing delay between waves, and writes every verdict back
//! with a fresh timestamp. Probe failures always resolve into verdicts —
//! nothing here returns an error to the caller.

use std::time::Duration;

use futures::future::join_all;
use log::debug;

use crate::managers::validity_cache::{now_ms, ValidityCache, ValidityCacheTrait};
use crate::types::bookmark::Bookmark;
use crate::types::detection::{CacheStats, DeadLinkReport, ValidityRecord};

/// Concurrent probes per wave.
pub const PROBE_CONCURRENCY: usize = 10;

/// Per-probe time box.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause between waves, to avoid bursting the network or rate limits.
pub const WAVE_PACING: Duration = Duration::from_secs(1);

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeVerdict {
    pub valid: bool,
    pub error: Option<String>,
}

impl ProbeVerdict {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Trait for the network probe, so tests can substitute a scripted prober.
#[allow(async_fn_in_trait)]
pub trait LinkProber {
    async fn probe(&self, url: &str) -> ProbeVerdict;
}

/// Real prober: HEAD with a timeout, falling back to GET before declaring a
/// link invalid (some servers reject HEAD outright).
pub struct HttpLinkProber {
    http: reqwest::Client,
}

impl HttpLinkProber {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpLinkProber {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkProber for HttpLinkProber {
    async fn probe(&self, url: &str) -> ProbeVerdict {
        match self.http.head(url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response)
                if response.status().is_success() || response.status().is_redirection() =>
            {
                return ProbeVerdict::valid();
            }
            _ => {}
        }
        match self.http.get(url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response)
                if response.status().is_success() || response.status().is_redirection() =>
            {
                ProbeVerdict::valid()
            }
            Ok(response) => ProbeVerdict::invalid(format!("HTTP {}", response.status())),
            Err(e) if e.is_timeout() => ProbeVerdict::invalid("probe timed out"),
            Err(e) => ProbeVerdict::invalid(e.to_string()),
        }
    }
}

/// Dead-link detector generic over the prober.
pub struct DeadLinkDetector<P: LinkProber> {
    prober: P,
}

impl<P: LinkProber> DeadLinkDetector<P> {
    pub fn new(prober: P) -> Self {
        Self { prober }
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Scans the flattened bookmark list, using cached verdicts where fresh.
    pub async fn scan(
        &self,
        bookmarks: &[Bookmark],
        cache: &mut ValidityCache,
    ) -> DeadLinkReport {
        let mut report = DeadLinkReport::default();
        let mut stats = CacheStats::default();
        let mut to_probe: Vec<&Bookmark> = Vec::new();

        for bookmark in bookmarks {
            let fresh = cache
                .get(&bookmark.url)
                .filter(|record| cache.is_fresh(record))
                .cloned();
            match fresh {
                Some(record) => {
                    stats.hits += 1;
                    tally(&mut report, bookmark, record.valid);
                    // Every verdict, hit or miss, gets a fresh timestamp
                    cache.put(
                        &bookmark.url,
                        ValidityRecord {
                            valid: record.valid,
                            error: record.error,
                            timestamp: now_ms(),
                        },
                    );
                }
                None => {
                    stats.misses += 1;
                    to_probe.push(bookmark);
                }
            }
        }

        let waves = to_probe.chunks(PROBE_CONCURRENCY);
        let wave_count = waves.len();
        for (index, wave) in waves.enumerate() {
            if index > 0 {
                tokio::time::sleep(WAVE_PACING).await;
            }
            debug!("probe wave {}/{} ({} URL(s))", index + 1, wave_count, wave.len());

            let probes = wave.iter().map(|bookmark| async {
                let verdict = self.classify_and_probe(&bookmark.url).await;
                (*bookmark, verdict)
            });
            for (bookmark, verdict) in join_all(probes).await {
                cache.put(
                    &bookmark.url,
                    ValidityRecord {
                        valid: verdict.valid,
                        error: verdict.error,
                        timestamp: now_ms(),
                    },
                );
                tally(&mut report, bookmark, verdict.valid);
            }
        }

        report.cache_stats = stats;
        report
    }

    /// Scheme gate ahead of the network: `file:` URLs are trusted valid,
    /// malformed URLs and disallowed schemes are invalid without a probe.
    async fn classify_and_probe(&self, raw: &str) -> ProbeVerdict {
        match url::Url::parse(raw.trim()) {
            Ok(parsed) => match parsed.scheme() {
                "file" => ProbeVerdict::valid(),
                "http" | "https" => self.prober.probe(raw).await,
                other => ProbeVerdict::invalid(format!("unsupported scheme: {}", other)),
            },
            Err(e) => ProbeVerdict::invalid(format!("malformed URL: {}", e)),
        }
    }
}

fn tally(report: &mut DeadLinkReport, bookmark: &Bookmark, valid: bool) {
    if valid {
        report.valid += 1;
    } else {
        report.invalid += 1;
        report.invalid_bookmarks.push(bookmark.clone());
    }
}
