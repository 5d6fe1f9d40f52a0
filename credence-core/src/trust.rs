//! Domain trust table
//!
//! Maps known source domains to a curated trust value in [0, 1].
//! Lookups try an exact host match first, then the first known domain
//! (in declaration order) that the host ends with, then fall back to
//! [`UNKNOWN_DOMAIN_TRUST`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{CoreError, UNKNOWN_DOMAIN_TRUST};

/// Builtin trust values, in precedence order for suffix matching
static BUILTIN_DOMAINS: &[(&str, f64)] = &[
    // Wire services and newspapers of record
    ("reuters.com", 0.95),
    ("apnews.com", 0.95),
    ("nytimes.com", 0.95),
    ("bbc.com", 0.93),
    ("bbc.co.uk", 0.93),
    ("theguardian.com", 0.92),
    ("washingtonpost.com", 0.92),
    ("npr.org", 0.92),
    ("bloomberg.com", 0.92),
    ("wsj.com", 0.92),
    ("economist.com", 0.91),
    ("ft.com", 0.91),
    ("axios.com", 0.88),
    ("politico.com", 0.86),
    ("cnbc.com", 0.86),
    ("theatlantic.com", 0.85),
    ("cnn.com", 0.84),
    ("aljazeera.com", 0.82),
    // Research publishers and public health agencies
    ("nature.com", 0.97),
    ("science.org", 0.97),
    ("nejm.org", 0.97),
    ("thelancet.com", 0.97),
    ("jamanetwork.com", 0.96),
    ("pubmed.ncbi.nlm.nih.gov", 0.96),
    ("bmj.com", 0.95),
    ("nih.gov", 0.95),
    ("cdc.gov", 0.94),
    ("who.int", 0.93),
    ("plos.org", 0.92),
    ("arxiv.org", 0.90),
    // Reference works
    ("britannica.com", 0.88),
    ("wikipedia.org", 0.80),
    ("stackoverflow.com", 0.76),
    // User-generated publishing platforms
    ("github.com", 0.70),
    ("substack.com", 0.55),
    ("medium.com", 0.55),
    ("wordpress.com", 0.50),
    ("blogspot.com", 0.50),
    ("reddit.com", 0.50),
    ("quora.com", 0.45),
    // Satire and known misinformation sources
    ("theonion.com", 0.15),
    ("babylonbee.com", 0.15),
    ("infowars.com", 0.10),
    ("naturalnews.com", 0.10),
];

/// One row of a trust table file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustEntry {
    /// Domain without `www.` prefix
    pub name: String,
    /// Trust value (clamped to 0.0 - 1.0 on load)
    pub trust: f64,
}

#[derive(Debug, Deserialize)]
struct TrustFile {
    #[serde(default)]
    domain: Vec<TrustEntry>,
}

/// Immutable domain -> trust mapping that preserves declaration order
#[derive(Debug, Clone, Default)]
pub struct DomainTrustTable {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl DomainTrustTable {
    /// Build a table from ordered `(domain, trust)` pairs.
    ///
    /// Later duplicates overwrite the value but keep the first position.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (domain, trust) in entries {
            table.upsert(domain.into(), trust);
        }
        table
    }

    /// The curated table shipped with the engine
    pub fn builtin() -> Self {
        Self::new(BUILTIN_DOMAINS.iter().copied())
    }

    /// Parse a TOML table of `[[domain]]` entries
    pub fn from_toml_str(input: &str) -> Result<Self, CoreError> {
        let file: TrustFile =
            toml::from_str(input).map_err(|e| CoreError::TrustTable(e.to_string()))?;

        for entry in &file.domain {
            if entry.name.trim().is_empty() {
                return Err(CoreError::TrustTable("empty domain name".to_string()));
            }
            if !entry.trust.is_finite() {
                return Err(CoreError::TrustTable(format!(
                    "non-finite trust for {}",
                    entry.name
                )));
            }
        }

        Ok(Self::new(file.domain.into_iter().map(|e| (e.name, e.trust))))
    }

    /// Load a TOML trust table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Builtin table with `overrides` applied on top.
    ///
    /// Overridden domains keep their builtin position; new domains are appended.
    pub fn merged_over_builtin(overrides: &DomainTrustTable) -> Self {
        let mut table = Self::builtin();
        for (domain, trust) in &overrides.entries {
            table.upsert(domain.clone(), *trust);
        }
        table
    }

    fn upsert(&mut self, domain: String, trust: f64) {
        let domain = normalize_domain(&domain);
        let trust = trust.clamp(0.0, 1.0);
        match self.index.get(&domain) {
            Some(&pos) => self.entries[pos].1 = trust,
            None => {
                self.index.insert(domain.clone(), self.entries.len());
                self.entries.push((domain, trust));
            }
        }
    }

    /// Trust for a normalized host (exact, then suffix, then default)
    pub fn trust_for_host(&self, host: &str) -> f64 {
        if let Some(&pos) = self.index.get(host) {
            return self.entries[pos].1;
        }

        self.entries
            .iter()
            .find(|(known, _)| host.ends_with(known.as_str()))
            .map(|(_, trust)| *trust)
            .unwrap_or(UNKNOWN_DOMAIN_TRUST)
    }

    /// Trust for a URL; unparseable URLs get the unknown-domain default
    pub fn lookup(&self, url: &str) -> f64 {
        match normalize_host(url) {
            Some(host) => self.trust_for_host(&host),
            None => UNKNOWN_DOMAIN_TRUST,
        }
    }

    /// Exact-match trust, without suffix fallback
    pub fn get(&self, domain: &str) -> Option<f64> {
        self.index.get(domain).map(|&pos| self.entries[pos].1)
    }

    /// Domains in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(d, t)| (d.as_str(), *t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim().to_lowercase();
    match domain.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => domain,
    }
}

/// Lowercased URL host with a single leading `www.` removed.
///
/// Returns `None` when the URL cannot be parsed or has no host.
pub fn normalize_host(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }
    Some(normalize_domain(host))
}

/// Host used in human-readable output; falls back to the raw input
pub fn display_domain(url: &str) -> String {
    normalize_host(url).unwrap_or_else(|| url.trim().to_string())
}
