//! Content type classification
//!
//! Curated domain sets and TLD rules decide whether a page is news or
//! research; anything else keeps the caller's hint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::normalize_host;

/// Curated research publishers and indexes
pub static RESEARCH_DOMAINS: &[&str] = &[
    "arxiv.org",
    "pubmed.ncbi.nlm.nih.gov",
    "nature.com",
    "science.org",
    "nejm.org",
    "thelancet.com",
    "jamanetwork.com",
    "bmj.com",
    "plos.org",
];

/// Curated news organisations
pub static NEWS_DOMAINS: &[&str] = &[
    "nytimes.com",
    "theguardian.com",
    "bbc.com",
    "reuters.com",
    "apnews.com",
    "washingtonpost.com",
    "bloomberg.com",
    "npr.org",
    "axios.com",
    "cnbc.com",
];

/// URL substrings the orchestrator treats as news before scoring
const NEWS_URL_HINTS: &[&str] = &["news", "nytimes", "guardian"];

/// Category of a source, each bound to a fixed credibility weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    News,
    Research,
    Pdf,
    #[default]
    Blog,
    Unknown,
}

impl ContentType {
    /// Weight in [0, 1] applied to the content-type signal
    pub fn weight(self) -> f64 {
        match self {
            ContentType::News => 1.0,
            ContentType::Research => 0.95,
            ContentType::Pdf => 0.85,
            ContentType::Blog => 0.65,
            ContentType::Unknown => 0.60,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::News => "news",
            ContentType::Research => "research",
            ContentType::Pdf => "pdf",
            ContentType::Blog => "blog",
            ContentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = std::convert::Infallible;

    /// Unrecognized labels map to [`ContentType::Unknown`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "news" => ContentType::News,
            "research" => ContentType::Research,
            "pdf" => ContentType::Pdf,
            "blog" => ContentType::Blog,
            _ => ContentType::Unknown,
        })
    }
}

/// Resolve the content type of `url`, falling back to `hint`.
///
/// Precedence: curated research set, curated news set, `.gov`/`.edu`
/// anywhere in the host, then the hint unchanged.
pub fn classify(url: &str, hint: ContentType) -> ContentType {
    let Some(host) = normalize_host(url) else {
        return hint;
    };

    if RESEARCH_DOMAINS.contains(&host.as_str()) {
        ContentType::Research
    } else if NEWS_DOMAINS.contains(&host.as_str()) {
        ContentType::News
    } else if host.contains(".gov") || host.contains(".edu") {
        ContentType::Research
    } else {
        hint
    }
}

/// Cheap pre-classification from URL substrings alone
pub fn hint_from_url(url: &str) -> ContentType {
    if url.contains(".pdf") {
        ContentType::Pdf
    } else if NEWS_URL_HINTS.iter().any(|h| url.contains(h)) {
        ContentType::News
    } else {
        ContentType::Blog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights() {
        assert_eq!(ContentType::News.weight(), 1.0);
        assert_eq!(ContentType::Research.weight(), 0.95);
        assert_eq!(ContentType::Pdf.weight(), 0.85);
        assert_eq!(ContentType::Blog.weight(), 0.65);
        assert_eq!(ContentType::Unknown.weight(), 0.60);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("News".parse::<ContentType>().unwrap(), ContentType::News);
        assert_eq!(" pdf ".parse::<ContentType>().unwrap(), ContentType::Pdf);
        assert_eq!("podcast".parse::<ContentType>().unwrap(), ContentType::Unknown);
    }

    #[test]
    fn test_curated_sets_override_hint() {
        assert_eq!(
            classify("https://arxiv.org/abs/2401.00001", ContentType::Blog),
            ContentType::Research
        );
        assert_eq!(
            classify("https://www.nytimes.com/2024/01/01/x.html", ContentType::Pdf),
            ContentType::News
        );
    }

    #[test]
    fn test_edu_and_gov_hosts_are_research() {
        assert_eq!(
            classify("https://cs.stanford.edu/people/x", ContentType::Blog),
            ContentType::Research
        );
        assert_eq!(
            classify("https://www.energy.gov/report", ContentType::News),
            ContentType::Research
        );
    }

    #[test]
    fn test_curated_sets_are_exact_only() {
        // Subdomains of curated hosts are not in the curated sets
        assert_eq!(
            classify("https://blog.nytimes.com/post", ContentType::Blog),
            ContentType::Blog
        );
    }

    #[test]
    fn test_hint_passthrough() {
        assert_eq!(
            classify("https://example.com/post", ContentType::Pdf),
            ContentType::Pdf
        );
        assert_eq!(classify("::bad::", ContentType::Unknown), ContentType::Unknown);
    }

    #[test]
    fn test_hint_from_url() {
        assert_eq!(hint_from_url("https://x.org/paper.pdf"), ContentType::Pdf);
        assert_eq!(hint_from_url("https://foxnews.com/a"), ContentType::News);
        assert_eq!(hint_from_url("https://theguardian.com/a"), ContentType::News);
        assert_eq!(hint_from_url("https://example.com/a"), ContentType::Blog);
    }
}
