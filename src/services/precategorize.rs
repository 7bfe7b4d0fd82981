//! Rule-based pre-categorization for MarkWarden.
//!
//! Deterministic domain/keyword classifier with two call sites: embedded in
//! the LLM prompt as a starting-partition hint, and used as the fallback
//! result when the network is unreachable, the API key is invalid, or parsing
//! permanently fails.

use url::Url;

use crate::types::bookmark::Bookmark;
use crate::types::category::{BookmarkRef, CategoryMap, OTHER_CATEGORY};

/// Registered-domain patterns mapped to category names. First match wins.
/// This is the single canonical table; the validator's domain-majority
/// inference consults it too.
const DOMAIN_RULES: &[(&str, &str)] = &[
    // Development
    ("github.com", "Development"),
    ("gitlab.com", "Development"),
    ("stackoverflow.com", "Development"),
    ("docs.rs", "Development"),
    ("crates.io", "Development"),
    ("developer.mozilla.org", "Development"),
    // Video
    ("youtube.com", "Video"),
    ("youtu.be", "Video"),
    ("vimeo.com", "Video"),
    ("twitch.tv", "Video"),
    ("netflix.com", "Video"),
    // Social
    ("twitter.com", "Social"),
    ("x.com", "Social"),
    ("facebook.com", "Social"),
    ("instagram.com", "Social"),
    ("reddit.com", "Social"),
    ("linkedin.com", "Social"),
    // Shopping
    ("amazon.", "Shopping"),
    ("ebay.", "Shopping"),
    ("aliexpress.com", "Shopping"),
    ("etsy.com", "Shopping"),
    // News
    ("nytimes.com", "News"),
    ("bbc.co.uk", "News"),
    ("bbc.com", "News"),
    ("cnn.com", "News"),
    ("theguardian.com", "News"),
    ("reuters.com", "News"),
    // Reading
    ("medium.com", "Reading"),
    ("substack.com", "Reading"),
    // Reference & research
    ("wikipedia.org", "Reference"),
    ("arxiv.org", "Research"),
    ("scholar.google.com", "Research"),
    // Music
    ("spotify.com", "Music"),
    ("soundcloud.com", "Music"),
    ("bandcamp.com", "Music"),
    // Learning
    ("coursera.org", "Learning"),
    ("udemy.com", "Learning"),
    ("khanacademy.org", "Learning"),
    // Productivity
    ("docs.google.com", "Productivity"),
    ("notion.so", "Productivity"),
    ("trello.com", "Productivity"),
];

/// Title keywords (case-insensitive substring) tried when domain matching
/// misses.
const KEYWORD_RULES: &[(&str, &str)] = &[
    ("tutorial", "Learning"),
    ("course", "Learning"),
    ("documentation", "Development"),
    ("docs", "Development"),
    ("api reference", "Development"),
    ("news", "News"),
    ("recipe", "Cooking"),
    ("blog", "Reading"),
    ("shop", "Shopping"),
    ("store", "Shopping"),
    ("music", "Music"),
    ("playlist", "Music"),
    ("video", "Video"),
    ("game", "Gaming"),
    ("wiki", "Reference"),
    ("forum", "Social"),
];

/// Extracts the host of a URL, lower-cased with any leading `www.` removed.
/// Unparsable URLs yield an empty string.
pub fn domain_of(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("").to_lowercase();
            host.strip_prefix("www.").unwrap_or(&host).to_string()
        }
        Err(_) => String::new(),
    }
}

/// Returns the rule category for a domain, if any.
pub fn category_for_domain(domain: &str) -> Option<&'static str> {
    DOMAIN_RULES
        .iter()
        .find(|(pattern, _)| domain_matches(domain, pattern))
        .map(|(_, category)| *category)
}

/// Anchored matcher. Trailing-dot patterns are registered-domain prefixes:
/// `"amazon."` matches `amazon.co.uk` and `smile.amazon.de` but not
/// `notamazon.example`. Other patterns match the host exactly or as a parent
/// domain on a label boundary, so `"x.com"` never fires on `linux.com`.
fn domain_matches(host: &str, pattern: &str) -> bool {
    if pattern.ends_with('.') {
        host.starts_with(pattern) || host.contains(&format!(".{}", pattern))
    } else {
        host == pattern || host.ends_with(&format!(".{}", pattern))
    }
}

/// Returns the rule category for a title, if any.
pub fn category_for_title(title: &str) -> Option<&'static str> {
    let title_lower = title.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(keyword, _)| title_lower.contains(keyword))
        .map(|(_, category)| *category)
}

/// Classifies one bookmark: domain rules first, then title keywords.
pub fn category_for(title: &str, url: &str) -> Option<&'static str> {
    category_for_domain(&domain_of(url)).or_else(|| category_for_title(title))
}

/// Classifies a bookmark list by rules alone. Bookmarks no rule matches are
/// omitted — this partial map is the prompt hint, not a partition.
pub fn categorize_by_rules(bookmarks: &[Bookmark]) -> CategoryMap {
    let mut map = CategoryMap::new();
    for bookmark in bookmarks {
        if let Some(category) = category_for(&bookmark.title, &bookmark.url) {
            map.entry(category.to_string()).or_default().push(BookmarkRef {
                title: bookmark.title.clone(),
                url: bookmark.url.clone(),
            });
        }
    }
    map
}

/// Rule-based classification with leftovers routed to `"Other"`, producing a
/// complete partition. This is the fallback shape for degraded batches and
/// for whole-run degradation on preflight failure.
pub fn fallback_partition(bookmarks: &[Bookmark]) -> CategoryMap {
    let mut map = CategoryMap::new();
    for bookmark in bookmarks {
        let category = category_for(&bookmark.title, &bookmark.url).unwrap_or(OTHER_CATEGORY);
        map.entry(category.to_string()).or_default().push(BookmarkRef {
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
        });
    }
    map
}
