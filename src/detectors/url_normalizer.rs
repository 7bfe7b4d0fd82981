//! URL canonicalization for equality comparisons.

use url::Url;

/// Canonicalizes a URL for duplicate comparison: lower-cases the scheme and
/// host, strips a leading `www.`, and drops the trailing slash. Query strings
/// are kept — different queries are usually different pages. URLs that fail
/// to parse fall back to the trimmed, lower-cased input.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(parsed) => {
            let scheme = parsed.scheme().to_lowercase();
            let host = parsed.host_str().unwrap_or("").to_lowercase();
            let host = host.strip_prefix("www.").unwrap_or(&host);

            let mut normalized = format!("{}://{}", scheme, host);
            if let Some(port) = parsed.port() {
                normalized.push(':');
                normalized.push_str(&port.to_string());
            }
            normalized.push_str(parsed.path().trim_end_matches('/'));
            if let Some(query) = parsed.query() {
                normalized.push('?');
                normalized.push_str(query);
            }
            normalized
        }
        Err(_) => trimmed.trim_end_matches('/').to_lowercase(),
    }
}
