//! Property tests for URL canonicalization: equivalent spellings of the same
//! address always collapse to one form.

use markwarden::detectors::url_normalizer::normalize_url;
use proptest::prelude::*;

fn host() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9]{0,10}", "[a-z]{2,4}").prop_map(|(name, tld)| format!("{}.{}", name, tld))
}

fn path() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z0-9]{1,8}", 0..4).prop_map(|segments| {
        if segments.is_empty() {
            String::new()
        } else {
            format!("/{}", segments.join("/"))
        }
    })
}

proptest! {
    /// The `www.` prefix never distinguishes two URLs.
    #[test]
    fn www_prefix_is_transparent(host in host(), path in path()) {
        let plain = format!("https://{}{}", host, path);
        let www = format!("https://www.{}{}", host, path);
        prop_assert_eq!(normalize_url(&plain), normalize_url(&www));
    }

    /// A trailing slash never distinguishes two URLs.
    #[test]
    fn trailing_slash_is_transparent(host in host(), path in path()) {
        let bare = format!("http://{}{}", host, path);
        let slashed = format!("http://{}{}/", host, path);
        prop_assert_eq!(normalize_url(&bare), normalize_url(&slashed));
    }

    /// Scheme and host casing never distinguish two URLs.
    #[test]
    fn scheme_and_host_case_is_transparent(host in host(), path in path()) {
        let lower = format!("https://{}{}", host, path);
        let upper = format!("HTTPS://{}{}", host.to_uppercase(), path);
        prop_assert_eq!(normalize_url(&lower), normalize_url(&upper));
    }

    /// Normalizing twice equals normalizing once, parseable or not.
    #[test]
    fn normalization_is_idempotent(input in "[a-z0-9:/?=. -]{0,60}") {
        let once = normalize_url(&input);
        let twice = normalize_url(&once);
        prop_assert_eq!(twice, once);
    }

    /// Distinct queries stay distinct.
    #[test]
    fn queries_are_preserved(host in host(), a in "[a-z]{1,5}", b in "[a-z]{1,5}") {
        prop_assume!(a != b);
        let with_a = normalize_url(&format!("https://{}/page?q={}", host, a));
        let with_b = normalize_url(&format!("https://{}/page?q={}", host, b));
        prop_assert_ne!(with_a, with_b);
    }
}
