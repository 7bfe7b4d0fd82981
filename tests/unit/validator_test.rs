//! Unit tests for category post-processing: count capping and degenerate
//! name relabeling.

use markwarden::services::validator::validate_categories;
use markwarden::types::category::{BookmarkRef, CategoryMap, MAX_CATEGORIES, OTHER_CATEGORY};

fn entry(n: usize) -> BookmarkRef {
    BookmarkRef {
        title: format!("Bookmark {}", n),
        url: format!("https://site{}.example/page", n),
    }
}

fn entries(count: usize, offset: usize) -> Vec<BookmarkRef> {
    (0..count).map(|i| entry(offset + i)).collect()
}

fn total(map: &CategoryMap) -> usize {
    map.values().map(|v| v.len()).sum()
}

#[test]
fn test_small_map_passes_through() {
    let mut raw = CategoryMap::new();
    raw.insert("Development".to_string(), entries(3, 0));
    raw.insert("News".to_string(), entries(2, 10));
    let validated = validate_categories(raw.clone());
    assert_eq!(validated, raw);
}

#[test]
fn test_oversized_map_is_capped() {
    // 40 singleton categories plus 5 large ones
    let mut raw = CategoryMap::new();
    for i in 0..40 {
        raw.insert(format!("Niche {}", i), entries(1, i));
    }
    for i in 0..5 {
        raw.insert(format!("Big {}", i), entries(10, 100 + i * 10));
    }
    let before = total(&raw);
    let validated = validate_categories(raw);

    assert!(validated.len() <= MAX_CATEGORIES);
    assert_eq!(total(&validated), before);
    // The large categories always survive
    for i in 0..5 {
        assert_eq!(validated[&format!("Big {}", i)].len(), 10);
    }
    // Singletons past the bound land in Other
    assert!(validated[OTHER_CATEGORY].len() >= 11);
}

#[test]
fn test_capping_never_drops_bookmarks() {
    let mut raw = CategoryMap::new();
    for i in 0..60 {
        raw.insert(format!("Category {}", i), entries(2, i * 2));
    }
    let before = total(&raw);
    let validated = validate_categories(raw);
    assert!(validated.len() <= MAX_CATEGORIES);
    assert_eq!(total(&validated), before);
}

#[test]
fn test_numeric_name_relabeled_by_domain_majority() {
    let mut raw = CategoryMap::new();
    raw.insert(
        "3".to_string(),
        vec![
            BookmarkRef {
                title: "GitHub".to_string(),
                url: "https://github.com/a".to_string(),
            },
            BookmarkRef {
                title: "GitLab".to_string(),
                url: "https://gitlab.com/b".to_string(),
            },
            BookmarkRef {
                title: "Unknown".to_string(),
                url: "https://example.invalid".to_string(),
            },
        ],
    );
    let validated = validate_categories(raw);
    assert!(validated.contains_key("Development"));
    assert!(!validated.contains_key("3"));
    assert_eq!(validated["Development"].len(), 3);
}

#[test]
fn test_degenerate_name_without_majority_goes_to_other() {
    let mut raw = CategoryMap::new();
    raw.insert(
        "x".to_string(),
        (0..6)
            .map(|i| BookmarkRef {
                title: format!("Site {}", i),
                url: format!("https://obscure{}.invalid", i),
            })
            .collect(),
    );
    let validated = validate_categories(raw);
    assert_eq!(validated.len(), 1);
    assert_eq!(validated[OTHER_CATEGORY].len(), 6);
}

#[test]
fn test_relabeled_category_merges_into_existing() {
    let mut raw = CategoryMap::new();
    raw.insert("Development".to_string(), entries(2, 0));
    raw.insert(
        "7".to_string(),
        vec![BookmarkRef {
            title: "GitHub".to_string(),
            url: "https://github.com".to_string(),
        }],
    );
    let validated = validate_categories(raw);
    assert_eq!(validated.len(), 1);
    assert_eq!(validated["Development"].len(), 3);
}

#[test]
fn test_overlong_names_are_bounded() {
    let long_name = "A".repeat(80);
    let mut raw = CategoryMap::new();
    raw.insert(long_name, entries(2, 0));
    let validated = validate_categories(raw);
    let name = validated.keys().next().unwrap();
    assert_eq!(name.chars().count(), 30);
}
