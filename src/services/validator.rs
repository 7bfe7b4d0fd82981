//! Category post-processing for MarkWarden.
//!
//! Normalizes a raw LLM category map: caps the category count, relabels
//! numeric or degenerate category names via domain-majority inference, and
//! merges singleton categories into `"Other"`. Never drops a bookmark.

use std::collections::HashMap;

use crate::types::category::{
    BookmarkRef, CategoryMap, KEEP_TOP_CATEGORIES, MAX_CATEGORIES, OTHER_CATEGORY,
};
use crate::services::precategorize;

/// Share of member domains that must agree before a degenerate category name
/// is replaced by the inferred rule-table name.
const DOMAIN_MAJORITY_THRESHOLD: f64 = 0.2;

/// Normalizes a raw category map.
///
/// Every input bookmark appears in exactly one output category; the output
/// has at most [`MAX_CATEGORIES`] categories and no numeric or
/// shorter-than-two-character names.
pub fn validate_categories(raw: CategoryMap) -> CategoryMap {
    let capped = cap_category_count(raw);
    rename_degenerate_names(capped)
}

/// Folds an oversized map down to the category-count bound.
///
/// Sorts categories by size descending, keeps the top 25 untouched, keeps
/// remaining multi-member categories while under the bound, and merges
/// everything else (all singletons included) into `"Other"`.
fn cap_category_count(map: CategoryMap) -> CategoryMap {
    if map.len() <= MAX_CATEGORIES {
        return map;
    }

    let mut sized: Vec<(String, Vec<_>)> = map.into_iter().collect();
    sized.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));

    let mut out = CategoryMap::new();
    let mut kept = 0usize;
    let mut other = Vec::new();

    for (index, (name, entries)) in sized.into_iter().enumerate() {
        let keep = index < KEEP_TOP_CATEGORIES
            || (entries.len() > 1 && kept < MAX_CATEGORIES - 1);
        if keep && name != OTHER_CATEGORY {
            kept += 1;
            out.insert(name, entries);
        } else {
            other.extend(entries);
        }
    }

    if !other.is_empty() {
        out.entry(OTHER_CATEGORY.to_string()).or_default().extend(other);
    }
    out
}

/// Relabels category names matching `^\d+$` or shorter than 2 characters.
///
/// A degenerate name is replaced by the rule category that at least 20% of
/// its member domains map to, when one exists; otherwise by `"Other"`.
/// Members merge into an existing category of the same name.
fn rename_degenerate_names(map: CategoryMap) -> CategoryMap {
    let mut out = CategoryMap::new();
    for (name, entries) in map {
        let trimmed = name.trim();
        if !is_degenerate_name(trimmed) {
            // Names are bounded at 30 characters
            let bounded: String = trimmed.chars().take(30).collect();
            out.entry(bounded).or_default().extend(entries);
            continue;
        }
        let replacement = infer_category_name(&entries)
            .unwrap_or(OTHER_CATEGORY)
            .to_string();
        out.entry(replacement).or_default().extend(entries);
    }
    out
}

fn is_degenerate_name(name: &str) -> bool {
    name.chars().count() < 2 || name.chars().all(|c| c.is_ascii_digit())
}

/// Domain-majority inference: returns the rule category that the largest
/// share of member domains maps to, when that share clears the threshold.
fn infer_category_name(entries: &[BookmarkRef]) -> Option<&'static str> {
    if entries.is_empty() {
        return None;
    }
    let mut votes: HashMap<&'static str, usize> = HashMap::new();
    for entry in entries {
        let domain = precategorize::domain_of(&entry.url);
        if let Some(category) = precategorize::category_for_domain(&domain) {
            *votes.entry(category).or_insert(0) += 1;
        }
    }
    let (best, count) = votes.into_iter().max_by_key(|(_, count)| *count)?;
    let share = count as f64 / entries.len() as f64;
    (share >= DOMAIN_MAJORITY_THRESHOLD).then_some(best)
}
