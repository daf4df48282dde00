//! Listing helpers applied by callers on top of a `ContentStore`.
//!
//! Stores hand back entries unordered; sorting, filtering and pagination all
//! happen here.

use crate::domain::model::ContentEntry;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::cmp::Ordering;

pub const ALL_CATEGORIES: &str = "All";

/// Accepts `YYYY-MM-DD`, RFC 3339, or `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_published(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()
}

pub fn published_date(entry: &ContentEntry) -> Option<NaiveDateTime> {
    entry.published_at().and_then(parse_published)
}

/// 新的在前；無法解析日期的排最後
fn newest_first(a: &ContentEntry, b: &ContentEntry) -> Ordering {
    match (published_date(a), published_date(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_by_published_desc(entries: &mut [ContentEntry]) {
    entries.sort_by(newest_first);
}

/// Entries whose `flag_field` is true come first, each group newest first.
pub fn sort_highlighted_first(entries: &mut [ContentEntry], flag_field: &str) {
    entries.sort_by(|a, b| {
        let a_flag = a.metadata.get_bool(flag_field).unwrap_or(false);
        let b_flag = b.metadata.get_bool(flag_field).unwrap_or(false);
        b_flag.cmp(&a_flag).then_with(|| newest_first(a, b))
    });
}

pub fn category(entry: &ContentEntry) -> Option<&str> {
    entry.metadata.get_str("category")
}

/// `All` keeps every entry.
pub fn filter_by_category(entries: Vec<ContentEntry>, wanted: &str) -> Vec<ContentEntry> {
    if wanted == ALL_CATEGORIES {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| category(entry) == Some(wanted))
        .collect()
}

/// Unique categories in first-seen order.
pub fn categories(entries: &[ContentEntry]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in entries.iter().filter_map(category) {
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Same-category entries first, then the rest, excluding `current`.
pub fn related_posts<'a>(
    current: &ContentEntry,
    all: &'a [ContentEntry],
    max: usize,
) -> Vec<&'a ContentEntry> {
    let current_category = category(current);
    let others = all.iter().filter(|entry| entry.slug != current.slug);
    let (same, different): (Vec<&ContentEntry>, Vec<&ContentEntry>) =
        others.partition(|entry| current_category.is_some() && category(entry) == current_category);

    same.into_iter().chain(different).take(max).collect()
}

pub fn more_posts<'a>(current: &ContentEntry, all: &'a [ContentEntry], max: usize) -> Vec<&'a ContentEntry> {
    all.iter()
        .filter(|entry| entry.slug != current.slug)
        .take(max)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

impl<T> Paginated<T> {
    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }
}

pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Paginated<T> {
    let total = items.len();
    let page = items.into_iter().skip(offset).take(limit).collect();
    Paginated {
        items: page,
        total,
        offset,
        limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Metadata;

    fn post(slug: &str, date: &str, category: &str, highlighted: bool) -> ContentEntry {
        let mut metadata = Metadata::new();
        metadata.insert("title", slug);
        metadata.insert("publishedAt", date);
        metadata.insert("category", category);
        metadata.insert("highlighted", highlighted);
        ContentEntry {
            slug: slug.to_string(),
            metadata,
            content: String::new(),
        }
    }

    fn slugs(entries: &[ContentEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.slug.as_str()).collect()
    }

    #[test]
    fn test_parse_published_formats() {
        assert!(parse_published("2024-03-01").is_some());
        assert!(parse_published("2024-03-01T10:00:00Z").is_some());
        assert!(parse_published("2024-03-01T10:00:00").is_some());
        assert!(parse_published("March 1st").is_none());
    }

    #[test]
    fn test_sort_by_published_desc_puts_undated_last() {
        let mut entries = vec![
            post("old", "2022-01-01", "A", false),
            post("undated", "someday", "A", false),
            post("new", "2024-06-01", "A", false),
        ];
        sort_by_published_desc(&mut entries);
        assert_eq!(slugs(&entries), vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_sort_highlighted_first() {
        let mut entries = vec![
            post("plain-new", "2024-06-01", "A", false),
            post("star-old", "2021-01-01", "A", true),
            post("star-new", "2023-01-01", "A", true),
            post("plain-old", "2020-01-01", "A", false),
        ];
        sort_highlighted_first(&mut entries, "highlighted");
        assert_eq!(
            slugs(&entries),
            vec!["star-new", "star-old", "plain-new", "plain-old"]
        );
    }

    #[test]
    fn test_filter_and_categories() {
        let entries = vec![
            post("a", "2024-01-01", "Leadership", false),
            post("b", "2024-01-02", "Technology", false),
            post("c", "2024-01-03", "Leadership", false),
        ];
        assert_eq!(categories(&entries), vec!["Leadership", "Technology"]);

        let filtered = filter_by_category(entries.clone(), "Leadership");
        assert_eq!(slugs(&filtered), vec!["a", "c"]);
        assert_eq!(filter_by_category(entries, ALL_CATEGORIES).len(), 3);
    }

    #[test]
    fn test_related_posts_prefers_same_category() {
        let all = vec![
            post("current", "2024-01-01", "Leadership", false),
            post("tech", "2024-01-02", "Technology", false),
            post("lead-1", "2024-01-03", "Leadership", false),
            post("lead-2", "2024-01-04", "Leadership", false),
        ];
        let related = related_posts(&all[0], &all, 3);
        let related: Vec<&str> = related.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(related, vec!["lead-1", "lead-2", "tech"]);

        assert_eq!(related_posts(&all[0], &all, 1).len(), 1);
    }

    #[test]
    fn test_more_posts_excludes_current() {
        let all = vec![
            post("a", "2024-01-01", "X", false),
            post("b", "2024-01-02", "X", false),
        ];
        let more = more_posts(&all[1], &all, 4);
        assert_eq!(more.len(), 1);
        assert_eq!(more[0].slug, "a");
    }

    #[test]
    fn test_paginate() {
        let page = paginate((1..=10).collect::<Vec<_>>(), 8, 8);
        assert_eq!(page.items, vec![9, 10]);
        assert_eq!(page.total, 10);
        assert!(!page.has_more());

        let first = paginate((1..=10).collect::<Vec<_>>(), 0, 8);
        assert!(first.has_more());
    }
}
