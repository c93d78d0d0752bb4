//! Mapping raw provider records into [`SearchResult`]s

use super::types::{RawRecord, SearchResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const TITLE_KEYS: &[&str] = &["title", "name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "snippet", "content"];
const URL_KEYS: &[&str] = &["url", "link", "href"];

/// Stand-in for a url the provider did not supply
pub const MISSING_URL: &str = "";

/// Highlight tags providers wrap around matched terms. Anything else in
/// angle brackets is content (`Vec<String>`) and is left alone.
static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:strong|b|em|i|mark|br)\s*/?>").unwrap());

/// Keep the first `limit` records in provider order and rank them 1..n.
///
/// Never pads: a short provider page gives a short result list.
pub fn normalize(raw: Vec<RawRecord>, limit: usize) -> Vec<SearchResult> {
    raw.into_iter()
        .take(limit)
        .zip(1u32..)
        .map(|(record, rank)| SearchResult {
            rank,
            title: text_field(&record, TITLE_KEYS).unwrap_or_default(),
            description: text_field(&record, DESCRIPTION_KEYS).unwrap_or_default(),
            url: text_field(&record, URL_KEYS).unwrap_or_else(|| MISSING_URL.to_string()),
        })
        .collect()
}

/// First alias present as a scalar, rendered to text with markup removed
fn text_field(record: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .find_map(scalar_text)
        .map(|text| strip_markup(&text))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Drop highlight tags such as `<strong>`
fn strip_markup(text: &str) -> String {
    MARKUP.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(n: usize) -> Vec<RawRecord> {
        (1..=n)
            .map(|i| {
                RawRecord::new(json!({
                    "title": format!("title {i}"),
                    "url": format!("https://example.com/{i}"),
                    "description": format!("desc {i}"),
                }))
            })
            .collect()
    }

    #[test]
    fn truncates_to_limit_in_order() {
        let results = normalize(records(15), 10);
        assert_eq!(results.len(), 10);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.rank as usize, i + 1);
            assert_eq!(r.title, format!("title {}", i + 1));
        }
    }

    #[test]
    fn short_input_is_not_padded() {
        let results = normalize(records(3), 10);
        assert_eq!(results.len(), 3);
        assert_eq!(
            results.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(normalize(vec![], 10).is_empty());
    }

    #[test]
    fn zero_limit_gives_empty_output() {
        assert!(normalize(records(5), 0).is_empty());
    }

    #[test]
    fn absent_fields_become_empty_strings() {
        let results = normalize(vec![RawRecord::new(json!({}))], 1);
        assert_eq!(
            results[0],
            SearchResult {
                rank: 1,
                title: String::new(),
                description: String::new(),
                url: MISSING_URL.to_string(),
            }
        );
    }

    #[test]
    fn non_object_record_is_still_a_row() {
        let results = normalize(vec![RawRecord::new(json!(42)), RawRecord::new(json!(null))], 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].rank, 2);
        assert!(results[1].title.is_empty());
    }

    #[test]
    fn aliases_are_used() {
        let raw = RawRecord::new(json!({
            "name": "Named",
            "snippet": "a snippet",
            "link": "https://link.example",
        }));
        let r = &normalize(vec![raw], 1)[0];
        assert_eq!(r.title, "Named");
        assert_eq!(r.description, "a snippet");
        assert_eq!(r.url, "https://link.example");
    }

    #[test]
    fn null_primary_falls_back_to_alias() {
        let raw = RawRecord::new(json!({"title": null, "name": "fallback"}));
        assert_eq!(normalize(vec![raw], 1)[0].title, "fallback");
    }

    #[test]
    fn scalars_are_rendered() {
        let raw = RawRecord::new(json!({"title": 2024, "description": true}));
        let r = &normalize(vec![raw], 1)[0];
        assert_eq!(r.title, "2024");
        assert_eq!(r.description, "true");
    }

    #[test]
    fn highlight_markup_is_stripped() {
        let raw = RawRecord::new(json!({
            "title": "Tokyo <strong>weather</strong>",
            "description": " Today in <strong>Tokyo</strong>: 3 < 5 <br/> ",
        }));
        let r = &normalize(vec![raw], 1)[0];
        assert_eq!(r.title, "Tokyo weather");
        assert_eq!(r.description, "Today in Tokyo: 3 < 5");
    }

    #[test]
    fn angle_bracketed_text_is_kept() {
        let raw = RawRecord::new(json!({
            "title": "Option<T> and Vec<String> in Rust",
            "description": "Use <B>Box</B><dyn Error> or <EM>anyhow</EM>",
        }));
        let r = &normalize(vec![raw], 1)[0];
        assert_eq!(r.title, "Option<T> and Vec<String> in Rust");
        assert_eq!(r.description, "Use Box<dyn Error> or anyhow");
    }

    #[test]
    fn ranks_ignore_provider_scores() {
        let raw = vec![
            RawRecord::new(json!({"title": "b", "rank": 7, "score": 0.1})),
            RawRecord::new(json!({"title": "a", "rank": 1, "score": 0.9})),
        ];
        let results = normalize(raw, 2);
        assert_eq!(results[0].title, "b");
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].rank, 2);
    }
}
