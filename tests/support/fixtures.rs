//! Canned upstream bodies shared by the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;

/// Fixed "today" for every date-dependent assertion.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap_or_default()
}

/// One Atom `<entry>`.
pub fn atom_entry(id: &str, title: &str, summary: &str, published: &str) -> String {
    format!(
        "<entry><id>{id}</id><published>{published}</published><title>{title}</title>\
         <summary>{summary}</summary><author><name>Ada Lovelace</name></author></entry>"
    )
}

/// Atom feed wrapping `entries`.
pub fn atom_feed(entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><feed xmlns="http://www.w3.org/2005/Atom"><title>ArXiv Query</title>{}</feed>"#,
        entries.concat()
    )
}

/// One OpenAlex work; `date` of `None` serializes as `null`.
pub fn openalex_work(id: &str, title: &str, date: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "type": "article",
        "title": title,
        "publication_date": date,
        "cited_by_count": 3,
        "doi": format!("https://doi.org/10.1234/{id}"),
        "authorships": [{"author": {"display_name": "Charles Babbage"}}],
        "abstract_inverted_index": {"Working": [0], "paper": [1], "abstract": [2]},
        "primary_location": {"source": {"display_name": "NBER Working Paper Series"}}
    })
}

/// OpenAlex `/works` envelope.
pub fn openalex_works(results: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "meta": {"count": results.len()}, "results": results })
}
