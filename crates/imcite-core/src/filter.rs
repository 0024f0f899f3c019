//! Query/filter interface over a record snapshot
//!
//! Matching is case-insensitive substring search: the query splits on
//! whitespace and every term must occur somewhere in the record's title,
//! authors, or year (terms may hit different fields). Ranking is
//! deterministic: records whose title contains the whole query come first,
//! then records where an author contains it, then all remaining matches;
//! each band keeps the snapshot order (most recently added first). An
//! empty query returns the full snapshot unchanged.

use crate::record::PaperRecord;

/// Narrow a snapshot by the user's query, best match first. Never fails.
pub fn filter(records: &[PaperRecord], query: &str) -> Vec<PaperRecord> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return records.to_vec();
    }

    let whole = trimmed.to_lowercase();
    let terms: Vec<String> = whole.split_whitespace().map(str::to_string).collect();

    let mut title_band = Vec::new();
    let mut author_band = Vec::new();
    let mut rest_band = Vec::new();

    for record in records {
        let title = record.title.to_lowercase();
        let authors: Vec<String> = record.authors.iter().map(|a| a.to_lowercase()).collect();
        let year = record
            .year
            .map(|y| y.to_string())
            .unwrap_or_default();

        let matches = terms.iter().all(|term| {
            title.contains(term.as_str())
                || authors.iter().any(|a| a.contains(term.as_str()))
                || year.contains(term.as_str())
        });
        if !matches {
            continue;
        }

        if title.contains(&whole) {
            title_band.push(record.clone());
        } else if authors.iter().any(|a| a.contains(&whole)) {
            author_band.push(record.clone());
        } else {
            rest_band.push(record.clone());
        }
    }

    title_band
        .into_iter()
        .chain(author_band)
        .chain(rest_band)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str, authors: &[&str], year: i32) -> PaperRecord {
        PaperRecord {
            id,
            title: title.into(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            year: Some(year),
            cite_key: format!("Key{id}:{year}ta"),
            pdf_path: None,
        }
    }

    fn snapshot() -> Vec<PaperRecord> {
        vec![
            record(3, "Spectra of Random Graphs", &["Smith", "Jones"], 2019),
            record(2, "Graph Theory", &["Euler"], 1736),
            record(1, "Number Theory Notes", &["Graham"], 1994),
        ]
    }

    #[test]
    fn empty_query_returns_all_in_snapshot_order() {
        let records = snapshot();
        let result = filter(&records, "");
        assert_eq!(result, records);
        let result = filter(&records, "   ");
        assert_eq!(result, records);
    }

    #[test]
    fn no_match_returns_empty() {
        assert!(filter(&snapshot(), "zzz-no-match").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let records = snapshot();
        let upper = filter(&records, "SMITH");
        let lower = filter(&records, "smith");
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].id, 3);
    }

    #[test]
    fn title_matches_rank_before_author_matches() {
        // "graph" hits the titles of 3 and 2, and the author of 1
        let result = filter(&snapshot(), "graph");
        let ids: Vec<i64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn terms_may_match_different_fields() {
        // "euler" hits an author, "1736" hits the year
        let result = filter(&snapshot(), "euler 1736");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
        // a term matching nothing rules the record out
        assert!(filter(&snapshot(), "euler 2019").is_empty());
    }

    #[test]
    fn year_matches_as_substring() {
        let result = filter(&snapshot(), "1994");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn bands_preserve_snapshot_order() {
        let records = vec![
            record(5, "Alpha", &["Theory"], 2001),
            record(4, "Theory of Heat", &["Maxwell"], 1871),
            record(3, "Beta", &["Theory"], 2002),
            record(2, "Game Theory", &["Nash"], 1950),
        ];
        let ids: Vec<i64> = filter(&records, "theory").iter().map(|r| r.id).collect();
        // title band (4, 2) in snapshot order, then author band (5, 3)
        assert_eq!(ids, vec![4, 2, 5, 3]);
    }
}
