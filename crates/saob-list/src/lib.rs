//! Load the scraped SAOB word list and index it by lemma.
//!
//! The snapshot is a headerless CSV produced by the list scraper: column 0 is
//! a row counter (ignored), column 1 the written form, column 2 the free-text
//! category token, column 3 an optional homonym number (empty means 0), and
//! column 4 the article URL whose `id` query parameter becomes the entry id.
//!
//! Malformed rows are skipped with a warning and counted on the returned
//! [`Snapshot`]; they never abort the load. [`CandidateIndex`] gives exact,
//! case-sensitive lemma lookup returning candidates in file order.
//!
//! ```no_run
//! use saob_list::{CandidateIndex, read_snapshot};
//!
//! # fn main() -> Result<(), saob_list::ListError> {
//! let snapshot = read_snapshot("saob.csv")?;
//! let index = CandidateIndex::build(snapshot.entries);
//! for entry in index.lookup("hund") {
//!     println!("{} {}", entry.raw_category, entry.url());
//! }
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use lexsaob_types::SaobEntry;

/// Errors that abort loading the word list entirely.
///
/// Per-row problems are downgraded to warnings and counted instead.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to read word list: {0}")]
    Csv(#[from] csv::Error),
}

/// Result of reading a snapshot file.
#[derive(Debug)]
pub struct Snapshot {
    /// Entries in file order.
    pub entries: Vec<SaobEntry>,
    /// Rows dropped because of missing columns, empty lemma, a bad number, or
    /// a URL without an `id` parameter.
    pub skipped_rows: usize,
}

/// Read a snapshot CSV from disk.
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Snapshot, ListError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut entries = Vec::new();
    let mut skipped_rows = 0usize;
    for (row_number, record) in reader.records().enumerate() {
        let record = record?;
        match parse_row(&record) {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                warn!("skipping word list row {}: {reason}", row_number + 1);
                skipped_rows += 1;
            }
        }
    }

    info!(
        "loaded {} word list entries ({} rows skipped)",
        entries.len(),
        skipped_rows
    );
    Ok(Snapshot {
        entries,
        skipped_rows,
    })
}

fn parse_row(record: &csv::StringRecord) -> Result<SaobEntry, String> {
    if record.len() < 5 {
        return Err(format!("expected 5 columns, got {}", record.len()));
    }
    let lemma = record[1].to_string();
    if lemma.is_empty() {
        return Err("empty lemma".to_string());
    }
    let raw_category = record[2].to_string();
    let number = if record[3].is_empty() {
        0
    } else {
        record[3]
            .parse::<u32>()
            .map_err(|_| format!("bad homonym number {:?}", &record[3]))?
    };
    let id = entry_id_from_url(&record[4])?;

    Ok(SaobEntry {
        id,
        lemma,
        raw_category,
        number,
    })
}

fn entry_id_from_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|e| format!("bad entry URL {raw:?}: {e}"))?;
    url.query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| format!("entry URL {raw:?} has no id parameter"))
}

/// Exact-lemma lookup over the full entry list.
///
/// Every entry lands in exactly one bucket keyed by its lemma string as-is:
/// no case folding, no diacritic normalization. Lookups return candidates in
/// original file order so repeated runs stay reproducible.
#[derive(Debug, Clone)]
pub struct CandidateIndex {
    entries: Vec<SaobEntry>,
    by_lemma: HashMap<String, Vec<usize>>,
}

impl CandidateIndex {
    /// Build the index, consuming the entry list.
    pub fn build(entries: Vec<SaobEntry>) -> Self {
        let mut by_lemma: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, entry) in entries.iter().enumerate() {
            by_lemma.entry(entry.lemma.clone()).or_default().push(position);
        }
        Self { entries, by_lemma }
    }

    /// All entries whose lemma equals `lemma`, in file order.
    pub fn lookup(&self, lemma: &str) -> Vec<&SaobEntry> {
        self.by_lemma
            .get(lemma)
            .map(|positions| positions.iter().map(|&p| &self.entries[p]).collect())
            .unwrap_or_default()
    }

    /// Total number of indexed entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of distinct lemmas.
    pub fn lemma_count(&self) -> usize {
        self.by_lemma.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(lemma: &str, raw_category: &str, id: &str) -> SaobEntry {
        SaobEntry {
            id: id.to_string(),
            lemma: lemma.to_string(),
            raw_category: raw_category.to_string(),
            number: 0,
        }
    }

    #[test]
    fn lookup_returns_exact_matches_in_file_order() {
        let index = CandidateIndex::build(vec![
            entry("väg", "subst.", "V_1"),
            entry("vägg", "subst.", "V_2"),
            entry("väg", "verb", "V_3"),
        ]);
        let hits = index.lookup("väg");
        assert_eq!(
            hits.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["V_1", "V_3"]
        );
        assert!(index.lookup("Väg").is_empty(), "lookup is case-sensitive");
        assert!(index.lookup("saknas").is_empty());
        assert_eq!(index.entry_count(), 3);
        assert_eq!(index.lemma_count(), 2);
    }

    #[test]
    fn extracts_id_from_entry_url() {
        let id = entry_id_from_url("https://www.saob.se/artikel/?id=O_0283-0242.Qqdq&pz=5")
            .expect("id present");
        assert_eq!(id, "O_0283-0242.Qqdq");
        assert!(entry_id_from_url("https://www.saob.se/artikel/?pz=5").is_err());
        assert!(entry_id_from_url("not a url").is_err());
    }
}
