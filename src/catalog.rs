//! Book catalog ingestion from the structured YAML source.
//!
//! The catalog arrives as a YAML sequence of mappings whose keys carry stray
//! `:` characters (`"id:"`, `"title:"`). Keys are cleaned before field
//! mapping, the author string is reduced to an [`AuthorSet`], and structural
//! problems are fatal: YAML syntax errors surface with a diagnostic preview
//! of the source, malformed entries as typed [`CatalogError`]s naming the
//! entry.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde_yaml::Value;
use thiserror::Error;

use crate::{authors::AuthorSet, ingest::scrub_sentinel};

const DIAGNOSTIC_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog source is not a sequence of entries")]
    NotASequence,
    #[error("catalog entry {index} is not a mapping")]
    NotAMapping { index: usize },
    #[error("catalog entry {index} is missing an 'id' field")]
    MissingId { index: usize },
}

/// One catalog record after key cleanup. The price survives as the raw
/// string; nothing downstream consumes it.
#[derive(Debug, Clone)]
pub struct Book {
    pub id: String,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i64>,
    pub price: Option<String>,
    pub authors: AuthorSet,
}

/// Reads the book catalog, cleaning colon-suffixed keys and deriving each
/// entry's author-set.
pub fn load_books(path: &Path) -> Result<Vec<Book>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Opening catalog file {path:?}"))?;
    let value: Value = serde_yaml::from_str(&raw).with_context(|| {
        format!(
            "Parsing catalog YAML from {path:?}; source begins:\n{}",
            snippet(&raw)
        )
    })?;
    let entries = value.as_sequence().ok_or(CatalogError::NotASequence)?;
    let mut books = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        books.push(book_from_entry(index, entry)?);
    }
    info!("Ingested {} catalog entries from {:?}", books.len(), path);
    Ok(books)
}

fn book_from_entry(index: usize, entry: &Value) -> Result<Book> {
    let mapping = entry
        .as_mapping()
        .ok_or(CatalogError::NotAMapping { index })?;

    let mut id = None;
    let mut title = None;
    let mut author = None;
    let mut genre = None;
    let mut publisher = None;
    let mut year = None;
    let mut price = None;

    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            continue;
        };
        let cleaned: String = key.chars().filter(|c| *c != ':').collect();
        match cleaned.trim() {
            "id" => id = scalar_to_string(value),
            "title" => title = scalar_to_string(value),
            "author" => author = scalar_to_string(value),
            "genre" => genre = scalar_to_string(value),
            "publisher" => publisher = scalar_to_string(value),
            "year" => year = value.as_i64(),
            "price" => price = scalar_to_string(value),
            _ => {}
        }
    }

    let id = id.ok_or(CatalogError::MissingId { index })?;
    Ok(Book {
        id,
        title,
        genre,
        publisher,
        year,
        price,
        authors: AuthorSet::parse(author.as_deref()),
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => scrub_sentinel(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn snippet(raw: &str) -> &str {
    match raw.char_indices().nth(DIAGNOSTIC_PREVIEW_CHARS) {
        Some((byte_idx, _)) => &raw[..byte_idx],
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_yaml(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write yaml");
        file
    }

    #[test]
    fn colon_suffixed_keys_are_cleaned() {
        let file = write_yaml(
            "- \"id:\": b1\n  \"title:\": Dune\n  \"author:\": \"Dr. Jane Smith, John Doe\"\n  \"genre:\": scifi\n  \"publisher:\": Ace\n  \"year:\": 1965\n  \"price:\": \"$9.99\"\n",
        );
        let books = load_books(file.path()).expect("catalog loads");
        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.id, "b1");
        assert_eq!(book.title.as_deref(), Some("Dune"));
        assert_eq!(book.year, Some(1965));
        assert_eq!(book.authors.names(), ["Jane Smith", "John Doe"]);
    }

    #[test]
    fn numeric_ids_become_strings() {
        let file = write_yaml("- \"id:\": 17\n  \"author:\": solo\n");
        let books = load_books(file.path()).expect("catalog loads");
        assert_eq!(books[0].id, "17");
    }

    #[test]
    fn null_author_maps_to_the_placeholder_set() {
        let file = write_yaml("- \"id:\": b1\n  \"author:\": null\n");
        let books = load_books(file.path()).expect("catalog loads");
        assert_eq!(books[0].authors.names(), ["Unknown"]);
    }

    #[test]
    fn missing_id_is_fatal_and_names_the_entry() {
        let file = write_yaml("- \"title:\": Orphan\n");
        let err = load_books(file.path()).expect_err("missing id must fail");
        assert!(err.to_string().contains("entry 0"));
    }

    #[test]
    fn non_sequence_source_is_fatal() {
        let file = write_yaml("just: a mapping\n");
        assert!(load_books(file.path()).is_err());
    }

    #[test]
    fn invalid_yaml_reports_a_source_preview() {
        let file = write_yaml("- [unclosed\n");
        let err = load_books(file.path()).expect_err("syntax error must fail");
        assert!(format!("{err:#}").contains("source begins"));
    }
}
