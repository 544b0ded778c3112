//! Author-identity normalization.
//!
//! Catalog feeds spell authorship inconsistently: honorifics come and go,
//! casing varies, and multi-author strings list names in arbitrary order.
//! [`AuthorSet`] reduces a raw author string to an order-independent,
//! deduplicated, sorted tuple of clean name tokens so that two strings naming
//! the same people compare equal.

use std::fmt;
use std::sync::LazyLock;

use heck::ToTitleCase;
use regex::Regex;

/// Placeholder token for catalog entries with no author at all.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

// Whole-word honorific/credential tokens only; `Drake` must survive the
// `Dr.` rule and `Phdson` the `PhD` rule. Dotted titles anchor on the word
// boundary before the token plus the literal dot, credentials on boundaries
// either side.
static HONORIFICS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:Rep|Sen|Dr)\.|\b(?:LLD|PhD)\b").expect("hard-coded regex"));

/// An order-independent authorship identity: the sorted, deduplicated tuple
/// of cleaned author name tokens for one book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuthorSet(Vec<String>);

impl AuthorSet {
    /// Canonicalizes a raw author string; an absent value maps to the
    /// `Unknown` placeholder set.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self(vec![UNKNOWN_AUTHOR.to_string()]);
        };
        let mut tokens: Vec<String> = raw
            .split(',')
            .map(clean_name)
            .filter(|name| !name.is_empty())
            .collect();
        tokens.sort();
        tokens.dedup();
        Self(tokens)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn into_names(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for AuthorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

fn clean_name(part: &str) -> String {
    let stripped = HONORIFICS.replace_all(part, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_title_case()
}
