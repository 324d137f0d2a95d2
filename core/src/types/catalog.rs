//! Entries returned by the floor-scoped searches (genre, maker, series,
//! author).

use serde::Serialize;

use crate::decode::{self, FromRaw, RawMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genre {
    pub genre_id: u64,
    pub name: String,
    pub ruby: String,
    pub list_url: String,
    #[serde(skip)]
    pub raw: RawMap,
}

impl FromRaw for Genre {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            genre_id: decode::u64_or(raw, "genre_id", 0),
            name: decode::string(raw, "name"),
            ruby: decode::string(raw, "ruby"),
            list_url: decode::string(raw, "list_url"),
            raw: raw.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Maker {
    pub maker_id: u64,
    pub name: String,
    pub ruby: String,
    pub list_url: String,
    #[serde(skip)]
    pub raw: RawMap,
}

impl FromRaw for Maker {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            maker_id: decode::u64_or(raw, "maker_id", 0),
            name: decode::string(raw, "name"),
            ruby: decode::string(raw, "ruby"),
            list_url: decode::string(raw, "list_url"),
            raw: raw.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub series_id: u64,
    pub name: String,
    pub ruby: String,
    pub list_url: String,
    #[serde(skip)]
    pub raw: RawMap,
}

impl FromRaw for Series {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            series_id: decode::u64_or(raw, "series_id", 0),
            name: decode::string(raw, "name"),
            ruby: decode::string(raw, "ruby"),
            list_url: decode::string(raw, "list_url"),
            raw: raw.clone(),
        }
    }
}

/// An author. `another_name` carries pen-name variants when the Provider
/// has any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub author_id: u64,
    pub name: String,
    pub ruby: String,
    pub another_name: Option<String>,
    pub list_url: String,
    #[serde(skip)]
    pub raw: RawMap,
}

impl FromRaw for Author {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            author_id: decode::u64_or(raw, "author_id", 0),
            name: decode::string(raw, "name"),
            ruby: decode::string(raw, "ruby"),
            another_name: decode::opt_string(raw, "another_name").filter(|s| !s.is_empty()),
            list_url: decode::string(raw, "list_url"),
            raw: raw.clone(),
        }
    }
}
