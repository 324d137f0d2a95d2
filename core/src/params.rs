//! Call arguments for each operation and their validation.
//!
//! # Design
//! Each operation takes a parameter struct whose optional fields mirror the
//! Provider's query parameters. `to_query` validates every field and
//! produces the ordered query list, so a bad argument is reported before any
//! request is built. Credentials are not part of these structs; the client
//! injects them from its configuration.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::ApiError;

/// Inclusive bounds of the `hits` parameter.
pub const MIN_HITS: u32 = 1;
pub const MAX_HITS: u32 = 100;

pub const SITES: [&str; 2] = ["DMM.com", "FANZA"];

pub const ITEM_SORTS: [&str; 6] = ["rank", "price", "-price", "date", "review", "match"];

/// Actress sort keys; each also accepts a leading `-` for descending order.
pub const ACTRESS_SORTS: [&str; 7] = ["name", "bust", "waist", "hip", "height", "birthday", "id"];

pub const ARTICLES: [&str; 5] = ["actress", "author", "genre", "series", "maker"];

static CALENDAR_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

static ISO_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$").expect("valid datetime pattern")
});

/// Ordered query parameters for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) {
        self.0.push((key.to_string(), value.to_string()));
    }

    pub fn push_opt<T: ToString>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        self.0
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ApiError {
    ApiError::InvalidParameter {
        field,
        message: message.into(),
    }
}

/// `hits` must lie in 1..=100. Out-of-range values are rejected, not
/// clamped.
pub fn validate_hits(hits: u32) -> Result<u32, ApiError> {
    if (MIN_HITS..=MAX_HITS).contains(&hits) {
        Ok(hits)
    } else {
        Err(invalid(
            "hits",
            format!("must be between {MIN_HITS} and {MAX_HITS}, got {hits}"),
        ))
    }
}

/// `offset` is a 1-based position.
pub fn validate_offset(offset: u32) -> Result<u32, ApiError> {
    if offset >= 1 {
        Ok(offset)
    } else {
        Err(invalid("offset", "must be 1 or greater"))
    }
}

/// Check `value` against `allowed`. With `descending`, one leading `-` is
/// also accepted in front of any allowed key.
pub fn validate_sort<'a>(value: &'a str, allowed: &[&str], descending: bool) -> Result<&'a str, ApiError> {
    let key = match value.strip_prefix('-') {
        Some(rest) if descending && !allowed.contains(&value) => rest,
        _ => value,
    };
    if allowed.contains(&key) {
        Ok(value)
    } else {
        Err(invalid(
            "sort",
            format!("`{value}` is not one of {}", allowed.join(", ")),
        ))
    }
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn validate_date(field: &'static str, value: &str) -> Result<(), ApiError> {
    let valid = CALENDAR_DATE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if valid {
        Ok(())
    } else {
        Err(invalid(field, format!("`{value}` is not a YYYY-MM-DD date")))
    }
}

/// Date-time in `YYYY-MM-DDTHH:MM:SS` form.
pub fn validate_datetime(field: &'static str, value: &str) -> Result<(), ApiError> {
    let valid = ISO_DATETIME.is_match(value)
        && NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok();
    if valid {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("`{value}` is not a YYYY-MM-DDTHH:MM:SS date-time"),
        ))
    }
}

fn validate_initial(value: &str) -> Result<(), ApiError> {
    if value.chars().count() == 1 {
        Ok(())
    } else {
        Err(invalid("initial", format!("`{value}` must be a single character")))
    }
}

fn validate_one_of(field: &'static str, value: &str, allowed: &[&str]) -> Result<(), ApiError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("`{value}` is not one of {}", allowed.join(", ")),
        ))
    }
}

fn push_paging(query: &mut QueryParams, hits: Option<u32>, offset: Option<u32>) -> Result<(), ApiError> {
    query.push_opt("hits", hits.map(validate_hits).transpose()?);
    query.push_opt("offset", offset.map(validate_offset).transpose()?);
    Ok(())
}

/// Arguments of `ItemList`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSearch {
    pub site: String,
    pub service: Option<String>,
    pub floor: Option<String>,
    pub keyword: Option<String>,
    /// Content id filter (`cid`).
    pub content_id: Option<String>,
    pub article: Option<String>,
    pub article_id: Option<String>,
    pub gte_date: Option<String>,
    pub lte_date: Option<String>,
    pub mono_stock: Option<String>,
    pub hits: Option<u32>,
    pub offset: Option<u32>,
    pub sort: Option<String>,
}

impl ItemSearch {
    pub fn new(site: &str) -> Self {
        Self {
            site: site.to_string(),
            service: None,
            floor: None,
            keyword: None,
            content_id: None,
            article: None,
            article_id: None,
            gte_date: None,
            lte_date: None,
            mono_stock: None,
            hits: None,
            offset: None,
            sort: None,
        }
    }

    pub fn service(mut self, service: &str) -> Self {
        self.service = Some(service.to_string());
        self
    }

    pub fn floor(mut self, floor: &str) -> Self {
        self.floor = Some(floor.to_string());
        self
    }

    pub fn keyword(mut self, keyword: &str) -> Self {
        self.keyword = Some(keyword.to_string());
        self
    }

    pub fn content_id(mut self, content_id: &str) -> Self {
        self.content_id = Some(content_id.to_string());
        self
    }

    pub fn article(mut self, article: &str, article_id: &str) -> Self {
        self.article = Some(article.to_string());
        self.article_id = Some(article_id.to_string());
        self
    }

    pub fn released_between(mut self, gte: Option<&str>, lte: Option<&str>) -> Self {
        self.gte_date = gte.map(str::to_string);
        self.lte_date = lte.map(str::to_string);
        self
    }

    pub fn hits(mut self, hits: u32) -> Self {
        self.hits = Some(hits);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn sort(mut self, sort: &str) -> Self {
        self.sort = Some(sort.to_string());
        self
    }

    pub fn to_query(&self) -> Result<QueryParams, ApiError> {
        validate_one_of("site", &self.site, &SITES)?;
        if let Some(article) = &self.article {
            validate_one_of("article", article, &ARTICLES)?;
        }
        if let Some(sort) = &self.sort {
            validate_sort(sort, &ITEM_SORTS, false)?;
        }
        if let Some(gte) = &self.gte_date {
            validate_datetime("gte_date", gte)?;
        }
        if let Some(lte) = &self.lte_date {
            validate_datetime("lte_date", lte)?;
        }

        let mut query = QueryParams::new();
        query.push("site", &self.site);
        query.push_opt("service", self.service.as_ref());
        query.push_opt("floor", self.floor.as_ref());
        push_paging(&mut query, self.hits, self.offset)?;
        query.push_opt("sort", self.sort.as_ref());
        query.push_opt("keyword", self.keyword.as_ref());
        query.push_opt("cid", self.content_id.as_ref());
        query.push_opt("article", self.article.as_ref());
        query.push_opt("article_id", self.article_id.as_ref());
        query.push_opt("gte_date", self.gte_date.as_ref());
        query.push_opt("lte_date", self.lte_date.as_ref());
        query.push_opt("mono_stock", self.mono_stock.as_ref());
        Ok(query)
    }
}

/// Arguments of `ActressSearch`. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActressSearch {
    pub initial: Option<String>,
    pub actress_id: Option<u64>,
    pub keyword: Option<String>,
    pub gte_bust: Option<u32>,
    pub lte_bust: Option<u32>,
    pub gte_waist: Option<u32>,
    pub lte_waist: Option<u32>,
    pub gte_hip: Option<u32>,
    pub lte_hip: Option<u32>,
    pub gte_height: Option<u32>,
    pub lte_height: Option<u32>,
    pub gte_birthday: Option<String>,
    pub lte_birthday: Option<String>,
    pub hits: Option<u32>,
    pub offset: Option<u32>,
    pub sort: Option<String>,
}

impl ActressSearch {
    pub fn to_query(&self) -> Result<QueryParams, ApiError> {
        if let Some(initial) = &self.initial {
            validate_initial(initial)?;
        }
        if let Some(sort) = &self.sort {
            validate_sort(sort, &ACTRESS_SORTS, true)?;
        }
        if let Some(gte) = &self.gte_birthday {
            validate_date("gte_birthday", gte)?;
        }
        if let Some(lte) = &self.lte_birthday {
            validate_date("lte_birthday", lte)?;
        }

        let mut query = QueryParams::new();
        query.push_opt("initial", self.initial.as_ref());
        query.push_opt("actress_id", self.actress_id);
        query.push_opt("keyword", self.keyword.as_ref());
        query.push_opt("gte_bust", self.gte_bust);
        query.push_opt("lte_bust", self.lte_bust);
        query.push_opt("gte_waist", self.gte_waist);
        query.push_opt("lte_waist", self.lte_waist);
        query.push_opt("gte_hip", self.gte_hip);
        query.push_opt("lte_hip", self.lte_hip);
        query.push_opt("gte_height", self.gte_height);
        query.push_opt("lte_height", self.lte_height);
        query.push_opt("gte_birthday", self.gte_birthday.as_ref());
        query.push_opt("lte_birthday", self.lte_birthday.as_ref());
        query.push_opt("sort", self.sort.as_ref());
        push_paging(&mut query, self.hits, self.offset)?;
        Ok(query)
    }
}

/// Arguments shared by the genre, maker, series and author searches, which
/// all list entries within one floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorSearch {
    pub floor_id: u64,
    pub initial: Option<String>,
    pub hits: Option<u32>,
    pub offset: Option<u32>,
}

impl FloorSearch {
    pub fn new(floor_id: u64) -> Self {
        Self {
            floor_id,
            initial: None,
            hits: None,
            offset: None,
        }
    }

    pub fn initial(mut self, initial: &str) -> Self {
        self.initial = Some(initial.to_string());
        self
    }

    pub fn hits(mut self, hits: u32) -> Self {
        self.hits = Some(hits);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_query(&self) -> Result<QueryParams, ApiError> {
        if let Some(initial) = &self.initial {
            validate_initial(initial)?;
        }
        let mut query = QueryParams::new();
        query.push("floor_id", self.floor_id);
        query.push_opt("initial", self.initial.as_ref());
        push_paging(&mut query, self.hits, self.offset)?;
        Ok(query)
    }
}
