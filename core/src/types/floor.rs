//! Site → service → floor hierarchy returned by `FloorList`.
//!
//! Children keep the order the Provider sent them in; that order is the
//! display order on the Provider's own pages.

use serde::Serialize;

use crate::decode::{self, FromRaw, RawMap};
use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Floor {
    pub id: u64,
    pub name: String,
    pub code: String,
}

impl FromRaw for Floor {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            id: decode::u64_or(raw, "id", 0),
            name: decode::string(raw, "name"),
            code: decode::string(raw, "code"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub name: String,
    pub code: String,
    pub floors: Vec<Floor>,
}

impl FromRaw for Service {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            name: decode::string(raw, "name"),
            code: decode::string(raw, "code"),
            floors: decode::list(raw, "floor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub name: String,
    pub code: String,
    pub services: Vec<Service>,
}

impl FromRaw for Site {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            name: decode::string(raw, "name"),
            code: decode::string(raw, "code"),
            services: decode::list(raw, "service"),
        }
    }
}

impl Site {
    pub fn service(&self, code: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.code == code)
    }
}

impl Service {
    pub fn floor(&self, code: &str) -> Option<&Floor> {
        self.floors.iter().find(|f| f.code == code)
    }
}

/// Result section of `FloorList`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FloorTree {
    pub sites: Vec<Site>,
}

impl FloorTree {
    /// Decode the `result` section.
    ///
    /// A missing or empty `site` key yields an empty tree. A `site` value
    /// that is neither a mapping nor a list means the section is not a
    /// floor list at all and is reported.
    pub fn decode(raw: &RawMap) -> Result<Self, DecodeError> {
        match raw.get("site") {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => Ok(Self {
                sites: decode::list_of(value),
            }),
            Some(_) => Err(DecodeError::NotAnArray { field: "site" }),
        }
    }

    pub fn site(&self, code: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.code == code)
    }

    /// Every floor in tree order, paired with its site and service codes.
    pub fn floors(&self) -> impl Iterator<Item = (&str, &str, &Floor)> {
        self.sites.iter().flat_map(|site| {
            site.services.iter().flat_map(move |service| {
                service
                    .floors
                    .iter()
                    .map(move |floor| (site.code.as_str(), service.code.as_str(), floor))
            })
        })
    }
}
