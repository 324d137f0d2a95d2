//! Response envelope and the listing result shared by the search endpoints.

use serde::Serialize;
use serde_json::Value;

use crate::decode::{self, FromRaw, RawMap};

const IDENTITY_KEYS: [&str; 2] = ["api_id", "affiliate_id"];

/// Parameters the Provider echoes back under `request.parameters`.
///
/// The identity keys are kept apart from everything else so they can never
/// be duplicated inside `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestParameters {
    pub api_id: String,
    pub affiliate_id: String,
    /// Every other echoed parameter, in the order received.
    pub extra: RawMap,
}

impl RequestParameters {
    pub fn get(&self, key: &str) -> Option<&Value> {
        match key {
            "api_id" | "affiliate_id" => None,
            _ => self.extra.get(key),
        }
    }
}

impl FromRaw for RequestParameters {
    fn from_raw(raw: &RawMap) -> Self {
        let extra = raw
            .iter()
            .filter(|(key, _)| !IDENTITY_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self {
            api_id: decode::string(raw, "api_id"),
            affiliate_id: decode::string(raw, "affiliate_id"),
            extra,
        }
    }
}

/// Status and counters exposed by a result section.
pub trait ResultSummary {
    fn status(&self) -> u16;
    fn result_count(&self) -> u32;
    fn total_count(&self) -> u64;
}

/// A decoded Provider response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<R> {
    pub request: RequestParameters,
    pub result: R,
    /// Deep copy of the complete response body.
    #[serde(skip)]
    pub raw: Value,
}

impl<R: ResultSummary> Response<R> {
    pub fn status(&self) -> u16 {
        self.result.status()
    }

    pub fn result_count(&self) -> u32 {
        self.result.result_count()
    }

    pub fn total_count(&self) -> u64 {
        self.result.total_count()
    }
}

/// Site, service and floor a floor-scoped search ran against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FloorContext {
    pub site_name: String,
    pub site_code: String,
    pub service_name: String,
    pub service_code: String,
    pub floor_id: u64,
    pub floor_name: String,
    pub floor_code: String,
}

impl FromRaw for FloorContext {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            site_name: decode::string(raw, "site_name"),
            site_code: decode::string(raw, "site_code"),
            service_name: decode::string(raw, "service_name"),
            service_code: decode::string(raw, "service_code"),
            floor_id: decode::u64_or(raw, "floor_id", 0),
            floor_name: decode::string(raw, "floor_name"),
            floor_code: decode::string(raw, "floor_code"),
        }
    }
}

/// Paged listing returned by the search endpoints.
///
/// `result_count` is what the Provider reports; `items.len()` is what it
/// actually sent. The two are decoded independently and may disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub status: u16,
    pub result_count: u32,
    pub total_count: u64,
    pub first_position: u32,
    /// Floor context, present only on floor-scoped searches.
    pub floor: Option<FloorContext>,
    pub items: Vec<T>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            status: 200,
            result_count: 0,
            total_count: 0,
            first_position: 1,
            floor: None,
            items: Vec::new(),
        }
    }
}

impl<T: FromRaw> Listing<T> {
    /// Decode a result section whose entries live under `items_key`.
    pub fn from_raw(raw: &RawMap, items_key: &str) -> Self {
        let floor = raw
            .get("floor_id")
            .filter(|v| decode::is_truthy(v))
            .map(|_| FloorContext::from_raw(raw));
        Self {
            status: decode::opt_u64(raw, "status")
                .and_then(|s| u16::try_from(s).ok())
                .unwrap_or(200),
            result_count: decode::u32_or(raw, "result_count", 0),
            total_count: decode::u64_or(raw, "total_count", 0),
            first_position: decode::u32_or(raw, "first_position", 1),
            floor,
            items: decode::list(raw, items_key),
        }
    }
}

impl<T> ResultSummary for Listing<T> {
    fn status(&self) -> u16 {
        self.status
    }

    fn result_count(&self) -> u32 {
        self.result_count
    }

    fn total_count(&self) -> u64 {
        self.total_count
    }
}
