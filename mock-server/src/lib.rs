//! Local stand-in for the DMM affiliate API.
//!
//! Serves canned payloads from `fixtures/` in the Provider's envelope
//! format, applying the handful of filters the client tests rely on
//! (`cid`, `keyword`, `service`, `floor`, `initial`, paging). Credentials
//! other than `API_ID` / `AFFILIATE_ID` are answered the way the Provider
//! does: HTTP 200 with a 400 status inside the result.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

pub const API_ID: &str = "mock-api-id";
pub const AFFILIATE_ID: &str = "mock-990";

const ITEMS: &str = include_str!("../fixtures/items.json");
const FLOORS: &str = include_str!("../fixtures/floors.json");
const ACTRESSES: &str = include_str!("../fixtures/actresses.json");
const GENRES: &str = include_str!("../fixtures/genres.json");
const MAKERS: &str = include_str!("../fixtures/makers.json");
const SERIES: &str = include_str!("../fixtures/series.json");
const AUTHORS: &str = include_str!("../fixtures/authors.json");

/// Parsed fixtures shared by every handler.
#[derive(Debug)]
pub struct Catalog {
    pub items: Vec<Value>,
    pub floors: Value,
    pub actresses: Vec<Value>,
    pub genres: Vec<Value>,
    pub makers: Vec<Value>,
    pub series: Vec<Value>,
    pub authors: Vec<Value>,
}

fn entries(raw: &str) -> Vec<Value> {
    serde_json::from_str(raw).expect("fixture is a JSON array")
}

impl Catalog {
    pub fn load() -> Self {
        Self {
            items: entries(ITEMS),
            floors: serde_json::from_str(FLOORS).expect("fixture is a JSON object"),
            actresses: entries(ACTRESSES),
            genres: entries(GENRES),
            makers: entries(MAKERS),
            series: entries(SERIES),
            authors: entries(AUTHORS),
        }
    }
}

/// Broken behaviours for exercising the client's error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// 200 with a body that has no `result` key.
    MissingResult,
    /// 503 with a plain-text body.
    Unavailable,
    /// 200 with a body that is not JSON.
    NotJson,
}

type Params = Vec<(String, String)>;

pub fn app() -> Router {
    Router::new()
        .route("/{endpoint}", get(dispatch))
        .with_state(Arc::new(Catalog::load()))
}

/// Router answering every path with `fault`.
pub fn faulty_app(fault: Fault) -> Router {
    Router::new().route(
        "/{endpoint}",
        get(move |Query(params): Query<Params>| async move { faulty(fault, params) }),
    )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_faulty(listener: TcpListener, fault: Fault) -> Result<(), std::io::Error> {
    axum::serve(listener, faulty_app(fault)).await
}

fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn echo(params: &Params) -> Value {
    let parameters: Map<String, Value> = params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    json!({ "parameters": parameters })
}

fn faulty(fault: Fault, params: Params) -> Response {
    match fault {
        Fault::MissingResult => Json(json!({ "request": echo(&params) })).into_response(),
        Fault::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "service unavailable").into_response(),
        Fault::NotJson => (StatusCode::OK, "<html>maintenance</html>").into_response(),
    }
}

async fn dispatch(
    State(catalog): State<Arc<Catalog>>,
    Path(endpoint): Path<String>,
    Query(params): Query<Params>,
) -> Response {
    let request = echo(&params);

    if let Some(errors) = credential_errors(&params) {
        let body = json!({
            "request": request,
            "result": {"status": 400, "message": "BAD REQUEST", "errors": errors}
        });
        return Json(body).into_response();
    }

    let result = match endpoint.as_str() {
        "ItemList" => item_list(&catalog, &params),
        "FloorList" => catalog.floors.clone(),
        "ActressSearch" => listing(&params, "actress", filter_initial(&catalog.actresses, &params), None),
        "GenreSearch" => floor_scoped(&catalog, &params, "genre", &catalog.genres),
        "MakerSearch" => floor_scoped(&catalog, &params, "maker", &catalog.makers),
        "SeriesSearch" => floor_scoped(&catalog, &params, "series", &catalog.series),
        "AuthorSearch" => floor_scoped(&catalog, &params, "author", &catalog.authors),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Json(json!({ "request": request, "result": result })).into_response()
}

fn credential_errors(params: &Params) -> Option<Value> {
    let mut errors = Map::new();
    if param(params, "api_id") != Some(API_ID) {
        errors.insert("api_id".into(), json!("API ID is invalid"));
    }
    if param(params, "affiliate_id") != Some(AFFILIATE_ID) {
        errors.insert("affiliate_id".into(), json!("affiliate_id is invalid"));
    }
    (!errors.is_empty()).then(|| Value::Object(errors))
}

fn field<'a>(entry: &'a Value, key: &str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or("")
}

fn item_list(catalog: &Catalog, params: &Params) -> Value {
    let keyword = param(params, "keyword").map(str::to_lowercase);
    let matches: Vec<Value> = catalog
        .items
        .iter()
        .filter(|item| param(params, "cid").map_or(true, |cid| field(item, "content_id") == cid))
        .filter(|item| param(params, "service").map_or(true, |s| field(item, "service_code") == s))
        .filter(|item| param(params, "floor").map_or(true, |f| field(item, "floor_code") == f))
        .filter(|item| {
            keyword.as_deref().map_or(true, |kw| {
                field(item, "title").to_lowercase().contains(kw)
                    || field(item, "maker_product").to_lowercase() == kw
            })
        })
        .cloned()
        .collect();
    listing(params, "items", matches, None)
}

fn filter_initial(entries: &[Value], params: &Params) -> Vec<Value> {
    entries
        .iter()
        .filter(|entry| param(params, "initial").map_or(true, |initial| field(entry, "ruby").starts_with(initial)))
        .cloned()
        .collect()
}

fn floor_scoped(catalog: &Catalog, params: &Params, key: &str, entries: &[Value]) -> Value {
    let floor_id = param(params, "floor_id").unwrap_or("");
    let floor = catalog.floors["site"].as_array().and_then(|sites| {
        sites.iter().find_map(|site| {
            site["service"].as_array()?.iter().find_map(|service| {
                let floor = service["floor"]
                    .as_array()
                    .map(|floors| floors.iter().find(|f| field(f, "id") == floor_id))
                    .unwrap_or_else(|| Some(&service["floor"]).filter(|f| field(f, "id") == floor_id))?;
                Some(json!({
                    "site_name": site["name"],
                    "site_code": site["code"],
                    "service_name": service["name"],
                    "service_code": service["code"],
                    "floor_id": floor["id"],
                    "floor_name": floor["name"],
                    "floor_code": floor["code"],
                }))
            })
        })
    });
    listing(params, key, filter_initial(entries, params), floor)
}

/// Wrap `matches` in a paged listing. Numbers are sent as strings the way
/// the Provider sends some of them.
fn listing(params: &Params, key: &str, matches: Vec<Value>, floor: Option<Value>) -> Value {
    let hits: usize = param(params, "hits").and_then(|h| h.parse().ok()).unwrap_or(20);
    let offset: usize = param(params, "offset").and_then(|o| o.parse().ok()).unwrap_or(1);
    let page: Vec<Value> = matches
        .iter()
        .skip(offset.saturating_sub(1))
        .take(hits)
        .cloned()
        .collect();

    let mut result = Map::new();
    result.insert("status".into(), json!(200));
    result.insert("result_count".into(), json!(page.len()));
    result.insert("total_count".into(), json!(matches.len().to_string()));
    result.insert("first_position".into(), json!(offset));
    if let Some(Value::Object(floor)) = floor {
        result.extend(floor);
    }
    result.insert(key.into(), Value::Array(page));
    Value::Object(result)
}
