//! Request builder and response classifier for the DMM affiliate API.
//!
//! # Design
//! `DmmClient` holds only the configuration and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! validates the arguments and produces an `HttpRequest`, and a `parse_*`
//! method that classifies and decodes an `HttpResponse`. The blocking and
//! async clients both delegate to this type, so the validation, defaulting
//! and error rules cannot drift between them.

use log::{debug, trace, warn};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::decode::{FromRaw, RawMap};
use crate::error::{ApiError, DecodeError, Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{ActressSearch, FloorSearch, ItemSearch, QueryParams};
use crate::types::{
    Actress, Author, FloorTree, Genre, Item, Listing, Maker, RequestParameters, Response, Series,
};

/// Provider endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ItemList,
    FloorList,
    ActressSearch,
    GenreSearch,
    MakerSearch,
    SeriesSearch,
    AuthorSearch,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::ItemList => "ItemList",
            Endpoint::FloorList => "FloorList",
            Endpoint::ActressSearch => "ActressSearch",
            Endpoint::GenreSearch => "GenreSearch",
            Endpoint::MakerSearch => "MakerSearch",
            Endpoint::SeriesSearch => "SeriesSearch",
            Endpoint::AuthorSearch => "AuthorSearch",
        }
    }

    /// Name used in wrapped decode failures ("Failed to get <resource>").
    pub fn resource(self) -> &'static str {
        match self {
            Endpoint::ItemList => "products",
            Endpoint::FloorList => "floors",
            Endpoint::ActressSearch => "actresses",
            Endpoint::GenreSearch => "genres",
            Endpoint::MakerSearch => "makers",
            Endpoint::SeriesSearch => "series",
            Endpoint::AuthorSearch => "authors",
        }
    }

    /// Key the result section stores its entries under.
    pub fn items_key(self) -> &'static str {
        match self {
            Endpoint::ItemList => "items",
            Endpoint::FloorList => "site",
            Endpoint::ActressSearch => "actress",
            Endpoint::GenreSearch => "genre",
            Endpoint::MakerSearch => "maker",
            Endpoint::SeriesSearch => "series",
            Endpoint::AuthorSearch => "author",
        }
    }
}

/// Stateless request builder and response parser.
#[derive(Debug, Clone)]
pub struct DmmClient {
    config: ClientConfig,
}

impl DmmClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Assemble the request, injecting the credentials from configuration.
    fn build(&self, endpoint: Endpoint, params: QueryParams) -> HttpRequest {
        let mut query = Vec::with_capacity(params.len() + 3);
        query.push(("api_id".to_string(), self.config.api_id().to_string()));
        query.push((
            "affiliate_id".to_string(),
            self.config.affiliate_id().to_string(),
        ));
        query.extend(params.into_vec());
        query.push(("output".to_string(), "json".to_string()));
        HttpRequest {
            endpoint: endpoint.path(),
            url: format!("{}/{}", self.config.base_url(), endpoint.path()),
            query,
        }
    }

    pub fn build_item_list(&self, search: &ItemSearch) -> Result<HttpRequest> {
        Ok(self.build(Endpoint::ItemList, search.to_query()?))
    }

    pub fn build_floor_list(&self) -> HttpRequest {
        self.build(Endpoint::FloorList, QueryParams::new())
    }

    pub fn build_actress_search(&self, search: &ActressSearch) -> Result<HttpRequest> {
        Ok(self.build(Endpoint::ActressSearch, search.to_query()?))
    }

    pub fn build_genre_search(&self, search: &FloorSearch) -> Result<HttpRequest> {
        Ok(self.build(Endpoint::GenreSearch, search.to_query()?))
    }

    pub fn build_maker_search(&self, search: &FloorSearch) -> Result<HttpRequest> {
        Ok(self.build(Endpoint::MakerSearch, search.to_query()?))
    }

    pub fn build_series_search(&self, search: &FloorSearch) -> Result<HttpRequest> {
        Ok(self.build(Endpoint::SeriesSearch, search.to_query()?))
    }

    pub fn build_author_search(&self, search: &FloorSearch) -> Result<HttpRequest> {
        Ok(self.build(Endpoint::AuthorSearch, search.to_query()?))
    }

    /// Lookup of one product by content id.
    pub fn build_item_by_content_id(&self, site: &str, content_id: &str) -> Result<HttpRequest> {
        self.build_item_list(&ItemSearch::new(site).content_id(content_id))
    }

    /// Keyword search for a maker product id such as `ABP-477`.
    pub fn build_item_by_maker_product_id(&self, site: &str, maker_product_id: &str) -> Result<HttpRequest> {
        self.build_item_list(
            &ItemSearch::new(site)
                .keyword(maker_product_id)
                .hits(crate::params::MAX_HITS),
        )
    }

    pub fn parse_item_list(&self, response: HttpResponse) -> Result<Response<Listing<Item>>> {
        parse_listing(Endpoint::ItemList, response)
    }

    pub fn parse_floor_list(&self, response: HttpResponse) -> Result<Response<FloorTree>> {
        parse(Endpoint::FloorList, response, FloorTree::decode)
    }

    pub fn parse_actress_search(&self, response: HttpResponse) -> Result<Response<Listing<Actress>>> {
        parse_listing(Endpoint::ActressSearch, response)
    }

    pub fn parse_genre_search(&self, response: HttpResponse) -> Result<Response<Listing<Genre>>> {
        parse_listing(Endpoint::GenreSearch, response)
    }

    pub fn parse_maker_search(&self, response: HttpResponse) -> Result<Response<Listing<Maker>>> {
        parse_listing(Endpoint::MakerSearch, response)
    }

    pub fn parse_series_search(&self, response: HttpResponse) -> Result<Response<Listing<Series>>> {
        parse_listing(Endpoint::SeriesSearch, response)
    }

    pub fn parse_author_search(&self, response: HttpResponse) -> Result<Response<Listing<Author>>> {
        parse_listing(Endpoint::AuthorSearch, response)
    }

    /// The product whose content id matches exactly, if any.
    pub fn parse_item_by_content_id(&self, response: HttpResponse, content_id: &str) -> Result<Option<Item>> {
        let listing = self.parse_item_list(response)?.result;
        Ok(listing
            .items
            .into_iter()
            .find(|item| item.content_id == content_id))
    }

    /// The product whose maker product id matches, ignoring ASCII case.
    pub fn parse_item_by_maker_product_id(
        &self,
        response: HttpResponse,
        maker_product_id: &str,
    ) -> Result<Option<Item>> {
        let listing = self.parse_item_list(response)?.result;
        Ok(listing.items.into_iter().find(|item| {
            item.maker_product
                .as_deref()
                .is_some_and(|id| id.eq_ignore_ascii_case(maker_product_id))
        }))
    }
}

fn parse_listing<T: FromRaw>(endpoint: Endpoint, response: HttpResponse) -> Result<Response<Listing<T>>> {
    parse(endpoint, response, |raw| {
        Ok(Listing::from_raw(raw, endpoint.items_key()))
    })
}

/// Classify a response and decode its result section with `decode_result`.
///
/// Transport-level failures, a missing `result` key, and Provider-reported
/// errors are each reported as their own kind. Any failure from
/// `decode_result` is wrapped with the resource name.
fn parse<R>(
    endpoint: Endpoint,
    response: HttpResponse,
    decode_result: impl FnOnce(&RawMap) -> std::result::Result<R, DecodeError>,
) -> Result<Response<R>> {
    debug!("{} answered HTTP {}", endpoint.path(), response.status);
    trace!("{} body: {}", endpoint.path(), response.body);

    check_status(&response)?;

    let root: Value =
        serde_json::from_str(&response.body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;

    let empty = RawMap::new();
    let result = match root.get("result") {
        None => return Err(ApiError::MissingField("result").into()),
        Some(Value::Null) => &empty,
        Some(Value::Object(obj)) => obj,
        Some(_) => {
            return Err(ApiError::Decode {
                resource: endpoint.resource(),
                source: DecodeError::NotAnObject { field: "result" },
            }
            .into())
        }
    };

    check_provider_error(endpoint, result)?;

    let request = root
        .get("request")
        .and_then(|r| r.get("parameters"))
        .and_then(Value::as_object)
        .map(RequestParameters::from_raw)
        .unwrap_or_default();

    let decoded = decode_result(result).map_err(|source| ApiError::Decode {
        resource: endpoint.resource(),
        source,
    })?;

    Ok(Response {
        request,
        result: decoded,
        raw: root,
    })
}

fn is_auth_status(status: u16) -> bool {
    status == 401 || status == 403
}

/// Map non-success status codes to the appropriate error kind.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    if is_auth_status(response.status) {
        return Err(Error::Authentication {
            status: Some(response.status),
            message: response.body.clone(),
        });
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    }
    .into())
}

/// Reject result sections that carry a Provider error status.
///
/// The Provider reports bad credentials as a 400 whose `errors` mapping
/// names `api_id` or `affiliate_id`; those become authentication failures.
fn check_provider_error(endpoint: Endpoint, result: &RawMap) -> Result<()> {
    let status = match crate::decode::opt_u64(result, "status") {
        Some(status) if status >= 400 => u16::try_from(status).unwrap_or(u16::MAX),
        _ => return Ok(()),
    };

    let mut message = crate::decode::string(result, "message");
    let mut credential_error = is_auth_status(status);
    if let Some(errors) = result.get("errors") {
        let details = error_details(errors);
        credential_error |= details
            .iter()
            .any(|(key, text)| is_credential_detail(key) || is_credential_detail(text));
        let joined: Vec<String> = details.into_iter().map(|(_, text)| text).collect();
        if !joined.is_empty() {
            if !message.is_empty() {
                message.push_str(": ");
            }
            message.push_str(&joined.join("; "));
        }
    }
    if message.is_empty() {
        message = format!("{} failed", endpoint.path());
    }

    warn!("{} reported status {status}: {message}", endpoint.path());
    if credential_error {
        return Err(Error::Authentication {
            status: Some(status),
            message,
        });
    }
    Err(ApiError::Provider { status, message }.into())
}

fn is_credential_detail(text: &str) -> bool {
    text.contains("api_id") || text.contains("affiliate_id")
}

/// Flatten the `errors` value into `(key, message)` pairs. It arrives as a
/// mapping, a list of mappings, or a list of strings.
fn error_details(errors: &Value) -> Vec<(String, String)> {
    fn text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
    match errors {
        Value::Object(obj) => obj.iter().map(|(k, v)| (k.clone(), text(v))).collect(),
        Value::Array(entries) => entries.iter().flat_map(error_details).collect(),
        Value::Null => Vec::new(),
        other => vec![(String::new(), text(other))],
    }
}
