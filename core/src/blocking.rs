//! Blocking client backed by a persistent `ureq` agent.

use log::debug;

use crate::client::DmmClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{ActressSearch, FloorSearch, ItemSearch};
use crate::session::{Session, SessionState};
use crate::types::{Actress, Author, FloorTree, Genre, Item, Listing, Maker, Response, Series};

/// Blocking client. Each operation performs one round trip on the shared
/// agent and blocks the calling thread until the response is decoded.
///
/// The agent is created lazily and reused until `close`. Dropping the
/// client releases it as well.
#[derive(Debug)]
pub struct BlockingClient {
    core: DmmClient,
    session: Session<ureq::Agent>,
}

fn connect() -> ureq::Agent {
    // Non-2xx answers are data for the classifier, not transport errors.
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Closes the borrowed client when the scope unwinds.
struct CloseOnDrop<'a>(&'a BlockingClient);

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}

fn transport(err: ureq::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

impl BlockingClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            core: DmmClient::new(config),
            session: Session::new("blocking"),
        }
    }

    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Run `f` against a freshly opened client and close it afterwards,
    /// whether `f` succeeds, fails or panics.
    pub fn scoped<T>(config: ClientConfig, f: impl FnOnce(&BlockingClient) -> Result<T>) -> Result<T> {
        let client = Self::new(config);
        client.open()?;
        let guard = CloseOnDrop(&client);
        f(guard.0)
    }

    /// Open the connection now instead of on the first call.
    pub fn open(&self) -> Result<()> {
        self.session.acquire(|| Ok(connect())).map(|_| ())
    }

    pub fn close(&self) {
        self.session.close();
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn core(&self) -> &DmmClient {
        &self.core
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let agent = self.session.acquire(|| Ok(connect()))?;
        debug!("GET {}", request.url);
        let pairs = request.query.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        let mut response = agent
            .get(&request.url)
            .query_pairs(pairs)
            .call()
            .map_err(transport)?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(transport)?;
        Ok(HttpResponse { status, body })
    }

    pub fn search_items(&self, search: &ItemSearch) -> Result<Response<Listing<Item>>> {
        let request = self.core.build_item_list(search)?;
        self.core.parse_item_list(self.execute(request)?)
    }

    pub fn get_item_by_content_id(&self, site: &str, content_id: &str) -> Result<Option<Item>> {
        let request = self.core.build_item_by_content_id(site, content_id)?;
        self.core
            .parse_item_by_content_id(self.execute(request)?, content_id)
    }

    pub fn get_item_by_maker_product_id(&self, site: &str, maker_product_id: &str) -> Result<Option<Item>> {
        let request = self
            .core
            .build_item_by_maker_product_id(site, maker_product_id)?;
        self.core
            .parse_item_by_maker_product_id(self.execute(request)?, maker_product_id)
    }

    pub fn list_floors(&self) -> Result<Response<FloorTree>> {
        let request = self.core.build_floor_list();
        self.core.parse_floor_list(self.execute(request)?)
    }

    pub fn search_actresses(&self, search: &ActressSearch) -> Result<Response<Listing<Actress>>> {
        let request = self.core.build_actress_search(search)?;
        self.core.parse_actress_search(self.execute(request)?)
    }

    pub fn search_genres(&self, search: &FloorSearch) -> Result<Response<Listing<Genre>>> {
        let request = self.core.build_genre_search(search)?;
        self.core.parse_genre_search(self.execute(request)?)
    }

    pub fn search_makers(&self, search: &FloorSearch) -> Result<Response<Listing<Maker>>> {
        let request = self.core.build_maker_search(search)?;
        self.core.parse_maker_search(self.execute(request)?)
    }

    pub fn search_series(&self, search: &FloorSearch) -> Result<Response<Listing<Series>>> {
        let request = self.core.build_series_search(search)?;
        self.core.parse_series_search(self.execute(request)?)
    }

    pub fn search_authors(&self, search: &FloorSearch) -> Result<Response<Listing<Author>>> {
        let request = self.core.build_author_search(search)?;
        self.core.parse_author_search(self.execute(request)?)
    }
}
