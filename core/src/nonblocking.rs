//! Async client backed by one shared `reqwest::Client`.
//!
//! Clones of an `AsyncClient` share the same connection and lifecycle, so
//! concurrent calls issued through clones (for example with
//! `futures::future::join_all`) all multiplex over one connection pool.

use std::future::Future;
use std::sync::Arc;

use log::debug;

use crate::client::DmmClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{ActressSearch, FloorSearch, ItemSearch};
use crate::session::{Session, SessionState};
use crate::types::{Actress, Author, FloorTree, Genre, Item, Listing, Maker, Response, Series};

#[derive(Debug)]
struct Inner {
    core: DmmClient,
    session: Session<reqwest::Client>,
}

/// Async client. Each operation suspends only while the request is on the
/// wire; validation and decoding run to completion once the body arrives.
#[derive(Debug, Clone)]
pub struct AsyncClient {
    inner: Arc<Inner>,
}

fn connect() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| ApiError::Transport(e.to_string()).into())
}

/// Closes the client when a scope ends, including by cancellation.
struct CloseOnDrop(AsyncClient);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

impl AsyncClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                core: DmmClient::new(config),
                session: Session::new("async"),
            }),
        }
    }

    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Run `f` against a freshly opened client and close it when the
    /// returned future completes or is dropped before completing.
    pub async fn scoped<T, F, Fut>(config: ClientConfig, f: F) -> Result<T>
    where
        F: FnOnce(AsyncClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let client = Self::new(config);
        client.open()?;
        let guard = CloseOnDrop(client);
        f(guard.0.clone()).await
    }

    /// Open the connection now instead of on the first call.
    pub fn open(&self) -> Result<()> {
        self.inner.session.acquire(connect).map(|_| ())
    }

    pub fn close(&self) {
        self.inner.session.close();
    }

    pub fn state(&self) -> SessionState {
        self.inner.session.state()
    }

    pub fn core(&self) -> &DmmClient {
        &self.inner.core
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let client = self.inner.session.acquire(connect)?;
        debug!("GET {}", request.url);
        let response = client
            .get(&request.url)
            .query(&request.query)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        Ok(HttpResponse { status, body })
    }

    pub async fn search_items(&self, search: &ItemSearch) -> Result<Response<Listing<Item>>> {
        let request = self.core().build_item_list(search)?;
        let response = self.execute(request).await?;
        self.core().parse_item_list(response)
    }

    pub async fn get_item_by_content_id(&self, site: &str, content_id: &str) -> Result<Option<Item>> {
        let request = self.core().build_item_by_content_id(site, content_id)?;
        let response = self.execute(request).await?;
        self.core().parse_item_by_content_id(response, content_id)
    }

    pub async fn get_item_by_maker_product_id(
        &self,
        site: &str,
        maker_product_id: &str,
    ) -> Result<Option<Item>> {
        let request = self
            .core()
            .build_item_by_maker_product_id(site, maker_product_id)?;
        let response = self.execute(request).await?;
        self.core()
            .parse_item_by_maker_product_id(response, maker_product_id)
    }

    pub async fn list_floors(&self) -> Result<Response<FloorTree>> {
        let request = self.core().build_floor_list();
        let response = self.execute(request).await?;
        self.core().parse_floor_list(response)
    }

    pub async fn search_actresses(&self, search: &ActressSearch) -> Result<Response<Listing<Actress>>> {
        let request = self.core().build_actress_search(search)?;
        let response = self.execute(request).await?;
        self.core().parse_actress_search(response)
    }

    pub async fn search_genres(&self, search: &FloorSearch) -> Result<Response<Listing<Genre>>> {
        let request = self.core().build_genre_search(search)?;
        let response = self.execute(request).await?;
        self.core().parse_genre_search(response)
    }

    pub async fn search_makers(&self, search: &FloorSearch) -> Result<Response<Listing<Maker>>> {
        let request = self.core().build_maker_search(search)?;
        let response = self.execute(request).await?;
        self.core().parse_maker_search(response)
    }

    pub async fn search_series(&self, search: &FloorSearch) -> Result<Response<Listing<Series>>> {
        let request = self.core().build_series_search(search)?;
        let response = self.execute(request).await?;
        self.core().parse_series_search(response)
    }

    pub async fn search_authors(&self, search: &FloorSearch) -> Result<Response<Listing<Author>>> {
        let request = self.core().build_author_search(search)?;
        let response = self.execute(request).await?;
        self.core().parse_author_search(response)
    }
}
