//! Typed client for the DMM affiliate API (v3).
//!
//! # Overview
//! Validates call arguments, performs one `GET` per operation, and decodes
//! the Provider's loosely-typed JSON into immutable entity trees. Two
//! transports share one core: `BlockingClient` (ureq) and `AsyncClient`
//! (reqwest).
//!
//! # Design
//! - `DmmClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` classifies and decodes an `HttpResponse`. The two transport
//!   wrappers only execute the round trip in between.
//! - Decoding is lenient: missing or mistyped fields fall back to per-field
//!   defaults, and absent nested blocks decode to `None`. Only a missing
//!   `result` key or a result section of the wrong shape is an error.
//! - Every client owns one connection object, created lazily and reused
//!   until `close`.

pub mod blocking;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod nonblocking;
pub mod params;
pub mod session;
pub mod types;

pub use blocking::BlockingClient;
pub use client::{DmmClient, Endpoint};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, DecodeError, Error, Result};
pub use http::{HttpRequest, HttpResponse};
pub use nonblocking::AsyncClient;
pub use params::{ActressSearch, FloorSearch, ItemSearch};
pub use session::SessionState;
pub use types::{
    Actress, Author, FloorTree, Genre, Item, Listing, Maker, RequestParameters, Response, ResultSummary,
    Series,
};
