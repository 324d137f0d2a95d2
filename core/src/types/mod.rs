//! Typed entities decoded from Provider responses.
//!
//! Every entity is built in one step from a raw mapping and never mutated
//! afterwards. Top-level records keep a deep copy of the mapping they were
//! decoded from in `raw`.

mod actress;
mod catalog;
mod envelope;
mod floor;
mod item;

pub use actress::{Actress, ActressImage, ActressListUrl};
pub use catalog::{Author, Genre, Maker, Series};
pub use envelope::{FloorContext, Listing, RequestParameters, Response, ResultSummary};
pub use floor::{Floor, FloorTree, Service, Site};
pub use item::{
    Campaign, CdInfo, Delivery, Directory, ImageUrl, Item, ItemInfo, ItemInfoEntry, Prices, Review,
    SampleImageUrl, SampleMovieUrl, Tachiyomi,
};
