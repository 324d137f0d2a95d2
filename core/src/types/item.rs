//! Product records returned by `ItemList`.
//!
//! # Design
//! Every nested block is `Option` and is decoded only when its key is present
//! and truthy, so a missing review or price block is `None` rather than a
//! record of zeroes. `content_id` and `product_id` are separate identifiers;
//! they frequently coincide but are not interchangeable.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::decode::{self, FromRaw, RawMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub count: u32,
    pub average: f64,
}

impl FromRaw for Review {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            count: decode::u32_or(raw, "count", 0),
            average: decode::f64_or(raw, "average", 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrl {
    pub list: String,
    pub small: String,
    pub large: String,
}

impl FromRaw for ImageUrl {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            list: decode::string(raw, "list"),
            small: decode::string(raw, "small"),
            large: decode::string(raw, "large"),
        }
    }
}

/// Free preview ("tachiyomi") links for books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tachiyomi {
    pub url: String,
    pub affiliate_url: String,
}

impl FromRaw for Tachiyomi {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            url: decode::string(raw, "URL"),
            affiliate_url: decode::string(raw, "affiliateURL"),
        }
    }
}

/// Sample image URLs. Each size arrives as `{"image": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleImageUrl {
    pub sample_s: Vec<String>,
    pub sample_l: Vec<String>,
}

impl FromRaw for SampleImageUrl {
    fn from_raw(raw: &RawMap) -> Self {
        let images = |key: &str| {
            decode::object(raw, key)
                .map(|block| decode::string_list(block, "image"))
                .unwrap_or_default()
        };
        Self {
            sample_s: images("sample_s"),
            sample_l: images("sample_l"),
        }
    }
}

/// Sample movie player URLs, keyed by player size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleMovieUrl {
    pub size_476_306: Option<String>,
    pub size_560_360: Option<String>,
    pub size_644_414: Option<String>,
    pub size_720_480: Option<String>,
    pub pc_flag: bool,
    pub sp_flag: bool,
}

impl FromRaw for SampleMovieUrl {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            size_476_306: decode::opt_string(raw, "size_476_306"),
            size_560_360: decode::opt_string(raw, "size_560_360"),
            size_644_414: decode::opt_string(raw, "size_644_414"),
            size_720_480: decode::opt_string(raw, "size_720_480"),
            pc_flag: decode::flag(raw, "pc_flag"),
            sp_flag: decode::flag(raw, "sp_flag"),
        }
    }
}

/// One delivery option (download, stream, HD, ...) and its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub delivery_type: String,
    pub price: Option<u64>,
    pub list_price: Option<u64>,
}

impl FromRaw for Delivery {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            delivery_type: decode::string(raw, "type"),
            price: decode::price(raw, "price"),
            list_price: decode::price(raw, "list_price"),
        }
    }
}

/// Price block. `price_text` keeps the Provider's string (e.g. `"210~"`)
/// while `price` holds the extracted number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prices {
    pub price: Option<u64>,
    pub price_text: Option<String>,
    pub list_price: Option<u64>,
    pub deliveries: Vec<Delivery>,
}

impl FromRaw for Prices {
    fn from_raw(raw: &RawMap) -> Self {
        let deliveries = decode::object(raw, "deliveries")
            .map(|block| decode::list(block, "delivery"))
            .unwrap_or_default();
        Self {
            price: decode::price(raw, "price"),
            price_text: decode::opt_string(raw, "price"),
            list_price: decode::price(raw, "list_price"),
            deliveries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemInfoEntry {
    pub id: u64,
    pub name: String,
    pub ruby: Option<String>,
}

impl FromRaw for ItemInfoEntry {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            id: decode::u64_or(raw, "id", 0),
            name: decode::string(raw, "name"),
            ruby: decode::opt_string(raw, "ruby"),
        }
    }
}

/// Categorized metadata attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemInfo {
    pub genre: Vec<ItemInfoEntry>,
    pub series: Vec<ItemInfoEntry>,
    pub maker: Vec<ItemInfoEntry>,
    pub actress: Vec<ItemInfoEntry>,
    pub actor: Vec<ItemInfoEntry>,
    pub director: Vec<ItemInfoEntry>,
    pub author: Vec<ItemInfoEntry>,
    pub label: Vec<ItemInfoEntry>,
    #[serde(rename = "type")]
    pub item_type: Vec<ItemInfoEntry>,
    pub color: Vec<ItemInfoEntry>,
    pub size: Vec<ItemInfoEntry>,
    pub manufacture: Vec<ItemInfoEntry>,
    pub artist: Vec<ItemInfoEntry>,
}

impl FromRaw for ItemInfo {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            genre: decode::list(raw, "genre"),
            series: decode::list(raw, "series"),
            maker: decode::list(raw, "maker"),
            actress: decode::list(raw, "actress"),
            actor: decode::list(raw, "actor"),
            director: decode::list(raw, "director"),
            author: decode::list(raw, "author"),
            label: decode::list(raw, "label"),
            item_type: decode::list(raw, "type"),
            color: decode::list(raw, "color"),
            size: decode::list(raw, "size"),
            manufacture: decode::list(raw, "manufacture"),
            artist: decode::list(raw, "artist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CdInfo {
    pub kind: String,
}

impl FromRaw for CdInfo {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            kind: decode::string(raw, "kind"),
        }
    }
}

/// Category directory the product is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directory {
    pub id: u64,
    pub name: String,
}

impl FromRaw for Directory {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            id: decode::u64_or(raw, "id", 0),
            name: decode::string(raw, "name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    pub date_begin: Option<NaiveDateTime>,
    pub date_end: Option<NaiveDateTime>,
    pub title: String,
}

impl FromRaw for Campaign {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            date_begin: decode::datetime(raw, "date_begin"),
            date_end: decode::datetime(raw, "date_end"),
            title: decode::string(raw, "title"),
        }
    }
}

/// A product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub service_code: String,
    pub service_name: String,
    pub floor_code: String,
    pub floor_name: String,
    pub category_name: String,
    pub content_id: String,
    pub product_id: String,
    pub title: String,
    pub volume: Option<String>,
    pub number: Option<String>,
    pub review: Option<Review>,
    pub url: String,
    pub url_sp: Option<String>,
    pub affiliate_url: String,
    pub affiliate_url_sp: Option<String>,
    pub image_url: Option<ImageUrl>,
    pub tachiyomi: Option<Tachiyomi>,
    pub sample_image_url: Option<SampleImageUrl>,
    pub sample_movie_url: Option<SampleMovieUrl>,
    pub prices: Option<Prices>,
    pub date: Option<NaiveDateTime>,
    pub item_info: Option<ItemInfo>,
    pub cd_info: Option<CdInfo>,
    pub jancode: Option<String>,
    pub maker_product: Option<String>,
    pub isbn: Option<String>,
    pub stock: Option<String>,
    pub directory: Vec<Directory>,
    pub campaign: Vec<Campaign>,
    /// Deep copy of the product mapping as received.
    #[serde(skip)]
    pub raw: RawMap,
}

impl FromRaw for Item {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            service_code: decode::string(raw, "service_code"),
            service_name: decode::string(raw, "service_name"),
            floor_code: decode::string(raw, "floor_code"),
            floor_name: decode::string(raw, "floor_name"),
            category_name: decode::string(raw, "category_name"),
            content_id: decode::string(raw, "content_id"),
            product_id: decode::string(raw, "product_id"),
            title: decode::string(raw, "title"),
            volume: decode::opt_string(raw, "volume"),
            number: decode::opt_string(raw, "number"),
            review: decode::nested(raw, "review"),
            url: decode::string(raw, "URL"),
            url_sp: decode::opt_string(raw, "URLsp"),
            affiliate_url: decode::string(raw, "affiliateURL"),
            affiliate_url_sp: decode::opt_string(raw, "affiliateURLsp"),
            image_url: decode::nested(raw, "imageURL"),
            tachiyomi: decode::nested(raw, "tachiyomi"),
            sample_image_url: decode::nested(raw, "sampleImageURL"),
            sample_movie_url: decode::nested(raw, "sampleMovieURL"),
            prices: decode::nested(raw, "prices"),
            date: decode::datetime(raw, "date"),
            item_info: decode::nested(raw, "iteminfo"),
            cd_info: decode::nested(raw, "cdinfo"),
            jancode: decode::opt_string(raw, "jancode"),
            maker_product: decode::opt_string(raw, "maker_product"),
            isbn: decode::opt_string(raw, "isbn"),
            stock: decode::opt_string(raw, "stock"),
            directory: decode::list(raw, "directory"),
            campaign: decode::list(raw, "campaign"),
            raw: raw.clone(),
        }
    }
}

impl Item {
    /// Extracted sale price, if the product has a price block.
    pub fn price(&self) -> Option<u64> {
        self.prices.as_ref().and_then(|p| p.price)
    }

    /// Names of the performers credited on the product.
    pub fn actress_names(&self) -> Vec<&str> {
        self.item_info
            .iter()
            .flat_map(|info| info.actress.iter().map(|a| a.name.as_str()))
            .collect()
    }
}
