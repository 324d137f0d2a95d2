//! Actress records returned by `ActressSearch`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::decode::{self, FromRaw, RawMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActressImage {
    pub small: String,
    pub large: String,
}

impl FromRaw for ActressImage {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            small: decode::string(raw, "small"),
            large: decode::string(raw, "large"),
        }
    }
}

/// Listing pages for the actress per service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActressListUrl {
    pub digital: String,
    pub monthly: String,
    pub mono: String,
}

impl FromRaw for ActressListUrl {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            digital: decode::string(raw, "digital"),
            monthly: decode::string(raw, "monthly"),
            mono: decode::string(raw, "mono"),
        }
    }
}

/// Measurements are in centimetres and are `None` when the Provider has no
/// value for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actress {
    pub id: u64,
    pub name: String,
    pub ruby: String,
    pub bust: Option<u32>,
    pub cup: Option<String>,
    pub waist: Option<u32>,
    pub hip: Option<u32>,
    pub height: Option<u32>,
    pub birthday: Option<NaiveDate>,
    pub blood_type: Option<String>,
    pub hobby: Option<String>,
    pub prefectures: Option<String>,
    pub image_url: Option<ActressImage>,
    pub list_url: Option<ActressListUrl>,
    #[serde(skip)]
    pub raw: RawMap,
}

fn non_empty(raw: &RawMap, key: &str) -> Option<String> {
    decode::opt_string(raw, key).filter(|s| !s.is_empty())
}

impl FromRaw for Actress {
    fn from_raw(raw: &RawMap) -> Self {
        Self {
            id: decode::u64_or(raw, "id", 0),
            name: decode::string(raw, "name"),
            ruby: decode::string(raw, "ruby"),
            bust: decode::opt_u32(raw, "bust"),
            cup: non_empty(raw, "cup"),
            waist: decode::opt_u32(raw, "waist"),
            hip: decode::opt_u32(raw, "hip"),
            height: decode::opt_u32(raw, "height"),
            birthday: decode::date(raw, "birthday"),
            blood_type: non_empty(raw, "blood_type"),
            hobby: non_empty(raw, "hobby"),
            prefectures: non_empty(raw, "prefectures"),
            image_url: decode::nested(raw, "imageURL"),
            list_url: decode::nested(raw, "listURL"),
            raw: raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn map(value: Value) -> RawMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn decodes_full_record() {
        let actress = Actress::from_raw(&map(json!({
            "id": "1011199",
            "name": "河北彩花",
            "ruby": "かわきたさいか",
            "bust": "85",
            "cup": "D",
            "waist": "56",
            "hip": "84",
            "height": "160",
            "birthday": "1998-10-12",
            "blood_type": null,
            "hobby": "",
            "prefectures": "埼玉県",
            "imageURL": {
                "small": "http://pics.dmm.co.jp/mono/actjpgs/thumbnail/kawakita_saika.jpg",
                "large": "http://pics.dmm.co.jp/mono/actjpgs/kawakita_saika.jpg"
            },
            "listURL": {"digital": "d", "monthly": "m", "mono": "o"}
        })));
        assert_eq!(actress.id, 1011199);
        assert_eq!(actress.bust, Some(85));
        assert_eq!(actress.cup.as_deref(), Some("D"));
        assert_eq!(actress.birthday, NaiveDate::from_ymd_opt(1998, 10, 12));
        assert_eq!(actress.blood_type, None);
        assert_eq!(actress.hobby, None);
        assert!(actress.image_url.unwrap().large.ends_with("kawakita_saika.jpg"));
        assert_eq!(actress.list_url.unwrap().mono, "o");
    }

    #[test]
    fn missing_measurements_are_no_value() {
        let actress = Actress::from_raw(&map(json!({"id": 7, "name": "X", "bust": null, "height": ""})));
        assert_eq!(actress.bust, None);
        assert_eq!(actress.height, None);
        assert_eq!(actress.birthday, None);
        assert!(actress.image_url.is_none());
        assert!(actress.list_url.is_none());
    }
}
