//! Location records and the lenient decoding of the content feed.
//!
//! The feed is a WordPress REST listing with ACF custom fields. Any optional
//! field may be missing, null or of the wrong type; decoding never fails on
//! those, it falls back to an empty value instead.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Display label for records without a usable name
pub const UNNAMED_LOCATION: &str = "Unnamed Location";

const REGION_CLASS_PREFIX: &str = "state-";

/// The source data for this site carries the wrong coordinates.
const MODBURY_MATCH: &str = "modbury";
const MODBURY_COORDINATES: Coordinates = Coordinates {
    longitude: 138.69172072516687,
    latitude: -34.82960547422781,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns None unless both values are finite, non-zero and on the globe.
    /// Zero is treated as missing, the feed uses it as a placeholder.
    pub fn checked(longitude: f64, latitude: f64) -> Option<Self> {
        let valid = longitude.is_finite()
            && latitude.is_finite()
            && longitude != 0.0
            && latitude != 0.0
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude);
        valid.then_some(Self::new(longitude, latitude))
    }
}

/// A single gym location, read-only once decoded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    /// Slug derived from the display name; empty when there is no name
    pub id: String,
    pub name: Option<String>,
    /// None when the record has no usable coordinates; such locations are
    /// listed but never placed on the map
    pub coordinates: Option<Coordinates>,
    /// Upper-cased region tag (e.g. `WA`), empty when unclassified
    pub region: String,
    pub address: String,
    pub size: Option<String>,
    pub phone: Option<String>,
    pub link: Option<String>,
    pub map_link: Option<String>,
    pub gallery: Vec<String>,
    pub is_presale: bool,
    pub has_amenity: bool,
}

impl Location {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_LOCATION)
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Build a location from one raw feed record. Never fails: anything that
    /// is not shaped like a record decodes as an empty location.
    pub fn from_record(record: Value) -> Self {
        let raw: RawRecord = serde_json::from_value(record).unwrap_or_default();
        let acf = raw.acf.unwrap_or_default();

        let name = raw
            .title
            .and_then(|title| title.rendered)
            .map(|rendered| decode_entities(rendered.trim()))
            .filter(|name| !name.is_empty());

        let id = name.as_deref().map(slugify).unwrap_or_default();

        let coordinates = match name.as_deref() {
            Some(name) if name.to_lowercase().contains(MODBURY_MATCH) => Some(MODBURY_COORDINATES),
            _ => acf
                .longitude
                .as_ref()
                .and_then(Scalar::as_f64)
                .zip(acf.latitude.as_ref().and_then(Scalar::as_f64))
                .and_then(|(longitude, latitude)| Coordinates::checked(longitude, latitude)),
        };

        let region = raw
            .class_list
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
            .find_map(|class| class.strip_prefix(REGION_CLASS_PREFIX))
            .map(str::to_uppercase)
            .unwrap_or_default();

        let gallery = acf
            .gallery
            .unwrap_or_default()
            .iter()
            .filter_map(|image| match image {
                Value::String(url) => Some(url.as_str()),
                Value::Object(fields) => fields.get("url").and_then(Value::as_str),
                _ => None,
            })
            .filter(|url| !url.is_empty())
            .map(String::from)
            .collect();

        Self {
            id,
            name,
            coordinates,
            region,
            address: non_empty(acf.custom_address.map(Scalar::into_text)).unwrap_or_default(),
            size: non_empty(acf.size.map(Scalar::into_text)),
            phone: non_empty(acf.phone.map(Scalar::into_text)),
            link: non_empty(raw.link),
            map_link: non_empty(acf.map_link),
            gallery,
            is_presale: acf.is_presale.as_ref().is_some_and(truthy),
            has_amenity: acf.studio_available.as_ref().is_some_and(truthy),
        }
    }
}

/// Decode a full feed body. Only a body that is not a JSON array is an
/// error; individual records always decode.
pub fn decode_feed(body: &str) -> Result<Vec<Location>, serde_json::Error> {
    let records: Vec<Value> = serde_json::from_str(body)?;
    Ok(records.into_iter().map(Location::from_record).collect())
}

/// Lower-case the name, then keep only ASCII letters, digits, `_` and `-`.
/// Whitespace, punctuation and non-ASCII characters are dropped.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .collect()
}

/// Decode the HTML entities WordPress puts into rendered titles
pub fn decode_entities(input: &str) -> String {
    let mut decoded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let tail = &rest[start..];

        let entity = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|ch| (ch, end)));

        match entity {
            Some((ch, end)) => {
                decoded.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &tail[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Loose truthiness, the way the feed's flags were consumed originally
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Deserialize a field, turning any type mismatch into None
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(number) => Some(*number),
            Scalar::Text(text) => text.trim().parse().ok(),
        }
    }

    fn into_text(self) -> String {
        match self {
            Scalar::Number(number) => number.to_string(),
            Scalar::Text(text) => text,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    #[serde(deserialize_with = "lenient")]
    title: Option<RawTitle>,
    #[serde(deserialize_with = "lenient")]
    link: Option<String>,
    #[serde(deserialize_with = "lenient")]
    class_list: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient")]
    acf: Option<RawAcf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTitle {
    #[serde(deserialize_with = "lenient")]
    rendered: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAcf {
    #[serde(deserialize_with = "lenient")]
    latitude: Option<Scalar>,
    #[serde(deserialize_with = "lenient")]
    longitude: Option<Scalar>,
    #[serde(deserialize_with = "lenient")]
    custom_address: Option<Scalar>,
    #[serde(deserialize_with = "lenient")]
    map_link: Option<String>,
    #[serde(deserialize_with = "lenient")]
    size: Option<Scalar>,
    #[serde(deserialize_with = "lenient")]
    phone: Option<Scalar>,
    #[serde(deserialize_with = "lenient")]
    gallery: Option<Vec<Value>>,
    is_presale: Option<Value>,
    studio_available: Option<Value>,
}
