//! Product wire types exchanged with the catalog service.

use serde::{Deserialize, Deserializer, Serialize};

// == Product Record ==
/// A product as returned by the catalog.
///
/// Every field is optional on the wire: a partial payload degrades
/// classification instead of failing the probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub version: Option<i64>,
}

/// Page of products returned by the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

// == Product Update ==
/// Body of a price/stock update (POST /products/:id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub price: f64,
    pub stock: i64,
}

// == Cache Signal ==
/// Cache outcome reported by the catalog itself, when it chooses to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheSignal {
    Hit,
    Miss,
}

impl CacheSignal {
    /// Parses a cache status header value such as `HIT`, `miss` or `HIT from edge`.
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if value.starts_with("hit") {
            Some(CacheSignal::Hit)
        } else if value.starts_with("miss") {
            Some(CacheSignal::Miss)
        } else {
            None
        }
    }
}

/// Accepts the price either as a JSON number or as a decimal string.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Price>::deserialize(deserializer)? {
        Some(Price::Number(n)) => Some(n),
        Some(Price::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
