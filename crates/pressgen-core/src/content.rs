//! Content records loaded from the site's JSON data files.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Identifier or foreign key of a record.
///
/// Data files mix numeric and string ids. Comparison is strict: `1` and `"1"`
/// are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric id, e.g. `3`.
    Int(i64),
    /// String id, e.g. `"teknologi"`.
    Str(String),
}

impl Default for RecordId {
    fn default() -> Self {
        Self::Str(String::new())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

/// A news article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Headline; the page slug is derived from it.
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,

    /// Short summary used in cards and meta descriptions.
    #[serde(deserialize_with = "lenient::string")]
    pub excerpt: String,

    /// Article body as an HTML fragment.
    #[serde(deserialize_with = "lenient::string")]
    pub content: String,

    /// Cover image URL.
    #[serde(deserialize_with = "lenient::string")]
    pub image: String,

    /// Publication date as written in the data file.
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,

    /// Author id.
    #[serde(deserialize_with = "lenient::record_id")]
    pub author: RecordId,

    /// Category id.
    #[serde(deserialize_with = "lenient::record_id")]
    pub category: RecordId,

    /// Reading time label, e.g. "5 menit".
    #[serde(rename = "readTime", deserialize_with = "lenient::string")]
    pub read_time: String,
}

/// An article author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "lenient::record_id")]
    pub id: RecordId,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub bio: String,

    /// Avatar image URL.
    #[serde(deserialize_with = "lenient::string")]
    pub avatar: String,

    #[serde(deserialize_with = "lenient::optional_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    pub whatsapp: Option<String>,
}

/// A news category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    #[serde(deserialize_with = "lenient::record_id")]
    pub id: RecordId,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub excerpt: String,

    /// Banner image URL.
    #[serde(deserialize_with = "lenient::string")]
    pub image: String,
}

/// A digital product listed in the shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(deserialize_with = "lenient::record_id")]
    pub id: RecordId,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,

    /// Price in whole currency units, kept exactly as written. A numeric
    /// string is read as its number.
    #[serde(deserialize_with = "lenient::price")]
    pub price: Number,

    #[serde(deserialize_with = "lenient::string")]
    pub thumbnail_url: String,

    /// Preview/demo link.
    #[serde(deserialize_with = "lenient::string")]
    pub file_url: String,

    #[serde(deserialize_with = "lenient::record_id")]
    pub category_id: RecordId,

    /// Inactive products get neither a page nor a shop card.
    #[serde(deserialize_with = "lenient::flag")]
    pub is_active: bool,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: RecordId::default(),
            title: String::new(),
            description: String::new(),
            price: Number::from(0),
            thumbnail_url: String::new(),
            file_url: String::new(),
            category_id: RecordId::default(),
            is_active: false,
        }
    }
}

/// A generated page, as listed in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// File stem of the page; the page lives at `<slug>.html`.
    pub slug: String,

    /// Page title.
    pub title: String,

    /// Publication date of the underlying record, when it has one.
    #[serde(default)]
    pub date: Option<String>,
}

impl Page {
    /// Create a page entry without a date.
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            date: None,
        }
    }

    /// Attach a publication date.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Output file name of the page.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.slug)
    }
}

/// Field decoders that accept what the data files actually contain.
///
/// `null` becomes the field default. Scalars are coerced the way the pages
/// print them. Only values with no sensible reading fail the record.
mod lenient {
    use serde::{Deserialize, Deserializer, de::Error};
    use serde_json::{Number, Value};

    use super::RecordId;
    use crate::format::number_text;

    fn text<E: Error>(value: Value) -> Result<String, E> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(number_text(&n)),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(E::custom(format!("expected text, found {other}"))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        text(Value::deserialize(deserializer)?)
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => text(value).map(Some),
        }
    }

    pub fn record_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RecordId, D::Error> {
        Ok(Option::<RecordId>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Truthiness: `0`, `""`, `false` and `null` are false.
    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => false,
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        })
    }

    /// A number, or a string holding one.
    pub fn price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Number, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Number::from(0)),
            Value::Number(n) => Ok(n),
            Value::String(s) => serde_json::from_str::<Number>(s.trim())
                .map_err(|_| D::Error::custom(format!("price is not a number: {s:?}"))),
            other => Err(D::Error::custom(format!("price is not a number: {other}"))),
        }
    }
}
