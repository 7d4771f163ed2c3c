use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

/// Token the observations endpoint reads as "every value of this dimension".
pub const WILDCARD: &str = "*";

/// Paged listing envelope used by `/datasets`, `/editions`, `/dimensions` and `/options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub count: u32,
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub offset: u32,
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub limit: u32,
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub total_count: u32,
}

/// Serde helper: parse `u32` from either a JSON number or a string.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom("negative value for u32"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

/// Observation values arrive as strings (`"101.2"`, or markers like `"."`), but
/// some responses use bare numbers. Normalize both to text.
fn de_string_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a string or number observation value")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
            Ok(s.to_string())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLinks {
    #[serde(default)]
    pub editions: Option<Link>,
    #[serde(default)]
    pub latest_version: Option<Link>,
}

/// A published dataset as listed by `/datasets` or `/datasets/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub links: DatasetLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionLinks {
    #[serde(default)]
    pub latest_version: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    pub edition: String,
    #[serde(default)]
    pub links: EditionLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionLinks {
    #[serde(default)]
    pub options: Option<Link>,
}

/// Raw entry from `{version}/dimensions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionEntry {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub links: DimensionLinks,
}

impl DimensionEntry {
    /// Path segment of the options listing; the service names it in `links.options.id`.
    pub fn options_id(&self) -> &str {
        self.links
            .options
            .as_ref()
            .and_then(|l| l.id.as_deref())
            .unwrap_or(&self.name)
    }
}

/// One legal value of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionOption {
    pub option: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// A dimension together with its options, in the order the service lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub label: Option<String>,
    pub options: Vec<DimensionOption>,
}

impl Dimension {
    pub fn codes(&self) -> BTreeSet<&str> {
        self.options.iter().map(|o| o.option.as_str()).collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.options.iter().any(|o| o.option == code)
    }
}

/// Dimension name to dimension.
pub type Dimensions = BTreeMap<String, Dimension>;

/// The value picked for one dimension of an observations query.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    Option(String),
    Wildcard,
}

impl Choice {
    pub fn as_query_value(&self) -> &str {
        match self {
            Choice::Option(code) => code,
            Choice::Wildcard => WILDCARD,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

impl From<&str> for Choice {
    fn from(s: &str) -> Self {
        if s == WILDCARD {
            Choice::Wildcard
        } else {
            Choice::Option(s.to_string())
        }
    }
}

impl From<String> for Choice {
    fn from(s: String) -> Self {
        if s == WILDCARD {
            Choice::Wildcard
        } else {
            Choice::Option(s)
        }
    }
}

/// Dimension name to chosen value. Completeness is checked by the service, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection(BTreeMap<String, Choice>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dimension: impl Into<String>, choice: impl Into<Choice>) -> Self {
        self.set(dimension, choice);
        self
    }

    pub fn with_wildcard(self, dimension: impl Into<String>) -> Self {
        self.with(dimension, Choice::Wildcard)
    }

    pub fn set(&mut self, dimension: impl Into<String>, choice: impl Into<Choice>) {
        self.0.insert(dimension.into(), choice.into());
    }

    pub fn get(&self, dimension: &str) -> Option<&Choice> {
        self.0.get(dimension)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Choice)> {
        self.0.iter()
    }

    /// One `name=value` pair per dimension, wildcard as `*`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.as_query_value().to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Choice>> FromIterator<(K, V)> for Selection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut s = Selection::new();
        for (k, v) in iter {
            s.set(k, v);
        }
        s
    }
}

/// The concrete value an observation carries for a wildcarded dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationDimension {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}

/// One data point from `{version}/observations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub dimensions: BTreeMap<String, ObservationDimension>,
    #[serde(deserialize_with = "de_string_from_string_or_number")]
    pub observation: String,
    /// Status flags and the like, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

fn trailing_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})\s*$").expect("valid year regex"))
}

impl Observation {
    /// Entry for the time dimension. The service capitalizes it (`Time`) in observations.
    pub fn time(&self) -> Option<&ObservationDimension> {
        self.dimensions
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("time"))
            .map(|(_, v)| v)
    }

    /// Numeric value, or `None` for suppressed/marker values.
    pub fn value(&self) -> Option<f64> {
        self.observation
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Year taken from the last four digits of the time id (`"Aug-2016"` -> 2016).
    pub fn year(&self) -> Option<i32> {
        let id = &self.time()?.id;
        trailing_year()
            .captures(id)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// Body of `{version}/observations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    pub observations: Vec<Observation>,
    #[serde(default)]
    pub total_observations: Option<u64>,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
}

/// Everything [`crate::Client::get_timeseries`] gathered on the way to the data.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub version_url: String,
    pub selection: Selection,
    pub observations: Observations,
}
