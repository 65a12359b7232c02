use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One element of the `products` array returned by Open Food Facts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Product {
    #[serde(default, deserialize_with = "code_from_any")]
    pub code: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub nutriments: Nutriments,
    #[serde(default, deserialize_with = "tags_or_empty")]
    pub countries_tags: Vec<String>,
}

/// Barcodes arrive as strings, occasionally as bare numbers, and sometimes as `null`.
fn code_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a product code, got {other}"
        ))),
    }
}

// `null` list or `null` items
fn tags_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(tags.unwrap_or_default().into_iter().flatten().collect())
}

/// The loosely structured `nutriments` payload, decoded once at the API boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Nutriments {
    #[default]
    Absent,
    /// Present, but not a JSON object.
    Malformed(Value),
    Map(Map<String, Value>),
}

/// Result of looking up one nutrient inside [`Nutriments`].
#[derive(Debug, Clone, PartialEq)]
pub enum KcalValue {
    Absent,
    Numeric(f64),
    NonNumeric(Value),
}

impl Nutriments {
    pub const ENERGY_KCAL: &'static str = "energy-kcal";

    pub fn lookup(&self, key: &str) -> KcalValue {
        let Nutriments::Map(map) = self else {
            return KcalValue::Absent;
        };

        match map.get(key) {
            None | Some(Value::Null) => KcalValue::Absent,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) => KcalValue::Numeric(v),
                None => KcalValue::NonNumeric(Value::Number(n.clone())),
            },
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) => KcalValue::Numeric(v),
                Err(_) => KcalValue::NonNumeric(Value::String(s.clone())),
            },
            Some(other) => KcalValue::NonNumeric(other.clone()),
        }
    }

    pub fn energy_kcal(&self) -> KcalValue {
        self.lookup(Self::ENERGY_KCAL)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Nutriments::Absent => Value::Null,
            Nutriments::Malformed(v) => v.clone(),
            Nutriments::Map(map) => Value::Object(map.clone()),
        }
    }
}

impl From<Value> for Nutriments {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Nutriments::Absent,
            Value::Object(map) => Nutriments::Map(map),
            other => Nutriments::Malformed(other),
        }
    }
}

impl<'de> Deserialize<'de> for Nutriments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Nutriments::from)
    }
}

impl Serialize for Nutriments {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

/// A [`Product`] with its derived energy value attached.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedProduct {
    pub product: Product,
    /// Country code whose fetch produced this row, when known.
    pub country: Option<String>,
    pub kcal_per100: f64,
}
